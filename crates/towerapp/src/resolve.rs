//! Turns parsed [`Reference`]s into platform identifiers.
//!
//! A resolver is built per command and holds nothing but a borrow of the platform, so
//! every lookup is a fresh, read-only API call. Name matching is exact and
//! case-insensitive. A name matching several resources is an error listing the
//! candidates; picking one silently would act on the wrong workspace.

use crate::error::{Result, TowerError};
use crate::model::{Action, ComputeEnv, ComputeEnvStatus, OrgAndWorkspace, Pipeline};
use crate::platform::{PageRequest, PlatformApi};
use crate::reference::{Reference, USER_WORKSPACE_NAME};
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWorkspace {
    /// `None` addresses the caller's personal workspace.
    pub id: Option<i64>,
    pub organization_id: Option<i64>,
    pub organization_name: Option<String>,
    pub workspace_name: Option<String>,
}

impl ResolvedWorkspace {
    pub fn personal() -> Self {
        Self::default()
    }

    pub fn is_personal(&self) -> bool {
        self.id.is_none()
    }

    /// `[org / ws]` when names are known, `[id]` for bare ids, `[user]` for personal.
    pub fn display_ref(&self) -> String {
        format!("[{}]", self)
    }
}

impl fmt::Display for ResolvedWorkspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.organization_name, &self.workspace_name, self.id) {
            (Some(org), Some(ws), _) => write!(f, "{} / {}", org, ws),
            (_, _, Some(id)) => write!(f, "{}", id),
            _ => write!(f, "{}", USER_WORKSPACE_NAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOrganization {
    pub id: i64,
    pub name: Option<String>,
}

impl ResolvedOrganization {
    pub fn display_ref(&self) -> String {
        match &self.name {
            Some(name) => format!("[{}]", name),
            None => format!("[{}]", self.id),
        }
    }
}

pub struct ReferenceResolver<'a, P: PlatformApi> {
    platform: &'a P,
}

impl<'a, P: PlatformApi> ReferenceResolver<'a, P> {
    pub fn new(platform: &'a P) -> Self {
        Self { platform }
    }

    pub fn resolve_workspace(&self, reference: &Reference) -> Result<ResolvedWorkspace> {
        let resolved = match reference {
            Reference::Unset => ResolvedWorkspace::personal(),
            Reference::NumericId(id) => ResolvedWorkspace {
                id: Some(*id),
                ..Default::default()
            },
            Reference::NamePair {
                organization,
                resource,
            } => {
                let entries = self.platform.list_orgs_and_workspaces()?;
                let matches: Vec<&OrgAndWorkspace> = entries
                    .iter()
                    .filter(|e| e.org_name.eq_ignore_ascii_case(organization))
                    .filter(|e| workspace_named(e, resource))
                    .collect();
                workspace_from(single("Workspace", reference, matches, workspace_label)?)
            }
            Reference::Name(name) => {
                let entries = self.platform.list_orgs_and_workspaces()?;
                let matches: Vec<&OrgAndWorkspace> =
                    entries.iter().filter(|e| workspace_named(e, name)).collect();
                workspace_from(single("Workspace", reference, matches, workspace_label)?)
            }
        };
        debug!(reference = %reference, workspace = ?resolved.id, "resolved workspace");
        Ok(resolved)
    }

    pub fn resolve_organization(&self, reference: &Reference) -> Result<ResolvedOrganization> {
        let resolved = match reference {
            Reference::Unset => return Err(TowerError::MissingReference("organization")),
            Reference::NamePair { .. } => {
                return Err(TowerError::InvalidReference(reference.to_string()))
            }
            Reference::NumericId(id) => ResolvedOrganization { id: *id, name: None },
            Reference::Name(name) => {
                let entries = self.platform.list_orgs_and_workspaces()?;
                let mut orgs: Vec<(i64, &str)> = entries
                    .iter()
                    .filter(|e| e.org_name.eq_ignore_ascii_case(name))
                    .map(|e| (e.org_id, e.org_name.as_str()))
                    .collect();
                orgs.sort();
                orgs.dedup();
                let (id, org_name) =
                    single("Organization", reference, orgs, |(id, n)| format!("{} ({})", n, id))?;
                ResolvedOrganization {
                    id,
                    name: Some(org_name.to_string()),
                }
            }
        };
        debug!(reference = %reference, organization = resolved.id, "resolved organization");
        Ok(resolved)
    }

    /// Explicit reference, or the workspace's primary environment when absent.
    pub fn resolve_compute_env(
        &self,
        reference: Option<&str>,
        workspace: &ResolvedWorkspace,
    ) -> Result<ComputeEnv> {
        let reference = match reference.map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => r,
            None => return self.primary_compute_env(workspace),
        };
        let envs = self
            .platform
            .list_compute_envs(workspace.id, Some(ComputeEnvStatus::Available))?;
        let matches: Vec<ComputeEnv> = envs
            .into_iter()
            .filter(|ce| ce.id == reference || ce.name.eq_ignore_ascii_case(reference))
            .collect();
        let ce = single("Compute environment", reference, matches, |ce| {
            format!("{} ({})", ce.name, ce.id)
        })?;
        debug!(reference, id = %ce.id, "resolved compute environment");
        Ok(ce)
    }

    pub fn primary_compute_env(&self, workspace: &ResolvedWorkspace) -> Result<ComputeEnv> {
        let envs = self
            .platform
            .list_compute_envs(workspace.id, Some(ComputeEnvStatus::Available))?;
        let mut primaries: Vec<ComputeEnv> = envs.into_iter().filter(|ce| ce.is_primary()).collect();
        match primaries.len() {
            0 => Err(TowerError::NoPrimaryComputeEnvironment {
                workspace: workspace.display_ref(),
            }),
            1 => {
                let ce = primaries.remove(0);
                debug!(id = %ce.id, "using primary compute environment");
                Ok(ce)
            }
            count => Err(TowerError::AmbiguousPrimaryComputeEnvironment {
                workspace: workspace.display_ref(),
                count,
            }),
        }
    }

    /// Name or numeric id. Names are searched on the platform, then matched exactly.
    pub fn resolve_pipeline(
        &self,
        reference: &str,
        workspace: &ResolvedWorkspace,
    ) -> Result<Pipeline> {
        let reference = non_blank(reference, "pipeline")?;
        if let Ok(Reference::NumericId(id)) = reference.parse::<Reference>() {
            return match self.platform.describe_pipeline(id, workspace.id) {
                Ok(pipeline) => Ok(pipeline),
                Err(TowerError::Api { status: 404, .. }) => {
                    Err(TowerError::not_found("Pipeline", reference))
                }
                Err(err) => Err(err),
            };
        }
        let page = PageRequest::all().with_search(Some(reference.to_string()));
        let found = self.platform.list_pipelines(workspace.id, &page)?;
        let matches: Vec<Pipeline> = found
            .items
            .into_iter()
            .filter(|p| p.name.eq_ignore_ascii_case(reference))
            .collect();
        let pipeline = single("Pipeline", reference, matches, |p| {
            format!("{} ({})", p.name, p.pipeline_id)
        })?;
        debug!(reference, id = pipeline.pipeline_id, "resolved pipeline");
        Ok(pipeline)
    }

    pub fn resolve_action(&self, reference: &str, workspace: &ResolvedWorkspace) -> Result<Action> {
        let reference = non_blank(reference, "action")?;
        let actions = self.platform.list_actions(workspace.id)?;
        let matches: Vec<Action> = actions
            .into_iter()
            .filter(|a| a.id == reference || a.name.eq_ignore_ascii_case(reference))
            .collect();
        let action = single("Action", reference, matches, |a| {
            format!("{} ({})", a.name, a.id)
        })?;
        debug!(reference, id = %action.id, "resolved action");
        Ok(action)
    }

    /// Id of the workspace label with this exact (case-sensitive) name.
    pub fn resolve_label_id(&self, name: &str, workspace: &ResolvedWorkspace) -> Result<i64> {
        let page = PageRequest::all().with_search(Some(name.to_string()));
        let found = self
            .platform
            .list_labels(workspace.id, crate::model::LabelType::Simple, &page)?;
        let matches: Vec<i64> = found
            .items
            .into_iter()
            .filter(|l| l.name == name)
            .map(|l| l.id)
            .collect();
        single("Label", name, matches, |id| id.to_string())
    }
}

fn non_blank<'r>(reference: &'r str, kind: &'static str) -> Result<&'r str> {
    let reference = reference.trim();
    if reference.is_empty() {
        Err(TowerError::MissingReference(kind))
    } else {
        Ok(reference)
    }
}

fn workspace_named(entry: &OrgAndWorkspace, name: &str) -> bool {
    entry
        .workspace_name
        .as_deref()
        .is_some_and(|ws| ws.eq_ignore_ascii_case(name))
}

fn workspace_label(entry: &&OrgAndWorkspace) -> String {
    format!(
        "{}/{}",
        entry.org_name,
        entry.workspace_name.as_deref().unwrap_or_default()
    )
}

fn workspace_from(entry: &OrgAndWorkspace) -> ResolvedWorkspace {
    ResolvedWorkspace {
        id: entry.workspace_id,
        organization_id: Some(entry.org_id),
        organization_name: Some(entry.org_name.clone()),
        workspace_name: entry.workspace_name.clone(),
    }
}

/// Exactly one match, or the not-found / ambiguous error for `kind`.
fn single<T, R, F>(kind: &'static str, reference: R, mut matches: Vec<T>, describe: F) -> Result<T>
where
    R: ToString,
    F: Fn(&T) -> String,
{
    match matches.len() {
        0 => Err(TowerError::not_found(kind, reference.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(TowerError::ambiguous(
            kind,
            reference.to_string(),
            matches.iter().map(describe).collect(),
        )),
    }
}
