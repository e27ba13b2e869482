//! # API Facade
//!
//! [`TowerApp`] is the single entry point the CLI (or any other front end) uses. It is a
//! thin layer over [`crate::commands`].
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Parses references**: raw `-w`/`-o` strings become [`Reference`]s, falling back to
//!   the environment defaults captured at construction
//! - **Dispatches** to the command function for the operation
//! - **Returns structured responses**, never strings
//!
//! ## What the Facade Does NOT Do
//!
//! - **Resolution and business logic**: that lives in `commands/*.rs`
//! - **Output**: no stdout or stderr, no formatting
//! - **Configuration loading**: it receives an already-built platform and defaults
//!
//! ## Generic Over PlatformApi
//!
//! `TowerApp<P: PlatformApi>`:
//! - Production: `TowerApp<HttpPlatform>`, built with [`TowerApp::from_config`]
//! - Testing: `TowerApp<InMemoryPlatform>`
//!
//! Facade tests check that defaults and arguments reach the right command. Command
//! behavior is tested in the command modules.

use crate::commands;
use crate::config::{EnvDefaults, TowerConfig};
use crate::error::Result;
use crate::labels::{parse_labels, LabelOperation};
use crate::model::LabelType;
use crate::pagination::Pagination;
use crate::platform::http::HttpPlatform;
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::responses::*;
use std::path::Path;

pub struct TowerApp<P: PlatformApi> {
    platform: P,
    endpoint: String,
    defaults: EnvDefaults,
}

impl TowerApp<HttpPlatform> {
    pub fn from_config(config: &TowerConfig) -> Result<Self> {
        let platform = HttpPlatform::new(config)?;
        Ok(Self::new(platform, &config.endpoint, config.defaults.clone()))
    }
}

impl<P: PlatformApi> TowerApp<P> {
    pub fn new(platform: P, endpoint: &str, defaults: EnvDefaults) -> Self {
        Self {
            platform,
            endpoint: endpoint.to_string(),
            defaults,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    fn workspace(&self, raw: Option<&str>) -> Result<Reference> {
        Reference::parse(raw, &self.defaults.workspace())
    }

    fn organization(&self, raw: Option<&str>) -> Result<Reference> {
        Reference::parse(raw, &self.defaults.organization())
    }

    pub fn info(&self) -> Result<Info> {
        commands::info::run(&self.platform, &self.endpoint)
    }

    pub fn list_organizations(&self) -> Result<OrganizationsList> {
        commands::organizations::list(&self.platform)
    }

    pub fn view_organization(&self, organization: Option<&str>) -> Result<OrganizationView> {
        commands::organizations::view(&self.platform, &self.organization(organization)?)
    }

    pub fn list_workspaces(&self, organization: Option<&str>) -> Result<WorkspacesList> {
        commands::workspaces::list(&self.platform, &self.organization(organization)?)
    }

    pub fn view_workspace(&self, workspace: Option<&str>) -> Result<WorkspaceView> {
        commands::workspaces::view(&self.platform, &self.workspace(workspace)?)
    }

    pub fn list_members(
        &self,
        organization: Option<&str>,
        pagination: &Pagination,
        filter: Option<&str>,
    ) -> Result<MembersList> {
        commands::members::list_members(
            &self.platform,
            &self.organization(organization)?,
            pagination,
            filter,
        )
    }

    pub fn list_collaborators(
        &self,
        organization: Option<&str>,
        pagination: &Pagination,
    ) -> Result<CollaboratorsList> {
        commands::members::list_collaborators(
            &self.platform,
            &self.organization(organization)?,
            pagination,
        )
    }

    pub fn list_teams(
        &self,
        organization: Option<&str>,
        pagination: &Pagination,
    ) -> Result<TeamsList> {
        commands::members::list_teams(&self.platform, &self.organization(organization)?, pagination)
    }

    pub fn list_compute_envs(&self, workspace: Option<&str>) -> Result<ComputeEnvsList> {
        commands::compute_envs::list(&self.platform, &self.workspace(workspace)?)
    }

    pub fn view_compute_env(
        &self,
        workspace: Option<&str>,
        compute_env: Option<&str>,
    ) -> Result<ComputeEnvView> {
        commands::compute_envs::view(&self.platform, &self.workspace(workspace)?, compute_env)
    }

    pub fn export_compute_env(
        &self,
        workspace: Option<&str>,
        compute_env: Option<&str>,
        path: Option<&Path>,
    ) -> Result<ComputeEnvExported> {
        commands::compute_envs::export(
            &self.platform,
            &self.workspace(workspace)?,
            compute_env,
            path,
        )
    }

    pub fn get_primary_compute_env(&self, workspace: Option<&str>) -> Result<PrimaryComputeEnv> {
        commands::compute_envs::get_primary(&self.platform, &self.workspace(workspace)?)
    }

    pub fn set_primary_compute_env(
        &self,
        workspace: Option<&str>,
        compute_env: &str,
    ) -> Result<PrimaryComputeEnv> {
        commands::compute_envs::set_primary(&self.platform, &self.workspace(workspace)?, compute_env)
    }

    pub fn list_pipelines(
        &self,
        workspace: Option<&str>,
        pagination: &Pagination,
        filter: Option<&str>,
        show_labels: bool,
    ) -> Result<PipelinesList> {
        commands::pipelines::list(
            &self.platform,
            &self.workspace(workspace)?,
            pagination,
            filter,
            show_labels,
        )
    }

    pub fn view_pipeline(&self, workspace: Option<&str>, pipeline: &str) -> Result<PipelineView> {
        commands::pipelines::view(&self.platform, &self.workspace(workspace)?, pipeline)
    }

    pub fn pipeline_labels<S: AsRef<str>>(
        &self,
        workspace: Option<&str>,
        pipeline: &str,
        operation: LabelOperation,
        labels: &[S],
    ) -> Result<LabelsManaged> {
        commands::pipelines::labels(
            &self.platform,
            &self.workspace(workspace)?,
            pipeline,
            operation,
            &parse_labels(labels),
        )
    }

    pub fn list_actions(&self, workspace: Option<&str>) -> Result<ActionsList> {
        commands::actions::list(&self.platform, &self.workspace(workspace)?)
    }

    pub fn action_labels<S: AsRef<str>>(
        &self,
        workspace: Option<&str>,
        action: &str,
        operation: LabelOperation,
        labels: &[S],
    ) -> Result<LabelsManaged> {
        commands::actions::labels(
            &self.platform,
            &self.workspace(workspace)?,
            action,
            operation,
            &parse_labels(labels),
        )
    }

    pub fn list_labels(
        &self,
        workspace: Option<&str>,
        label_type: LabelType,
        pagination: &Pagination,
        filter: Option<&str>,
    ) -> Result<LabelsList> {
        commands::labels::list(
            &self.platform,
            &self.workspace(workspace)?,
            label_type,
            pagination,
            filter,
        )
    }

    pub fn list_runs(
        &self,
        workspace: Option<&str>,
        pagination: &Pagination,
        filter: Option<&str>,
    ) -> Result<RunsList> {
        commands::runs::list(&self.platform, &self.workspace(workspace)?, pagination, filter)
    }

    pub fn run_metrics(&self, workspace: Option<&str>, run_id: &str) -> Result<RunMetrics> {
        commands::runs::metrics(&self.platform, &self.workspace(workspace)?, run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TowerError;
    use crate::platform::memory::fixtures::*;
    use crate::platform::memory::InMemoryPlatform;

    fn app(defaults: EnvDefaults) -> TowerApp<InMemoryPlatform> {
        TowerApp::new(acme(), "https://tower.example/api", defaults)
    }

    #[test]
    fn test_explicit_workspace_wins_over_default() {
        let app = app(EnvDefaults {
            workspace_name: Some("globex/shared".into()),
            ..Default::default()
        });
        let list = app.list_compute_envs(Some("acme/rnaseq")).unwrap();
        assert_eq!(list.workspace, "[acme / rnaseq]");
    }

    #[test]
    fn test_workspace_default_from_environment() {
        let app = app(EnvDefaults {
            workspace_id: Some(ACME_WS_ID.to_string()),
            workspace_name: Some("globex/shared".into()),
            ..Default::default()
        });
        let list = app.list_actions(None).unwrap();
        assert_eq!(list.workspace, format!("[{}]", ACME_WS_ID));
        assert_eq!(app.platform().call_count("list_orgs_and_workspaces"), 0);
    }

    #[test]
    fn test_organization_default_from_environment() {
        let app = app(EnvDefaults {
            organization_name: Some("acme".into()),
            ..Default::default()
        });
        let teams = app.list_teams(None, &Pagination::default()).unwrap();
        assert_eq!(teams.organization, "[acme]");
        assert_eq!(teams.teams.len(), 2);
    }

    #[test]
    fn test_missing_organization() {
        let app = app(EnvDefaults::default());
        let err = app.list_collaborators(None, &Pagination::default()).unwrap_err();
        assert!(matches!(err, TowerError::MissingReference("organization")));
    }

    #[test]
    fn test_collaborators_first_page() {
        let app = app(EnvDefaults::default());
        let list = app
            .list_collaborators(Some("27736513644467"), &Pagination::default())
            .unwrap();
        assert_eq!(list.collaborators.len(), 3);
        let request = app.platform().last_page_request().unwrap();
        assert_eq!(request.max.limit(), Some(100));
        assert_eq!(request.offset, 0);
    }

    #[test]
    fn test_labels_arguments_split_on_commas() {
        let app = app(EnvDefaults::default());
        let result = app
            .pipeline_labels(Some("acme/rnaseq"), "sarek", LabelOperation::Add, &["prod,rna"])
            .unwrap();
        assert_eq!(result.report.added, vec!["prod", "rna"]);
    }

    #[test]
    fn test_info_uses_endpoint() {
        let app = app(EnvDefaults::default());
        assert_eq!(app.info().unwrap().endpoint, "https://tower.example/api");
    }
}
