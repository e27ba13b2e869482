use crate::error::{Result, TowerError};
use crate::model::OrgAndWorkspace;
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::resolve::ReferenceResolver;
use crate::responses::{WorkspaceView, WorkspacesList};

/// Workspaces of one organization, or of every organization when `organization` is unset.
pub fn list<P: PlatformApi>(platform: &P, organization: &Reference) -> Result<WorkspacesList> {
    if organization.is_unset() {
        let user = platform.user_info()?;
        return Ok(WorkspacesList {
            owner: user.user_name,
            by_organization: false,
            workspaces: workspaces(platform.list_orgs_and_workspaces()?, None),
        });
    }
    let org = ReferenceResolver::new(platform).resolve_organization(organization)?;
    Ok(WorkspacesList {
        owner: org.display_ref(),
        by_organization: true,
        workspaces: workspaces(platform.list_orgs_and_workspaces()?, Some(org.id)),
    })
}

pub fn view<P: PlatformApi>(platform: &P, workspace: &Reference) -> Result<WorkspaceView> {
    if workspace.is_unset() {
        return Err(TowerError::MissingReference("workspace"));
    }
    let resolved = ReferenceResolver::new(platform).resolve_workspace(workspace)?;
    let entry = platform
        .list_orgs_and_workspaces()?
        .into_iter()
        .find(|e| e.workspace_id.is_some() && e.workspace_id == resolved.id)
        .ok_or_else(|| TowerError::not_found("Workspace", workspace.to_string()))?;
    Ok(WorkspaceView { workspace: entry })
}

fn workspaces(entries: Vec<OrgAndWorkspace>, org_id: Option<i64>) -> Vec<OrgAndWorkspace> {
    entries
        .into_iter()
        .filter(|e| e.workspace_id.is_some())
        .filter(|e| org_id.map_or(true, |id| e.org_id == id))
        .collect()
}
