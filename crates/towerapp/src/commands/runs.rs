use super::{page_info, page_request};
use crate::error::{Result, TowerError};
use crate::pagination::Pagination;
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::resolve::ReferenceResolver;
use crate::responses::{RunMetrics, RunsList};

pub fn list<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    pagination: &Pagination,
    filter: Option<&str>,
) -> Result<RunsList> {
    let request = page_request(pagination, filter)?;
    let ws = ReferenceResolver::new(platform).resolve_workspace(workspace)?;
    let page = platform.list_workflows(ws.id, &request)?;
    Ok(RunsList {
        workspace: ws.display_ref(),
        pagination: Some(page_info(&page, &request)),
        workflows: page.items,
    })
}

pub fn metrics<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    run_id: &str,
) -> Result<RunMetrics> {
    let run_id = run_id.trim();
    if run_id.is_empty() {
        return Err(TowerError::MissingReference("run"));
    }
    let ws = ReferenceResolver::new(platform).resolve_workspace(workspace)?;
    let metrics = match platform.workflow_metrics(run_id, ws.id) {
        Err(TowerError::Api { status: 404, .. }) => {
            return Err(TowerError::not_found("Pipeline run", run_id))
        }
        other => other?,
    };
    Ok(RunMetrics {
        workspace: ws.display_ref(),
        run_id: run_id.to_string(),
        metrics,
    })
}
