use super::labels::{manage, LabelSubject};
use super::{page_info, page_request};
use crate::error::Result;
use crate::labels::{LabelOperation, LabelSet};
use crate::model::LabelTarget;
use crate::pagination::Pagination;
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::resolve::ReferenceResolver;
use crate::responses::{LabelsManaged, PipelineView, PipelinesList};

pub fn list<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    pagination: &Pagination,
    filter: Option<&str>,
    show_labels: bool,
) -> Result<PipelinesList> {
    let request = page_request(pagination, filter)?;
    let ws = ReferenceResolver::new(platform).resolve_workspace(workspace)?;
    let page = platform.list_pipelines(ws.id, &request)?;
    Ok(PipelinesList {
        workspace: ws.display_ref(),
        pagination: Some(page_info(&page, &request)),
        pipelines: page.items,
        show_labels,
    })
}

pub fn view<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    pipeline: &str,
) -> Result<PipelineView> {
    let resolver = ReferenceResolver::new(platform);
    let ws = resolver.resolve_workspace(workspace)?;
    let pipeline = resolver.resolve_pipeline(pipeline, &ws)?;
    Ok(PipelineView {
        workspace: ws.display_ref(),
        pipeline,
    })
}

pub fn labels<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    pipeline: &str,
    operation: LabelOperation,
    requested: &LabelSet,
) -> Result<LabelsManaged> {
    let resolver = ReferenceResolver::new(platform);
    let ws = resolver.resolve_workspace(workspace)?;
    let pipeline = resolver.resolve_pipeline(pipeline, &ws)?;
    let subject = LabelSubject {
        target: LabelTarget::Pipeline,
        id: pipeline.pipeline_id.to_string(),
        name: pipeline.name.clone(),
        labels: &pipeline.labels,
    };
    manage(platform, &ws, subject, operation, requested)
}
