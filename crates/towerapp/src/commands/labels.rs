use super::{page_info, page_request};
use crate::error::{Result, TowerError};
use crate::labels::{self, LabelOperation, LabelSet};
use crate::model::{Label, LabelTarget, LabelType};
use crate::pagination::Pagination;
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::resolve::{ReferenceResolver, ResolvedWorkspace};
use crate::responses::{LabelsList, LabelsManaged};
use std::collections::HashMap;
use tracing::debug;

pub fn list<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    label_type: LabelType,
    pagination: &Pagination,
    filter: Option<&str>,
) -> Result<LabelsList> {
    let request = page_request(pagination, filter)?;
    let ws = ReferenceResolver::new(platform).resolve_workspace(workspace)?;
    let page = platform.list_labels(ws.id, label_type, &request)?;
    Ok(LabelsList {
        workspace: ws.display_ref(),
        pagination: Some(page_info(&page, &request)),
        labels: page.items,
    })
}

/// The resource a label command acts on, already resolved.
pub(crate) struct LabelSubject<'l> {
    pub target: LabelTarget,
    pub id: String,
    pub name: String,
    pub labels: &'l [Label],
}

/// Brings the simple labels of `subject` in line with `operation` and `requested`.
///
/// Resource labels are left alone. Label names not defined in the workspace fail
/// individually, like any other rejected change.
pub(crate) fn manage<P: PlatformApi>(
    platform: &P,
    ws: &ResolvedWorkspace,
    subject: LabelSubject<'_>,
    operation: LabelOperation,
    requested: &LabelSet,
) -> Result<LabelsManaged> {
    if requested.is_empty() && operation != LabelOperation::Set {
        return Err(TowerError::InvalidArgument(
            "at least one label name is required".to_string(),
        ));
    }

    let attached: HashMap<&str, i64> = subject
        .labels
        .iter()
        .filter(|l| !l.resource)
        .map(|l| (l.name.as_str(), l.id))
        .collect();
    let current: LabelSet = attached.keys().map(|name| name.to_string()).collect();
    let desired = operation.desired(&current, requested);
    let diff = labels::diff(&desired, &current);
    debug!(
        resource = %subject.id,
        add = diff.to_add.len(),
        remove = diff.to_remove.len(),
        "label diff"
    );

    let resolver = ReferenceResolver::new(platform);
    let report = labels::apply(
        &diff,
        |name| {
            let id = resolver.resolve_label_id(name, ws)?;
            platform.add_labels(subject.target, ws.id, &subject.id, &[id])
        },
        |name| {
            let id = attached
                .get(name)
                .copied()
                .ok_or_else(|| TowerError::not_found("Label", name))?;
            platform.remove_labels(subject.target, ws.id, &subject.id, &[id])
        },
    );

    Ok(LabelsManaged {
        workspace: ws.display_ref(),
        target: subject.target,
        resource_id: subject.id,
        resource_name: subject.name,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PaginationInfo;
    use crate::platform::memory::fixtures::*;

    #[test]
    fn test_list_simple_labels() {
        let platform = acme();
        let list = list(
            &platform,
            &"acme/rnaseq".parse().unwrap(),
            LabelType::Simple,
            &Pagination::default(),
            None,
        )
        .unwrap();
        let names: Vec<&str> = list.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["prod", "rna", "legacy"]);
        assert_eq!(list.pagination, Some(PaginationInfo::new(3, 3, 0)));
    }

    #[test]
    fn test_list_resource_labels_filtered() {
        let platform = acme();
        let list = list(
            &platform,
            &Reference::NumericId(ACME_WS_ID),
            LabelType::Resource,
            &Pagination::default(),
            Some("own"),
        )
        .unwrap();
        assert_eq!(list.labels.len(), 1);
        assert_eq!(list.labels[0].display(), "owner=ada");
        assert_eq!(list.workspace, format!("[{}]", ACME_WS_ID));
    }
}
