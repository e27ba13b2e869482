use super::labels::{manage, LabelSubject};
use crate::error::Result;
use crate::labels::{LabelOperation, LabelSet};
use crate::model::LabelTarget;
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::resolve::ReferenceResolver;
use crate::responses::{ActionsList, LabelsManaged};

pub fn list<P: PlatformApi>(platform: &P, workspace: &Reference) -> Result<ActionsList> {
    let ws = ReferenceResolver::new(platform).resolve_workspace(workspace)?;
    let actions = platform.list_actions(ws.id)?;
    Ok(ActionsList {
        workspace: ws.display_ref(),
        actions,
    })
}

pub fn labels<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    action: &str,
    operation: LabelOperation,
    requested: &LabelSet,
) -> Result<LabelsManaged> {
    let resolver = ReferenceResolver::new(platform);
    let ws = resolver.resolve_workspace(workspace)?;
    let action = resolver.resolve_action(action, &ws)?;
    let subject = LabelSubject {
        target: LabelTarget::Action,
        id: action.id.clone(),
        name: action.name.clone(),
        labels: &action.labels,
    };
    manage(platform, &ws, subject, operation, requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::parse_labels;
    use crate::platform::memory::fixtures::*;

    #[test]
    fn test_list_actions() {
        let platform = acme();
        let list = list(&platform, &Reference::NumericId(ACME_WS_ID)).unwrap();
        assert_eq!(list.actions.len(), 1);
        assert_eq!(list.actions[0].name, "nightly");
    }

    #[test]
    fn test_add_then_remove_labels() {
        let platform = acme();
        let ws: Reference = "acme/rnaseq".parse().unwrap();

        let added = labels(&platform, &ws, "nightly", LabelOperation::Add, &parse_labels(&["prod"]))
            .unwrap();
        assert_eq!(added.target, LabelTarget::Action);
        assert_eq!(added.resource_id, "act1");
        assert_eq!(platform.action_labels(Some(ACME_WS_ID), "act1"), vec!["prod"]);

        let removed = labels(&platform, &ws, "act1", LabelOperation::Remove, &parse_labels(&["prod"]))
            .unwrap();
        assert_eq!(removed.report.removed, vec!["prod"]);
        assert!(platform.action_labels(Some(ACME_WS_ID), "act1").is_empty());
    }

    #[test]
    fn test_resource_labels_untouched_by_set() {
        let platform = acme().with_action(
            Some(ACME_WS_ID),
            action("act2", "weekly", vec![resource_label(104, "owner", "ada")]),
        );
        let result = labels(
            &platform,
            &Reference::NumericId(ACME_WS_ID),
            "weekly",
            LabelOperation::Set,
            &LabelSet::new(),
        )
        .unwrap();
        assert!(result.report.removed.is_empty());
        assert_eq!(platform.action_labels(Some(ACME_WS_ID), "act2"), vec!["owner"]);
    }
}
