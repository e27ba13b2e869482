use super::{labels_cell, or_empty};
use crate::labels::LabelReport;
use crate::model::{Action, Label, LabelTarget, Pipeline};
use crate::pagination::PaginationInfo;
use crate::render::{Column, Response, Row, TableView};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelinesList {
    pub workspace: String,
    pub pipelines: Vec<Pipeline>,
    #[serde(skip)]
    pub pagination: Option<PaginationInfo>,
    #[serde(skip)]
    pub show_labels: bool,
}

impl Response for PipelinesList {
    fn table(&self) -> TableView {
        let rows = self
            .pipelines
            .iter()
            .map(|p| {
                Row::new([
                    p.pipeline_id.to_string(),
                    p.name.clone(),
                    or_empty(p.repository.as_deref()),
                    or_empty(p.visibility.as_deref()),
                    labels_cell(&p.labels),
                ])
            })
            .collect();
        TableView::new(
            format!("Pipelines at {} workspace:", self.workspace),
            vec![
                Column::fixed("ID"),
                Column::fixed("Name"),
                Column::fixed("Repository"),
                Column::fixed("Visibility"),
                Column::optional("Labels"),
            ],
        )
        .rows(rows)
        .empty_notice("No pipelines found")
        .pagination(self.pagination)
        .show_optional(self.show_labels)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineView {
    pub workspace: String,
    pub pipeline: Pipeline,
}

impl Response for PipelineView {
    fn table(&self) -> TableView {
        let p = &self.pipeline;
        TableView::properties(
            format!("Pipeline at {} workspace:", self.workspace),
            [
                ("ID", p.pipeline_id.to_string()),
                ("Name", p.name.clone()),
                ("Description", or_empty(p.description.as_deref())),
                ("Repository", or_empty(p.repository.as_deref())),
                ("Owner", or_empty(p.user_name.as_deref())),
                ("Visibility", or_empty(p.visibility.as_deref())),
                ("Labels", labels_cell(&p.labels)),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsList {
    pub workspace: String,
    pub actions: Vec<Action>,
}

impl Response for ActionsList {
    fn table(&self) -> TableView {
        let rows = self
            .actions
            .iter()
            .map(|a| {
                Row::new([
                    a.id.clone(),
                    a.name.clone(),
                    or_empty(a.status.as_deref()),
                    a.source.clone(),
                    or_empty(a.endpoint.as_deref()),
                    labels_cell(&a.labels),
                ])
            })
            .collect();
        TableView::new(
            format!("Actions at {} workspace:", self.workspace),
            vec![
                Column::fixed("ID"),
                Column::fixed("Name"),
                Column::fixed("Status"),
                Column::fixed("Source"),
                Column::optional("Endpoint"),
                Column::optional("Labels"),
            ],
        )
        .rows(rows)
        .empty_notice("No actions found")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelsList {
    pub workspace: String,
    pub labels: Vec<Label>,
    #[serde(skip)]
    pub pagination: Option<PaginationInfo>,
}

impl Response for LabelsList {
    fn table(&self) -> TableView {
        let rows = self
            .labels
            .iter()
            .map(|l| {
                Row::new([
                    l.id.to_string(),
                    l.name.clone(),
                    or_empty(l.value.as_deref()),
                    if l.resource { "resource" } else { "simple" }.to_string(),
                    if l.is_default { "yes" } else { "no" }.to_string(),
                ])
            })
            .collect();
        TableView::new(
            format!("Labels at {} workspace:", self.workspace),
            vec![
                Column::fixed("ID"),
                Column::fixed("Name"),
                Column::fixed("Value"),
                Column::fixed("Type"),
                Column::optional("Default"),
            ],
        )
        .rows(rows)
        .empty_notice("No labels found")
        .pagination(self.pagination)
    }
}

/// Outcome of a label command. Failed changes become warnings; the command still succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelsManaged {
    pub workspace: String,
    pub target: LabelTarget,
    pub resource_id: String,
    pub resource_name: String,
    #[serde(flatten)]
    pub report: LabelReport,
}

impl Response for LabelsManaged {
    fn table(&self) -> TableView {
        let subject = format!(
            "{} '{}' at {} workspace",
            self.target.noun(),
            self.resource_name,
            self.workspace
        );
        let warnings = self.report.failures.iter().map(|f| f.warning()).collect();
        if self.report.added.is_empty() && self.report.removed.is_empty() {
            let title = if self.report.failures.is_empty() {
                format!("No label changes for {}", subject)
            } else {
                format!("Labels of {} were not updated", subject)
            };
            return TableView::message(title).warnings(warnings);
        }
        let mut text = vec![String::new()];
        if !self.report.added.is_empty() {
            text.push(format!("    Added: {}", self.report.added.join(", ")));
        }
        if !self.report.removed.is_empty() {
            text.push(format!("    Removed: {}", self.report.removed.join(", ")));
        }
        TableView::message(format!("Labels updated on {}:", subject))
            .text(text)
            .warnings(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{LabelChange, LabelFailure};
    use crate::platform::memory::fixtures::{label, pipeline, resource_label};
    use crate::render::{render, OutputFormat, RenderOptions};

    fn pipelines() -> PipelinesList {
        PipelinesList {
            workspace: "[acme / rnaseq]".into(),
            pipelines: vec![pipeline(42, "rnaseq", vec![label(1, "prod"), resource_label(2, "owner", "ada")])],
            pagination: Some(PaginationInfo::new(1, 1, 0)),
            show_labels: false,
        }
    }

    #[test]
    fn test_labels_column_toggle() {
        let out = render(&pipelines(), &RenderOptions::default()).unwrap();
        assert!(!out.contains("Labels"));
        let shown = PipelinesList {
            show_labels: true,
            ..pipelines()
        };
        let out = render(&shown, &RenderOptions::default()).unwrap();
        assert!(out.contains("| prod, owner=ada"));
    }

    #[test]
    fn test_pipelines_json_has_labels_but_no_footer() {
        let out = render(&pipelines(), &RenderOptions::new(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["pipelines"][0]["labels"][1]["value"], "ada");
        assert!(value.get("pagination").is_none());
    }

    fn managed(report: LabelReport) -> LabelsManaged {
        LabelsManaged {
            workspace: "[acme / rnaseq]".into(),
            target: LabelTarget::Pipeline,
            resource_id: "42".into(),
            resource_name: "rnaseq".into(),
            report,
        }
    }

    #[test]
    fn test_managed_with_partial_failure() {
        let report = LabelReport {
            added: vec!["prod".into()],
            removed: vec!["legacy".into()],
            failures: vec![LabelFailure {
                label: "rna".into(),
                operation: LabelChange::Add,
                message: "API error 500: boom".into(),
            }],
        };
        let out = render(&managed(report.clone()), &RenderOptions::default()).unwrap();
        assert_eq!(
            out,
            "  Labels updated on pipeline 'rnaseq' at [acme / rnaseq] workspace:\n\
             \n    Added: prod\
             \n    Removed: legacy\
             \n\
             \n  WARNING: Could not add label 'rna': API error 500: boom\n"
        );

        let json = render(&managed(report), &RenderOptions::new(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["target"], "pipeline");
        assert_eq!(value["failures"][0]["operation"], "add");
        assert_eq!(value["added"][0], "prod");
    }

    #[test]
    fn test_managed_without_changes() {
        let out = render(&managed(LabelReport::default()), &RenderOptions::default()).unwrap();
        assert_eq!(
            out,
            "  No label changes for pipeline 'rnaseq' at [acme / rnaseq] workspace\n"
        );
    }
}
