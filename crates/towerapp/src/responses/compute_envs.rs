use super::{date, or_empty, time_ago};
use crate::model::ComputeEnv;
use crate::render::{Column, Response, Row, TableView};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeEnvsList {
    pub workspace: String,
    pub compute_envs: Vec<ComputeEnv>,
}

impl Response for ComputeEnvsList {
    fn table(&self) -> TableView {
        let rows = self
            .compute_envs
            .iter()
            .map(|ce| {
                let id = if ce.is_primary() {
                    format!("*{}", ce.id)
                } else {
                    ce.id.clone()
                };
                Row::new([
                    id,
                    or_empty(ce.status.as_deref()),
                    ce.platform.clone(),
                    ce.name.clone(),
                    time_ago(ce.last_used),
                ])
                .highlighted(ce.is_primary())
            })
            .collect();
        TableView::new(
            format!("Compute environments at {} workspace:", self.workspace),
            vec![
                Column::fixed("ID"),
                Column::fixed("Status"),
                Column::fixed("Platform"),
                Column::fixed("Name"),
                Column::fixed("Last activity"),
            ],
        )
        .rows(rows)
        .empty_notice("No compute environments found")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeEnvView {
    pub workspace: String,
    pub compute_env: ComputeEnv,
}

impl Response for ComputeEnvView {
    fn table(&self) -> TableView {
        let ce = &self.compute_env;
        let mut text = Vec::new();
        if let Some(config) = &ce.config {
            text.push(String::new());
            text.push("  Configuration:".to_string());
            text.push(String::new());
            let pretty = serde_json::to_string_pretty(config).unwrap_or_default();
            text.extend(pretty.lines().map(|l| format!("    {}", l)));
        }
        TableView::properties(
            format!(
                "Compute environment at {} workspace:",
                self.workspace
            ),
            [
                ("ID", ce.id.clone()),
                ("Name", ce.name.clone()),
                ("Platform", ce.platform.clone()),
                ("Status", or_empty(ce.status.as_deref())),
                ("Primary", ce.is_primary().to_string()),
                ("Credentials", or_empty(ce.credentials_id.as_deref())),
                ("Created", date(ce.date_created)),
                ("Last used", date(ce.last_used)),
            ],
        )
        .text(text)
    }
}

/// The exported definition, written to `path` or carried inline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeEnvExported {
    pub compute_env_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub definition: serde_json::Value,
}

impl Response for ComputeEnvExported {
    fn table(&self) -> TableView {
        match &self.path {
            Some(path) => TableView::message(format!(
                "Compute environment '{}' exported into '{}' file",
                self.compute_env_name, path
            )),
            None => {
                let pretty = serde_json::to_string_pretty(&self.definition).unwrap_or_default();
                let mut text = vec![String::new()];
                text.extend(pretty.lines().map(|l| format!("    {}", l)));
                TableView::message(format!(
                    "Compute environment '{}' definition:",
                    self.compute_env_name
                ))
                .text(text)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryComputeEnv {
    pub workspace: String,
    pub compute_env_id: String,
    pub compute_env_name: String,
    /// `true` when the command changed the primary environment.
    pub updated: bool,
}

impl Response for PrimaryComputeEnv {
    fn table(&self) -> TableView {
        let verb = if self.updated { "was set to" } else { "is" };
        TableView::message(format!(
            "Primary compute environment for workspace {} {} '{} ({})'",
            self.workspace, verb, self.compute_env_name, self.compute_env_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::fixtures::compute_env;
    use crate::render::{render, OutputFormat, RenderOptions};

    fn list() -> ComputeEnvsList {
        let mut first = compute_env("ce1", "aws-prod", true);
        first.config = None;
        let mut second = compute_env("ce2", "aws-dev", false);
        second.config = None;
        ComputeEnvsList {
            workspace: "[acme / rnaseq]".into(),
            compute_envs: vec![first, second],
        }
    }

    #[test]
    fn test_primary_marked() {
        let out = render(&list(), &RenderOptions::default()).unwrap();
        assert!(out.contains("    *ce1 | AVAILABLE | aws-batch | aws-prod | never"));
        assert!(out.contains("    ce2  | AVAILABLE | aws-batch | aws-dev  | never"));
    }

    #[test]
    fn test_list_json() {
        let out = render(&list(), &RenderOptions::new(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["computeEnvs"][0]["primary"], true);
        assert!(value["computeEnvs"][0].get("config").is_none());
    }

    #[test]
    fn test_view_includes_configuration() {
        let view = ComputeEnvView {
            workspace: "[acme / rnaseq]".into(),
            compute_env: compute_env("ce1", "aws-prod", true),
        };
        let out = render(&view, &RenderOptions::default()).unwrap();
        assert!(out.contains("Primary     | true"));
        assert!(out.contains("  Configuration:"));
        assert!(out.contains("\"region\": \"eu-west-1\""));
    }

    #[test]
    fn test_export_messages() {
        let exported = ComputeEnvExported {
            compute_env_name: "aws-prod".into(),
            path: Some("ce.json".into()),
            definition: serde_json::json!({"name": "aws-prod"}),
        };
        let out = render(&exported, &RenderOptions::default()).unwrap();
        assert_eq!(out, "  Compute environment 'aws-prod' exported into 'ce.json' file\n");

        let inline = ComputeEnvExported {
            path: None,
            ..exported
        };
        let out = render(&inline, &RenderOptions::default()).unwrap();
        assert!(out.contains("    \"name\": \"aws-prod\""));
    }

    #[test]
    fn test_primary_messages() {
        let mut primary = PrimaryComputeEnv {
            workspace: "[acme / rnaseq]".into(),
            compute_env_id: "ce1".into(),
            compute_env_name: "aws-prod".into(),
            updated: false,
        };
        assert_eq!(
            primary.table().title,
            "Primary compute environment for workspace [acme / rnaseq] is 'aws-prod (ce1)'"
        );
        primary.updated = true;
        assert!(primary.table().title.contains("was set to"));
    }
}
