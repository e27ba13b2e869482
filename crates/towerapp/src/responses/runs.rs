use super::{date, or_empty};
use crate::metrics::{duration, MetricFormatMapper, METRIC_KEYS};
use crate::model::{ProcessMetrics, Workflow};
use crate::pagination::PaginationInfo;
use crate::render::{Column, Response, Row, TableView};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunsList {
    pub workspace: String,
    pub workflows: Vec<Workflow>,
    #[serde(skip)]
    pub pagination: Option<PaginationInfo>,
}

impl Response for RunsList {
    fn table(&self) -> TableView {
        let rows = self
            .workflows
            .iter()
            .map(|w| {
                Row::new([
                    w.id.clone(),
                    w.status.clone(),
                    or_empty(w.project_name.as_deref()),
                    w.run_name.clone(),
                    or_empty(w.user_name.as_deref()),
                    date(w.submit),
                    w.duration.map(|ms| duration(ms as f64)).unwrap_or_default(),
                ])
                .highlighted(w.status == "RUNNING")
            })
            .collect();
        TableView::new(
            format!("Pipeline runs at {} workspace:", self.workspace),
            vec![
                Column::fixed("ID"),
                Column::fixed("Status"),
                Column::fixed("Project Name"),
                Column::fixed("Run Name"),
                Column::fixed("Username"),
                Column::fixed("Submit Date"),
                Column::optional("Duration"),
            ],
        )
        .rows(rows)
        .empty_notice("No pipeline runs found")
        .pagination(self.pagination)
    }
}

/// Per-process resource usage of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetrics {
    pub workspace: String,
    pub run_id: String,
    pub metrics: Vec<ProcessMetrics>,
}

impl Response for RunMetrics {
    fn table(&self) -> TableView {
        let mapper = MetricFormatMapper::standard();
        let mut rows = Vec::new();
        for process in &self.metrics {
            for key in METRIC_KEYS {
                let Some(stats) = process.stats(key) else {
                    continue;
                };
                let mut cells = vec![process.process.clone(), key.to_string()];
                cells.extend(stats.values().iter().map(|v| mapper.format_padded(key, *v)));
                rows.push(Row::new(cells));
            }
        }
        let mut columns = vec![Column::fixed("Process"), Column::fixed("Metric")];
        columns.extend(
            ["Mean", "Min", "Q1", "Q2", "Q3", "Max"]
                .iter()
                .map(|h| Column::fixed(h).right()),
        );
        TableView::new(
            format!("Metrics of run {} at {} workspace:", self.run_id, self.workspace),
            columns,
        )
        .rows(rows)
        .empty_notice("No metrics found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::fixtures::{process_metrics, workflow};
    use crate::render::{render, OutputFormat, RenderOptions};

    #[test]
    fn test_metrics_formatting() {
        let metrics = RunMetrics {
            workspace: "[acme / rnaseq]".into(),
            run_id: "wf1".into(),
            metrics: vec![process_metrics("ALIGN")],
        };
        let out = render(&metrics, &RenderOptions::default()).unwrap();
        assert!(out.contains("ALIGN   | cpuRaw     |"));
        assert!(out.contains("95.5% |"));
        assert!(out.contains("1.5 GB |"));
        assert!(out.contains("1h 2m 3s |"));
        assert!(!out.contains("writesRaw"));
    }

    #[test]
    fn test_metrics_json_keeps_raw_numbers() {
        let metrics = RunMetrics {
            workspace: "[acme / rnaseq]".into(),
            run_id: "wf1".into(),
            metrics: vec![process_metrics("ALIGN")],
        };
        let out = render(&metrics, &RenderOptions::new(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["metrics"][0]["cpu"]["mean"], 95.5);
    }

    #[test]
    fn test_runs_table() {
        let runs = RunsList {
            workspace: "[acme / rnaseq]".into(),
            workflows: vec![workflow("wf1", "happy_turing", "SUCCEEDED")],
            pagination: Some(PaginationInfo::new(1, 2, 0)),
        };
        let out = render(&runs, &RenderOptions::default()).unwrap();
        assert!(out.contains("wf1 | SUCCEEDED | nf-core/rnaseq | happy_turing | ada"));
        assert!(out.contains("Sat, 2 Mar 2024 10:00:00 GMT"));
        assert!(out.contains("Showing 1 of 2 (offset 0)"));
        let verbose = render(&runs, &RenderOptions::default().verbose(true)).unwrap();
        assert!(verbose.contains("1h 2m 3s"));
    }
}
