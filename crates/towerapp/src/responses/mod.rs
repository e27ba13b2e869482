//! Command results.
//!
//! One struct per result kind. Each serializes to the machine formats as-is and
//! describes its own table through [`Response::table`](crate::render::Response).
//! Display-only state (page footers, column toggles) is `#[serde(skip)]`.

use crate::model::Label;
use chrono::{DateTime, Utc};

mod compute_envs;
mod info;
mod orgs;
mod pipelines;
mod runs;

pub use compute_envs::{ComputeEnvExported, ComputeEnvView, ComputeEnvsList, PrimaryComputeEnv};
pub use info::Info;
pub use orgs::{
    CollaboratorsList, MembersList, OrganizationView, OrganizationsList, TeamsList,
    WorkspaceView, WorkspacesList,
};
pub use pipelines::{ActionsList, LabelsList, LabelsManaged, PipelineView, PipelinesList};
pub use runs::{RunMetrics, RunsList};

fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn labels_cell(labels: &[Label]) -> String {
    labels
        .iter()
        .map(Label::display)
        .collect::<Vec<_>>()
        .join(", ")
}

fn time_ago(timestamp: Option<DateTime<Utc>>) -> String {
    let Some(timestamp) = timestamp else {
        return "never".to_string();
    };
    let elapsed = Utc::now().signed_duration_since(timestamp);
    timeago::Formatter::new().convert(elapsed.to_std().unwrap_or_default())
}

fn date(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format("%a, %-d %b %Y %H:%M:%S GMT").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_format() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single();
        assert_eq!(date(t), "Fri, 1 Mar 2024 09:30:00 GMT");
        assert_eq!(date(None), "");
    }

    #[test]
    fn test_time_ago() {
        assert_eq!(time_ago(None), "never");
        let hour_ago = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(time_ago(Some(hour_ago)), "1 hour ago");
    }
}
