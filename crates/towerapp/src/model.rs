//! Platform data types.
//!
//! These mirror the JSON bodies the platform returns. Field names are camelCase on the
//! wire and stay camelCase in `json`/`yaml` output, so the machine-readable contract
//! is the platform's own. Optional fields default when absent because older platform
//! versions omit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub user_name: String,
    pub email: String,
}

/// One entry of the caller's organization/workspace listing.
///
/// Entries with `workspace_id == None` describe an organization the caller belongs to
/// without naming a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgAndWorkspace {
    pub org_id: i64,
    pub org_name: String,
    #[serde(default)]
    pub workspace_id: Option<i64>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub workspace_full_name: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub org_id: i64,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub member_role: Option<String>,
}

/// Organization member or collaborator. Field order is the output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub member_id: i64,
    pub user_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeEnv {
    pub id: String,
    pub name: String,
    pub platform: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub primary: Option<bool>,
    #[serde(default)]
    pub credentials_id: Option<String>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    /// Platform-specific settings, only present when the environment is described.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl ComputeEnv {
    pub fn is_primary(&self) -> bool {
        self.primary.unwrap_or(false)
    }
}

/// Status filter accepted by the compute environment listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeEnvStatus {
    Available,
    Creating,
    Errored,
    Invalid,
}

impl ComputeEnvStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeEnvStatus::Available => "AVAILABLE",
            ComputeEnvStatus::Creating => "CREATING",
            ComputeEnvStatus::Errored => "ERRORED",
            ComputeEnvStatus::Invalid => "INVALID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub resource: bool,
    #[serde(default)]
    pub is_default: bool,
}

impl Label {
    /// `name` for simple labels, `name=value` for resource labels.
    pub fn display(&self) -> String {
        match &self.value {
            Some(value) if self.resource => format!("{}={}", self.name, value),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelType {
    Simple,
    Resource,
    All,
}

impl LabelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelType::Simple => "simple",
            LabelType::Resource => "resource",
            LabelType::All => "all",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub pipeline_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Resources that labels can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelTarget {
    Pipeline,
    Action,
}

impl LabelTarget {
    pub fn noun(&self) -> &'static str {
        match self {
            LabelTarget::Pipeline => "pipeline",
            LabelTarget::Action => "action",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub run_name: String,
    #[serde(default)]
    pub project_name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub submit: Option<DateTime<Utc>>,
    /// Milliseconds.
    #[serde(default)]
    pub duration: Option<i64>,
}

/// Distribution of one resource metric across the tasks of a process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceStats {
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub max: f64,
}

impl ResourceStats {
    pub fn values(&self) -> [f64; 6] {
        [self.mean, self.min, self.q1, self.q2, self.q3, self.max]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetrics {
    pub process: String,
    #[serde(default)]
    pub cpu: Option<ResourceStats>,
    #[serde(default)]
    pub cpu_usage: Option<ResourceStats>,
    #[serde(default)]
    pub mem: Option<ResourceStats>,
    #[serde(default)]
    pub vmem: Option<ResourceStats>,
    #[serde(default)]
    pub mem_usage: Option<ResourceStats>,
    #[serde(default)]
    pub time: Option<ResourceStats>,
    #[serde(default)]
    pub time_usage: Option<ResourceStats>,
    #[serde(default)]
    pub reads: Option<ResourceStats>,
    #[serde(default)]
    pub writes: Option<ResourceStats>,
}

impl ProcessMetrics {
    /// Looks up a metric by the key used in the metric format table.
    pub fn stats(&self, key: &str) -> Option<&ResourceStats> {
        match key {
            "cpuRaw" => self.cpu.as_ref(),
            "cpuUsage" => self.cpu_usage.as_ref(),
            "memRaw" => self.mem.as_ref(),
            "memVirtual" => self.vmem.as_ref(),
            "memUsage" => self.mem_usage.as_ref(),
            "timeRaw" => self.time.as_ref(),
            "timeUsage" => self.time_usage.as_ref(),
            "readsRaw" => self.reads.as_ref(),
            "writesRaw" => self.writes.as_ref(),
            _ => None,
        }
    }
}

/// One page of a listing plus the total the platform reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_deserializes_platform_json() {
        let json = r#"{"memberId": 7, "userName": "ada", "email": "ada@example.com", "avatar": "x"}"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.member_id, 7);
        assert_eq!(member.first_name, None);
    }

    #[test]
    fn test_compute_env_config_omitted_when_absent() {
        let ce = ComputeEnv {
            id: "ce1".into(),
            name: "aws".into(),
            platform: "aws-batch".into(),
            status: Some("AVAILABLE".into()),
            message: None,
            primary: Some(true),
            credentials_id: None,
            last_used: None,
            date_created: None,
            config: None,
        };
        let value = serde_json::to_value(&ce).unwrap();
        assert!(value.get("config").is_none());
        assert!(ce.is_primary());
    }

    #[test]
    fn test_label_display() {
        let simple = Label {
            id: 1,
            name: "prod".into(),
            value: None,
            resource: false,
            is_default: false,
        };
        let resource = Label {
            id: 2,
            name: "owner".into(),
            value: Some("ada".into()),
            resource: true,
            is_default: false,
        };
        assert_eq!(simple.display(), "prod");
        assert_eq!(resource.display(), "owner=ada");
    }

    #[test]
    fn test_process_metrics_lookup_by_format_key() {
        let stats = ResourceStats {
            mean: 1.0,
            min: 0.0,
            q1: 0.5,
            q2: 1.0,
            q3: 1.5,
            max: 2.0,
        };
        let metrics = ProcessMetrics {
            process: "ALIGN".into(),
            cpu: None,
            cpu_usage: None,
            mem: None,
            vmem: Some(stats),
            mem_usage: None,
            time: None,
            time_usage: None,
            reads: None,
            writes: None,
        };
        assert_eq!(metrics.stats("memVirtual"), Some(&stats));
        assert_eq!(metrics.stats("memRaw"), None);
        assert_eq!(metrics.stats("bogus"), None);
    }
}
