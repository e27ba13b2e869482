//! # Platform Layer
//!
//! The [`PlatformApi`] trait is the only way the rest of the crate talks to the remote
//! platform. It is deliberately shaped like the platform's REST surface: one method
//! per listing or action, plain ids in, model types out.
//!
//! ## Implementations
//!
//! - [`http::HttpPlatform`]: production implementation over blocking HTTP.
//! - [`memory::InMemoryPlatform`]: fixture-driven implementation for tests. It keeps a
//!   log of the calls it served so tests can assert which lookups a command issued.
//!
//! ## Contract
//!
//! - `workspace_id: None` addresses the caller's personal workspace.
//! - Failures surface as [`crate::error::TowerError`]; non-2xx responses become
//!   `TowerError::Api` carrying the status code and the platform's message.
//! - No retries, no caching. Every call hits the platform.

use crate::error::Result;
use crate::model::{
    Action, ComputeEnv, ComputeEnvStatus, Label, LabelTarget, LabelType, Member,
    OrgAndWorkspace, Organization, Page, Pipeline, ProcessMetrics, Team, UserInfo, Workflow,
};
use crate::pagination::Max;

pub mod http;
#[cfg(any(test, feature = "test_utils"))]
pub mod memory;

/// Page window and search term for listing calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub max: Max,
    pub offset: u64,
    pub search: Option<String>,
}

impl PageRequest {
    pub fn new(max: Max, offset: u64) -> Self {
        Self {
            max,
            offset,
            search: None,
        }
    }

    /// Everything, from the first row.
    pub fn all() -> Self {
        Self::new(Max::Unbounded, 0)
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.trim().is_empty());
        self
    }

    /// Applies the window to an in-memory list.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset)
            .unwrap_or(usize::MAX)
            .min(items.len());
        let window = &items[start..];
        match self.max.limit() {
            Some(n) => window.iter().take(n as usize).cloned().collect(),
            None => window.to_vec(),
        }
    }
}

/// Abstract interface to the platform.
pub trait PlatformApi {
    /// The authenticated caller.
    fn user_info(&self) -> Result<UserInfo>;

    /// Every organization and workspace the caller can access.
    fn list_orgs_and_workspaces(&self) -> Result<Vec<OrgAndWorkspace>>;

    fn list_organizations(&self) -> Result<Vec<Organization>>;

    fn list_members(&self, org_id: i64, page: &PageRequest) -> Result<Page<Member>>;

    fn list_collaborators(&self, org_id: i64, page: &PageRequest) -> Result<Page<Member>>;

    fn list_teams(&self, org_id: i64, page: &PageRequest) -> Result<Page<Team>>;

    fn list_compute_envs(
        &self,
        workspace_id: Option<i64>,
        status: Option<ComputeEnvStatus>,
    ) -> Result<Vec<ComputeEnv>>;

    /// Full definition, including the platform-specific `config` block.
    fn describe_compute_env(&self, id: &str, workspace_id: Option<i64>) -> Result<ComputeEnv>;

    fn set_primary_compute_env(&self, id: &str, workspace_id: Option<i64>) -> Result<()>;

    /// Pipelines with their labels attached.
    fn list_pipelines(&self, workspace_id: Option<i64>, page: &PageRequest)
        -> Result<Page<Pipeline>>;

    fn describe_pipeline(&self, pipeline_id: i64, workspace_id: Option<i64>) -> Result<Pipeline>;

    fn list_actions(&self, workspace_id: Option<i64>) -> Result<Vec<Action>>;

    fn list_labels(
        &self,
        workspace_id: Option<i64>,
        label_type: LabelType,
        page: &PageRequest,
    ) -> Result<Page<Label>>;

    fn add_labels(
        &self,
        target: LabelTarget,
        workspace_id: Option<i64>,
        resource_id: &str,
        label_ids: &[i64],
    ) -> Result<()>;

    fn remove_labels(
        &self,
        target: LabelTarget,
        workspace_id: Option<i64>,
        resource_id: &str,
        label_ids: &[i64],
    ) -> Result<()>;

    fn list_workflows(&self, workspace_id: Option<i64>, page: &PageRequest)
        -> Result<Page<Workflow>>;

    fn workflow_metrics(
        &self,
        workflow_id: &str,
        workspace_id: Option<i64>,
    ) -> Result<Vec<ProcessMetrics>>;
}
