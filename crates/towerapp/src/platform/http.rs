//! Blocking HTTP implementation of [`PlatformApi`].

use super::{PageRequest, PlatformApi};
use crate::config::TowerConfig;
use crate::error::{Result, TowerError};
use crate::model::{
    Action, ComputeEnv, ComputeEnvStatus, Label, LabelTarget, LabelType, Member,
    OrgAndWorkspace, Organization, Page, Pipeline, ProcessMetrics, Team, UserInfo, Workflow,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("tw/", env!("CARGO_PKG_VERSION"));

type Query = Vec<(&'static str, String)>;

pub struct HttpPlatform {
    client: Client,
    endpoint: String,
    access_token: Option<String>,
}

impl HttpPlatform {
    pub fn new(config: &TowerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T> {
        let url = format!("{}{}", self.endpoint, path);
        debug!(%url, ?query, "GET");
        let response = self
            .authorize(self.client.get(&url))
            .query(query)
            .send()?;
        let body = check(response)?.text()?;
        decode(&url, &body)
    }

    fn post<B: Serialize>(&self, path: &str, query: &Query, body: Option<&B>) -> Result<()> {
        let url = format!("{}{}", self.endpoint, path);
        debug!(%url, ?query, "POST");
        let mut request = self.authorize(self.client.post(&url)).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        check(request.send()?)?;
        Ok(())
    }
}

fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(api_error(status, &body))
}

/// `TowerError::Api` for a non-2xx response, preferring the platform's own message.
fn api_error(status: StatusCode, body: &str) -> TowerError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        });
    TowerError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Parses a 2xx body into its envelope.
fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|err| TowerError::InvalidResponse {
        url: url.to_string(),
        reason: err.to_string(),
    })
}

fn workspace_query(workspace_id: Option<i64>) -> Query {
    workspace_id
        .map(|id| vec![("workspaceId", id.to_string())])
        .unwrap_or_default()
}

fn page_query(mut query: Query, page: &PageRequest) -> Query {
    if let Some(max) = page.max.limit() {
        query.push(("max", max.to_string()));
    }
    query.push(("offset", page.offset.to_string()));
    if let Some(search) = &page.search {
        query.push(("search", search.clone()));
    }
    query
}

impl PlatformApi for HttpPlatform {
    fn user_info(&self) -> Result<UserInfo> {
        let body: UserInfoBody = self.get("/user-info", &Query::new())?;
        Ok(body.user)
    }

    fn list_orgs_and_workspaces(&self) -> Result<Vec<OrgAndWorkspace>> {
        let user = self.user_info()?;
        let body: OrgsAndWorkspacesBody =
            self.get(&format!("/user/{}/workspaces", user.id), &Query::new())?;
        Ok(body.orgs_and_workspaces)
    }

    fn list_organizations(&self) -> Result<Vec<Organization>> {
        let body: OrganizationsBody = self.get("/orgs", &Query::new())?;
        Ok(body.organizations)
    }

    fn list_members(&self, org_id: i64, page: &PageRequest) -> Result<Page<Member>> {
        let body: MembersBody =
            self.get(&format!("/orgs/{}/members", org_id), &page_query(Query::new(), page))?;
        let total = body.total_size.unwrap_or(body.members.len() as u64);
        Ok(Page::new(body.members, total))
    }

    fn list_collaborators(&self, org_id: i64, page: &PageRequest) -> Result<Page<Member>> {
        let body: CollaboratorsBody = self.get(
            &format!("/orgs/{}/collaborators", org_id),
            &page_query(Query::new(), page),
        )?;
        let total = body.total_size.unwrap_or(body.collaborators.len() as u64);
        Ok(Page::new(body.collaborators, total))
    }

    fn list_teams(&self, org_id: i64, page: &PageRequest) -> Result<Page<Team>> {
        let body: TeamsBody =
            self.get(&format!("/orgs/{}/teams", org_id), &page_query(Query::new(), page))?;
        let total = body.total_size.unwrap_or(body.teams.len() as u64);
        Ok(Page::new(body.teams, total))
    }

    fn list_compute_envs(
        &self,
        workspace_id: Option<i64>,
        status: Option<ComputeEnvStatus>,
    ) -> Result<Vec<ComputeEnv>> {
        let mut query = workspace_query(workspace_id);
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        let body: ComputeEnvsBody = self.get("/compute-envs", &query)?;
        Ok(body.compute_envs)
    }

    fn describe_compute_env(&self, id: &str, workspace_id: Option<i64>) -> Result<ComputeEnv> {
        let body: ComputeEnvBody =
            self.get(&format!("/compute-envs/{}", id), &workspace_query(workspace_id))?;
        Ok(body.compute_env)
    }

    fn set_primary_compute_env(&self, id: &str, workspace_id: Option<i64>) -> Result<()> {
        self.post::<()>(
            &format!("/compute-envs/{}/primary", id),
            &workspace_query(workspace_id),
            None,
        )
    }

    fn list_pipelines(
        &self,
        workspace_id: Option<i64>,
        page: &PageRequest,
    ) -> Result<Page<Pipeline>> {
        let mut query = page_query(workspace_query(workspace_id), page);
        query.push(("attributes", "labels".to_string()));
        let body: PipelinesBody = self.get("/pipelines", &query)?;
        let total = body.total_size.unwrap_or(body.pipelines.len() as u64);
        Ok(Page::new(body.pipelines, total))
    }

    fn describe_pipeline(&self, pipeline_id: i64, workspace_id: Option<i64>) -> Result<Pipeline> {
        let mut query = workspace_query(workspace_id);
        query.push(("attributes", "labels".to_string()));
        let body: PipelineBody = self.get(&format!("/pipelines/{}", pipeline_id), &query)?;
        Ok(body.pipeline)
    }

    fn list_actions(&self, workspace_id: Option<i64>) -> Result<Vec<Action>> {
        let mut query = workspace_query(workspace_id);
        query.push(("attributes", "labels".to_string()));
        let body: ActionsBody = self.get("/actions", &query)?;
        Ok(body.actions)
    }

    fn list_labels(
        &self,
        workspace_id: Option<i64>,
        label_type: LabelType,
        page: &PageRequest,
    ) -> Result<Page<Label>> {
        let mut query = page_query(workspace_query(workspace_id), page);
        query.push(("type", label_type.as_str().to_string()));
        let body: LabelsBody = self.get("/labels", &query)?;
        let total = body.total_size.unwrap_or(body.labels.len() as u64);
        Ok(Page::new(body.labels, total))
    }

    fn add_labels(
        &self,
        target: LabelTarget,
        workspace_id: Option<i64>,
        resource_id: &str,
        label_ids: &[i64],
    ) -> Result<()> {
        let (path, body) = label_request(target, "add", resource_id, label_ids)?;
        self.post(&path, &workspace_query(workspace_id), Some(&body))
    }

    fn remove_labels(
        &self,
        target: LabelTarget,
        workspace_id: Option<i64>,
        resource_id: &str,
        label_ids: &[i64],
    ) -> Result<()> {
        let (path, body) = label_request(target, "remove", resource_id, label_ids)?;
        self.post(&path, &workspace_query(workspace_id), Some(&body))
    }

    fn list_workflows(
        &self,
        workspace_id: Option<i64>,
        page: &PageRequest,
    ) -> Result<Page<Workflow>> {
        let body: WorkflowsBody =
            self.get("/workflow", &page_query(workspace_query(workspace_id), page))?;
        let workflows: Vec<Workflow> = body.workflows.into_iter().map(|w| w.workflow).collect();
        let total = body.total_size.unwrap_or(workflows.len() as u64);
        Ok(Page::new(workflows, total))
    }

    fn workflow_metrics(
        &self,
        workflow_id: &str,
        workspace_id: Option<i64>,
    ) -> Result<Vec<ProcessMetrics>> {
        let body: MetricsBody = self.get(
            &format!("/workflow/{}/metrics", workflow_id),
            &workspace_query(workspace_id),
        )?;
        Ok(body.metrics)
    }
}

fn label_request(
    target: LabelTarget,
    verb: &str,
    resource_id: &str,
    label_ids: &[i64],
) -> Result<(String, LabelsRequest)> {
    let body = match target {
        LabelTarget::Pipeline => {
            let id = resource_id.parse::<i64>().map_err(|_| {
                TowerError::InvalidArgument(format!("pipeline id '{}' is not numeric", resource_id))
            })?;
            LabelsRequest::Pipelines {
                pipeline_ids: vec![id],
                label_ids: label_ids.to_vec(),
            }
        }
        LabelTarget::Action => LabelsRequest::Actions {
            action_ids: vec![resource_id.to_string()],
            label_ids: label_ids.to_vec(),
        },
    };
    let path = match target {
        LabelTarget::Pipeline => format!("/pipelines/labels/{}", verb),
        LabelTarget::Action => format!("/actions/labels/{}", verb),
    };
    Ok((path, body))
}

// Wire envelopes

#[derive(Serialize)]
#[serde(untagged)]
enum LabelsRequest {
    #[serde(rename_all = "camelCase")]
    Pipelines {
        pipeline_ids: Vec<i64>,
        label_ids: Vec<i64>,
    },
    #[serde(rename_all = "camelCase")]
    Actions {
        action_ids: Vec<String>,
        label_ids: Vec<i64>,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct UserInfoBody {
    user: UserInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgsAndWorkspacesBody {
    #[serde(default)]
    orgs_and_workspaces: Vec<OrgAndWorkspace>,
}

#[derive(Deserialize)]
struct OrganizationsBody {
    #[serde(default)]
    organizations: Vec<Organization>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembersBody {
    #[serde(default)]
    members: Vec<Member>,
    total_size: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollaboratorsBody {
    #[serde(default)]
    collaborators: Vec<Member>,
    total_size: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamsBody {
    #[serde(default)]
    teams: Vec<Team>,
    total_size: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeEnvsBody {
    #[serde(default)]
    compute_envs: Vec<ComputeEnv>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeEnvBody {
    compute_env: ComputeEnv,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipelinesBody {
    #[serde(default)]
    pipelines: Vec<Pipeline>,
    total_size: Option<u64>,
}

#[derive(Deserialize)]
struct PipelineBody {
    pipeline: Pipeline,
}

#[derive(Deserialize)]
struct ActionsBody {
    #[serde(default)]
    actions: Vec<Action>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelsBody {
    #[serde(default)]
    labels: Vec<Label>,
    total_size: Option<u64>,
}

#[derive(Deserialize)]
struct WorkflowItem {
    workflow: Workflow,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowsBody {
    #[serde(default)]
    workflows: Vec<WorkflowItem>,
    total_size: Option<u64>,
}

#[derive(Deserialize)]
struct MetricsBody {
    #[serde(default)]
    metrics: Vec<ProcessMetrics>,
}
