use super::{PageRequest, PlatformApi};
use crate::error::{Result, TowerError};
use crate::model::{
    Action, ComputeEnv, ComputeEnvStatus, Label, LabelTarget, LabelType, Member,
    OrgAndWorkspace, Organization, Page, Pipeline, ProcessMetrics, Team, UserInfo, Workflow,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

type WorkspaceKey = Option<i64>;

/// In-memory platform for testing.
///
/// Fixtures are added with the `with_*` builders. Listings honour the page window and
/// the search term the way the platform does (case-insensitive substring on the name).
/// Uses `RefCell` for the state that commands mutate (primary flag, attached labels)
/// and for the call log, so every trait method can take `&self`.
pub struct InMemoryPlatform {
    user: UserInfo,
    orgs_and_workspaces: Vec<OrgAndWorkspace>,
    organizations: Vec<Organization>,
    members: HashMap<i64, Vec<Member>>,
    collaborators: HashMap<i64, Vec<Member>>,
    teams: HashMap<i64, Vec<Team>>,
    compute_envs: RefCell<HashMap<WorkspaceKey, Vec<ComputeEnv>>>,
    pipelines: RefCell<HashMap<WorkspaceKey, Vec<Pipeline>>>,
    actions: RefCell<HashMap<WorkspaceKey, Vec<Action>>>,
    labels: HashMap<WorkspaceKey, Vec<Label>>,
    workflows: HashMap<WorkspaceKey, Vec<Workflow>>,
    metrics: HashMap<String, Vec<ProcessMetrics>>,
    failing_labels: HashSet<i64>,
    calls: RefCell<Vec<String>>,
    last_page: RefCell<Option<PageRequest>>,
}

impl Default for InMemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self {
            user: UserInfo {
                id: 1,
                user_name: "ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            orgs_and_workspaces: Vec::new(),
            organizations: Vec::new(),
            members: HashMap::new(),
            collaborators: HashMap::new(),
            teams: HashMap::new(),
            compute_envs: RefCell::new(HashMap::new()),
            pipelines: RefCell::new(HashMap::new()),
            actions: RefCell::new(HashMap::new()),
            labels: HashMap::new(),
            workflows: HashMap::new(),
            metrics: HashMap::new(),
            failing_labels: HashSet::new(),
            calls: RefCell::new(Vec::new()),
            last_page: RefCell::new(None),
        }
    }

    /// Adds an organization the caller belongs to.
    pub fn with_organization(mut self, org_id: i64, name: &str) -> Self {
        if !self.organizations.iter().any(|o| o.org_id == org_id) {
            self.organizations.push(Organization {
                org_id,
                name: name.to_string(),
                full_name: Some(format!("{} Inc.", name)),
                description: None,
                location: None,
                website: None,
                member_role: Some("owner".to_string()),
            });
            self.orgs_and_workspaces.push(OrgAndWorkspace {
                org_id,
                org_name: name.to_string(),
                workspace_id: None,
                workspace_name: None,
                workspace_full_name: None,
                visibility: None,
            });
        }
        self
    }

    /// Adds a workspace, registering its organization when needed.
    pub fn with_workspace(mut self, org_id: i64, org_name: &str, ws_id: i64, ws_name: &str) -> Self {
        self = self.with_organization(org_id, org_name);
        self.orgs_and_workspaces.push(OrgAndWorkspace {
            org_id,
            org_name: org_name.to_string(),
            workspace_id: Some(ws_id),
            workspace_name: Some(ws_name.to_string()),
            workspace_full_name: Some(format!("{} workspace", ws_name)),
            visibility: Some("PRIVATE".to_string()),
        });
        self
    }

    pub fn with_members(mut self, org_id: i64, members: Vec<Member>) -> Self {
        self.members.entry(org_id).or_default().extend(members);
        self
    }

    pub fn with_collaborators(mut self, org_id: i64, collaborators: Vec<Member>) -> Self {
        self.collaborators
            .entry(org_id)
            .or_default()
            .extend(collaborators);
        self
    }

    pub fn with_teams(mut self, org_id: i64, teams: Vec<Team>) -> Self {
        self.teams.entry(org_id).or_default().extend(teams);
        self
    }

    pub fn with_compute_env(self, workspace_id: WorkspaceKey, ce: ComputeEnv) -> Self {
        self.compute_envs
            .borrow_mut()
            .entry(workspace_id)
            .or_default()
            .push(ce);
        self
    }

    pub fn with_pipeline(self, workspace_id: WorkspaceKey, pipeline: Pipeline) -> Self {
        self.pipelines
            .borrow_mut()
            .entry(workspace_id)
            .or_default()
            .push(pipeline);
        self
    }

    pub fn with_action(self, workspace_id: WorkspaceKey, action: Action) -> Self {
        self.actions
            .borrow_mut()
            .entry(workspace_id)
            .or_default()
            .push(action);
        self
    }

    pub fn with_label(mut self, workspace_id: WorkspaceKey, label: Label) -> Self {
        self.labels.entry(workspace_id).or_default().push(label);
        self
    }

    pub fn with_workflow(mut self, workspace_id: WorkspaceKey, workflow: Workflow) -> Self {
        self.workflows.entry(workspace_id).or_default().push(workflow);
        self
    }

    pub fn with_metrics(mut self, workflow_id: &str, metrics: Vec<ProcessMetrics>) -> Self {
        self.metrics.insert(workflow_id.to_string(), metrics);
        self
    }

    /// Makes every attach/detach of this label fail with a platform error.
    pub fn failing_label(mut self, label_id: i64) -> Self {
        self.failing_labels.insert(label_id);
        self
    }

    /// Names of the trait methods served so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == method).count()
    }

    /// Page window of the most recent paginated listing.
    pub fn last_page_request(&self) -> Option<PageRequest> {
        self.last_page.borrow().clone()
    }

    pub fn pipeline_labels(&self, workspace_id: WorkspaceKey, pipeline_id: i64) -> Vec<String> {
        self.pipelines
            .borrow()
            .get(&workspace_id)
            .and_then(|list| list.iter().find(|p| p.pipeline_id == pipeline_id))
            .map(|p| p.labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn action_labels(&self, workspace_id: WorkspaceKey, action_id: &str) -> Vec<String> {
        self.actions
            .borrow()
            .get(&workspace_id)
            .and_then(|list| list.iter().find(|a| a.id == action_id))
            .map(|a| a.labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, method: &str) {
        self.calls.borrow_mut().push(method.to_string());
    }

    fn record_page(&self, method: &str, page: &PageRequest) {
        self.record(method);
        *self.last_page.borrow_mut() = Some(page.clone());
    }

    fn ensure_org(&self, org_id: i64) -> Result<()> {
        if self.organizations.iter().any(|o| o.org_id == org_id) {
            Ok(())
        } else {
            Err(TowerError::Api {
                status: 403,
                message: "Forbidden".to_string(),
            })
        }
    }

    fn label_by_id(&self, workspace_id: WorkspaceKey, label_id: i64) -> Result<Label> {
        if self.failing_labels.contains(&label_id) {
            return Err(TowerError::Api {
                status: 500,
                message: format!("Unable to update label {}", label_id),
            });
        }
        self.labels
            .get(&workspace_id)
            .and_then(|list| list.iter().find(|l| l.id == label_id))
            .cloned()
            .ok_or_else(|| TowerError::Api {
                status: 404,
                message: format!("Label {} not found", label_id),
            })
    }

    fn resolve_labels(&self, workspace_id: WorkspaceKey, label_ids: &[i64]) -> Result<Vec<Label>> {
        label_ids
            .iter()
            .map(|id| self.label_by_id(workspace_id, *id))
            .collect()
    }

    fn update_labels<F>(
        &self,
        target: LabelTarget,
        workspace_id: WorkspaceKey,
        resource_id: &str,
        update: F,
    ) -> Result<()>
    where
        F: Fn(&mut Vec<Label>),
    {
        let missing = || TowerError::Api {
            status: 404,
            message: format!("{} {} not found", target.noun(), resource_id),
        };
        match target {
            LabelTarget::Pipeline => {
                let mut pipelines = self.pipelines.borrow_mut();
                let pipeline = pipelines
                    .get_mut(&workspace_id)
                    .and_then(|list| {
                        list.iter_mut()
                            .find(|p| p.pipeline_id.to_string() == resource_id)
                    })
                    .ok_or_else(missing)?;
                update(&mut pipeline.labels);
            }
            LabelTarget::Action => {
                let mut actions = self.actions.borrow_mut();
                let action = actions
                    .get_mut(&workspace_id)
                    .and_then(|list| list.iter_mut().find(|a| a.id == resource_id))
                    .ok_or_else(missing)?;
                update(&mut action.labels);
            }
        }
        Ok(())
    }
}

fn matches_search(name: &str, search: &Option<String>) -> bool {
    match search {
        Some(term) => name.to_lowercase().contains(&term.to_lowercase()),
        None => true,
    }
}

fn paged<T: Clone>(items: Vec<T>, page: &PageRequest) -> Page<T> {
    let total = items.len() as u64;
    Page::new(page.slice(&items), total)
}

impl PlatformApi for InMemoryPlatform {
    fn user_info(&self) -> Result<UserInfo> {
        self.record("user_info");
        Ok(self.user.clone())
    }

    fn list_orgs_and_workspaces(&self) -> Result<Vec<OrgAndWorkspace>> {
        self.record("list_orgs_and_workspaces");
        Ok(self.orgs_and_workspaces.clone())
    }

    fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.record("list_organizations");
        Ok(self.organizations.clone())
    }

    fn list_members(&self, org_id: i64, page: &PageRequest) -> Result<Page<Member>> {
        self.record_page("list_members", page);
        self.ensure_org(org_id)?;
        let members: Vec<Member> = self
            .members
            .get(&org_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|m| matches_search(&m.user_name, &page.search))
            .collect();
        Ok(paged(members, page))
    }

    fn list_collaborators(&self, org_id: i64, page: &PageRequest) -> Result<Page<Member>> {
        self.record_page("list_collaborators", page);
        self.ensure_org(org_id)?;
        let collaborators = self.collaborators.get(&org_id).cloned().unwrap_or_default();
        Ok(paged(collaborators, page))
    }

    fn list_teams(&self, org_id: i64, page: &PageRequest) -> Result<Page<Team>> {
        self.record_page("list_teams", page);
        self.ensure_org(org_id)?;
        let teams = self.teams.get(&org_id).cloned().unwrap_or_default();
        Ok(paged(teams, page))
    }

    fn list_compute_envs(
        &self,
        workspace_id: Option<i64>,
        status: Option<ComputeEnvStatus>,
    ) -> Result<Vec<ComputeEnv>> {
        self.record("list_compute_envs");
        let all = self
            .compute_envs
            .borrow()
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default();
        Ok(all
            .into_iter()
            .filter(|ce| match status {
                Some(status) => ce.status.as_deref() == Some(status.as_str()),
                None => true,
            })
            .map(|mut ce| {
                ce.config = None;
                ce
            })
            .collect())
    }

    fn describe_compute_env(&self, id: &str, workspace_id: Option<i64>) -> Result<ComputeEnv> {
        self.record("describe_compute_env");
        self.compute_envs
            .borrow()
            .get(&workspace_id)
            .and_then(|list| list.iter().find(|ce| ce.id == id))
            .cloned()
            .ok_or_else(|| TowerError::Api {
                status: 404,
                message: format!("Compute environment {} not found", id),
            })
    }

    fn set_primary_compute_env(&self, id: &str, workspace_id: Option<i64>) -> Result<()> {
        self.record("set_primary_compute_env");
        let mut envs = self.compute_envs.borrow_mut();
        let list = envs.entry(workspace_id).or_default();
        if !list.iter().any(|ce| ce.id == id) {
            return Err(TowerError::Api {
                status: 404,
                message: format!("Compute environment {} not found", id),
            });
        }
        for ce in list.iter_mut() {
            ce.primary = Some(ce.id == id);
        }
        Ok(())
    }

    fn list_pipelines(
        &self,
        workspace_id: Option<i64>,
        page: &PageRequest,
    ) -> Result<Page<Pipeline>> {
        self.record_page("list_pipelines", page);
        let pipelines: Vec<Pipeline> = self
            .pipelines
            .borrow()
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| matches_search(&p.name, &page.search))
            .collect();
        Ok(paged(pipelines, page))
    }

    fn describe_pipeline(&self, pipeline_id: i64, workspace_id: Option<i64>) -> Result<Pipeline> {
        self.record("describe_pipeline");
        self.pipelines
            .borrow()
            .get(&workspace_id)
            .and_then(|list| list.iter().find(|p| p.pipeline_id == pipeline_id))
            .cloned()
            .ok_or_else(|| TowerError::Api {
                status: 404,
                message: format!("Pipeline {} not found", pipeline_id),
            })
    }

    fn list_actions(&self, workspace_id: Option<i64>) -> Result<Vec<Action>> {
        self.record("list_actions");
        Ok(self
            .actions
            .borrow()
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default())
    }

    fn list_labels(
        &self,
        workspace_id: Option<i64>,
        label_type: LabelType,
        page: &PageRequest,
    ) -> Result<Page<Label>> {
        self.record_page("list_labels", page);
        let labels: Vec<Label> = self
            .labels
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|l| match label_type {
                LabelType::Simple => !l.resource,
                LabelType::Resource => l.resource,
                LabelType::All => true,
            })
            .filter(|l| matches_search(&l.name, &page.search))
            .collect();
        Ok(paged(labels, page))
    }

    fn add_labels(
        &self,
        target: LabelTarget,
        workspace_id: Option<i64>,
        resource_id: &str,
        label_ids: &[i64],
    ) -> Result<()> {
        self.record("add_labels");
        let labels = self.resolve_labels(workspace_id, label_ids)?;
        self.update_labels(target, workspace_id, resource_id, |current| {
            for label in &labels {
                if !current.iter().any(|l| l.id == label.id) {
                    current.push(label.clone());
                }
            }
        })
    }

    fn remove_labels(
        &self,
        target: LabelTarget,
        workspace_id: Option<i64>,
        resource_id: &str,
        label_ids: &[i64],
    ) -> Result<()> {
        self.record("remove_labels");
        self.resolve_labels(workspace_id, label_ids)?;
        self.update_labels(target, workspace_id, resource_id, |current| {
            current.retain(|l| !label_ids.contains(&l.id));
        })
    }

    fn list_workflows(
        &self,
        workspace_id: Option<i64>,
        page: &PageRequest,
    ) -> Result<Page<Workflow>> {
        self.record_page("list_workflows", page);
        let workflows: Vec<Workflow> = self
            .workflows
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|w| matches_search(&w.run_name, &page.search))
            .collect();
        Ok(paged(workflows, page))
    }

    fn workflow_metrics(
        &self,
        workflow_id: &str,
        _workspace_id: Option<i64>,
    ) -> Result<Vec<ProcessMetrics>> {
        self.record("workflow_metrics");
        self.metrics
            .get(workflow_id)
            .cloned()
            .ok_or_else(|| TowerError::Api {
                status: 404,
                message: format!("Workflow {} not found", workflow_id),
            })
    }
}

// --- Test Fixtures ---

pub mod fixtures {
    use super::InMemoryPlatform;
    use crate::model::{
        Action, ComputeEnv, Label, Member, Pipeline, ProcessMetrics, ResourceStats, Team,
        Workflow,
    };
    use chrono::{TimeZone, Utc};

    pub const ACME_ORG_ID: i64 = 27736513644467;
    pub const ACME_WS_ID: i64 = 75887156211589;
    pub const GLOBEX_ORG_ID: i64 = 40230138858677;
    pub const GLOBEX_WS_ID: i64 = 93364451384719;

    pub fn member(id: i64, user_name: &str) -> Member {
        Member {
            member_id: id,
            user_name: user_name.to_string(),
            email: format!("{}@example.com", user_name),
            first_name: None,
            last_name: None,
            role: Some("member".to_string()),
        }
    }

    pub fn team(id: i64, name: &str, members: i64) -> Team {
        Team {
            team_id: id,
            name: name.to_string(),
            description: None,
            members_count: Some(members),
        }
    }

    pub fn compute_env(id: &str, name: &str, primary: bool) -> ComputeEnv {
        ComputeEnv {
            id: id.to_string(),
            name: name.to_string(),
            platform: "aws-batch".to_string(),
            status: Some("AVAILABLE".to_string()),
            message: None,
            primary: Some(primary),
            credentials_id: Some("cred1".to_string()),
            last_used: None,
            date_created: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single(),
            config: Some(serde_json::json!({
                "region": "eu-west-1",
                "workDir": format!("s3://{}/work", name),
            })),
        }
    }

    pub fn label(id: i64, name: &str) -> Label {
        Label {
            id,
            name: name.to_string(),
            value: None,
            resource: false,
            is_default: false,
        }
    }

    pub fn resource_label(id: i64, name: &str, value: &str) -> Label {
        Label {
            id,
            name: name.to_string(),
            value: Some(value.to_string()),
            resource: true,
            is_default: false,
        }
    }

    pub fn pipeline(id: i64, name: &str, labels: Vec<Label>) -> Pipeline {
        Pipeline {
            pipeline_id: id,
            name: name.to_string(),
            description: None,
            repository: Some(format!("https://github.com/nf-core/{}", name)),
            user_name: Some("ada".to_string()),
            visibility: Some("PRIVATE".to_string()),
            labels,
        }
    }

    pub fn action(id: &str, name: &str, labels: Vec<Label>) -> Action {
        Action {
            id: id.to_string(),
            name: name.to_string(),
            source: "github".to_string(),
            status: Some("ACTIVE".to_string()),
            endpoint: None,
            labels,
        }
    }

    pub fn workflow(id: &str, run_name: &str, status: &str) -> Workflow {
        Workflow {
            id: id.to_string(),
            run_name: run_name.to_string(),
            project_name: Some("nf-core/rnaseq".to_string()),
            status: status.to_string(),
            user_name: Some("ada".to_string()),
            submit: Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).single(),
            duration: Some(3_723_000),
        }
    }

    pub fn stats(mean: f64, min: f64, max: f64) -> ResourceStats {
        ResourceStats {
            mean,
            min,
            q1: min,
            q2: mean,
            q3: mean,
            max,
        }
    }

    pub fn process_metrics(process: &str) -> ProcessMetrics {
        ProcessMetrics {
            process: process.to_string(),
            cpu: Some(stats(95.5, 80.0, 100.0)),
            cpu_usage: Some(stats(47.5, 40.0, 50.0)),
            mem: Some(stats(1_610_612_736.0, 1_073_741_824.0, 2_147_483_648.0)),
            vmem: Some(stats(3_221_225_472.0, 2_147_483_648.0, 4_294_967_296.0)),
            mem_usage: Some(stats(25.0, 12.5, 50.0)),
            time: Some(stats(3_723_000.0, 60_000.0, 7_200_000.0)),
            time_usage: Some(stats(10.0, 1.0, 20.0)),
            reads: Some(stats(1536.0, 0.0, 4096.0)),
            writes: None,
        }
    }

    /// Two organizations, a shared workspace name across them, and a populated
    /// `acme/rnaseq` workspace.
    pub fn acme() -> InMemoryPlatform {
        let ws = Some(ACME_WS_ID);
        InMemoryPlatform::new()
            .with_workspace(ACME_ORG_ID, "acme", ACME_WS_ID, "rnaseq")
            .with_workspace(ACME_ORG_ID, "acme", 11, "shared")
            .with_workspace(GLOBEX_ORG_ID, "globex", GLOBEX_WS_ID, "Shared")
            .with_members(
                ACME_ORG_ID,
                vec![member(3, "grace"), member(1, "ada"), member(2, "alan")],
            )
            .with_collaborators(
                ACME_ORG_ID,
                vec![member(30, "linus"), member(4, "barbara"), member(12, "ken")],
            )
            .with_teams(ACME_ORG_ID, vec![team(1, "core", 3), team(2, "infra", 1)])
            .with_compute_env(ws, compute_env("ce1", "aws-prod", true))
            .with_compute_env(ws, compute_env("ce2", "aws-dev", false))
            .with_label(ws, label(101, "prod"))
            .with_label(ws, label(102, "rna"))
            .with_label(ws, label(103, "legacy"))
            .with_label(ws, resource_label(104, "owner", "ada"))
            .with_pipeline(ws, pipeline(42, "rnaseq", vec![label(103, "legacy")]))
            .with_pipeline(ws, pipeline(43, "sarek", Vec::new()))
            .with_action(ws, action("act1", "nightly", Vec::new()))
            .with_workflow(ws, workflow("wf1", "happy_turing", "SUCCEEDED"))
            .with_workflow(ws, workflow("wf2", "sad_hopper", "FAILED"))
            .with_metrics("wf1", vec![process_metrics("ALIGN")])
    }
}
