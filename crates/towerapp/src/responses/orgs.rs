use super::or_empty;
use crate::model::{Member, OrgAndWorkspace, Organization, Team};
use crate::pagination::PaginationInfo;
use crate::render::{Column, Response, Row, TableView};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationsList {
    pub user_name: String,
    pub organizations: Vec<Organization>,
}

impl Response for OrganizationsList {
    fn table(&self) -> TableView {
        let rows = self
            .organizations
            .iter()
            .map(|o| {
                Row::new([
                    o.org_id.to_string(),
                    o.name.clone(),
                    or_empty(o.full_name.as_deref()),
                    or_empty(o.member_role.as_deref()),
                    or_empty(o.description.as_deref()),
                    or_empty(o.website.as_deref()),
                ])
            })
            .collect();
        TableView::new(
            format!("Organizations for {} user:", self.user_name),
            vec![
                Column::fixed("ID"),
                Column::fixed("Name"),
                Column::fixed("Full Name"),
                Column::fixed("Role"),
                Column::optional("Description"),
                Column::optional("Website"),
            ],
        )
        .rows(rows)
        .empty_notice("No organizations found")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
    pub organization: Organization,
}

impl Response for OrganizationView {
    fn table(&self) -> TableView {
        let o = &self.organization;
        TableView::properties(
            format!("Details for organization '{}':", o.name),
            [
                ("ID", o.org_id.to_string()),
                ("Name", o.name.clone()),
                ("Full Name", or_empty(o.full_name.as_deref())),
                ("Description", or_empty(o.description.as_deref())),
                ("Location", or_empty(o.location.as_deref())),
                ("Website", or_empty(o.website.as_deref())),
                ("Role", or_empty(o.member_role.as_deref())),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspacesList {
    /// `[acme]` when filtered by organization, otherwise the caller's user name.
    pub owner: String,
    #[serde(skip)]
    pub by_organization: bool,
    pub workspaces: Vec<OrgAndWorkspace>,
}

impl Response for WorkspacesList {
    fn table(&self) -> TableView {
        let title = if self.by_organization {
            format!("Workspaces for {} organization:", self.owner)
        } else {
            format!("Workspaces for {} user:", self.owner)
        };
        let rows = self
            .workspaces
            .iter()
            .map(|w| {
                Row::new([
                    w.workspace_id.map(|id| id.to_string()).unwrap_or_default(),
                    or_empty(w.workspace_name.as_deref()),
                    or_empty(w.workspace_full_name.as_deref()),
                    w.org_name.clone(),
                    or_empty(w.visibility.as_deref()),
                ])
            })
            .collect();
        TableView::new(
            title,
            vec![
                Column::fixed("Workspace ID"),
                Column::fixed("Workspace Name"),
                Column::fixed("Full Name"),
                Column::fixed("Organization Name"),
                Column::optional("Visibility"),
            ],
        )
        .rows(rows)
        .empty_notice("No workspaces found")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceView {
    pub workspace: OrgAndWorkspace,
}

impl Response for WorkspaceView {
    fn table(&self) -> TableView {
        let w = &self.workspace;
        TableView::properties(
            format!(
                "Details for workspace '{}':",
                w.workspace_name.as_deref().unwrap_or_default()
            ),
            [
                (
                    "ID",
                    w.workspace_id.map(|id| id.to_string()).unwrap_or_default(),
                ),
                ("Name", or_empty(w.workspace_name.as_deref())),
                ("Full Name", or_empty(w.workspace_full_name.as_deref())),
                ("Organization ID", w.org_id.to_string()),
                ("Organization Name", w.org_name.clone()),
                ("Visibility", or_empty(w.visibility.as_deref())),
            ],
        )
    }
}

fn member_columns() -> Vec<Column> {
    vec![
        Column::fixed("ID"),
        Column::fixed("Username"),
        Column::fixed("Email"),
        Column::fixed("Role"),
        Column::optional("First Name"),
        Column::optional("Last Name"),
    ]
}

fn member_row(m: &Member) -> Row {
    Row::new([
        m.member_id.to_string(),
        m.user_name.clone(),
        m.email.clone(),
        or_empty(m.role.as_deref()),
        or_empty(m.first_name.as_deref()),
        or_empty(m.last_name.as_deref()),
    ])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembersList {
    pub organization: String,
    pub members: Vec<Member>,
    #[serde(skip)]
    pub pagination: Option<PaginationInfo>,
}

impl Response for MembersList {
    fn table(&self) -> TableView {
        TableView::new(
            format!("Members for {} organization:", self.organization),
            member_columns(),
        )
        .rows(self.members.iter().map(member_row).collect())
        .empty_notice("No members found")
        .pagination(self.pagination)
    }
}

/// Collaborators of an organization.
///
/// JSON and YAML output is an object with a single key wrapping the members in platform
/// order: `{"collaborators": [{"memberId": .., "userName": .., "email": ..}, ..]}`.
/// The organization and the pagination footer only appear in table output, which sorts
/// rows by member id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorsList {
    #[serde(skip)]
    pub organization: String,
    pub collaborators: Vec<Member>,
    #[serde(skip)]
    pub pagination: Option<PaginationInfo>,
}

impl Response for CollaboratorsList {
    fn table(&self) -> TableView {
        let rows = self
            .collaborators
            .iter()
            .map(|m| Row::new([m.member_id.to_string(), m.user_name.clone(), m.email.clone()]))
            .collect();
        TableView::new(
            format!("Collaborators for {} organization:", self.organization),
            vec![
                Column::fixed("Member ID"),
                Column::fixed("Username"),
                Column::fixed("Email"),
            ],
        )
        .rows(rows)
        .sort_by(0)
        .empty_notice("No collaborators found")
        .pagination(self.pagination)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsList {
    pub organization: String,
    pub teams: Vec<Team>,
    #[serde(skip)]
    pub pagination: Option<PaginationInfo>,
}

impl Response for TeamsList {
    fn table(&self) -> TableView {
        let rows = self
            .teams
            .iter()
            .map(|t| {
                Row::new([
                    t.team_id.to_string(),
                    t.name.clone(),
                    t.members_count.map(|n| n.to_string()).unwrap_or_default(),
                    or_empty(t.description.as_deref()),
                ])
            })
            .collect();
        TableView::new(
            format!("Teams for {} organization:", self.organization),
            vec![
                Column::fixed("Team ID"),
                Column::fixed("Team Name"),
                Column::fixed("Members Count").right(),
                Column::optional("Description"),
            ],
        )
        .rows(rows)
        .empty_notice("No teams found")
        .pagination(self.pagination)
    }
}
