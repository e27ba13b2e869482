use crate::render::{Response, TableView};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub cli_version: String,
    pub endpoint: String,
    pub user_id: i64,
    pub user_name: String,
    pub email: String,
}

impl Response for Info {
    fn table(&self) -> TableView {
        TableView::properties(
            "Details:",
            [
                ("Tool version", self.cli_version.clone()),
                ("Platform API endpoint", self.endpoint.clone()),
                ("Authenticated user", self.user_name.clone()),
                ("Email", self.email.clone()),
            ],
        )
    }
}
