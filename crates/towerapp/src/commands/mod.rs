//! # Command Layer
//!
//! Each command is a plain function over a [`PlatformApi`](crate::platform::PlatformApi):
//! it builds a fresh [`ReferenceResolver`](crate::resolve::ReferenceResolver), performs
//! its lookups in sequence, issues the primary call and returns a typed response from
//! [`crate::responses`].
//!
//! Commands do no I/O of their own beyond the platform calls (the one exception is
//! `compute_envs::export`, which writes the file it was asked to write). Rendering,
//! printing and exit codes belong to the caller.
//!
//! ## Testing
//!
//! Command tests run against `InMemoryPlatform` and check both the returned response
//! and, where it matters, which platform calls were issued.
//!
//! ## Modules
//!
//! - [`info`]: endpoint and authenticated user
//! - [`organizations`]: list and view organizations
//! - [`workspaces`]: list and view workspaces
//! - [`members`]: members, collaborators and teams of an organization
//! - [`compute_envs`]: list, view, export, primary get/set
//! - [`pipelines`]: list, view, labels
//! - [`actions`]: list, labels
//! - [`labels`]: workspace labels and the shared label-management step
//! - [`runs`]: list runs, run metrics

use crate::error::Result;
use crate::model::Page;
use crate::pagination::{Pagination, PaginationInfo};
use crate::platform::PageRequest;

pub mod actions;
pub mod compute_envs;
pub mod info;
pub mod labels;
pub mod members;
pub mod organizations;
pub mod pipelines;
pub mod runs;
pub mod workspaces;

/// Folds pagination flags and an optional search term into a page request.
pub(crate) fn page_request(pagination: &Pagination, search: Option<&str>) -> Result<PageRequest> {
    let (max, offset) = pagination.resolve()?;
    Ok(PageRequest::new(max, offset).with_search(search.map(str::to_string)))
}

pub(crate) fn page_info<T>(page: &Page<T>, request: &PageRequest) -> PaginationInfo {
    PaginationInfo::new(page.items.len(), page.total, request.offset)
}
