//! Pagination bookkeeping.
//!
//! Listing commands accept `--page`, `--offset`, `--max` and `--no-max`. These are
//! folded into a page size ([`Max`]) and a zero-based row offset before the request is
//! issued, and the response carries a [`PaginationInfo`] for the footer line.
//!
//! Rules:
//! - `--no-max` wins over any explicit `--max`.
//! - A page number (1-indexed) only means something with a bounded page size; it then
//!   overrides an explicit `--offset`.
//! - With an unbounded page size the offset is the explicit one, or 0.

use crate::error::{Result, TowerError};
use serde::Serialize;

pub const DEFAULT_MAX: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Max {
    Bounded(u32),
    Unbounded,
}

impl Max {
    pub fn limit(&self) -> Option<u32> {
        match self {
            Max::Bounded(n) => Some(*n),
            Max::Unbounded => None,
        }
    }
}

/// Raw pagination flags as given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub offset: Option<u64>,
    pub max: Option<u32>,
    pub no_max: bool,
}

impl Pagination {
    pub fn validate(&self) -> Result<()> {
        if self.page == Some(0) {
            return Err(TowerError::InvalidArgument(
                "page numbers start at 1".to_string(),
            ));
        }
        if self.max == Some(0) && !self.no_max {
            return Err(TowerError::InvalidArgument(
                "max must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates the flags and computes `(max, offset)` in one go.
    pub fn resolve(&self) -> Result<(Max, u64)> {
        self.validate()?;
        let max = compute_max(self);
        Ok((max, compute_offset(self, max)))
    }
}

pub fn compute_max(opts: &Pagination) -> Max {
    if opts.no_max {
        return Max::Unbounded;
    }
    Max::Bounded(opts.max.unwrap_or(DEFAULT_MAX))
}

pub fn compute_offset(opts: &Pagination, max: Max) -> u64 {
    match (opts.page, max) {
        (Some(page), Max::Bounded(size)) if page > 0 => u64::from(page - 1) * u64::from(size),
        _ => opts.offset.unwrap_or(0),
    }
}

/// Footer data for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub shown: usize,
    pub total: u64,
    pub offset: u64,
}

impl PaginationInfo {
    pub fn new(shown: usize, total: u64, offset: u64) -> Self {
        Self {
            shown,
            total,
            offset,
        }
    }

    pub fn footer(&self) -> String {
        format!(
            "Showing {} of {} (offset {})",
            self.shown, self.total, self.offset
        )
    }
}
