//! Text tables.
//!
//! A response describes its table as a [`TableView`]; [`render_table`] does the layout.
//! Layout (widths, padding, sorting) happens here because it needs display-width aware
//! string handling. The template only arranges the precomputed lines and picks styles.
//!
//! ```text
//!   Pipelines at [acme / rnaseq] workspace:
//!
//!     ID | Name   | Repository
//!     ---+--------+------------------------------------
//!     42 | rnaseq | https://github.com/nf-core/rnaseq
//!
//!     Showing 1 of 1 (offset 0)
//! ```

use super::style::{names, render_with_color, TOWER_THEME};
use crate::error::Result;
use crate::pagination::PaginationInfo;
use serde::Serialize;
use std::cmp::Ordering;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const TABLE_TEMPLATE: &str = include_str!("templates/table.tmp");

const CELL_SEPARATOR: &str = " | ";
const DIVIDER_SEPARATOR: &str = "-+-";
/// Cells wider than this are cut with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Always shown.
    Fixed,
    /// Shown in verbose mode, or when the response asks for it.
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub visibility: Visibility,
    pub align: Align,
}

impl Column {
    pub fn fixed(header: &str) -> Self {
        Self {
            header: header.to_string(),
            visibility: Visibility::Fixed,
            align: Align::Left,
        }
    }

    pub fn optional(header: &str) -> Self {
        Self {
            visibility: Visibility::Optional,
            ..Self::fixed(header)
        }
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    pub highlight: bool,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            highlight: false,
        }
    }

    pub fn highlighted(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub empty_notice: String,
    pub sort_by: Option<usize>,
    pub pagination: Option<PaginationInfo>,
    pub warnings: Vec<String>,
    /// Free text printed after the table.
    pub text: Vec<String>,
    pub show_optional: bool,
}

impl TableView {
    pub fn new(title: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            columns,
            ..Default::default()
        }
    }

    /// A title-only view (confirmations, exports).
    pub fn message(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Two-column `Property | Value` view for single resources.
    pub fn properties<I, K, V>(title: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rows = properties
            .into_iter()
            .map(|(k, v)| {
                let cells: [String; 2] = [k.into(), v.into()];
                Row::new(cells)
            })
            .collect();
        Self::new(title, vec![Column::fixed("Property"), Column::fixed("Value")]).rows(rows)
    }

    pub fn rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn empty_notice(mut self, notice: impl Into<String>) -> Self {
        self.empty_notice = notice.into();
        self
    }

    pub fn sort_by(mut self, column: usize) -> Self {
        self.sort_by = Some(column);
        self
    }

    pub fn pagination(mut self, info: Option<PaginationInfo>) -> Self {
        self.pagination = info;
        self
    }

    pub fn warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn text(mut self, lines: Vec<String>) -> Self {
        self.text = lines;
        self
    }

    pub fn show_optional(mut self, show: bool) -> Self {
        self.show_optional = show;
        self
    }
}

#[derive(Serialize)]
struct RowLine {
    line: String,
    style: &'static str,
}

#[derive(Serialize)]
struct TableData {
    title: String,
    text: Vec<String>,
    has_table: bool,
    empty: bool,
    empty_notice: String,
    header: String,
    divider: String,
    rows: Vec<RowLine>,
    footer: Option<String>,
    warnings: Vec<String>,
}

pub fn render_table(view: &TableView, verbose: bool, use_color: bool) -> Result<String> {
    let show_optional = verbose || view.show_optional;
    let visible: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.visibility == Visibility::Fixed || show_optional)
        .map(|(i, _)| i)
        .collect();

    let mut rows = view.rows.clone();
    if let Some(column) = view.sort_by {
        rows.sort_by(|a, b| compare_cells(cell(a, column), cell(b, column)));
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            visible
                .iter()
                .map(|&i| truncate_to_width(cell(row, i), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = visible
        .iter()
        .enumerate()
        .map(|(pos, &i)| {
            cells
                .iter()
                .map(|r| r[pos].width())
                .chain(std::iter::once(view.columns[i].header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let aligns: Vec<Align> = visible.iter().map(|&i| view.columns[i].align).collect();
    let headers: Vec<String> = visible
        .iter()
        .map(|&i| view.columns[i].header.clone())
        .collect();

    let data = TableData {
        title: view.title.clone(),
        text: view.text.clone(),
        has_table: !view.columns.is_empty(),
        empty: view.rows.is_empty(),
        empty_notice: view.empty_notice.clone(),
        header: layout_line(&headers, &widths, &aligns),
        divider: widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(DIVIDER_SEPARATOR),
        rows: rows
            .iter()
            .zip(cells.iter())
            .map(|(row, cells)| RowLine {
                line: layout_line(cells, &widths, &aligns),
                style: if row.highlight {
                    names::HIGHLIGHT
                } else {
                    names::ROW
                },
            })
            .collect(),
        footer: view.pagination.map(|p| p.footer()),
        warnings: view.warnings.clone(),
    };

    Ok(render_with_color(TABLE_TEMPLATE, &data, &TOWER_THEME, use_color)?)
}

fn cell(row: &Row, index: usize) -> &str {
    row.cells.get(index).map(String::as_str).unwrap_or("")
}

fn layout_line(cells: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let line = cells
        .iter()
        .zip(widths.iter().zip(aligns.iter()))
        .map(|(text, (width, align))| pad(text, *width, *align))
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR);
    line.trim_end().to_string()
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}

/// Numbers compare numerically and sort before text; text compares case-insensitively.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Plain decimals only: optional sign, ASCII digits, at most one dot.
fn numeric(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    let digits = cell.strip_prefix(['-', '+']).unwrap_or(cell);
    let plain = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if plain {
        cell.parse().ok()
    } else {
        None
    }
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let limit = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut current = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > limit {
            break;
        }
        result.push(c);
        current += w;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members_view(rows: Vec<Row>) -> TableView {
        TableView::new(
            "Members for [acme] organization:",
            vec![
                Column::fixed("ID"),
                Column::fixed("Username"),
                Column::optional("Role"),
            ],
        )
        .rows(rows)
        .empty_notice("No members found")
    }

    #[test]
    fn test_layout() {
        let view = members_view(vec![
            Row::new(["1", "ada", "owner"]),
            Row::new(["22", "grace", "member"]),
        ]);
        let out = render_table(&view, false, false).unwrap();
        assert_eq!(
            out,
            "  Members for [acme] organization:\n\
             \n    ID | Username\
             \n    ---+---------\
             \n    1  | ada\
             \n    22 | grace\n"
        );
    }

    #[test]
    fn test_optional_columns_in_verbose_mode() {
        let view = members_view(vec![Row::new(["1", "ada", "owner"])]);
        let out = render_table(&view, true, false).unwrap();
        assert!(out.contains("ID | Username | Role"));
        assert!(out.contains("1  | ada      | owner"));

        let out = render_table(&view.show_optional(true), false, false).unwrap();
        assert!(out.contains("Role"));
    }

    #[test]
    fn test_empty_notice() {
        let out = render_table(&members_view(Vec::new()), false, false).unwrap();
        assert_eq!(
            out,
            "  Members for [acme] organization:\n\n    No members found\n"
        );
    }

    #[test]
    fn test_numeric_aware_stable_sort() {
        let view = members_view(vec![
            Row::new(["30", "linus", ""]),
            Row::new(["4", "barbara", ""]),
            Row::new(["12", "ken", ""]),
            Row::new(["4", "second", ""]),
        ])
        .sort_by(0);
        let out = render_table(&view, false, false).unwrap();
        let order: Vec<&str> = out
            .lines()
            .skip(4)
            .map(|l| l.split('|').nth(1).unwrap_or("").trim())
            .collect();
        assert_eq!(order, vec!["barbara", "second", "ken", "linus"]);
    }

    #[test]
    fn test_float_keywords_sort_as_text() {
        let mut cells = vec!["zeta", "nan", "10", "inf", "alpha", "-2.5", "infinity", "1e3"];
        cells.sort_by(|a, b| compare_cells(a, b));
        assert_eq!(
            cells,
            vec!["-2.5", "10", "1e3", "alpha", "inf", "infinity", "nan", "zeta"]
        );
    }

    #[test]
    fn test_footer_and_warnings() {
        let view = members_view(vec![Row::new(["1", "ada", ""])])
            .pagination(Some(PaginationInfo::new(1, 10, 0)))
            .warnings(vec!["Could not add label 'x': boom".into()]);
        let out = render_table(&view, false, false).unwrap();
        assert!(out.contains("\n    Showing 1 of 10 (offset 0)\n"));
        assert!(out.ends_with("  WARNING: Could not add label 'x': boom\n"));
    }

    #[test]
    fn test_highlight_only_with_color() {
        let view = members_view(vec![Row::new(["1", "ada", ""]).highlighted(true)]);
        assert!(!render_table(&view, false, false).unwrap().contains('\u{1b}'));
        assert!(render_table(&view, false, true).unwrap().contains('\u{1b}'));
    }

    #[test]
    fn test_wide_characters_align() {
        let view = TableView::new("t", vec![Column::fixed("Name"), Column::fixed("X")])
            .rows(vec![Row::new(["日本", "1"]), Row::new(["ab", "2"])]);
        let out = render_table(&view, false, false).unwrap();
        assert!(out.contains("日本 | 1"));
        assert!(out.contains("ab   | 2"));
    }

    #[test]
    fn test_right_alignment() {
        let view = TableView::new("t", vec![Column::fixed("Size").right()])
            .rows(vec![Row::new(["1.5 KB"]), Row::new(["12 B"])]);
        let out = render_table(&view, false, false).unwrap();
        assert!(out.contains("\n      Size\n"));
        assert!(out.contains("\n    1.5 KB\n      12 B\n"));
    }

    #[test]
    fn test_message_view() {
        let out = render_table(&TableView::message("Done"), false, false).unwrap();
        assert_eq!(out, "  Done\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("abcd", 4), "abcd");
    }
}
