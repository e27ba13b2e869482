//! # Rendering
//!
//! Every command returns a typed response. A response is rendered exactly once, in one
//! of three formats:
//!
//! - `table`: human output. The response describes a [`TableView`] and
//!   [`table::render_table`] lays it out. Colour only applies here.
//! - `json`: pretty-printed serde serialization of the response.
//! - `yaml`: the same value as YAML.
//!
//! Machine formats serialize the response struct itself, so their field names are the
//! camelCase names the platform uses.

use crate::error::Result;
use serde::Serialize;

pub mod style;
pub mod table;

pub use table::{Align, Column, Row, TableView, Visibility};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub verbose: bool,
    pub use_color: bool,
}

impl RenderOptions {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn use_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }
}

/// A command result that can render itself in every output format.
pub trait Response: Serialize {
    fn table(&self) -> TableView;
}

/// Renders `response` according to `options`. The output always ends with a newline.
pub fn render<R: Response>(response: &R, options: &RenderOptions) -> Result<String> {
    match options.format {
        OutputFormat::Table => table::render_table(
            &response.table(),
            options.verbose,
            options.use_color,
        ),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(response)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(response)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Greeting {
        user_name: String,
    }

    impl Response for Greeting {
        fn table(&self) -> TableView {
            TableView::message(format!("Hello {}", self.user_name))
        }
    }

    fn greeting() -> Greeting {
        Greeting {
            user_name: "ada".into(),
        }
    }

    #[test]
    fn test_table() {
        let out = render(&greeting(), &RenderOptions::default()).unwrap();
        assert_eq!(out, "  Hello ada\n");
    }

    #[test]
    fn test_json_uses_camel_case_and_no_color() {
        let options = RenderOptions::new(OutputFormat::Json).use_color(true);
        let out = render(&greeting(), &options).unwrap();
        assert_eq!(out, "{\n  \"userName\": \"ada\"\n}\n");
    }

    #[test]
    fn test_yaml() {
        let out = render(&greeting(), &RenderOptions::new(OutputFormat::Yaml)).unwrap();
        assert_eq!(out, "userName: ada\n");
    }
}
