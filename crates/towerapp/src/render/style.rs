//! Named terminal styles and the minijinja `style` filter.
//!
//! Templates never carry ANSI codes. They name a style (`{{ x | style("header") }}`)
//! and the filter applies it, or leaves the text untouched when colour is off.

use console::Style;
use minijinja::{Environment, Value};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Prefix shown when a template names a style the theme lacks.
pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

pub mod names {
    pub const TITLE: &str = "title";
    pub const HEADER: &str = "header";
    pub const MUTED: &str = "muted";
    pub const ROW: &str = "row";
    pub const HIGHLIGHT: &str = "highlight";
    pub const WARNING: &str = "warning";
}

#[derive(Clone, Default)]
pub struct Theme {
    styles: HashMap<String, Style>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles.insert(name.to_string(), style);
        self
    }

    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if use_color => style.apply_to(text).force_styling(true).to_string(),
            Some(_) => text.to_string(),
            None => format!("{} {}", MISSING_STYLE_INDICATOR, text),
        }
    }
}

pub static TOWER_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add(names::TITLE, Style::new().bold())
        .add(names::HEADER, Style::new().bold())
        .add(names::MUTED, Style::new().dim())
        .add(names::ROW, Style::new())
        .add(names::HIGHLIGHT, Style::new().green())
        .add(names::WARNING, Style::new().yellow().bold())
});

/// Renders `template` with the `style` filter bound to `theme`.
pub fn render_with_color<T: Serialize>(
    template: &str,
    data: &T,
    theme: &Theme,
    use_color: bool,
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    let theme = theme.clone();
    env.add_filter("style", move |value: Value, name: String| -> String {
        theme.apply(&name, &value.to_string(), use_color)
    });
    env.add_template("_inline", template)?;
    env.get_template("_inline")?.render(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Data {
        name: String,
    }

    #[test]
    fn test_plain_when_color_off() {
        let out = render_with_color(
            r#"{{ name | style("title") }}"#,
            &Data { name: "acme".into() },
            &TOWER_THEME,
            false,
        )
        .unwrap();
        assert_eq!(out, "acme");
    }

    #[test]
    fn test_ansi_when_color_on() {
        let out = render_with_color(
            r#"{{ name | style("highlight") }}"#,
            &Data { name: "acme".into() },
            &TOWER_THEME,
            true,
        )
        .unwrap();
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("acme"));
    }

    #[test]
    fn test_unknown_style_is_flagged() {
        let out = render_with_color(
            r#"{{ name | style("typo") }}"#,
            &Data { name: "acme".into() },
            &TOWER_THEME,
            false,
        )
        .unwrap();
        assert_eq!(out, "(!?) acme");
    }
}
