//! Plain-text rendering of notes from their template layout.
//!
//! Every block follows the same omission rule: a field that was never set, or
//! holds `""` or an empty list, produces no output at all. Scalars render as a
//! single value after their label; lists render one bullet line per item, in
//! stored order. Rendering never consults validation.

use super::schema::{Block, Row, TemplateSchema};
use crate::{FieldStore, FieldValue};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Formatting knobs shared by every template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Width of banner and rule lines.
    #[serde(default = "default_width")]
    pub width: usize,
    /// Prefix for each list item.
    #[serde(default = "default_bullet")]
    pub bullet: String,
    /// `chrono` format string for timestamp rows.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_width() -> usize {
    80
}

fn default_bullet() -> String {
    "- ".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            bullet: default_bullet(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// Everything a renderer may look at for one render call.
pub struct RenderContext<'a> {
    pub schema: &'a TemplateSchema,
    pub store: &'a FieldStore,
    pub options: &'a RenderOptions,
    pub now: DateTime<Local>,
}

impl<'a> RenderContext<'a> {
    /// Returns the value of `field` only if it is present and non-empty.
    pub fn value(&self, field: &str) -> Option<&'a FieldValue> {
        self.store.get(field).filter(|v| !v.is_empty())
    }

    /// The render time formatted with [`RenderOptions::timestamp_format`].
    pub fn timestamp(&self) -> String {
        self.now.format(&self.options.timestamp_format).to_string()
    }
}

/// Turns a note into text.
///
/// The built-in [`LayoutRenderer`] covers every configuration-table template;
/// implement this (or pass a closure) to give one note type its own output via
/// [`TemplateRegistry::register_renderer`](super::TemplateRegistry::register_renderer).
pub trait NoteRenderer: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

impl<F> NoteRenderer for F
where
    F: Fn(&RenderContext<'_>) -> String + Send + Sync,
{
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        self(ctx)
    }
}

/// Renders the schema's layout table.
///
/// Blocks are separated by one blank line and the output ends with a single newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutRenderer;

impl NoteRenderer for LayoutRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = banner(&ctx.schema.title, ctx.options);
        for block in &ctx.schema.layout {
            out.push_str(&render_block(block, ctx));
        }
        // The document ends at its last line; no blank line after the final block.
        if out.ends_with("\n\n") {
            out.pop();
        }
        out
    }
}

fn render_block(block: &Block, ctx: &RenderContext<'_>) -> String {
    match block {
        Block::Group { heading, rows } => {
            let lines: Vec<String> = rows
                .iter()
                .filter_map(|row| match row {
                    Row::Field { field, label } => {
                        let label = label.clone().unwrap_or_else(|| humanise_key(field));
                        ctx.value(field)
                            .map(|value| format_row(&label, value, ctx.options))
                    }
                    Row::Timestamp { timestamp } => {
                        Some(format!("{timestamp}: {}", ctx.timestamp()))
                    }
                })
                .collect();
            if lines.is_empty() {
                return String::new();
            }
            let mut out = String::new();
            if let Some(heading) = heading {
                out.push_str(&format!("{heading}:\n"));
            }
            out.push_str(&lines.join("\n"));
            out.push_str("\n\n");
            out
        }
        Block::Section { label, field } => match ctx.value(field) {
            Some(value) => {
                let label = label
                    .clone()
                    .unwrap_or_else(|| humanise_key(field).to_uppercase());
                format_section(&label, value, ctx.options)
            }
            None => String::new(),
        },
        Block::Rule { fill } => rule(*fill, ctx.options.width),
    }
}

/// Title framed by two `=` rules, followed by a blank line.
pub fn banner(title: &str, options: &RenderOptions) -> String {
    let bar = rule('=', options.width);
    format!("{bar}{title}\n{bar}\n")
}

/// A `width`-long line of `fill`, newline-terminated.
pub fn rule(fill: char, width: usize) -> String {
    let mut line: String = std::iter::repeat(fill).take(width).collect();
    line.push('\n');
    line
}

/// `LABEL:` then the value on following lines, then a blank line.
///
/// Returns an empty string for an empty value.
pub fn format_section(label: &str, value: &FieldValue, options: &RenderOptions) -> String {
    match value {
        FieldValue::Text(s) if s.is_empty() => String::new(),
        FieldValue::Text(s) => format!("{label}:\n{s}\n\n"),
        FieldValue::List(items) if items.is_empty() => String::new(),
        FieldValue::List(items) => format!("{label}:\n{}\n\n", bullets(items, options)),
    }
}

/// `Label: value` for scalars, `Label:` plus bullet lines for lists. No trailing newline.
fn format_row(label: &str, value: &FieldValue, options: &RenderOptions) -> String {
    match value {
        FieldValue::Text(s) => format!("{label}: {s}"),
        FieldValue::List(items) => format!("{label}:\n{}", bullets(items, options)),
    }
}

fn bullets(items: &[String], options: &RenderOptions) -> String {
    items
        .iter()
        .map(|item| format!("{}{item}", options.bullet))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a snake_case field key to a Title Case display label.
///
/// `"first_name"` → `"First Name"`, `"email"` → `"Email"`.
pub fn humanise_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
