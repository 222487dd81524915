//! Template definitions and the validated schemas built from them.

use super::render::humanise_key;
use crate::{FieldStore, MedinotesError, Result, Validation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap());
static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// A note-type configuration table as written in JSON.
///
/// ```json
/// {
///   "name": "consult",
///   "title": "CONSULTATION NOTE",
///   "required": ["patient_name", "patient_mrn"],
///   "optional": ["allergies"],
///   "layout": [
///     { "kind": "group", "heading": "PATIENT INFORMATION", "rows": [
///         { "label": "Name", "field": "patient_name" },
///         { "label": "MRN",  "field": "patient_mrn" } ] },
///     { "kind": "section", "label": "ALLERGIES", "field": "allergies" },
///     { "kind": "rule", "fill": "-" },
///     { "kind": "group", "rows": [ { "timestamp": "Date" } ] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
    /// Empty means "one section per declared field".
    #[serde(default)]
    pub layout: Vec<Block>,
}

/// One element of a rendered document, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Inline `Label: value` lines under an optional heading.
    Group {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
        rows: Vec<Row>,
    },
    /// `LABEL:` followed by the value on its own line(s).
    Section {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        field: String,
    },
    /// A full-width line of `fill`.
    Rule {
        #[serde(default = "default_rule_fill")]
        fill: char,
    },
}

/// A single line inside a [`Block::Group`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Row {
    Field {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Stamped with the render time rather than a stored value.
    Timestamp { timestamp: String },
}

fn default_rule_fill() -> char {
    '-'
}

/// A validated note type: declarations plus layout, immutable once built.
///
/// Shared between notes behind an `Arc`; nothing mutates it after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSchema {
    pub name: String,
    pub title: String,
    pub description: String,
    pub required: Vec<String>,
    pub optional: Vec<String>,
    pub layout: Vec<Block>,
}

impl TemplateSchema {
    /// Validates `def` and builds the schema it describes.
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::InvalidTemplate`] when the tag is malformed,
    /// a field name is malformed or repeated, a name is both required and
    /// optional, or the layout references an undeclared field.
    pub fn from_definition(def: TemplateDefinition) -> Result<Self> {
        let name = def.name.to_lowercase();
        if !TAG_RE.is_match(&name) {
            return Err(MedinotesError::InvalidTemplate(format!(
                "template name '{}' must start with a letter and contain only a-z, 0-9, '_' or '-'",
                def.name
            )));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (list, kind) in [(&def.required, "required"), (&def.optional, "optional")] {
            for field in list {
                if !FIELD_RE.is_match(field) {
                    return Err(MedinotesError::InvalidTemplate(format!(
                        "{name}: {kind} field '{field}' is not a valid field name"
                    )));
                }
                if !seen.insert(field.as_str()) {
                    let both = def.required.contains(field) && def.optional.contains(field);
                    let reason = if both {
                        "is declared both required and optional"
                    } else {
                        "is declared more than once"
                    };
                    return Err(MedinotesError::InvalidTemplate(format!(
                        "{name}: field '{field}' {reason}"
                    )));
                }
            }
        }

        let mut layout = def.layout;
        if layout.is_empty() {
            layout = def
                .required
                .iter()
                .chain(&def.optional)
                .map(|field| Block::Section { label: None, field: field.clone() })
                .collect();
        }

        let mut placed: HashSet<&str> = HashSet::new();
        for block in &layout {
            match block {
                Block::Group { rows, .. } => {
                    if rows.is_empty() {
                        return Err(MedinotesError::InvalidTemplate(format!(
                            "{name}: layout group has no rows"
                        )));
                    }
                    for row in rows {
                        if let Row::Field { field, .. } = row {
                            placed.insert(field.as_str());
                        }
                    }
                }
                Block::Section { field, .. } => {
                    placed.insert(field.as_str());
                }
                Block::Rule { .. } => {}
            }
        }
        if let Some(unknown) = placed.iter().find(|f| !seen.contains(*f)) {
            return Err(MedinotesError::InvalidTemplate(format!(
                "{name}: layout references undeclared field '{unknown}'"
            )));
        }
        for field in def.required.iter().chain(&def.optional) {
            if !placed.contains(field.as_str()) {
                log::warn!("{name}: declared field '{field}' does not appear in the layout and will never render");
            }
        }

        let title = if def.title.trim().is_empty() {
            format!("{} NOTE", humanise_key(&name).to_uppercase())
        } else {
            def.title
        };

        Ok(Self {
            name,
            title,
            description: def.description,
            required: def.required,
            optional: def.optional,
            layout,
        })
    }

    /// Parses a JSON [`TemplateDefinition`] and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::Json`] for malformed JSON, otherwise as
    /// [`from_definition`](Self::from_definition).
    pub fn from_json(json: &str) -> Result<Self> {
        let def: TemplateDefinition = serde_json::from_str(json)?;
        Self::from_definition(def)
    }

    /// Checks that every required field holds a non-empty value.
    ///
    /// "Empty" means never set, `""`, or a list with no items. Missing names
    /// are reported in declaration order.
    pub fn validate(&self, store: &FieldStore) -> Validation {
        let missing = self
            .required
            .iter()
            .filter(|field| !store.is_present(field))
            .cloned()
            .collect();
        Validation::from_missing(missing)
    }

    pub fn is_declared(&self, field: &str) -> bool {
        self.is_required(field) || self.optional.iter().any(|f| f == field)
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|f| f == field)
    }

    /// Converts back to the serializable form, with the resolved title and layout.
    pub fn to_definition(&self) -> TemplateDefinition {
        TemplateDefinition {
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            required: self.required.clone(),
            optional: self.optional.clone(),
            layout: self.layout.clone(),
        }
    }
}
