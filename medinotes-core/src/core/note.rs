//! A single note: one template's schema paired with its own field store.

use crate::core::template::{LayoutRenderer, NoteRenderer, RenderContext, RenderOptions};
use crate::{FieldStore, FieldValue, Result, StoreSnapshot, TemplateSchema};
use chrono::{DateTime, Local, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Outcome of [`NoteTemplate::validate`]. Failing validation is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    /// Required fields that are absent or empty, in declaration order.
    pub missing_fields: Vec<String>,
}

impl Validation {
    pub fn from_missing(missing_fields: Vec<String>) -> Self {
        Self { is_valid: missing_fields.is_empty(), missing_fields }
    }
}

/// Immutable export of a note for persistence or EMR integration.
///
/// ```json
/// {
///   "templateType": "handoff",
///   "createdAt": "2025-10-20T14:30:00Z",
///   "lastModified": "2025-10-20T14:31:12Z",
///   "fields": { "patient_name": "Test Patient", "active_issues": ["Pneumonia"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSnapshot {
    pub template_type: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub fields: IndexMap<String, FieldValue>,
}

impl NoteSnapshot {
    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::Json`](crate::MedinotesError::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns [`MedinotesError::Json`](crate::MedinotesError::Json) for malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The field-store part of this snapshot, for [`FieldStore::from_snapshot`].
    pub fn store_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            fields: self.fields.clone(),
            created_at: self.created_at,
            last_modified: self.last_modified,
        }
    }
}

/// A note of one template type.
///
/// Created through [`TemplateRegistry::create`](crate::TemplateRegistry::create)
/// or [`create_template`](crate::create_template). Field access delegates to the
/// owned [`FieldStore`]; validation and rendering are independent of each other.
pub struct NoteTemplate {
    schema: Arc<TemplateSchema>,
    store: FieldStore,
    renderer: Option<Arc<dyn NoteRenderer>>,
    options: RenderOptions,
}

impl fmt::Debug for NoteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteTemplate")
            .field("template_type", &self.schema.name)
            .field("store", &self.store)
            .field("custom_renderer", &self.renderer.is_some())
            .finish()
    }
}

impl NoteTemplate {
    pub(crate) fn from_parts(
        schema: Arc<TemplateSchema>,
        store: FieldStore,
        renderer: Option<Arc<dyn NoteRenderer>>,
        options: RenderOptions,
    ) -> Self {
        Self { schema, store, renderer, options }
    }

    /// The type tag, e.g. `"consult"`.
    pub fn template_type(&self) -> &str {
        &self.schema.name
    }

    pub fn title(&self) -> &str {
        &self.schema.title
    }

    pub fn schema(&self) -> &TemplateSchema {
        &self.schema
    }

    pub fn required_fields(&self) -> &[String] {
        &self.schema.required
    }

    pub fn optional_fields(&self) -> &[String] {
        &self.schema.optional
    }

    /// Stores a field. Names need not be declared by the template; undeclared
    /// fields are kept and exported but never rendered or validated.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.store.set(name, value);
    }

    pub fn set_fields<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.store.set_many(entries);
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.store.get(name)
    }

    /// Returns the stored value, or `default` when `name` was never set.
    pub fn get_field_or(&self, name: &str, default: FieldValue) -> FieldValue {
        self.store.get_or(name, default)
    }

    /// Returns the stored value, or an empty scalar when `name` was never set.
    pub fn get_field_or_empty(&self, name: &str) -> FieldValue {
        self.store.get_or_empty(name)
    }

    /// Empties the field store. Declarations are untouched.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.store.created_at()
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.store.last_modified()
    }

    /// Checks every required field for a non-empty value.
    pub fn validate(&self) -> Validation {
        self.schema.validate(&self.store)
    }

    /// Renders the note as plain text, stamping timestamp rows with the current local time.
    pub fn render(&self) -> String {
        self.render_at(Local::now())
    }

    /// Renders with an explicit render time.
    pub fn render_at(&self, now: DateTime<Local>) -> String {
        self.render_with(&self.options, now)
    }

    /// Renders with explicit options and render time.
    pub fn render_with(&self, options: &RenderOptions, now: DateTime<Local>) -> String {
        let ctx = RenderContext {
            schema: &self.schema,
            store: &self.store,
            options,
            now,
        };
        match &self.renderer {
            Some(renderer) => renderer.render(&ctx),
            None => LayoutRenderer.render(&ctx),
        }
    }

    /// Deep-copies the note into a detached [`NoteSnapshot`].
    pub fn export_snapshot(&self) -> NoteSnapshot {
        let store = self.store.export();
        NoteSnapshot {
            template_type: self.schema.name.clone(),
            created_at: store.created_at,
            last_modified: store.last_modified,
            fields: store.fields,
        }
    }
}
