//! Template registry for Medinotes note types and renderers.
//!
//! [`TemplateRegistry`] is the public entry point. It owns the validated
//! [`TemplateSchema`]s keyed by type tag, any per-type [`NoteRenderer`]
//! overrides, and the [`RenderOptions`] handed to every note it creates.

mod render;
mod schema;

pub use render::{
    banner, format_section, humanise_key, rule, LayoutRenderer, NoteRenderer, RenderContext,
    RenderOptions,
};
pub use schema::{Block, Row, TemplateDefinition, TemplateSchema};

use crate::{FieldStore, MedinotesError, NoteSnapshot, NoteTemplate, Result};
use include_dir::{include_dir, Dir};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

static SYSTEM_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/src/system_templates");

/// A bundled template definition with its filename and JSON source.
pub struct SystemTemplate {
    /// The filename (e.g. `"00_consult.json"`), used to derive load order.
    pub filename: String,
    pub source: String,
}

/// Registry of note types, keyed by lower-case type tag in registration order.
///
/// Schemas are immutable once registered and shared with every note created
/// from them, so notes never observe later registrations.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    schemas: IndexMap<String, Arc<TemplateSchema>>,
    renderers: HashMap<String, Arc<dyn NoteRenderer>>,
    options: RenderOptions,
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("types", &self.list_types())
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}

impl TemplateRegistry {
    /// Creates a registry holding the built-in `consult`, `handoff` and
    /// `operative` templates.
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::InvalidTemplate`] or [`MedinotesError::Json`]
    /// if a bundled definition fails to load.
    pub fn new() -> Result<Self> {
        let mut registry = Self::empty();
        for system in Self::system_templates() {
            registry.register_json(&system.source).map_err(|e| {
                MedinotesError::InvalidTemplate(format!("{}: {e}", system.filename))
            })?;
        }
        Ok(registry)
    }

    /// Creates a registry with no templates at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the bundled template definitions, sorted by filename (load order).
    pub fn system_templates() -> Vec<SystemTemplate> {
        let mut templates: Vec<SystemTemplate> = SYSTEM_TEMPLATES
            .files()
            .filter_map(|file| {
                let filename = file.path().file_name()?.to_str()?.to_string();
                let source = file.contents_utf8()?.to_string();
                Some(SystemTemplate { filename, source })
            })
            .collect();
        templates.sort_by(|a, b| a.filename.cmp(&b.filename));
        templates
    }

    /// Validates `def` and registers it under its (lower-cased) name.
    ///
    /// A tag that is already registered is replaced; notes created earlier keep
    /// the schema they were created with. Returns the registered tag.
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::InvalidTemplate`] if the definition is rejected.
    pub fn register(&mut self, def: TemplateDefinition) -> Result<String> {
        let schema = TemplateSchema::from_definition(def)?;
        let tag = schema.name.clone();
        if self.schemas.contains_key(&tag) {
            log::warn!("template '{tag}' is already registered; replacing it");
        }
        log::debug!(
            "registered template '{tag}' ({} required, {} optional, {} layout blocks)",
            schema.required.len(),
            schema.optional.len(),
            schema.layout.len()
        );
        self.schemas.insert(tag.clone(), Arc::new(schema));
        Ok(tag)
    }

    /// Parses a JSON [`TemplateDefinition`] and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::Json`] for malformed JSON, otherwise as
    /// [`register`](Self::register).
    pub fn register_json(&mut self, json: &str) -> Result<String> {
        let def: TemplateDefinition = serde_json::from_str(json)?;
        self.register(def)
    }

    /// Overrides the layout renderer for one template type.
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::UnknownTemplateType`] if `tag` is not registered.
    pub fn register_renderer(&mut self, tag: &str, renderer: Arc<dyn NoteRenderer>) -> Result<()> {
        let schema = self.get_schema(tag)?;
        self.renderers.insert(schema.name.clone(), renderer);
        Ok(())
    }

    /// Returns `true` if a custom renderer is registered for `tag`.
    pub fn has_renderer(&self, tag: &str) -> bool {
        self.renderers.contains_key(&tag.to_lowercase())
    }

    /// Returns the schema registered under `tag` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::UnknownTemplateType`] if no such tag exists.
    pub fn get_schema(&self, tag: &str) -> Result<Arc<TemplateSchema>> {
        self.schemas
            .get(&tag.to_lowercase())
            .cloned()
            .ok_or_else(|| MedinotesError::UnknownTemplateType {
                tag: tag.to_string(),
                valid: self.list_types(),
            })
    }

    /// Returns the registered tags in registration order.
    pub fn list_types(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }

    pub fn schema_exists(&self, tag: &str) -> bool {
        self.schemas.contains_key(&tag.to_lowercase())
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Sets the render options handed to notes created from now on.
    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Creates an empty note of type `tag` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::UnknownTemplateType`] if no such tag exists.
    pub fn create(&self, tag: &str) -> Result<NoteTemplate> {
        self.build(tag, FieldStore::new())
    }

    /// Recreates a live note from an exported snapshot, timestamps included.
    ///
    /// # Errors
    ///
    /// Returns [`MedinotesError::UnknownTemplateType`] if the snapshot's type is
    /// not registered here.
    pub fn restore(&self, snapshot: &NoteSnapshot) -> Result<NoteTemplate> {
        let store = FieldStore::from_snapshot(snapshot.store_snapshot());
        self.build(&snapshot.template_type, store)
    }

    fn build(&self, tag: &str, store: FieldStore) -> Result<NoteTemplate> {
        let schema = self.get_schema(tag)?;
        let renderer = self.renderers.get(&schema.name).cloned();
        log::debug!("creating '{}' note", schema.name);
        Ok(NoteTemplate::from_parts(schema, store, renderer, self.options.clone()))
    }
}

/// Built-in registry, loaded on first use and shared by every note created
/// through [`create_template`].
static BUILTIN: LazyLock<std::result::Result<TemplateRegistry, String>> = LazyLock::new(|| {
    TemplateRegistry::new().map_err(|e| {
        log::error!("bundled templates failed to load: {e}");
        e.to_string()
    })
});

/// Creates an empty note of a built-in type: `"consult"`, `"handoff"` or
/// `"operative"` (case-insensitive).
///
/// Notes of the same type share one schema allocation.
///
/// # Errors
///
/// Returns [`MedinotesError::UnknownTemplateType`] for any other tag, or
/// [`MedinotesError::InvalidTemplate`] if the bundled templates failed to load.
pub fn create_template(tag: &str) -> Result<NoteTemplate> {
    match &*BUILTIN {
        Ok(registry) => registry.create(tag),
        Err(msg) => Err(MedinotesError::InvalidTemplate(msg.clone())),
    }
}
