//! Core library for Medinotes: schema-driven clinical note templates.
//!
//! The primary entry points are [`create_template`] for the built-in note types
//! and [`TemplateRegistry`] when user-defined templates or custom renderers are
//! involved. Every note is a [`NoteTemplate`]: a [`FieldStore`] paired with the
//! immutable [`TemplateSchema`] that validates and renders it.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    error::{MedinotesError, Result},
    field::FieldValue,
    field_store::{FieldStore, StoreSnapshot},
    note::{NoteSnapshot, NoteTemplate, Validation},
    template::{
        create_template, humanise_key, Block, LayoutRenderer, NoteRenderer, RenderContext,
        RenderOptions, Row, SystemTemplate, TemplateDefinition, TemplateRegistry, TemplateSchema,
    },
};
