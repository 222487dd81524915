//! Internal domain modules for the Medinotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod error;
pub mod field;
pub mod field_store;
pub mod note;
pub mod template;

#[doc(inline)]
pub use error::{MedinotesError, Result};
#[doc(inline)]
pub use field::FieldValue;
#[doc(inline)]
pub use field_store::{FieldStore, StoreSnapshot};
#[doc(inline)]
pub use note::{NoteSnapshot, NoteTemplate, Validation};
#[doc(inline)]
pub use template::{create_template, NoteRenderer, RenderOptions, TemplateRegistry, TemplateSchema};
