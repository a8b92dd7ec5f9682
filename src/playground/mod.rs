//! # Playground Core
//!
//! The template-placeholder pipeline: scanning `{{...}}` tokens out of a
//! template definition, rendering a preview with user-supplied values,
//! compiling the provider-specific request body, validating form fields
//! and generating client code snippets.
//!
//! Everything in here is deterministic and synchronous except
//! [`session`], which drives the upstream services.

pub mod compile;
pub mod extract;
pub mod render;
pub mod session;
pub mod snippets;
pub mod tokens;
pub mod validate;
