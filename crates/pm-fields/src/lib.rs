//! Repeatable form fields.
//!
//! A container holds field groups instantiated from a `<template>`. Adding a
//! group rewrites the bracketed index in every field name to the container's
//! child count; removing a group detaches the nearest enclosing group.
//!
//! The algorithm lives in [`FieldManager`] and runs against any [`FieldHost`]:
//! the in-memory [`MemoryTree`] here, or the live DOM in the WASM frontend.

mod error;
mod host;
mod manager;
mod path;
mod tree;

pub use error::{FieldError, TreeError};
pub use host::FieldHost;
pub use manager::{Added, FieldManager, Removed};
pub use path::{FieldPath, reindex};
pub use tree::{Fragment, MemoryTree, NodeId};

pub use pm_ui_types::FieldRules;
