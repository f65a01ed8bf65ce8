//! Tag-dispatch system shared by feed-level and entry-level parsing.
//!
//! Each format family owns a [`TagRegistry`] per record kind, mapping bare
//! (`link`) and qualified (`media:content`) element names to field handlers.
//! The [`DispatchEngine`] walks the children of a container element and
//! invokes the matching handlers.

mod config;
mod core;
mod engine;
pub mod handlers;
mod types;

pub use config::{
    create_atom_entry_registry, create_atom_feed_registry, create_rdf_entry_registry,
    create_rss_entry_registry, create_rss_feed_registry, profile_for, FormatProfile, Layout,
};
pub use core::TagRegistry;
pub use engine::DispatchEngine;
pub use types::{DispatchContext, EntryDraft, FieldHandler};
