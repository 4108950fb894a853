//! Core data types for the Coldcut media migration pipeline.
//!
//! This crate provides the records shared by the store clients and the
//! pipeline: media items, content objects, the reference index, the hot/cold
//! tier split and the run phases.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod index;
mod media;
mod object;
mod page;
mod phase;
mod tier;

pub use index::ReferenceIndex;
pub use media::{MediaItem, MediaItemBuilder, MediaItemBuilderError, filename_from_url};
pub use object::{
    ContentObject, ContentObjectBuilder, ContentObjectBuilderError, ImageRef, ObjectRef,
};
pub use page::{Page, PageRequest};
pub use phase::RunPhase;
pub use tier::TierAssignment;
