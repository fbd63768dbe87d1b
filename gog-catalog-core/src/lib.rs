//! Shared types for populating a host catalog from the GOG storefront.
//!
//! Entity kinds, storefront product summaries, host record payloads, slug and
//! date normalization, and the collaborator traits the populator is built on.

pub mod entity;
pub mod error;
pub mod kind;
pub mod media;
pub mod product;
pub mod slug;
pub mod store;

pub use entity::{
    EntityFilter, EntityRecord, FindResult, NewEntity, NewGame, NewReference, Pagination,
};
pub use error::StoreError;
pub use kind::EntityKind;
pub use media::{GALLERY_LIMIT, IMAGE_SUFFIX, ImageField, ImageUpload, image_url};
pub use product::{GameDetails, ListingResponse, Price, ProductSummary, release_date_iso};
pub use slug::{game_slug, slugify};
pub use store::{Collection, EntityStore, MediaUploader};
