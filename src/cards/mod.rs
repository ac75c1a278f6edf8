//! Card entity and its tag model.
//!
//! ## Key Types
//!
//! - `Card`: identity, owning client, opaque detail, tag set
//! - `CardDetail`: opaque payload from the metadata collaborator
//! - `CardTags`: derived state (location, visibility, tap/flip, modifiers)
//! - `apply_tag_change`: pure reducer over tags, driven by `TAG_RULES`
//! - `CardStore`: cards by id for one session

pub mod attributes;
pub mod card;
pub mod tags;
pub mod store;

pub use attributes::{AttributeKey, AttributeValue, Attributes, CardDetail};
pub use card::Card;
pub use tags::{
    apply_tag_change, CardTags, Modifiers, RulePhase, TagChange, TagEffect, TagField, TagOverrides,
    TagRule, TAG_RULES,
};
pub use store::CardStore;
