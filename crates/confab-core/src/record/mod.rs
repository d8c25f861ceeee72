//! Canonical record model
//!
//! Everything the pipeline moves between stages is a [`CanonicalRecord`]:
//! a provider-neutral envelope around one organization, conversation, or
//! message. The envelope carries identity (`provider`, `kind`, `id`),
//! lineage (`parent_id`), and a content hash that makes cache hits a pure
//! payload comparison.

pub mod hash;

mod canonical;
mod key;
mod kind;
mod provider;

pub use canonical::CanonicalRecord;
pub use key::RecordKey;
pub use kind::RecordKind;
pub use provider::Provider;

pub(crate) use key::encode_component;
