//! Metadata handling: reading what a file carries, removing it, and forging
//! replacement text entries.

pub mod forge;
pub mod inspect;
pub mod scrub;

pub use forge::{forge_metadata, FakeMetadata, FORGED_ENTRY_COUNT};
pub use inspect::{inspect_bytes, inspect_file, MetadataSnapshot};
pub use scrub::{scrub_direct, scrub_round_trip};
