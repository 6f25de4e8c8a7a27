//! Legacy item catalog: integer-keyed rows with a name and a price.

pub mod types;

pub use types::{Item, ItemId, NewItem};
