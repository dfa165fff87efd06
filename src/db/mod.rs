//! Database change-sets.
//!
//! Layout:
//! - `changesets.rs`: the ordered literal SQL blocks and the manual verification query

pub mod changesets;

pub use changesets::{CHANGESETS, ChangeSet, VERIFY_COLUMNS_QUERY};
