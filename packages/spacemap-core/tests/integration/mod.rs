//! Integration test suite.
//!
//! Every test drives models through the public API against an in-memory
//! store registered under three aliases:
//! - `default`: space 0, unique index 0 on position 0
//! - `the_new_space`: space 1, plus a non-unique index 1 on position 1
//! - `composite_primary_key`: space 2, unique index 0 on positions 0 and 1

pub mod definitions;
pub mod helpers;
pub mod manager_create;
pub mod manager_get;
pub mod model_delete;
pub mod model_save;
