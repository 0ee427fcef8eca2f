//! Attention tape — a linked log of moments of attention plus mutable,
//! branchable plans of what to look at next.
//!
//! Two independent structures live side by side in one SQLite database:
//!
//! | Structure | Shape | Mutability |
//! |-----------|-------|------------|
//! | **Interest log** | Doubly linked chain per owner, newest entry is "now" | Append-only chain; discoveries accumulate until resolution |
//! | **Interest lists** | Named, ordered item sequences with a cursor | Items added, removed, reordered, navigated; lists can be branched |
//!
//! List items may point at log entries (`item_type = "interest"`) but the two
//! never share a lifecycle.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite connection setup, schema, migrations, and column helpers
//! - [`error`] — The [`Error`] taxonomy shared by all operations
//! - [`interest`] — The interest log: chaining, discoveries, trajectory, tags, insights
//! - [`list`] — Interest lists: items, positions, navigation, and branching

#[macro_use]
mod macros;

pub mod config;
pub mod db;
pub mod error;
pub mod interest;
pub mod list;

pub use error::{Error, Result};
