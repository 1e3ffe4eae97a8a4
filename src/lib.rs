//! Durable recipe favorites for mobile recipe browsers.
//!
//! The [`favorites`] module holds the favorites manager, which keeps an
//! in-memory cache consistent with a single durable record provided by the
//! [`store`] module. [`search`] talks to the recipe search backend whose hits
//! become favorites, and `ffi` exposes all of it to iOS and Android hosts.

pub mod favorites;
pub mod ffi;
pub mod model;
pub mod search;
pub mod store;

pub use favorites::{FavoritesError, FavoritesManager, Toggled};
pub use model::*;
pub use store::{DurableRecord, FileStore, KeyValueStore, MemoryStore};

uniffi::setup_scaffolding!();
