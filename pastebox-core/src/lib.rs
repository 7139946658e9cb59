//! # Pastebox Core
//!
//! An ephemeral, in-process store for paste-style services: callers hand in
//! any serializable value with an expiration time and get back a short random
//! identifier to fetch or remove it later.
//!
//! ## Features
//!
//! - Random identifiers with bounded collision retry ([`MAX_ID_ATTEMPTS`])
//! - Expired items are invisible to reads immediately (lazy expiration)
//! - Background sweep task reclaiming expired items, stoppable per store
//! - One mutex over the whole map, so every operation is atomic
//! - Pluggable identifier generator and clock
//!
//! ## Example
//!
//! ```rust,no_run
//! use pastebox_core::{Store, StoreConfig};
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Paste {
//!     text: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pastebox_core::StoreError> {
//!     // Sweep expired pastes every hour instead of once a day
//!     let config = StoreConfig::default()
//!         .with_sweep_interval(Duration::from_secs(3600));
//!     let store = Store::with_config(config);
//!
//!     // Keep the paste for ten minutes
//!     let id = store.store_for(&Paste { text: "hi".into() }, Duration::from_secs(600))?;
//!
//!     let paste: Paste = store.fetch(&id)?;
//!     println!("{}: {}", id, paste.text);
//!
//!     store.remove(&id);
//!     store.shutdown();
//!     Ok(())
//! }
//! ```

mod clock;
mod config;
mod error;
mod id;
mod item;
mod storage;
mod store;

pub use clock::{Clock, SystemClock};
pub use config::{StoreConfig, DEFAULT_ID_LENGTH, DEFAULT_SWEEP_INTERVAL};
pub use error::{GeneratorError, IdGenerationError, StoreError};
pub use id::{IdGenerator, RandomIdGenerator};
pub use item::{is_expired, Item};
pub use storage::Storage;
pub use store::{Store, MAX_ID_ATTEMPTS};
