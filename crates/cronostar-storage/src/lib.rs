//! Profile container storage for CronoStar
//!
//! Profiles are persisted as JSON containers, one file per preset and
//! storage prefix. [`ProfileStore`] reads and writes them; [`ProfileCache`]
//! keeps recently loaded containers in memory for a TTL.

mod cache;
mod container;
mod store;

pub use cache::{ProfileCache, DEFAULT_CACHE_TTL};
pub use container::{container_file_name, ContainerMeta, ProfileContainer, ProfileData};
pub use store::{ProfileStore, StorageError, StorageResult};
