//! Data-driven combat content and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Weapon attack tables (RON, with embedded defaults)
//! - Combat tuning (TOML)
//!
//! Content is consumed by runtime oracles and never appears in combat state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AttackCatalogData, AttackCatalogLoader, ConfigLoader, ContentFactory, LoadResult, WeaponTable,
};
