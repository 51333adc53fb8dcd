//! Provider directories
//!
//! A [`ProviderDirectory`] enumerates candidate providers near a point. The
//! locator never cares where they come from:
//! - [`FixtureDirectory`]: fixed templates placed at small offsets from the
//!   searcher, for tests and demos
//! - [`HttpDirectory`]: a remote medical directory API

pub mod fixture;
pub mod remote;

use crate::config::DirectoryConfig;
use crate::models::{Coordinates, Provider};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;

pub use fixture::{FixtureDirectory, ProviderTemplate};
pub use remote::HttpDirectory;

/// Source of candidate providers around a location
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    /// Providers near `near`; distance and radius filtering is left to the caller
    async fn list_candidates(&self, near: &Coordinates) -> Result<Vec<Provider>>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Build the directory selected by `config.kind`
pub fn from_config(config: &DirectoryConfig) -> Result<Arc<dyn ProviderDirectory>> {
    match config.kind.as_str() {
        "fixture" => {
            let directory = if config.fixtures.is_empty() {
                FixtureDirectory::default()
            } else {
                FixtureDirectory::new(config.fixtures.clone())
            };
            Ok(Arc::new(directory))
        }
        "http" => Ok(Arc::new(HttpDirectory::new(config)?)),
        other => bail!("Unknown provider directory kind '{other}'"),
    }
}
