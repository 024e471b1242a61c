//! Host-version adapter selection.
//!
//! The host process registers one factory per host API generation it can
//! speak, then asks for the one matching the configured version.  Selection
//! happens once at session start.

use ha_core::HostApiVersion;

use crate::{WorldError, WorldOps, WorldResult};

/// Builds a fresh adapter for one host API generation.
pub type AdapterFactory = Box<dyn Fn() -> Box<dyn WorldOps>>;

/// Maps host API versions to adapter factories.
#[derive(Default)]
pub struct AdapterRegistry {
    factories: Vec<(HostApiVersion, AdapterFactory)>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for `version`, replacing any earlier registration.
    pub fn register<F>(mut self, version: HostApiVersion, factory: F) -> Self
    where
        F: Fn() -> Box<dyn WorldOps> + 'static,
    {
        self.factories.retain(|(v, _)| *v != version);
        self.factories.push((version, Box::new(factory)));
        self
    }

    pub fn supports(&self, version: HostApiVersion) -> bool {
        self.factories.iter().any(|(v, _)| *v == version)
    }

    /// Instantiate the adapter for `version`.
    pub fn select(&self, version: HostApiVersion) -> WorldResult<Box<dyn WorldOps>> {
        let (_, factory) = self
            .factories
            .iter()
            .find(|(v, _)| *v == version)
            .ok_or(WorldError::NoAdapter(version))?;
        tracing::info!(?version, "world adapter selected");
        Ok(factory())
    }
}
