use std::sync::Arc;

use crate::error::{MyRsError, Result};
use crate::traits::DatabaseDriver;

/// Capability table of available drivers.
///
/// Hosts register the drivers they ship; nothing is discovered implicitly.
/// Resolution is by name when [`ConnectSettings`](crate::ConnectSettings)
/// pins one, otherwise the first registered driver wins, so registration
/// order is priority order.
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: Vec<Arc<dyn DatabaseDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a driver at the lowest priority.
    pub fn register(&mut self, driver: Arc<dyn DatabaseDriver>) {
        self.drivers.push(driver);
    }

    /// Looks up a driver by registered name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn DatabaseDriver>> {
        self.drivers.iter().find(|d| d.name() == name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Resolves the driver for a client: by name when one was requested,
    /// otherwise the highest-priority registration.
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn DatabaseDriver>> {
        match name {
            Some(name) => self.get(name).ok_or_else(|| {
                MyRsError::DriverUnavailable(format!("no driver registered under '{name}'"))
            }),
            None => self
                .drivers
                .first()
                .cloned()
                .ok_or_else(|| MyRsError::DriverUnavailable("no drivers registered".to_string())),
        }
    }
}
