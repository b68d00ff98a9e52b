//! Form configuration
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! illustrate_flow = true
//!
//! [markers]
//! hide = "cf-hide"
//! animate-in = "cf-animate-in"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::markers::MarkerClasses;

/// Settings shared by every widget of a form
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Emit flow-illustration traces for dispatched notifications
    pub illustrate_flow: bool,
    /// Class names used to project presentation markers
    pub markers: MarkerClasses,
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable flow illustration
    pub fn illustrate_flow(mut self, enabled: bool) -> Self {
        self.illustrate_flow = enabled;
        self
    }

    /// Override the marker class names
    pub fn markers(mut self, markers: MarkerClasses) -> Self {
        self.markers = markers;
        self
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded form config");
        Ok(config)
    }
}
