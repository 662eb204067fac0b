// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serialisation settings.
//!
//! Settings are stored as RON:
//!
//! ```ron
//! SerialisationConfig(
//!     plug_module: Some("Gaffer"),
//!     value_module: Some("IECore"),
//! )
//! ```

use crate::class_path::ClassPathResolver;
use crate::repr::ComponentLiteralRenderer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file name
pub const CONFIG_FILE_NAME: &str = "serialisation.ron";

/// Module prefixes used when writing and reading plug expressions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialisationConfig {
    /// Module qualifying plug class paths (`Gaffer.V3fPlug`)
    pub plug_module: Option<String>,
    /// Module qualifying value literals (`IECore.V3f( 0, 0, 0 )`)
    pub value_module: Option<String>,
}

impl SerialisationConfig {
    /// Parse settings from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(content)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!("Loaded serialisation config from {:?}", path);
        Ok(config)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved serialisation config to {:?}", path);
        Ok(())
    }

    /// Class path resolver for these settings
    pub fn class_path_resolver(&self) -> ClassPathResolver {
        match &self.plug_module {
            Some(module) => ClassPathResolver::with_module(module.clone()),
            None => ClassPathResolver::new(),
        }
    }

    /// Value literal renderer for these settings
    pub fn literal_renderer(&self) -> ComponentLiteralRenderer {
        match &self.value_module {
            Some(module) => ComponentLiteralRenderer::with_module(module.clone()),
            None => ComponentLiteralRenderer::new(),
        }
    }
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}
