//! Accumulator Configuration
//!
//! Selects which accumulator variant is active and can be loaded from or
//! saved to TOML.
//!
//! ```toml
//! sign_mode = "sign_aware"
//! width = "preserve_input"
//! strict_modulus = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How plaintext signs are carried in a raw ciphertext
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignMode {
    /// One ciphertext per value
    #[default]
    Plain,
    /// Two concatenated ciphertexts per value: actual half, negative half
    SignAware,
}

/// Byte width of the buffer produced by Terminate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthPolicy {
    /// Minimal big-integer encoding, variable length
    #[default]
    Minimal,
    /// Same width as the first accepted raw ciphertext
    PreserveInput,
    /// Always exactly this many bytes
    Fixed(usize),
}

/// Accumulator configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Sign-support mode
    #[serde(default)]
    pub sign_mode: SignMode,

    /// Output width policy
    #[serde(default)]
    pub width: WidthPolicy,

    /// Reject inputs whose modulus differs from the cached one.
    /// Off by default: the first-seen modulus is trusted for the lifetime of
    /// the aggregate and later arguments are ignored.
    #[serde(default)]
    pub strict_modulus: bool,
}

impl AggregateConfig {
    /// Single ciphertext, minimal-width output
    pub fn plain() -> Self {
        Self::default()
    }

    /// Dual ciphertext, output as wide as the first input
    pub fn signed() -> Self {
        Self {
            sign_mode: SignMode::SignAware,
            width: WidthPolicy::PreserveInput,
            strict_modulus: false,
        }
    }

    /// Dual ciphertext, output padded to a fixed maximum width
    pub fn signed_fixed(width: usize) -> Self {
        Self {
            sign_mode: SignMode::SignAware,
            width: WidthPolicy::Fixed(width),
            strict_modulus: false,
        }
    }

    /// Enable the modulus consistency check
    pub fn with_strict_modulus(mut self) -> Self {
        self.strict_modulus = true;
        self
    }

    /// Check that the combination of settings is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.sign_mode, self.width) {
            (SignMode::SignAware, WidthPolicy::Minimal) => Err(ConfigError::Invalid(
                "sign-aware mode needs a fixed-width output layout".into(),
            )),
            (_, WidthPolicy::Fixed(0)) => {
                Err(ConfigError::Invalid("fixed width must be positive".into()))
            }
            (SignMode::SignAware, WidthPolicy::Fixed(n)) if n % 2 != 0 => Err(
                ConfigError::Invalid(format!("sign-aware fixed width {} is not even", n)),
            ),
            _ => Ok(()),
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
