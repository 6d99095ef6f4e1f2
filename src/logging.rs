//! Logging setup for processes hosting the aggregate
//!
//! The library crates only emit `tracing` events under their own targets.
//! A host installs a subscriber once with [`init`]; everything outside the
//! cipherfold targets stays at `warn` so the host's own noise is not raised
//! along with ours.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Targets the cipherfold crates log under
pub const TARGETS: [&str; 3] = ["cipherfold", "cipherfold_homomorphic", "cipherfold_aggregate"];

/// Output settings a host can embed in its own config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Level applied to the cipherfold targets (`error` .. `trace`)
    pub level: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Filter directives raising only the cipherfold targets to `level`.
pub fn directives(level: &str) -> String {
    let mut out = String::from("warn");
    for target in TARGETS {
        out.push_str(&format!(",{}={}", target, level));
    }
    out
}

/// Build the filter for `settings`. `RUST_LOG` takes precedence when set.
pub fn filter(settings: &LogSettings) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directives(&settings.level))
        .map_err(|e| anyhow::anyhow!("Invalid log level {:?}: {}", settings.level, e))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(settings: &LogSettings) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(filter(settings)?);

    let installed = if settings.json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))
}
