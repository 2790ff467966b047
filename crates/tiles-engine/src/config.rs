//! # Engine Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILES_CACHE_DIR=/data/cache                                        │
//! │     TILES_PREPARED_BY=FAIZAN                                           │
//! │     TILES_STRICT_OVERFLOW=true                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/quotation/quotation.toml (Linux)                         │
//! │     ~/Library/Application Support/pk.tiles.quotation/quotation.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Shop letterhead, "sqm", lenient overflow, platform cache dir       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # quotation.toml
//! [company]
//! title = "SALES QUOTATION"
//! letterhead = [
//!     ["WAREHOUSE I-9:", "PLOT NO 231-232, ST NO. 7, I-9/2, ISLAMABAD."],
//!     ["T.CHOWK: 1 KM-TCHOWK, NEAR NOOR MAHAL MARQUEE, GT"],
//! ]
//!
//! [document]
//! prepared_by = "FAIZAN"
//! default_uom = "sqm"
//! strict_overflow = false
//!
//! [output]
//! cache_dir = "/data/quotations"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tiles_render::{LayoutSpec, Letterhead};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

const CONFIG_FILE: &str = "quotation.toml";

// =============================================================================
// Company
// =============================================================================

/// Letterhead printed at the top of every quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Address blocks. The first line of the first block prints bold.
    #[serde(default = "default_letterhead")]
    pub letterhead: Vec<Vec<String>>,
}

fn default_title() -> String {
    Letterhead::default().title
}

fn default_letterhead() -> Vec<Vec<String>> {
    Letterhead::default().blocks
}

impl Default for CompanyConfig {
    fn default() -> Self {
        CompanyConfig {
            title: default_title(),
            letterhead: default_letterhead(),
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// Document content defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Signatory printed above "Prepared By" when the order names none.
    #[serde(default)]
    pub prepared_by: Option<String>,

    /// Unit printed for lines without one.
    #[serde(default = "default_uom")]
    pub default_uom: String,

    /// Fail instead of warning when the item table overflows the page.
    #[serde(default)]
    pub strict_overflow: bool,
}

fn default_uom() -> String {
    tiles_core::DEFAULT_UOM.to_string()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            prepared_by: None,
            default_uom: default_uom(),
            strict_overflow: false,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Where finished PDFs go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Cache directory. Platform cache dir when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub company: CompanyConfig,

    #[serde(default)]
    pub document: DocumentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl EngineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (quotation.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document, then validates it. Environment is ignored.
    pub fn from_toml(contents: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.company.title.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "company.title must not be empty".into(),
            ));
        }

        if self.document.default_uom.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "document.default_uom must not be empty".into(),
            ));
        }

        if let Some(ref dir) = self.output.cache_dir {
            if dir.as_os_str().is_empty() {
                return Err(EngineError::InvalidConfig(
                    "output.cache_dir must not be empty when set".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// ## Supported Variables
    /// - `TILES_CACHE_DIR`: PDF output directory
    /// - `TILES_PREPARED_BY`: default signatory
    /// - `TILES_STRICT_OVERFLOW`: `true`/`1`/`yes` to fail on overflow
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("TILES_CACHE_DIR").filter(|v| !v.is_empty()) {
            debug!(cache_dir = %dir, "Overriding cache_dir from environment");
            self.output.cache_dir = Some(PathBuf::from(dir));
        }

        if let Some(name) = lookup("TILES_PREPARED_BY").filter(|v| !v.trim().is_empty()) {
            debug!(prepared_by = %name, "Overriding prepared_by from environment");
            self.document.prepared_by = Some(name);
        }

        if let Some(flag) = lookup("TILES_STRICT_OVERFLOW") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.document.strict_overflow = true,
                "0" | "false" | "no" => self.document.strict_overflow = false,
                other => warn!(value = %other, "Ignoring unrecognised TILES_STRICT_OVERFLOW"),
            }
        }
    }

    /// Returns the default config file path for the current platform.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Directory finished PDFs are written to.
    pub fn cache_dir(&self) -> PathBuf {
        self.output
            .cache_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.cache_dir().to_path_buf()))
            .unwrap_or_else(|| std::env::temp_dir().join("tiles-quotations"))
    }

    /// Page layout with this configuration's letterhead and unit.
    pub fn layout_spec(&self) -> LayoutSpec {
        let mut spec = LayoutSpec::standard().with_letterhead(Letterhead {
            title: self.company.title.clone(),
            blocks: self.company.letterhead.clone(),
        });
        spec.default_uom = self.document.default_uom.clone();
        spec
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("pk", "tiles", "quotation")
}
