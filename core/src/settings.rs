//! The engine's configuration surface.
//!
//! An immutable struct threaded through constructors, never a global.
//! Deserialized from TOML with `#[serde(default)]` per field and
//! `rename_all = "kebab-case"` on nested tables so a config file can write
//! `full-scan-threshold` rather than `full_scan_threshold`. Loading the
//! TOML document itself (finding the file, merging layers) is a front
//! end's job; this module only defines the shape and a
//! `Settings::default()`.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Fast,
    Comprehensive,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AutofixSettings {
    pub enabled: bool,
    pub no_progress_threshold: u32,
    pub max_diff_lines: u32,
}

impl Default for AutofixSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            no_progress_threshold: 3,
            max_diff_lines: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ParallelSettings {
    pub max_workers: usize,
}

impl Default for ParallelSettings {
    fn default() -> Self {
        Self { max_workers: 6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub size_budget_bytes: u64,
    pub directory: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            size_budget_bytes: 8 * 1024 * 1024,
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct QualityGateSettings {
    pub tier: Tier,
    pub ratchet_enabled: bool,
    pub exemptions_file: Option<PathBuf>,
}

impl Default for QualityGateSettings {
    fn default() -> Self {
        Self {
            tier: Tier::Auto,
            ratchet_enabled: true,
            exemptions_file: None,
        }
    }
}

/// Top-level, immutable engine configuration. Construct via
/// [`Settings::default`] and override fields, or deserialize from a TOML
/// document an external loader already parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    pub strategy: Strategy,
    pub incremental: bool,
    pub full_scan_threshold: usize,
    pub base_branch: String,
    pub autofix: AutofixSettings,
    pub parallel: ParallelSettings,
    pub cache: CacheSettings,
    pub quality_gate: QualityGateSettings,
    /// Per-tool timeout overrides: `adapter_timeouts.<tool>` in seconds,
    /// keyed by `HookDefinition::name`.
    pub adapter_timeouts: HashMap<String, u64>,
    pub project_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Both,
            incremental: true,
            full_scan_threshold: 50,
            base_branch: "main".to_string(),
            autofix: AutofixSettings::default(),
            parallel: ParallelSettings::default(),
            cache: CacheSettings::default(),
            quality_gate: QualityGateSettings::default(),
            adapter_timeouts: HashMap::new(),
            project_root: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Resolve the effective per-hook timeout: the override in
    /// `adapter_timeouts` if present, else the catalog's own
    /// `timeout_seconds`.
    pub fn timeout_for(&self, hook_name: &str, catalog_default: u64) -> std::time::Duration {
        let seconds = self.adapter_timeouts.get(hook_name).copied().unwrap_or(catalog_default);
        std::time::Duration::from_secs(seconds)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .directory
            .clone()
            .unwrap_or_else(|| self.project_root.join(".crackerjack-cache"))
    }

    pub fn lock_dir(&self) -> PathBuf {
        self.project_root.join(".locks")
    }

    pub fn baseline_path(&self) -> PathBuf {
        self.project_root.join(".quality_baseline.json")
    }

    pub fn exemptions_path(&self) -> PathBuf {
        self.quality_gate
            .exemptions_file
            .clone()
            .unwrap_or_else(|| self.project_root.join(".quality_exemptions.yaml"))
    }

    /// Parse a `Settings` overlay from a TOML document, falling back to
    /// defaults for any field it omits (every field above carries
    /// `#[serde(default)]`).
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
