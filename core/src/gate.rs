//! Tier-driven threshold evaluation with a monotonic ratchet.
//!
//! The ratchet's atomic baseline write uses a write-temp-then-rename
//! pattern, with an explicit `File::sync_all` of both the temp file and its
//! containing directory: a half-written baseline would silently reset the
//! ratchet, so this file gets stronger durability guarantees than the
//! result cache does.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    /// Resolve a configured `settings::Tier` (which carries an `Auto`
    /// variant for "detect from the project") down to one of this gate's
    /// three concrete tiers.
    pub fn resolve(configured: crate::settings::Tier, project_root: &Path) -> Self {
        match configured {
            crate::settings::Tier::Bronze => Self::Bronze,
            crate::settings::Tier::Silver => Self::Silver,
            crate::settings::Tier::Gold => Self::Gold,
            crate::settings::Tier::Auto => Self::auto_detect(project_root),
        }
    }

    /// Tier `auto` selection: published-package markers ⇒ gold, executable
    /// entry points ⇒ silver, otherwise bronze.
    pub fn auto_detect(project_root: &Path) -> Self {
        let has_package_markers = project_root.join("pyproject.toml").is_file()
            && std::fs::read_to_string(project_root.join("pyproject.toml"))
                .is_ok_and(|text| text.contains("[project]") && text.contains("version"));
        if has_package_markers {
            return Self::Gold;
        }
        let has_entry_points = project_root.join("pyproject.toml").is_file()
            && std::fs::read_to_string(project_root.join("pyproject.toml"))
                .is_ok_and(|text| text.contains("[project.scripts]"));
        if has_entry_points {
            return Self::Silver;
        }
        Self::Bronze
    }

    fn thresholds(self) -> TierThresholds {
        match self {
            // Monotonically stricter across bronze < silver < gold.
            Self::Bronze => TierThresholds {
                min_coverage_percent: 40.0,
                max_avg_complexity: 15.0,
                max_critical: 0,
                max_high: 5,
                max_medium: 20,
                min_type_hint_coverage_percent: 40.0,
                max_duplication_percent: 15.0,
                min_documentation_coverage_percent: 20.0,
            },
            Self::Silver => TierThresholds {
                min_coverage_percent: 65.0,
                max_avg_complexity: 10.0,
                max_critical: 0,
                max_high: 2,
                max_medium: 10,
                min_type_hint_coverage_percent: 70.0,
                max_duplication_percent: 8.0,
                min_documentation_coverage_percent: 50.0,
            },
            Self::Gold => TierThresholds {
                min_coverage_percent: 85.0,
                max_avg_complexity: 6.0,
                max_critical: 0,
                max_high: 0,
                max_medium: 3,
                min_type_hint_coverage_percent: 95.0,
                max_duplication_percent: 3.0,
                min_documentation_coverage_percent: 80.0,
            },
        }
    }
}

struct TierThresholds {
    min_coverage_percent: f64,
    max_avg_complexity: f64,
    max_critical: u32,
    max_high: u32,
    max_medium: u32,
    min_type_hint_coverage_percent: f64,
    max_duplication_percent: f64,
    min_documentation_coverage_percent: f64,
}

/// Snapshot of measured project metrics. For fields documented "higher is
/// better" regression means a decrease;
/// for "lower is better" fields regression means an increase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityBaseline {
    pub coverage_percent: f64,
    pub avg_complexity: f64,
    pub security_critical: u32,
    pub security_high: u32,
    pub security_medium: u32,
    pub type_hint_coverage_percent: f64,
    pub duplication_percent: f64,
    pub documentation_coverage_percent: f64,
}

impl QualityBaseline {
    /// Ratchet rule: every tracked metric must be `>=` (for
    /// higher-is-better metrics) or `<=` (for lower-is-better metrics) the
    /// prior baseline. Returns the list of regressed metric names with
    /// "was X, now Y" detail for the gate's violation messages.
    fn regressions_against(&self, previous: &QualityBaseline) -> Vec<String> {
        let mut regressions = Vec::new();
        let mut higher_is_better = |name: &str, now: f64, before: f64| {
            if now < before {
                regressions.push(format!("{name} regressed from {before:.2} to {now:.2}"));
            }
        };
        higher_is_better("coverage_percent", self.coverage_percent, previous.coverage_percent);
        higher_is_better("type_hint_coverage_percent", self.type_hint_coverage_percent, previous.type_hint_coverage_percent);
        higher_is_better("documentation_coverage_percent", self.documentation_coverage_percent, previous.documentation_coverage_percent);

        let mut lower_is_better = |name: &str, now: f64, before: f64| {
            if now > before {
                regressions.push(format!("{name} regressed from {before:.2} to {now:.2}"));
            }
        };
        lower_is_better("avg_complexity", self.avg_complexity, previous.avg_complexity);
        lower_is_better("duplication_percent", self.duplication_percent, previous.duplication_percent);
        lower_is_better("security_critical", f64::from(self.security_critical), f64::from(previous.security_critical));
        lower_is_better("security_high", f64::from(self.security_high), f64::from(previous.security_high));
        lower_is_better("security_medium", f64::from(self.security_medium), f64::from(previous.security_medium));
        regressions
    }

    fn is_improvement_or_hold(&self, previous: &QualityBaseline) -> bool {
        self.regressions_against(previous).is_empty()
    }

    /// Atomically persist this baseline: write-temp, fsync, rename, fsync
    /// the directory.
    pub fn save_atomic(&self, path: &Path) -> EngineResult<()> {
        let bytes = serde_json::to_vec_pretty(self).map_err(|source| EngineError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            source,
        )))?;
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(EngineError::Io)?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(EngineError::Io)?;
        use std::io::Write as _;
        tmp.write_all(&bytes).map_err(EngineError::Io)?;
        tmp.as_file().sync_all().map_err(EngineError::Io)?;
        tmp.persist(path).map_err(|err| EngineError::Io(err.error))?;
        if let Ok(dir_handle) = std::fs::File::open(parent) {
            let _ = dir_handle.sync_all();
        }
        Ok(())
    }

    pub fn load(path: &Path) -> EngineResult<Option<Self>> {
        match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| EngineError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, source))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(EngineError::Io(source)),
        }
    }
}

/// Suppresses regression checks for one `(file, check_type)` pair until
/// `expires_at`; inert afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exemption {
    pub file_path: String,
    pub check_type: String,
    pub reason: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Exemption {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateResult {
    pub passed: bool,
    pub tier: Tier,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Evaluates a measured `QualityBaseline` against a tier's thresholds and,
/// if a persisted baseline and ratchet are enabled, against regression.
pub struct QualityGate {
    ratchet_enabled: bool,
}

impl QualityGate {
    pub fn new(ratchet_enabled: bool) -> Self {
        Self { ratchet_enabled }
    }

    /// `exemptions` active at `now` suppress ratchet regression checks for
    /// matching `(file, check_type)` pairs; they do not exempt
    /// tier-threshold violations, which are unconditional.
    pub fn evaluate(
        &self,
        measured: &QualityBaseline,
        tier: Tier,
        previous_baseline: Option<&QualityBaseline>,
        exemptions: &[Exemption],
        now: DateTime<Utc>,
    ) -> GateResult {
        let thresholds = tier.thresholds();
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        if measured.coverage_percent < thresholds.min_coverage_percent {
            violations.push(format!(
                "coverage {:.1}% is below the {tier:?} tier threshold of {:.1}%",
                measured.coverage_percent, thresholds.min_coverage_percent
            ));
        }
        if measured.avg_complexity > thresholds.max_avg_complexity {
            violations.push(format!(
                "average complexity {:.1} exceeds the {tier:?} tier threshold of {:.1}",
                measured.avg_complexity, thresholds.max_avg_complexity
            ));
        }
        if measured.security_critical > thresholds.max_critical {
            violations.push(format!("{} critical security finding(s) exceed the tier limit", measured.security_critical));
        }
        if measured.security_high > thresholds.max_high {
            violations.push(format!("{} high security finding(s) exceed the tier limit", measured.security_high));
        }
        if measured.security_medium > thresholds.max_medium {
            violations.push(format!("{} medium security finding(s) exceed the tier limit", measured.security_medium));
        }
        if measured.type_hint_coverage_percent < thresholds.min_type_hint_coverage_percent {
            violations.push(format!(
                "type-hint coverage {:.1}% is below the {tier:?} tier threshold of {:.1}%",
                measured.type_hint_coverage_percent, thresholds.min_type_hint_coverage_percent
            ));
        }
        if measured.duplication_percent > thresholds.max_duplication_percent {
            violations.push(format!(
                "duplication {:.1}% exceeds the {tier:?} tier threshold of {:.1}%",
                measured.duplication_percent, thresholds.max_duplication_percent
            ));
        }
        if measured.documentation_coverage_percent < thresholds.min_documentation_coverage_percent {
            violations.push(format!(
                "documentation coverage {:.1}% is below the {tier:?} tier threshold of {:.1}%",
                measured.documentation_coverage_percent, thresholds.min_documentation_coverage_percent
            ));
        }

        if self.ratchet_enabled {
            if let Some(previous) = previous_baseline {
                let exempted = exemptions.iter().any(|e| e.is_active(now) && e.check_type == "ratchet");
                if exempted {
                    warnings.push("ratchet regression check suppressed by an active exemption".to_string());
                } else if !measured.is_improvement_or_hold(previous) {
                    for regression in measured.regressions_against(previous) {
                        violations.push(format!("ratchet: {regression}"));
                    }
                }
            }
        }

        GateResult { passed: violations.is_empty(), tier, violations, warnings }
    }
}

pub fn baseline_path_default(project_root: &Path) -> PathBuf {
    project_root.join(".quality_baseline.json")
}
