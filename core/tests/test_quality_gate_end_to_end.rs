//! `QualityGate` driven against a baseline file written and reloaded from
//! disk, rather than in-memory structs (`spec.md` §4.9, §9 durability
//! requirement on the ratchet baseline).

use chrono::Utc;
use crackerjack_core::gate::{Exemption, QualityBaseline, QualityGate, Tier};

fn baseline(coverage: f64) -> QualityBaseline {
    QualityBaseline {
        coverage_percent: coverage,
        avg_complexity: 5.0,
        security_critical: 0,
        security_high: 0,
        security_medium: 1,
        type_hint_coverage_percent: 92.0,
        duplication_percent: 1.5,
        documentation_coverage_percent: 82.0,
    }
}

#[test]
fn baseline_round_trips_through_atomic_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quality_baseline.json");
    let original = baseline(91.0);
    original.save_atomic(&path).unwrap();

    let loaded = QualityBaseline::load(&path).unwrap().expect("file was just written");
    assert_eq!(loaded, original);
}

#[test]
fn missing_baseline_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");
    assert!(QualityBaseline::load(&path).unwrap().is_none());
}

#[test]
fn first_run_with_no_baseline_only_checks_tier_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quality_baseline.json");
    assert!(QualityBaseline::load(&path).unwrap().is_none());

    let gate = QualityGate::new(true);
    let measured = baseline(90.0);
    let result = gate.evaluate(&measured, Tier::Gold, None, &[], Utc::now());
    assert!(result.passed);

    measured.save_atomic(&path).unwrap();
    assert!(QualityBaseline::load(&path).unwrap().is_some());
}

#[test]
fn a_regression_against_the_persisted_baseline_fails_the_gate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quality_baseline.json");
    baseline(95.0).save_atomic(&path).unwrap();

    let previous = QualityBaseline::load(&path).unwrap().unwrap();
    let gate = QualityGate::new(true);
    let measured = baseline(90.0); // dropped five points, still above gold's 85% floor
    let result = gate.evaluate(&measured, Tier::Gold, Some(&previous), &[], Utc::now());
    assert!(!result.passed);
    assert!(result.violations.iter().any(|v| v.contains("coverage_percent")));
}

#[test]
fn an_expired_exemption_no_longer_suppresses_the_ratchet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quality_baseline.json");
    baseline(95.0).save_atomic(&path).unwrap();
    let previous = QualityBaseline::load(&path).unwrap().unwrap();

    let gate = QualityGate::new(true);
    let measured = baseline(90.0);
    let expired = Exemption {
        file_path: "*".to_string(),
        check_type: "ratchet".to_string(),
        reason: "past migration window".to_string(),
        issued_at: Utc::now() - chrono::Duration::days(30),
        expires_at: Utc::now() - chrono::Duration::days(1),
    };
    let result = gate.evaluate(&measured, Tier::Gold, Some(&previous), std::slice::from_ref(&expired), Utc::now());
    assert!(!result.passed, "an expired exemption must not suppress the regression");
}

#[test]
fn tier_threshold_violation_is_unconditional_even_with_an_improving_ratchet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quality_baseline.json");
    baseline(20.0).save_atomic(&path).unwrap();
    let previous = QualityBaseline::load(&path).unwrap().unwrap();

    let gate = QualityGate::new(true);
    let measured = baseline(30.0); // improved over the baseline, still below bronze's 40% floor
    let result = gate.evaluate(&measured, Tier::Bronze, Some(&previous), &[], Utc::now());
    assert!(!result.passed);
    assert!(result.violations.iter().any(|v| v.contains("coverage")));
    assert!(!result.violations.iter().any(|v| v.contains("ratchet")));
}
