//! Scoring engine: scaling factors, composite scores, rating.
//!
//! The model is a weighted linear aggregate: each kernel's ops/sec times a
//! fixed per-kernel scaling factor, summed per mode. Linear (not a
//! geometric mean) so that improving any one kernel strictly improves the
//! aggregate. The table below is the single canonical copy; the
//! orchestrator and any persistence collaborator must consume it from
//! here, never duplicate it.

use crate::models::{BenchmarkResult, BenchmarkSummary, ThreadMode};

/// Per-kernel scaling factors converting raw ops/sec into comparable
/// sub-score contributions. Changing any entry invalidates comparisons
/// with previously recorded runs.
pub const SCALING_FACTORS: &[(&str, f64)] = &[
    ("Prime Generation", 0.00001),
    ("Fibonacci", 0.012),
    ("Matrix Multiplication", 0.025),
    ("Hash Computing", 0.01),
    ("String Sorting", 0.015),
    ("Ray Tracing", 0.006),
    ("Compression", 0.07),
    ("Monte Carlo", 0.07),
    ("JSON Parsing", 0.00004),
    ("N-Queens", 0.07),
];

/// Factor for kernels missing from the table (extension kernels that have
/// not been calibrated yet).
pub const FALLBACK_SCALING_FACTOR: f64 = 0.0001;

/// Mode weighting for the final score. Multi-core is weighted higher to
/// reflect real-world multi-threaded load.
const SINGLE_CORE_WEIGHT: f64 = 0.4;
const MULTI_CORE_WEIGHT: f64 = 0.6;

/// Final score of the reference device; it maps to a normalized 1000.
const REFERENCE_FINAL_SCORE: f64 = 600.0;
const NORMALIZED_BASELINE: f64 = 1000.0;

/// Look up the scaling factor for a kernel name.
pub fn scaling_factor(name: &str) -> f64 {
    SCALING_FACTORS
        .iter()
        .find(|(kernel, _)| *kernel == name)
        .map(|(_, factor)| *factor)
        .unwrap_or(FALLBACK_SCALING_FACTOR)
}

/// Sub-score contribution of one result. Invalid results contribute 0 but
/// are never excluded: a failed kernel degrades the aggregate instead of
/// silently vanishing from it.
fn sub_score(result: &BenchmarkResult) -> f64 {
    if !result.is_valid || !result.ops_per_second.is_finite() {
        return 0.0;
    }
    result.ops_per_second * scaling_factor(&result.name)
}

/// Summed weighted score for one kernel across all its results, the unit
/// consumed by per-kernel history storage.
pub fn kernel_sub_score(results: &[BenchmarkResult], name: &str) -> f64 {
    results
        .iter()
        .filter(|r| r.name == name)
        .map(sub_score)
        .sum()
}

/// Star rating buckets over the normalized score.
fn rating_for(normalized: f64) -> String {
    let stars: usize = if normalized >= 1300.0 {
        5
    } else if normalized >= 1000.0 {
        4
    } else if normalized >= 700.0 {
        3
    } else if normalized >= 400.0 {
        2
    } else {
        1
    };
    "★".repeat(stars)
}

/// Aggregate a full result set into the run summary.
pub fn score(results: &[BenchmarkResult]) -> BenchmarkSummary {
    let mut single_core_score = 0.0;
    let mut multi_core_score = 0.0;

    for result in results {
        match result.mode {
            ThreadMode::SingleCore => single_core_score += sub_score(result),
            ThreadMode::MultiCore => multi_core_score += sub_score(result),
        }
    }

    let core_ratio = if single_core_score > 0.0 {
        multi_core_score / single_core_score
    } else {
        0.0
    };

    let final_weighted_score =
        single_core_score * SINGLE_CORE_WEIGHT + multi_core_score * MULTI_CORE_WEIGHT;
    let normalized_score = final_weighted_score / REFERENCE_FINAL_SCORE * NORMALIZED_BASELINE;

    BenchmarkSummary {
        single_core_score,
        multi_core_score,
        core_ratio,
        final_weighted_score,
        normalized_score,
        rating: rating_for(normalized_score),
        interrupted: None,
        detailed_results: results.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::registry;

    fn result(name: &str, mode: ThreadMode, ops: f64, valid: bool) -> BenchmarkResult {
        BenchmarkResult {
            name: name.to_string(),
            mode,
            execution_time_ms: 100.0,
            ops_per_second: ops,
            is_valid: valid,
            error_message: None,
            acceleration_mode: None,
        }
    }

    #[test]
    fn test_table_covers_every_registry_kernel() {
        for kernel in registry() {
            assert!(
                SCALING_FACTORS.iter().any(|(name, _)| *name == kernel.name()),
                "no scaling factor for {}",
                kernel.name()
            );
        }
    }

    #[test]
    fn test_all_zero_results_yield_zero_scores_without_dividing() {
        let results = vec![
            result("Fibonacci", ThreadMode::SingleCore, 0.0, true),
            result("Fibonacci", ThreadMode::MultiCore, 0.0, true),
        ];
        let summary = score(&results);
        assert_eq!(summary.single_core_score, 0.0);
        assert_eq!(summary.multi_core_score, 0.0);
        assert_eq!(summary.core_ratio, 0.0);
        assert!(summary.final_weighted_score.is_finite());
        assert!(summary.normalized_score.is_finite());
    }

    #[test]
    fn test_invalid_results_contribute_zero_not_excluded() {
        let results = vec![
            result("Fibonacci", ThreadMode::SingleCore, 1000.0, true),
            result("Matrix Multiplication", ThreadMode::SingleCore, 1000.0, false),
        ];
        let summary = score(&results);
        assert!((summary.single_core_score - 1000.0 * 0.012).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_ops_are_guarded() {
        let results = vec![result("Fibonacci", ThreadMode::SingleCore, f64::INFINITY, true)];
        let summary = score(&results);
        assert_eq!(summary.single_core_score, 0.0);
    }

    #[test]
    fn test_final_score_weighting() {
        let results = vec![
            result("Fibonacci", ThreadMode::SingleCore, 1000.0, true),
            result("Fibonacci", ThreadMode::MultiCore, 4000.0, true),
        ];
        let summary = score(&results);
        let single = 1000.0 * 0.012;
        let multi = 4000.0 * 0.012;
        assert!((summary.final_weighted_score - (single * 0.4 + multi * 0.6)).abs() < 1e-9);
        assert!((summary.core_ratio - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_kernel_uses_fallback_factor() {
        assert_eq!(scaling_factor("Quantum Annealing"), FALLBACK_SCALING_FACTOR);
    }

    #[test]
    fn test_rating_buckets() {
        assert_eq!(rating_for(0.0), "★");
        assert_eq!(rating_for(450.0), "★★");
        assert_eq!(rating_for(700.0), "★★★");
        assert_eq!(rating_for(1000.0), "★★★★");
        assert_eq!(rating_for(2000.0), "★★★★★");
    }

    #[test]
    fn test_kernel_sub_score_sums_both_modes() {
        let results = vec![
            result("Ray Tracing", ThreadMode::SingleCore, 100.0, true),
            result("Ray Tracing", ThreadMode::MultiCore, 300.0, true),
            result("Fibonacci", ThreadMode::SingleCore, 999.0, true),
        ];
        let expected = 100.0 * 0.006 + 300.0 * 0.006;
        assert!((kernel_sub_score(&results, "Ray Tracing") - expected).abs() < 1e-9);
    }
}
