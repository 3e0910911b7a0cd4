use crate::types::{DimensionSpec, ReviewScores, DIMENSIONS};

/// Weighted total of `scores` using the registry weights, rounded to 2 decimals.
pub fn calculate_total(scores: &ReviewScores) -> f64 {
    calculate_total_with(scores, &DIMENSIONS)
}

/// Weighted total over an explicit set of dimensions.
///
/// Σ score[key] × weight[key], rounded half away from zero to 2 decimal
/// places. A dimension missing from the payload the scores were read from has
/// already defaulted to 0 in [`ReviewScores`].
pub fn calculate_total_with(scores: &ReviewScores, dimensions: &[DimensionSpec]) -> f64 {
    let total: f64 = dimensions
        .iter()
        .map(|dim| scores.get(dim.key) * dim.weight)
        .sum();
    round_to_hundredths(total)
}

/// Sum of the weights of `dimensions`.
pub fn weight_sum(dimensions: &[DimensionSpec]) -> f64 {
    dimensions.iter().map(|dim| dim.weight).sum()
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dimension;

    #[test]
    fn test_weights_sum_to_one() {
        assert!((weight_sum(&DIMENSIONS) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_scenario() {
        let scores = ReviewScores::new(90.0, 80.0, 70.0, 60.0);
        assert_eq!(calculate_total(&scores), 77.0);
    }

    #[test]
    fn test_all_zero_and_all_hundred() {
        assert_eq!(calculate_total(&ReviewScores::uniform(0.0)), 0.0);
        assert_eq!(calculate_total(&ReviewScores::uniform(100.0)), 100.0);
    }

    #[test]
    fn test_bounds_hold_across_integer_grid() {
        for music in (0..=100).step_by(10) {
            for tech in (0..=100).step_by(25) {
                for fusion in (0..=100).step_by(20) {
                    for creative in (0..=100).step_by(50) {
                        let scores = ReviewScores::new(
                            music as f64,
                            tech as f64,
                            fusion as f64,
                            creative as f64,
                        );
                        let total = calculate_total(&scores);
                        assert!((0.0..=100.0).contains(&total), "{scores:?} -> {total}");

                        let all_max = [music, tech, fusion, creative].iter().all(|&s| s == 100);
                        let all_min = [music, tech, fusion, creative].iter().all(|&s| s == 0);
                        assert_eq!(total == 100.0, all_max, "{scores:?} -> {total}");
                        assert_eq!(total == 0.0, all_min, "{scores:?} -> {total}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // 33.33*0.3 + 66.67*0.3 + 12.345*0.2 + 0*0.2 = 32.469
        let scores = ReviewScores::new(33.33, 66.67, 12.345, 0.0);
        assert_eq!(calculate_total(&scores), 32.47);
        assert_eq!(round_to_hundredths(1.005_000_1), 1.01);
        assert_eq!(round_to_hundredths(2.344), 2.34);
    }

    #[test]
    fn test_missing_key_counts_as_zero() {
        let scores: ReviewScores =
            serde_json::from_str(r#"{"music": 90, "tech": 80, "fusion": 70}"#).unwrap();
        assert_eq!(calculate_total(&scores), 65.0);
    }

    #[test]
    fn test_subset_of_dimensions() {
        let scores = ReviewScores::new(50.0, 100.0, 0.0, 0.0);
        let music_only: Vec<_> = DIMENSIONS
            .iter()
            .copied()
            .filter(|d| d.key == Dimension::Music)
            .collect();
        assert_eq!(calculate_total_with(&scores, &music_only), 15.0);
    }
}
