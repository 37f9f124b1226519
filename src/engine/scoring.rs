use super::round_to;
use crate::model::{Rating, Segment};

const TAM_SCALE: f64 = 5.0;
const TAM_NORM_MIN: f64 = 1.0;
const TAM_NORM_MAX: f64 = 5.0;

/// Map a TAM in billions onto the 1–5 rating scale.
///
/// Clamped, not stretched: anything at or below 5B is exactly 1.0 and
/// anything at or above 25B is exactly 5.0.
pub fn normalize_tam(tam_usd_b: f64) -> f64 {
    (tam_usd_b / TAM_SCALE).clamp(TAM_NORM_MIN, TAM_NORM_MAX)
}

/// Weighted priority of a segment, rounded to 2 decimals.
///
/// Weights are expected to be normalized by the caller (see
/// [`crate::model::Weights::normalized`]). Compliance burden is not part of
/// the score. Out-of-range ratings are scored as given.
pub fn compute_priority_score(segment: &Segment, w_tam: f64, w_adoption: f64, w_fit: f64) -> f64 {
    let tam_norm = normalize_tam(segment.tam_usd_b);
    round_to(
        tam_norm * w_tam
            + f64::from(segment.adoption_speed) * w_adoption
            + f64::from(segment.chs_fit) * w_fit,
        2,
    )
}

/// Impact × Confidence ÷ Effort, rounded to 2 decimals. Effort is floored
/// at 1 so a zero effort cannot divide by zero.
pub fn compute_ice_score(impact: Rating, confidence: Rating, effort: Rating) -> f64 {
    let effort = effort.max(1);
    round_to(
        f64::from(impact) * f64::from(confidence) / f64::from(effort),
        2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weights;
    use proptest::prelude::*;

    fn segment(tam: f64, adoption: Rating, fit: Rating) -> Segment {
        Segment {
            name: "Test Segment".into(),
            short_name: "Test".into(),
            tam_usd_b: tam,
            adoption_speed: adoption,
            compliance_burden: 3,
            chs_fit: fit,
            priority_score: 0.0,
        }
    }

    #[test]
    fn ice_score_examples() {
        assert_eq!(compute_ice_score(4, 3, 3), 4.0);
        assert_eq!(compute_ice_score(5, 5, 1), 25.0);
        assert_eq!(compute_ice_score(2, 3, 4), 1.5);
        assert_eq!(compute_ice_score(1, 1, 3), 0.33);
    }

    #[test]
    fn ice_score_zero_effort_is_floored() {
        assert_eq!(compute_ice_score(3, 2, 0), compute_ice_score(3, 2, 1));
        assert_eq!(compute_ice_score(3, 2, 0), 6.0);
    }

    #[test]
    fn priority_score_for_sample_segment() {
        // AI Health Coaches: tam_norm 2.2, adoption 5, fit 5.
        let w = Weights::default();
        let s = segment(11.0, 5, 5);
        assert_eq!(compute_priority_score(&s, w.tam, w.adoption, w.fit), 4.16);
    }

    #[test]
    fn small_tam_floors_at_one() {
        let w = Weights::default();
        // Aggregators: 0.212B is well under 5B, so tam_norm is 1.0.
        let s = segment(0.212, 3, 4);
        assert_eq!(compute_priority_score(&s, w.tam, w.adoption, w.fit), 2.8);
    }

    #[test]
    fn priority_score_ties_round_to_even() {
        // Weights 1/1/6 normalize to 0.125/0.125/0.75: 1*0.125 + 2*0.125 + 1*0.75 = 1.125.
        let w = Weights {
            tam: 1.0,
            adoption: 1.0,
            fit: 6.0,
        }
        .normalized();
        let s = segment(1.0, 2, 1);
        assert_eq!(compute_priority_score(&s, w.tam, w.adoption, w.fit), 1.12);
    }

    #[test]
    fn compliance_burden_is_ignored() {
        let w = Weights::default();
        let mut a = segment(7.8, 2, 4);
        let mut b = a.clone();
        a.compliance_burden = 1;
        b.compliance_burden = 5;
        assert_eq!(
            compute_priority_score(&a, w.tam, w.adoption, w.fit),
            compute_priority_score(&b, w.tam, w.adoption, w.fit)
        );
    }

    #[test]
    fn out_of_range_ratings_are_not_rejected() {
        let s = segment(0.0, 9, 0);
        assert_eq!(compute_priority_score(&s, 0.0, 1.0, 0.0), 9.0);
    }

    proptest! {
        #[test]
        fn tam_at_or_above_25_is_five(tam in 25.0f64..10_000.0) {
            prop_assert_eq!(normalize_tam(tam), 5.0);
        }

        #[test]
        fn tam_at_or_below_5_is_one(tam in 0.0f64..=5.0) {
            prop_assert_eq!(normalize_tam(tam), 1.0);
        }

        #[test]
        fn monotone_in_adoption_and_fit(
            tam in 0.0f64..50.0,
            adoption in 1u8..5,
            fit in 1u8..5,
            w_tam in 0.0f64..1.0,
            w_adoption in 0.0f64..1.0,
            w_fit in 0.0f64..1.0,
        ) {
            let w = Weights { tam: w_tam, adoption: w_adoption, fit: w_fit }.normalized();
            let base = compute_priority_score(&segment(tam, adoption, fit), w.tam, w.adoption, w.fit);
            let more_adoption =
                compute_priority_score(&segment(tam, adoption + 1, fit), w.tam, w.adoption, w.fit);
            let more_fit =
                compute_priority_score(&segment(tam, adoption, fit + 1), w.tam, w.adoption, w.fit);
            prop_assert!(more_adoption >= base);
            prop_assert!(more_fit >= base);
        }

        #[test]
        fn priority_score_is_idempotent(
            tam in 0.0f64..50.0,
            adoption in 1u8..=5,
            fit in 1u8..=5,
        ) {
            let w = Weights::default();
            let s = segment(tam, adoption, fit);
            let first = compute_priority_score(&s, w.tam, w.adoption, w.fit);
            let second = compute_priority_score(&s, w.tam, w.adoption, w.fit);
            prop_assert_eq!(first, second);
        }
    }
}
