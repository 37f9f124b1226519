//! Pure scoring and aggregation functions.
//!
//! Nothing in here holds state: callers pass records in and get derived
//! values back, so every interaction can simply recompute.

mod aggregate;
mod scoring;

pub use aggregate::{
    compute_conversion_series, group_count, reshape_to_long, ConversionRow, GroupCount,
    LongRecord,
};
pub use scoring::{compute_ice_score, compute_priority_score, normalize_tam};

/// Round to `places` decimal places, ties to even (banker's rounding).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn rounds_to_requested_places() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(16.0, 1), 16.0);
        assert_eq!(round_to(13.3333, 1), 13.3);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
    }

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_to(1.125, 2), 1.12);
        assert_eq!(round_to(1.375, 2), 1.38);
        assert_eq!(round_to(6.25, 1), 6.2);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(2.5, 0), 2.0);
    }
}
