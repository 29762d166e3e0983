//! Department analytics.
//!
//! Every figure is recomputed from the store on each call. Percentages and
//! averages are rounded to two decimals before they leave this module.

pub mod handlers;
pub mod recruiters;
pub mod skill_gap;
pub mod stats;
pub mod students;
pub mod summary;

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn test_round2() {
        assert_eq!(round2(8.0), 8.0);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.004), 0.0);
    }
}
