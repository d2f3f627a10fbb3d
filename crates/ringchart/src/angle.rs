use crate::category::{self, Category};
use crate::{FULL_TURN, START_OFFSET};
use std::f64::consts::PI;

/// Angular extent of one segment, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub start: f64,
    pub end: f64,
}

impl AngleRange {
    /// Zero-sweep range at the reference offset. Used whenever there is
    /// nothing to divide by.
    pub const DEGENERATE: Self = Self {
        start: START_OFFSET,
        end: START_OFFSET,
    };

    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Zero, negative or NaN sweep.
    pub fn is_degenerate(&self) -> bool {
        let sweep = self.sweep();
        sweep.is_nan() || sweep <= 0.0
    }

    /// Half-open test; `angle` must already be normalized.
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }
}

/// Start/end angle of `categories[index]`. The first segment starts at
/// `START_OFFSET` and segments follow in sequence order.
pub fn angle_range(index: usize, categories: &[Category], total: f64) -> AngleRange {
    if !divisible(total) || index >= categories.len() {
        return AngleRange::DEGENERATE;
    }

    let cumulative: f64 = categories[..index].iter().map(Category::value).sum();
    span(cumulative, categories[index].value(), total)
}

/// All ranges in one pass. Bit-identical to calling [`angle_range`] per index.
pub fn angle_ranges(categories: &[Category]) -> Vec<AngleRange> {
    let total = category::total(categories);
    if !divisible(total) {
        return vec![AngleRange::DEGENERATE; categories.len()];
    }

    let mut cumulative = 0.0;
    categories
        .iter()
        .map(|c| {
            let range = span(cumulative, c.value(), total);
            cumulative += c.value();
            range
        })
        .collect()
}

/// Finite values can still overflow to an infinite total.
fn divisible(total: f64) -> bool {
    total.is_finite() && total > 0.0
}

fn span(cumulative: f64, value: f64, total: f64) -> AngleRange {
    AngleRange {
        start: cumulative / total * FULL_TURN + START_OFFSET,
        end: (cumulative + value) / total * FULL_TURN + START_OFFSET,
    }
}

/// Maps any angle into `[START_OFFSET, START_OFFSET + 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    (angle - START_OFFSET).rem_euclid(FULL_TURN) + START_OFFSET
}

pub fn angle_difference(a: f64, b: f64) -> f64 {
    // shortest path around the circle, in [0, PI]
    ((a - b + PI).rem_euclid(FULL_TURN) - PI).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::sample;

    const EPSILON: f64 = 1e-9;

    fn categories(values: &[f64]) -> Vec<Category> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| sample(&format!("c{i}"), *v))
            .collect()
    }

    #[test]
    fn test_two_segment_ring() {
        let cats = vec![sample("food", 40.0), sample("rent", 60.0)];

        let food = angle_range(0, &cats, 100.0);
        let rent = angle_range(1, &cats, 100.0);

        assert!((food.start - (-PI / 2.0)).abs() < EPSILON);
        assert!((food.end - (-PI / 2.0 + 0.8 * PI)).abs() < EPSILON);
        assert!((rent.start - (-PI / 2.0 + 0.8 * PI)).abs() < EPSILON);
        assert!((rent.end - (-PI / 2.0 + 2.0 * PI)).abs() < EPSILON);
        assert!((food.sweep() - 0.4 * FULL_TURN).abs() < EPSILON);
        assert!((rent.sweep() - 0.6 * FULL_TURN).abs() < EPSILON);
    }

    #[test]
    fn test_sweeps_cover_full_turn() {
        for values in [
            vec![1.0],
            vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0],
            vec![0.1, 0.2, 0.3],
            vec![1e6, 0.001, 250.75],
            vec![0.0, 7.0, 0.0],
        ] {
            let cats = categories(&values);
            let swept: f64 = angle_ranges(&cats).iter().map(AngleRange::sweep).sum();
            assert!((swept - FULL_TURN).abs() < EPSILON, "values {values:?}");
        }
    }

    #[test]
    fn test_adjacent_segments_share_edges_exactly() {
        let cats = categories(&[0.1, 0.7, 0.2, 13.0, 0.0, 5.5]);
        let total = category::total(&cats);

        for i in 0..cats.len() - 1 {
            assert_eq!(
                angle_range(i, &cats, total).end,
                angle_range(i + 1, &cats, total).start
            );
        }
    }

    #[test]
    fn test_batch_matches_single_lookup() {
        let cats = categories(&[12.5, 0.3, 88.0, 41.1]);
        let total = category::total(&cats);

        for (i, range) in angle_ranges(&cats).iter().enumerate() {
            assert_eq!(*range, angle_range(i, &cats, total));
        }
    }

    #[test]
    fn test_zero_total_is_degenerate() {
        let cats = categories(&[0.0, 0.0]);

        let range = angle_range(0, &cats, 0.0);
        assert_eq!(range, AngleRange::DEGENERATE);
        assert!(!range.start.is_nan());
        assert!(range.is_degenerate());

        assert_eq!(angle_range(0, &[], 0.0), AngleRange::DEGENERATE);
        assert!(angle_ranges(&cats).iter().all(AngleRange::is_degenerate));
    }

    #[test]
    fn test_overflowing_total_is_degenerate() {
        let cats = categories(&[1e308, 1e308]);
        let total = category::total(&cats);
        assert!(total.is_infinite());

        for range in angle_ranges(&cats) {
            assert_eq!(range, AngleRange::DEGENERATE);
        }
        assert_eq!(angle_range(1, &cats, total), AngleRange::DEGENERATE);
    }

    #[test]
    fn test_nan_sweep_is_degenerate() {
        let range = AngleRange {
            start: 0.0,
            end: f64::NAN,
        };
        assert!(range.is_degenerate());
    }

    #[test]
    fn test_out_of_range_index_is_degenerate() {
        let cats = categories(&[1.0, 2.0]);
        assert_eq!(angle_range(5, &cats, 3.0), AngleRange::DEGENERATE);
    }

    #[test]
    fn test_normalize_and_difference() {
        assert!((normalize_angle(-PI) - PI).abs() < EPSILON);
        assert!((normalize_angle(3.0 * PI) - PI).abs() < EPSILON);
        assert!((normalize_angle(START_OFFSET) - START_OFFSET).abs() < EPSILON);

        assert!((angle_difference(0.1, FULL_TURN - 0.1) - 0.2).abs() < EPSILON);
        assert!((angle_difference(PI, -PI)).abs() < EPSILON);
    }
}
