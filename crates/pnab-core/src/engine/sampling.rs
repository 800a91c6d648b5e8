use crate::core::models::helical::{Configuration, HelicalAxis, HelicalPoint, HelicalRanges};
use itertools::Itertools;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use tracing::{debug, instrument};

/// Per-axis sample vectors drawn from the helical ranges, and the lazy
/// Cartesian product over them.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpander {
    samples: [Vec<f64>; 6],
}

impl RangeExpander {
    /// Draws `steps` uniform values from `[low, high]` for every axis.
    ///
    /// An axis with a single step yields its lower bound without consuming any
    /// randomness.
    #[instrument(level = "debug", skip_all)]
    pub fn draw(ranges: &HelicalRanges, rng: &mut impl Rng) -> Self {
        let samples = HelicalAxis::ALL.map(|axis| {
            let range = ranges.get(axis);
            if range.steps <= 1 {
                return vec![range.low];
            }
            let (lo, hi) = if range.low <= range.high {
                (range.low, range.high)
            } else {
                (range.high, range.low)
            };
            let dist = Uniform::new_inclusive(lo, hi);
            (0..range.steps).map(|_| dist.sample(rng)).collect()
        });

        let expander = Self { samples };
        debug!(
            configurations = expander.configuration_count(),
            "Drew helical samples."
        );
        expander
    }

    pub fn from_samples(samples: [Vec<f64>; 6]) -> Self {
        Self { samples }
    }

    pub fn samples(&self, axis: HelicalAxis) -> &[f64] {
        &self.samples[axis as usize]
    }

    pub fn configuration_count(&self) -> u64 {
        self.samples
            .iter()
            .fold(1u64, |acc, s| acc.saturating_mul(s.len() as u64))
    }

    /// Every combination of samples, numbered from 1, with the last axis
    /// varying fastest.
    pub fn configurations(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.samples
            .iter()
            .map(|s| s.iter().copied())
            .multi_cartesian_product()
            .zip(1u64..)
            .map(|(values, ordinal)| {
                let mut point = [0.0; 6];
                point.copy_from_slice(&values);
                Configuration {
                    ordinal,
                    point: HelicalPoint::new(point),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::helical::HelicalRange;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ranges(steps: [usize; 6]) -> HelicalRanges {
        let mut ranges = HelicalRanges::default();
        for (axis, n) in HelicalAxis::ALL.into_iter().zip(steps) {
            ranges.set(axis, HelicalRange::new(-1.0 * n as f64, 2.0 * n as f64, n));
        }
        ranges
    }

    #[test]
    fn single_step_axes_yield_their_lower_bound() {
        let mut r = HelicalRanges::default();
        r.set(HelicalAxis::HelicalTwist, HelicalRange::new(30.0, 40.0, 1));
        r.set(HelicalAxis::HelicalRise, HelicalRange::scalar(3.4));
        let expander = RangeExpander::draw(&r, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(expander.samples(HelicalAxis::HelicalTwist), [30.0]);
        assert_eq!(expander.samples(HelicalAxis::HelicalRise), [3.4]);
        assert_eq!(expander.samples(HelicalAxis::Tip), [0.0]);
    }

    #[test]
    fn count_is_the_product_of_steps() {
        for steps in [[1, 1, 1, 1, 1, 1], [3, 1, 5, 1, 1, 1], [2, 2, 2, 2, 2, 2], [4, 1, 1, 3, 1, 2]] {
            let expander =
                RangeExpander::draw(&ranges(steps), &mut ChaCha8Rng::seed_from_u64(9));
            let expected: u64 = steps.iter().map(|&s| s as u64).product();
            assert_eq!(expander.configuration_count(), expected);
            assert_eq!(expander.configurations().count() as u64, expected);
        }
    }

    #[test]
    fn samples_stay_within_bounds() {
        let r = ranges([5, 4, 3, 2, 6, 7]);
        let expander = RangeExpander::draw(&r, &mut ChaCha8Rng::seed_from_u64(3));
        for (axis, range) in r.iter() {
            let samples = expander.samples(axis);
            assert_eq!(samples.len(), range.steps);
            assert!(samples.iter().all(|v| (range.low..=range.high).contains(v)));
        }
    }

    #[test]
    fn reversed_bounds_are_sampled_between_them() {
        let mut r = HelicalRanges::default();
        r.set(HelicalAxis::Inclination, HelicalRange::new(5.0, -5.0, 4));
        let expander = RangeExpander::draw(&r, &mut ChaCha8Rng::seed_from_u64(5));
        assert!(expander
            .samples(HelicalAxis::Inclination)
            .iter()
            .all(|v| (-5.0..=5.0).contains(v)));
    }

    #[test]
    fn same_seed_draws_same_samples() {
        let r = ranges([3, 2, 1, 1, 1, 4]);
        let a = RangeExpander::draw(&r, &mut ChaCha8Rng::seed_from_u64(42));
        let b = RangeExpander::draw(&r, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn configurations_are_numbered_with_last_axis_fastest() {
        let expander = RangeExpander::from_samples([
            vec![10.0, 20.0],
            vec![0.0],
            vec![0.0],
            vec![1.0, 2.0, 3.0],
            vec![0.0],
            vec![0.0],
        ]);
        let configs: Vec<_> = expander.configurations().collect();
        assert_eq!(configs.len(), 6);
        let ordinals: Vec<_> = configs.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, [1, 2, 3, 4, 5, 6]);
        let pairs: Vec<_> = configs
            .iter()
            .map(|c| {
                (
                    c.point.get(HelicalAxis::HelicalTwist),
                    c.point.get(HelicalAxis::HelicalRise),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            [(10.0, 1.0), (10.0, 2.0), (10.0, 3.0), (20.0, 1.0), (20.0, 2.0), (20.0, 3.0)]
        );
        assert_eq!(configs[0].prefix(), "1");
    }
}
