use rand::Rng;

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Two-stage integer draw biased toward the interior of the overall range:
/// first draw the sub-range endpoints from `lower` and `upper`, then draw
/// within them. Values near `lower.0` or `upper.1` require two extreme
/// draws in a row, so the distribution bunches around the middle.
pub fn centered_range<R: Rng>(rng: &mut R, lower: (u32, u32), upper: (u32, u32)) -> u32 {
    let lo = rng.gen_range(lower.0..=lower.1);
    let hi = rng.gen_range(upper.0..=upper.1);
    if lo >= hi {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(
            std_dev(&[100., 120., 90., 102., 94.]),
            Some(10.322790320451151)
        );
        assert_eq!(std_dev(&[5.0, 5.0, 5.0, 5.0]), Some(0.0));
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn centered_range_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10_000 {
            let v = centered_range(&mut rng, (17, 25), (33, 40));
            assert!((17..=40).contains(&v));
        }
    }

    #[test]
    fn centered_range_prefers_the_interior() {
        let mut rng = StdRng::seed_from_u64(12);
        let draws: Vec<u32> = (0..20_000)
            .map(|_| centered_range(&mut rng, (0, 40), (60, 100)))
            .collect();
        let interior = draws.iter().filter(|v| (25..=75).contains(*v)).count();
        // A flat uniform over [0,100] would land ~51% in [25,75]; the nested
        // draw concentrates well above that.
        assert!(interior as f64 / draws.len() as f64 > 0.6);
    }

    #[test]
    fn centered_range_handles_overlapping_subranges() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..1_000 {
            let v = centered_range(&mut rng, (30, 50), (40, 60));
            assert!((30..=60).contains(&v));
        }
    }
}
