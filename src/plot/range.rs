use crate::error::{Bound, Error, RangeProblem, Result};

/// Sampling interval `[x_min, x_max]` and visible value window `[y_min, y_max]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlotRange {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl PlotRange {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        for (bound, value) in [
            (Bound::XMin, x_min),
            (Bound::XMax, x_max),
            (Bound::YMin, y_min),
            (Bound::YMax, y_max),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidRange {
                    bound,
                    problem: RangeProblem::NotFinite,
                });
            }
        }

        if x_min >= x_max {
            return Err(unordered(Bound::XMin, x_min, x_max));
        }
        if y_min >= y_max {
            return Err(unordered(Bound::YMin, y_min, y_max));
        }

        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Parses four user-typed bounds. `.` is the decimal separator regardless of locale.
    pub fn parse(x_min: &str, x_max: &str, y_min: &str, y_max: &str) -> Result<Self> {
        Self::new(
            parse_bound(Bound::XMin, x_min)?,
            parse_bound(Bound::XMax, x_max)?,
            parse_bound(Bound::YMin, y_min)?,
            parse_bound(Bound::YMax, y_max)?,
        )
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// The `index`-th of `steps + 1` evenly spaced samples; `steps` lands on `x_max` exactly.
    pub fn x_at(&self, index: usize, steps: usize) -> f64 {
        if index >= steps {
            return self.x_max;
        }
        // Weighted so `x_max - x_min` is never formed; it overflows for wide ranges.
        let t = index as f64 / steps as f64;
        self.x_min * (1.0 - t) + self.x_max * t
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y_min && y <= self.y_max
    }
}

fn parse_bound(bound: Bound, input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidRange {
            bound,
            problem: RangeProblem::NotANumber(input.to_string()),
        })
}

fn unordered(bound: Bound, min: f64, max: f64) -> Error {
    Error::InvalidRange {
        bound,
        problem: RangeProblem::Unordered { min, max },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        let range = PlotRange::new(-10.0, 10.0, -5.0, 5.0).unwrap();
        assert_eq!(range.x_min(), -10.0);
        assert_eq!(range.y_max(), 5.0);
    }

    #[test]
    fn test_unordered_x_is_rejected() {
        assert_eq!(
            PlotRange::new(5.0, 1.0, 0.0, 1.0),
            Err(Error::InvalidRange {
                bound: Bound::XMin,
                problem: RangeProblem::Unordered { min: 5.0, max: 1.0 },
            })
        );
    }

    #[test]
    fn test_equal_bounds_are_rejected() {
        assert!(PlotRange::new(1.0, 1.0, 0.0, 1.0).is_err());
        assert!(PlotRange::new(0.0, 1.0, 2.0, 2.0).is_err());
    }

    #[test]
    fn test_non_finite_bounds_are_rejected() {
        assert_eq!(
            PlotRange::new(0.0, f64::INFINITY, 0.0, 1.0),
            Err(Error::InvalidRange {
                bound: Bound::XMax,
                problem: RangeProblem::NotFinite,
            })
        );
        assert!(PlotRange::new(0.0, 1.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_parse_uses_invariant_decimal_point() {
        let range = PlotRange::parse(" -2.5", "2.5 ", "-1", "1e2").unwrap();
        assert_eq!(range.x_min(), -2.5);
        assert_eq!(range.x_max(), 2.5);
        assert_eq!(range.y_max(), 100.0);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(
            PlotRange::parse("0", "1,5", "0", "1"),
            Err(Error::InvalidRange {
                bound: Bound::XMax,
                problem: RangeProblem::NotANumber("1,5".to_string()),
            })
        );
        assert!(PlotRange::parse("", "1", "0", "1").is_err());
        assert!(PlotRange::parse("0", "1", "low", "1").is_err());
    }

    #[test]
    fn test_parse_rejects_textual_infinity() {
        assert!(PlotRange::parse("0", "inf", "0", "1").is_err());
    }

    #[test]
    fn test_x_at_covers_both_ends() {
        let range = PlotRange::new(0.0, 1.0, 0.0, 1.0).unwrap();
        assert_eq!(range.x_at(0, 4), 0.0);
        assert_eq!(range.x_at(2, 4), 0.5);
        assert_eq!(range.x_at(4, 4), 1.0);
    }

    #[test]
    fn test_x_at_stays_finite_across_widest_range() {
        let range = PlotRange::new(-f64::MAX, f64::MAX, 0.0, 1.0).unwrap();
        let xs: Vec<f64> = (0..=2000).map(|i| range.x_at(i, 2000)).collect();

        assert!(xs.iter().all(|x| x.is_finite()));
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(xs[0], -f64::MAX);
        assert_eq!(xs[1000], 0.0);
        assert_eq!(xs[2000], f64::MAX);
    }

    #[test]
    fn test_contains_y_is_inclusive() {
        let range = PlotRange::new(0.0, 1.0, -1.0, 1.0).unwrap();
        assert!(range.contains_y(-1.0));
        assert!(range.contains_y(1.0));
        assert!(!range.contains_y(1.0001));
    }
}
