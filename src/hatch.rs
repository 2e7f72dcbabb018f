// Hatch fill geometry.
//
// Lines are generated in backend (pixel) space so the pattern keeps its angle
// regardless of the axis aspect ratio. Line positions are anchored to a global
// grid, so neighbouring bars with the same hatch line up.

use crate::style::{Hatch, HatchLine};

/// Distance between two hatch lines at density 1, in pixels
pub const BASE_SPACING: f64 = 10.0;

pub type Segment = ((f64, f64), (f64, f64));

/// Hatch line segments clipped to the rectangle spanned by `a` and `b`
pub fn hatch_segments(a: (f64, f64), b: (f64, f64), hatch: &Hatch) -> Vec<Segment> {
    let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
    let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
    let spacing = BASE_SPACING / hatch.density.max(1) as f64;

    let mut segments = Vec::new();
    for line in &hatch.lines {
        match line {
            HatchLine::Vertical => {
                for x in grid(x0, x1, spacing) {
                    segments.push(((x, y0), (x, y1)));
                }
            }
            HatchLine::Horizontal => {
                for y in grid(y0, y1, spacing) {
                    segments.push(((x0, y), (x1, y)));
                }
            }
            HatchLine::Forward => {
                // x + y = c (screen y grows downwards)
                let step = spacing * std::f64::consts::SQRT_2;
                for c in grid(x0 + y0, x1 + y1, step) {
                    let xa = x0.max(c - y1);
                    let xb = x1.min(c - y0);
                    if xa < xb {
                        segments.push(((xa, c - xa), (xb, c - xb)));
                    }
                }
            }
            HatchLine::Back => {
                // x - y = c
                let step = spacing * std::f64::consts::SQRT_2;
                for c in grid(x0 - y1, x1 - y0, step) {
                    let xa = x0.max(y0 + c);
                    let xb = x1.min(y1 + c);
                    if xa < xb {
                        segments.push(((xa, xa - c), (xb, xb - c)));
                    }
                }
            }
        }
    }
    segments
}

/// Multiples of `step` strictly inside `(lo, hi)`
fn grid(lo: f64, hi: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (lo / step).floor() as i64 + 1;
    let last = (hi / step).ceil() as i64 - 1;
    (first..=last)
        .map(move |k| k as f64 * step)
        .filter(move |&v| v > lo && v < hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hatch(pattern: &str) -> Hatch {
        pattern.parse().unwrap()
    }

    fn inside(seg: &Segment, x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
        let eps = 1e-9;
        [seg.0, seg.1]
            .iter()
            .all(|&(x, y)| x >= x0 - eps && x <= x1 + eps && y >= y0 - eps && y <= y1 + eps)
    }

    #[test]
    fn test_vertical_lines() {
        let segs = hatch_segments((0.0, 0.0), (100.0, 50.0), &hatch("|"));
        // x = 10, 20, ..., 90
        assert_eq!(segs.len(), 9);
        assert_eq!(segs[0], ((10.0, 0.0), (10.0, 50.0)));
    }

    #[test]
    fn test_density_doubles_lines() {
        let single = hatch_segments((0.0, 0.0), (100.0, 100.0), &hatch("-"));
        let double = hatch_segments((0.0, 0.0), (100.0, 100.0), &hatch("--"));
        assert_eq!(single.len(), 9);
        assert_eq!(double.len(), 19);
    }

    #[test]
    fn test_corners_are_normalized() {
        let a = hatch_segments((100.0, 50.0), (0.0, 0.0), &hatch("|"));
        let b = hatch_segments((0.0, 0.0), (100.0, 50.0), &hatch("|"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_diagonals_stay_inside() {
        for pattern in ["/", "\\", "x", "+"] {
            let segs = hatch_segments((13.0, 7.0), (61.0, 140.0), &hatch(pattern));
            assert!(!segs.is_empty(), "no segments for {}", pattern);
            for seg in &segs {
                assert!(inside(seg, 13.0, 7.0, 61.0, 140.0), "{:?} escapes for {}", seg, pattern);
            }
        }
    }

    #[test]
    fn test_forward_slope() {
        let segs = hatch_segments((0.0, 0.0), (50.0, 50.0), &hatch("/"));
        for ((xa, ya), (xb, yb)) in segs {
            // Going right moves up the screen
            assert!(xb > xa);
            assert!(yb < ya);
        }
    }

    #[test]
    fn test_back_slope() {
        let segs = hatch_segments((0.0, 0.0), (50.0, 50.0), &hatch("\\"));
        for ((xa, ya), (xb, yb)) in segs {
            assert!(xb > xa);
            assert!(yb > ya);
        }
    }

    #[test]
    fn test_degenerate_rect() {
        let segs = hatch_segments((10.0, 10.0), (10.0, 40.0), &hatch("x|"));
        assert!(segs.iter().all(|((xa, _), (xb, _))| xa == xb));
    }
}
