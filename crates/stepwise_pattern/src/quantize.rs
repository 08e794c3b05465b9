//! Level quantization shared by value sequences and trigger previews.

/// Snaps `y` to the nearest of `levels` evenly spaced values in [0, 1].
///
/// `levels` of 0 or 1 means "no quantization" and returns `y` unchanged.
/// With `levels = L > 1` the grid is `{0, 1/(L-1), ..., 1}`; 0 and 1 are
/// always exact grid points and quantizing twice changes nothing.
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quantize(y: f32, levels: usize) -> f32 {
    if levels > 1 {
        let divisions = (levels - 1) as f32;
        (y * divisions).round() / divisions
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_below_two_levels() {
        for y in [-0.3, 0.0, 0.123, 0.5, 1.0, 7.5] {
            assert_eq!(quantize(y, 0), y);
            assert_eq!(quantize(y, 1), y);
        }
    }

    #[test]
    fn test_boundaries_exact() {
        for levels in 2..=64 {
            assert_eq!(quantize(0.0, levels), 0.0);
            assert_eq!(quantize(1.0, levels), 1.0);
        }
    }

    #[test]
    fn test_three_levels() {
        let got: Vec<f32> = [0.0, 0.2, 0.4, 0.6, 0.8]
            .into_iter()
            .map(|y| quantize(y, 3))
            .collect();
        assert_eq!(got, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_idempotent() {
        for levels in [2, 3, 5, 7, 12, 49, 100] {
            for i in 0..=200 {
                let y = i as f32 / 200.0;
                let once = quantize(y, levels);
                assert_eq!(quantize(once, levels), once, "levels={levels} y={y}");
            }
        }
    }

    #[test]
    fn test_two_levels_is_a_gate() {
        assert_eq!(quantize(0.49, 2), 0.0);
        assert_eq!(quantize(0.51, 2), 1.0);
    }
}
