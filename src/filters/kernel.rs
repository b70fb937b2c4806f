//! Gaussian kernel construction.

/// Kernel half-width in multiples of sigma.
///
/// Weights beyond `3σ` are below 1.2% of the center weight.
pub const SIGMA_SPAN: f64 = 3.0;

/// Largest kernel radius ever built.
///
/// Sigmas whose `3σ` reaches past it (`+inf` included) get this radius.
/// At such sigmas the sampled weights are close to flat, and exactly flat
/// once `2σ²` overflows to infinity.
pub const MAX_KERNEL_RADIUS: usize = 1 << 20;

/// Normalized, symmetric 1-D convolution kernel.
///
/// Holds `2 * radius + 1` non-negative weights that sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
    radius: usize,
}

impl Kernel {
    /// Kernel that leaves every pixel unchanged.
    pub fn identity() -> Self {
        Self {
            weights: vec![1.0],
            radius: 0,
        }
    }

    /// Samples a Gaussian of standard deviation `sigma` at integer offsets.
    ///
    /// The radius is `ceil(3 * sigma)`. Weights are renormalized after
    /// sampling so the truncated tails do not darken the result.
    /// The radius never exceeds [`MAX_KERNEL_RADIUS`].
    /// `sigma <= 0` (or NaN) yields [`Kernel::identity`].
    pub fn gaussian(sigma: f64) -> Self {
        Self::gaussian_within(sigma, MAX_KERNEL_RADIUS)
    }

    /// Like [`Kernel::gaussian`], with the radius capped at `max_radius`.
    ///
    /// Used by the convolver with `max_radius` set to the longest image
    /// side: offsets past the image never take part in a window, so the
    /// normalized output is unchanged while huge sigmas stay cheap.
    pub fn gaussian_within(sigma: f64, max_radius: usize) -> Self {
        if sigma.is_nan() || sigma <= 0.0 {
            return Self::identity();
        }

        let radius = Self::radius_for(sigma).min(max_radius);
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut weights: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-x * x / two_sigma_sq).exp()
            })
            .collect();

        // Normalize
        let sum: f64 = weights.iter().sum();
        for w in weights.iter_mut() {
            *w /= sum;
        }

        Self { weights, radius }
    }

    /// `ceil(3 * sigma)`, saturating at [`MAX_KERNEL_RADIUS`].
    fn radius_for(sigma: f64) -> usize {
        let span = (sigma * SIGMA_SPAN).ceil();
        if span >= MAX_KERNEL_RADIUS as f64 {
            MAX_KERNEL_RADIUS
        } else {
            span as usize
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at a signed offset from the center; zero outside the support.
    #[inline]
    pub fn weight(&self, offset: isize) -> f64 {
        let idx = offset + self.radius as isize;
        if idx < 0 {
            return 0.0;
        }
        self.weights.get(idx as usize).copied().unwrap_or(0.0)
    }

    /// Number of taps, `2 * radius + 1`. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_identity(&self) -> bool {
        self.radius == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_sigma_is_identity() {
        let k = Kernel::gaussian(0.0);
        assert_eq!(k, Kernel::identity());
        assert!(k.is_identity());
        assert_eq!(k.weights(), &[1.0]);
    }

    #[test]
    fn test_negative_and_nan_sigma_are_identity() {
        assert!(Kernel::gaussian(-2.0).is_identity());
        assert!(Kernel::gaussian(f64::NEG_INFINITY).is_identity());
        assert!(Kernel::gaussian(f64::NAN).is_identity());
    }

    #[test]
    fn test_huge_sigma_does_not_panic() {
        for sigma in [1e9, 1e30, f64::MAX] {
            let k = Kernel::gaussian(sigma);
            assert_eq!(k.radius(), MAX_KERNEL_RADIUS);
            assert_eq!(k.len(), 2 * MAX_KERNEL_RADIUS + 1);
        }
        let k = Kernel::gaussian(1e30);
        let sum: f64 = k.weights().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_infinite_sigma_is_flat() {
        let k = Kernel::gaussian_within(f64::INFINITY, 4);
        assert_eq!(k.radius(), 4);
        for &w in k.weights() {
            assert_relative_eq!(w, 1.0 / 9.0, epsilon = 1e-15);
        }
        assert_eq!(k, Kernel::gaussian_within(1e300, 4));
        assert_eq!(Kernel::gaussian(f64::INFINITY).radius(), MAX_KERNEL_RADIUS);
    }

    #[test]
    fn test_radius_from_sigma() {
        assert_eq!(Kernel::gaussian(0.5).radius(), 2);
        assert_eq!(Kernel::gaussian(1.0).radius(), 3);
        assert_eq!(Kernel::gaussian(1.5).radius(), 5);
        assert_eq!(Kernel::gaussian(10.0).radius(), 30);
        assert_eq!(Kernel::gaussian(10.0).len(), 61);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for &sigma in &[0.1, 0.5, 1.0, 2.5, 7.0, 42.0] {
            let k = Kernel::gaussian(sigma);
            let sum: f64 = k.weights().iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_weights_symmetric_and_peaked() {
        let k = Kernel::gaussian(1.3);
        let r = k.radius() as isize;
        for i in 1..=r {
            assert_eq!(k.weight(i), k.weight(-i));
            assert!(k.weight(i) < k.weight(i - 1));
            assert!(k.weight(i) >= 0.0);
        }
        assert_eq!(k.weight(r + 1), 0.0);
        assert_eq!(k.weight(-r - 1), 0.0);
    }

    #[test]
    fn test_gaussian_within_caps_radius() {
        let k = Kernel::gaussian_within(100.0, 4);
        assert_eq!(k.radius(), 4);
        let sum: f64 = k.weights().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);

        // Cap above the natural radius has no effect
        assert_eq!(Kernel::gaussian_within(1.0, 50), Kernel::gaussian(1.0));
    }

    #[test]
    fn test_sigma_half_center_weight() {
        // exp(0) / (1 + 2e^-2 + 2e^-8)
        let k = Kernel::gaussian(0.5);
        assert_relative_eq!(k.weight(0), 0.786_571, epsilon = 1e-6);
    }
}
