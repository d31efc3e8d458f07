//! Locating the associated parameter: the root of the itinerary numerator
//! inside the disc `|x| ≤ 2^(-1/2)`.
//!
//! # Method
//!
//! 1. Expand the factored numerator to exact integer coefficients.
//! 2. Factor out powers of `x` (roots at the origin).
//! 3. Take the eigenvalues of the companion matrix through a real Schur
//!    decomposition (`nalgebra`).
//! 4. Polish every eigenvalue with Newton steps on the original polynomial.
//! 5. Keep the roots inside the closed disc of radius `2^(-1/2) + ε`.
//!
//! For the kneading polynomials of interest exactly one conjugate pair (or a
//! single real root) lies in that disc. The filter is what encodes that fact;
//! nothing here assumes uniqueness without it.

use core::f64::consts::FRAC_1_SQRT_2;

use nalgebra::{DMatrix, Schur};
use num_complex::Complex64;

use crate::polynomial::{horner, ItineraryPolynomial};

/// Canonical slack added to the disc radius `2^(-1/2)`.
pub const DISC_TOLERANCE: f64 = 1e-14;

/// Tuning for [`RootLocator`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootLocatorConfig {
    /// Slack added to the radius `2^(-1/2)`. Default: [`DISC_TOLERANCE`].
    pub disc_tolerance: f64,
    /// Upper bound on Newton steps per root. Default: 64.
    pub polish_iterations: usize,
    /// Iteration cap for the Schur decomposition (0 = unbounded). Default: 10 000.
    pub max_schur_iterations: usize,
}

impl Default for RootLocatorConfig {
    fn default() -> Self {
        Self {
            disc_tolerance: DISC_TOLERANCE,
            polish_iterations: 64,
            max_schur_iterations: 10_000,
        }
    }
}

/// Outcome of the root search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AssociatedRoot {
    /// A root inside the disc.
    Found(Complex64),
    /// No root inside the disc; the parameter is undefined.
    NotFound,
}

impl AssociatedRoot {
    /// The root, or the sentinel `0 + 0i` when none was found.
    ///
    /// The sentinel is *not* a valid dynamical parameter; check
    /// [`is_found`](Self::is_found) before using the value.
    pub fn value(&self) -> Complex64 {
        match self {
            AssociatedRoot::Found(z) => *z,
            AssociatedRoot::NotFound => Complex64::new(0.0, 0.0),
        }
    }

    /// `true` if a root was found.
    pub fn is_found(&self) -> bool {
        matches!(self, AssociatedRoot::Found(_))
    }

    /// The root as an `Option`.
    pub fn to_option(self) -> Option<Complex64> {
        match self {
            AssociatedRoot::Found(z) => Some(z),
            AssociatedRoot::NotFound => None,
        }
    }
}

/// Finds the roots of itinerary numerators.
#[derive(Clone, Debug, Default)]
pub struct RootLocator {
    config: RootLocatorConfig,
}

impl RootLocator {
    /// Construct a locator with explicit configuration.
    pub fn new(config: RootLocatorConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &RootLocatorConfig {
        &self.config
    }

    /// Radius of the closed target disc, tolerance included.
    pub fn disc_radius(&self) -> f64 {
        FRAC_1_SQRT_2 + self.config.disc_tolerance
    }

    /// Every complex root of the numerator, with multiplicity.
    ///
    /// Empty for constant numerators, and empty (with a warning) if the
    /// Schur decomposition fails to converge.
    pub fn roots(&self, polynomial: &ItineraryPolynomial) -> Vec<Complex64> {
        polynomial_roots(&polynomial.coefficients(), &self.config)
    }

    /// Roots inside the closed disc, positive imaginary parts first.
    pub fn roots_in_disc(&self, polynomial: &ItineraryPolynomial) -> Vec<Complex64> {
        let radius = self.disc_radius();
        let mut inside: Vec<Complex64> = self
            .roots(polynomial)
            .into_iter()
            .filter(|z| z.norm() <= radius)
            .collect();
        inside.sort_by(|a, b| b.im.total_cmp(&a.im).then(b.re.total_cmp(&a.re)));
        inside
    }

    /// The associated parameter: the first root inside the disc.
    ///
    /// Logs at error level and returns [`AssociatedRoot::NotFound`] when the
    /// disc holds no root. Never fails.
    pub fn locate(&self, polynomial: &ItineraryPolynomial) -> AssociatedRoot {
        match self.roots_in_disc(polynomial).first() {
            Some(&z) => AssociatedRoot::Found(z),
            None => {
                tracing::error!(
                    polynomial = %polynomial,
                    radius = self.disc_radius(),
                    "could not find any root inside the disc of radius 2^(-1/2)"
                );
                AssociatedRoot::NotFound
            }
        }
    }
}

/// Roots of `Σ coeffs[i] x^i` (lowest degree first, nonzero leading term).
fn polynomial_roots(coeffs: &[i64], config: &RootLocatorConfig) -> Vec<Complex64> {
    let zero_roots = coeffs.iter().take_while(|&&c| c == 0).count();
    let reduced = &coeffs[zero_roots..];
    let mut roots = vec![Complex64::new(0.0, 0.0); zero_roots];

    let degree = reduced.len().saturating_sub(1);
    match degree {
        0 => {}
        1 => roots.push(Complex64::new(-(reduced[0] as f64) / reduced[1] as f64, 0.0)),
        _ => {
            let Some(estimates) = companion_eigenvalues(reduced, config.max_schur_iterations)
            else {
                tracing::warn!(degree, "schur decomposition of the companion matrix did not converge");
                return roots;
            };
            roots.extend(
                estimates
                    .into_iter()
                    .map(|z| polish(reduced, z, config.polish_iterations)),
            );
        }
    }
    roots
}

/// Eigenvalues of the companion matrix of a polynomial of degree ≥ 2.
fn companion_eigenvalues(coeffs: &[i64], max_iterations: usize) -> Option<Vec<Complex64>> {
    let n = coeffs.len() - 1;
    let lead = coeffs[n] as f64;

    let mut companion = DMatrix::<f64>::zeros(n, n);
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }
    for (i, &c) in coeffs[..n].iter().enumerate() {
        companion[(i, n - 1)] = -(c as f64) / lead;
    }

    let schur = Schur::try_new(companion, f64::EPSILON, max_iterations)?;
    Some(schur.complex_eigenvalues().iter().copied().collect())
}

/// Newton refinement on the exact-coefficient polynomial.
///
/// Stops at a zero derivative, once a step no longer reduces the residual,
/// or when the step falls below machine precision.
fn polish(coeffs: &[i64], estimate: Complex64, max_steps: usize) -> Complex64 {
    let derivative: Vec<i64> = coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| c * i as i64)
        .collect();

    let mut z = estimate;
    let mut residual = horner(coeffs, z).norm();
    for _ in 0..max_steps {
        if residual == 0.0 {
            break;
        }
        let slope = horner(&derivative, z);
        if slope.norm() == 0.0 {
            break;
        }
        let step = horner(coeffs, z) / slope;
        let candidate = z - step;
        let candidate_residual = horner(coeffs, candidate).norm();
        if candidate_residual > residual {
            break;
        }
        z = candidate;
        residual = candidate_residual;
        if step.norm() <= f64::EPSILON * z.norm() {
            break;
        }
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_root_is_exact() {
        let roots = polynomial_roots(&[1, -2], &RootLocatorConfig::default());
        assert_eq!(roots, vec![Complex64::new(0.5, 0.0)]);
    }

    #[test]
    fn quadratic_roots_come_in_conjugate_pairs() {
        // 2x² − 2x + 1 has roots (1 ± i) / 2.
        let mut roots = polynomial_roots(&[1, -2, 2], &RootLocatorConfig::default());
        roots.sort_by(|a, b| b.im.total_cmp(&a.im));
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0].re, 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(roots[0].im, 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(roots[1].im, -0.5, epsilon = 1e-14);
    }

    #[test]
    fn zero_roots_are_factored_out() {
        // x²(x − 3)
        let roots = polynomial_roots(&[0, 0, -3, 1], &RootLocatorConfig::default());
        assert_eq!(roots.len(), 3);
        assert_eq!(roots[0], Complex64::new(0.0, 0.0));
        assert_eq!(roots[1], Complex64::new(0.0, 0.0));
        assert_abs_diff_eq!(roots[2].re, 3.0, epsilon = 1e-15);
    }

    #[test]
    fn constant_has_no_roots() {
        assert!(polynomial_roots(&[1], &RootLocatorConfig::default()).is_empty());
    }

    #[test]
    fn polishing_recovers_full_precision() {
        // x² − 2 from a coarse estimate
        let z = polish(&[-2, 0, 1], Complex64::new(1.4, 0.0), 64);
        assert_abs_diff_eq!(z.re, 2f64.sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn sentinel_is_zero() {
        assert_eq!(AssociatedRoot::NotFound.value(), Complex64::new(0.0, 0.0));
        assert!(!AssociatedRoot::NotFound.is_found());
        assert_eq!(AssociatedRoot::NotFound.to_option(), None);
    }

    #[test]
    fn disc_radius_includes_tolerance() {
        let locator = RootLocator::default();
        assert_abs_diff_eq!(locator.disc_radius(), FRAC_1_SQRT_2 + 1e-14, epsilon = 0.0);
    }
}
