//! The polynomial numerator associated with an itinerary.
//!
//! An itinerary `s_0 s_1 … s_{n-1}` with a periodic block of length `P`
//! starting at index `k` corresponds to the power series
//! `Σ s_i x^i` whose tail repeats with period `P`. Clearing the denominator
//! `1 − x^P` leaves the numerator
//!
//! ```text
//! (s_0 x^0 + … + s_{k-1} x^{k-1}) · (1 − x^P)  +  (s_k x^k + … + s_{n-1} x^{n-1})
//! ```
//!
//! The split index `k` is the orbit's period start when the itinerary period
//! is 1, and one past it otherwise. The associated parameter is the root of
//! this numerator inside the disc of radius `2^(-1/2)`.

use core::fmt;

use num_complex::Complex64;

use crate::kneading::{Itinerary, Sign};
use crate::orbit::Period;

/// Exponent symbol used when rendering a polynomial as text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerNotation {
    /// `x^3`, Mathematica style (the canonical form).
    #[default]
    Caret,
    /// `x**3`, Python / sympy style.
    DoubleStar,
}

impl PowerNotation {
    /// The exponent operator.
    pub fn symbol(self) -> &'static str {
        match self {
            PowerNotation::Caret => "^",
            PowerNotation::DoubleStar => "**",
        }
    }
}

/// Factored numerator `(prefix)·(1 − x^P) + (remainder)` of an itinerary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItineraryPolynomial {
    signs: Vec<Sign>,
    split: usize,
    period: usize,
}

impl ItineraryPolynomial {
    /// Build the numerator for an itinerary.
    ///
    /// `itinerary_period` is the itinerary's own period length and `period`
    /// the orbit period whose `start_index` fixes the factor boundary.
    pub fn from_itinerary(itinerary: &Itinerary, itinerary_period: usize, period: Period) -> Self {
        let split = if itinerary_period == 1 {
            period.start_index
        } else {
            period.start_index + 1
        };
        Self {
            signs: itinerary.signs().to_vec(),
            split: split.min(itinerary.len()),
            period: itinerary_period,
        }
    }

    /// Exponent `P` in the factor `1 − x^P`.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Terms `(sign, exponent)` multiplied by `1 − x^P`.
    pub fn prefix_terms(&self) -> impl Iterator<Item = (Sign, usize)> + '_ {
        self.signs[..self.split].iter().copied().zip(0..)
    }

    /// Terms `(sign, exponent)` added after the factored block.
    pub fn remainder_terms(&self) -> impl Iterator<Item = (Sign, usize)> + '_ {
        self.signs[self.split..].iter().copied().zip(self.split..)
    }

    /// `true` for the degenerate numerator `1` (angle 0).
    pub fn is_constant(&self) -> bool {
        self.split == 0 && self.period == 1
    }

    /// Render the factored form, e.g. `(+x^0-x^1)*(1-x^4) +(+x^2+x^3-x^4-x^5)`.
    pub fn render(&self, notation: PowerNotation) -> String {
        if self.is_constant() {
            return "1".to_string();
        }
        let pow = notation.symbol();
        let term = |(sign, exp): (Sign, usize)| format!("{}x{pow}{exp}", sign.as_char());

        let prefix: String = self.prefix_terms().map(term).collect();
        let remainder: String = self.remainder_terms().map(term).collect();
        let factor = if self.period == 1 {
            "1-x".to_string()
        } else {
            format!("1-x{pow}{}", self.period)
        };
        format!("({prefix})*({factor}) +({remainder})")
    }

    /// Integer coefficients of the expanded numerator, lowest degree first.
    ///
    /// Trailing zeros are trimmed; the constant numerator yields `[1]`.
    pub fn coefficients(&self) -> Vec<i64> {
        if self.is_constant() {
            return vec![1];
        }
        let mut coeffs = vec![0i64; self.signs.len().max(self.split + self.period)];
        for (sign, exp) in self.prefix_terms() {
            coeffs[exp] += sign.as_i64();
            coeffs[exp + self.period] -= sign.as_i64();
        }
        for (sign, exp) in self.remainder_terms() {
            coeffs[exp] += sign.as_i64();
        }
        while coeffs.len() > 1 && coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        coeffs
    }

    /// Degree of the expanded numerator.
    pub fn degree(&self) -> usize {
        self.coefficients().len() - 1
    }

    /// Evaluate the expanded numerator at `x` (Horner's scheme).
    pub fn evaluate(&self, x: Complex64) -> Complex64 {
        horner(&self.coefficients(), x)
    }
}

impl fmt::Display for ItineraryPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(PowerNotation::Caret))
    }
}

/// Evaluate `Σ coeffs[i] x^i`.
pub(crate) fn horner(coeffs: &[i64], x: Complex64) -> Complex64 {
    coeffs
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c as f64)
}
