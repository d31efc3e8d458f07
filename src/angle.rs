//! Rational external angles and their memoized derived invariants.
//!
//! An [`Angle`] is an immutable value. Every derived field is computed on
//! first access and cached in its own [`OnceCell`]; a field that depends on
//! another pulls it through the accessor, so the chain
//!
//! ```text
//! orbit → kneading_sequence → itinerary → itinerary_period_length → polynomial → associated_root
//!   └──→ core_entropy
//! ```
//!
//! resolves itself in order and each link runs at most once per instance.
//! `Angle` is `Send` but not `Sync`; share it across threads behind a lock.

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::entropy::CoreEntropyEngine;
use crate::error::{DynamicsError, DynamicsResult};
use crate::kneading::{itinerary_period_length, Itinerary, KneadingSequence};
use crate::orbit::{Orbit, Period, Rational};
use crate::polynomial::ItineraryPolynomial;
use crate::roots::{AssociatedRoot, RootLocator};

/// Largest accepted denominator. Doubling stays exact in `i64` below it.
pub const MAX_DENOMINATOR: i64 = 1 << 60;

/// A rational angle `num/den` on the circle, with lazily derived invariants.
pub struct Angle {
    numerator: i64,
    denominator: i64,
    value: Rational,
    orbit: OnceCell<Orbit>,
    binary_expansion: OnceCell<String>,
    kneading: OnceCell<KneadingSequence>,
    itinerary: OnceCell<Itinerary>,
    itinerary_period: OnceCell<usize>,
    polynomial: OnceCell<ItineraryPolynomial>,
    root: OnceCell<AssociatedRoot>,
    entropy: OnceCell<f64>,
}

impl Angle {
    /// Validate and build `num/den`.
    ///
    /// Requires `den > 0`, `0 ≤ num ≤ den` and `den ≤ 2^60`.
    pub fn from_fraction(num: i64, den: i64) -> DynamicsResult<Self> {
        if den <= 0 {
            return Err(DynamicsError::NonPositiveDenominator(den));
        }
        if den > MAX_DENOMINATOR {
            return Err(DynamicsError::DenominatorTooLarge {
                den,
                max: MAX_DENOMINATOR,
            });
        }
        if num < 0 || num > den {
            return Err(DynamicsError::AngleOutOfRange { num, den });
        }
        Ok(Self {
            numerator: num,
            denominator: den,
            value: Rational::new(num, den),
            orbit: OnceCell::new(),
            binary_expansion: OnceCell::new(),
            kneading: OnceCell::new(),
            itinerary: OnceCell::new(),
            itinerary_period: OnceCell::new(),
            polynomial: OnceCell::new(),
            root: OnceCell::new(),
            entropy: OnceCell::new(),
        })
    }

    /// Parse `"num/den"` (surrounding whitespace allowed) and validate it.
    pub fn from_string(th: &str) -> DynamicsResult<Self> {
        let malformed = || DynamicsError::MalformedAngle {
            input: th.to_string(),
        };
        let (num, den) = th.split_once('/').ok_or_else(malformed)?;
        let num: i64 = num.trim().parse().map_err(|_| malformed())?;
        let den: i64 = den.trim().parse().map_err(|_| malformed())?;
        Self::from_fraction(num, den)
    }

    /// Numerator as supplied.
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    /// Denominator as supplied.
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Exact reduced value.
    pub fn value(&self) -> &Rational {
        &self.value
    }

    /// Nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Orbit under doubling.
    pub fn orbit(&self) -> &Orbit {
        self.orbit.get_or_init(|| {
            self.note_derivation("orbit");
            Orbit::of(self.value)
        })
    }

    /// Period length and start index.
    pub fn period(&self) -> Period {
        self.orbit().period()
    }

    /// Binary digits as `<preperiod>p<period>`.
    pub fn binary_expansion(&self) -> &str {
        self.binary_expansion.get_or_init(|| {
            self.note_derivation("binary_expansion");
            self.orbit().binary_expansion()
        })
    }

    /// Kneading sequence over `{0, 1, *}`.
    pub fn kneading_sequence(&self) -> &KneadingSequence {
        self.kneading.get_or_init(|| {
            self.note_derivation("kneading_sequence");
            KneadingSequence::from_orbit(self.orbit(), &self.value)
        })
    }

    /// Sign itinerary over `{+, -}`.
    pub fn itinerary(&self) -> &Itinerary {
        self.itinerary.get_or_init(|| {
            self.note_derivation("itinerary");
            Itinerary::from_kneading(self.kneading_sequence(), self.period())
        })
    }

    /// Length of the itinerary's periodic block.
    pub fn itinerary_period_length(&self) -> usize {
        *self.itinerary_period.get_or_init(|| {
            self.note_derivation("itinerary_period_length");
            itinerary_period_length(self.itinerary(), self.period())
        })
    }

    /// Numerator of the itinerary's generating function.
    pub fn polynomial(&self) -> &ItineraryPolynomial {
        self.polynomial.get_or_init(|| {
            self.note_derivation("polynomial");
            ItineraryPolynomial::from_itinerary(
                self.itinerary(),
                self.itinerary_period_length(),
                self.period(),
            )
        })
    }

    /// Root of the numerator inside `|x| ≤ 2^(-1/2)`, or `NotFound`.
    pub fn associated_root(&self) -> AssociatedRoot {
        *self.root.get_or_init(|| {
            self.note_derivation("associated_root");
            RootLocator::default().locate(self.polynomial())
        })
    }

    /// Core entropy as a growth rate, at most 2.
    pub fn core_entropy(&self) -> f64 {
        *self.entropy.get_or_init(|| {
            self.note_derivation("core_entropy");
            CoreEntropyEngine::default().core_entropy_of(&self.value, self.orbit())
        })
    }

    fn note_derivation(&self, field: &'static str) {
        tracing::trace!(angle = %self, field, "deriving");
        #[cfg(test)]
        counter::bump(field);
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl fmt::Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Angle({},{})", self.numerator, self.denominator)
    }
}

impl Clone for Angle {
    /// Copies the value and whatever has been derived so far.
    fn clone(&self) -> Self {
        Self {
            numerator: self.numerator,
            denominator: self.denominator,
            value: self.value,
            orbit: self.orbit.clone(),
            binary_expansion: self.binary_expansion.clone(),
            kneading: self.kneading.clone(),
            itinerary: self.itinerary.clone(),
            itinerary_period: self.itinerary_period.clone(),
            polynomial: self.polynomial.clone(),
            root: self.root.clone(),
            entropy: self.entropy.clone(),
        }
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Angle {}

impl Hash for Angle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl FromStr for Angle {
    type Err = DynamicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}
