//! Kneading sequences and the sign itineraries derived from them.
//!
//! # Kneading sequence
//!
//! The angle θ splits the circle at `θ/2` and `(θ+1)/2`. Every orbit point
//! `v` is coded by the half it lands in:
//!
//! ```text
//! θ/2 < v < (θ+1)/2   →  1
//! v ∈ {θ/2, (θ+1)/2}  →  *
//! otherwise           →  0
//! ```
//!
//! The symbol of the final (repeated) orbit point is dropped, so the sequence
//! has `orbit.len() - 1` symbols.
//!
//! # Itinerary
//!
//! The itinerary of 0 in the attractor starts `+-` and then follows the
//! kneading sequence from its second symbol: a `1` flips the running sign,
//! anything else repeats it. When the kneading period exceeds one, a second
//! pass over the periodic block decides whether the itinerary's true period
//! is twice the kneading period.

use core::fmt;

use crate::orbit::{Orbit, Period, Rational};

// ─── Kneading symbols ────────────────────────────────────────────────────────

/// One symbol of a kneading sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KneadingSymbol {
    /// Outside the open arc `(θ/2, (θ+1)/2)`.
    Zero,
    /// Inside the open arc `(θ/2, (θ+1)/2)`.
    One,
    /// Exactly on one of the two boundary points.
    Star,
}

impl KneadingSymbol {
    /// Character used in the textual form of a kneading sequence.
    pub fn as_char(self) -> char {
        match self {
            KneadingSymbol::Zero => '0',
            KneadingSymbol::One => '1',
            KneadingSymbol::Star => '*',
        }
    }
}

/// Kneading sequence of an angle: one symbol per orbit point, last one dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KneadingSequence {
    symbols: Vec<KneadingSymbol>,
}

impl KneadingSequence {
    /// Code every orbit point against the partition induced by `angle`.
    pub fn from_orbit(orbit: &Orbit, angle: &Rational) -> Self {
        let lower = *angle / 2;
        let upper = (*angle + 1) / 2;

        let mut symbols: Vec<KneadingSymbol> = orbit
            .points()
            .iter()
            .map(|v| {
                if lower < *v && *v < upper {
                    KneadingSymbol::One
                } else if *v == lower || *v == upper {
                    KneadingSymbol::Star
                } else {
                    KneadingSymbol::Zero
                }
            })
            .collect();
        // The last point repeats the start of the cycle.
        symbols.pop();
        Self { symbols }
    }

    /// The symbols in orbit order.
    pub fn symbols(&self) -> &[KneadingSymbol] {
        &self.symbols
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// `true` if there are no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for KneadingSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.symbols {
            write!(f, "{}", s.as_char())?;
        }
        Ok(())
    }
}

// ─── Signs ───────────────────────────────────────────────────────────────────

/// One entry of an itinerary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    /// `+`
    Plus,
    /// `-`
    Minus,
}

impl Sign {
    /// The opposite sign.
    pub fn flipped(self) -> Self {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }

    /// Sign that follows `self` after reading one kneading symbol.
    pub fn step(self, symbol: KneadingSymbol) -> Self {
        match symbol {
            KneadingSymbol::One => self.flipped(),
            KneadingSymbol::Zero | KneadingSymbol::Star => self,
        }
    }

    /// `+1` or `-1`.
    pub fn as_i64(self) -> i64 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }

    /// `'+'` or `'-'`.
    pub fn as_char(self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }
}

// ─── Itinerary ───────────────────────────────────────────────────────────────

/// Sign itinerary of 0 in the attractor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Itinerary {
    signs: Vec<Sign>,
}

impl Itinerary {
    /// Derive the itinerary from a kneading sequence and the orbit period.
    ///
    /// Assumes the kneading sequence starts with `1`, which holds for every
    /// angle in `(0, 1)`.
    pub fn from_kneading(kneading: &KneadingSequence, period: Period) -> Self {
        let symbols = kneading.symbols();
        let mut signs = vec![Sign::Plus, Sign::Minus];
        let mut last = Sign::Minus;

        for &symbol in symbols.iter().skip(1) {
            last = last.step(symbol);
            signs.push(last);
        }

        if period.length == 1 {
            // Fixed cycle: the itinerary is already complete.
            signs.pop();
        } else {
            let start = period.start_index;
            let second_pass: Vec<Sign> = symbols[start..]
                .iter()
                .map(|&symbol| {
                    last = last.step(symbol);
                    last
                })
                .collect();
            // The itinerary's period doubles when the second pass disagrees.
            if second_pass[..] != signs[start + 1..] {
                signs.extend(second_pass);
            }
        }

        Self { signs }
    }

    /// The signs in order.
    pub fn signs(&self) -> &[Sign] {
        &self.signs
    }

    /// Number of signs.
    pub fn len(&self) -> usize {
        self.signs.len()
    }

    /// `true` if there are no signs.
    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.signs {
            write!(f, "{}", s.as_char())?;
        }
        Ok(())
    }
}

/// Length of the periodic block of an itinerary.
///
/// Equals the orbit period when that is 1; otherwise everything after the
/// preperiodic block of `start_index + 1` signs.
pub fn itinerary_period_length(itinerary: &Itinerary, period: Period) -> usize {
    if period.length == 1 {
        1
    } else {
        itinerary.len() - period.start_index - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(num: i64, den: i64) -> (String, String, usize) {
        let angle = Rational::new(num, den);
        let orbit = Orbit::of(angle);
        let ks = KneadingSequence::from_orbit(&orbit, &angle);
        let itin = Itinerary::from_kneading(&ks, orbit.period());
        let per = itinerary_period_length(&itin, orbit.period());
        (ks.to_string(), itin.to_string(), per)
    }

    #[test]
    fn one_half() {
        assert_eq!(pipeline(1, 2), ("10".into(), "+-".into(), 1));
    }

    #[test]
    fn one_sixth_doubles_its_period() {
        assert_eq!(pipeline(1, 6), ("110".into(), "+-++--".into(), 4));
    }

    #[test]
    fn three_fourteenths_doubles_its_period() {
        assert_eq!(pipeline(3, 14), ("1100".into(), "+-+++---".into(), 6));
    }

    #[test]
    fn fixed_cycle_truncates() {
        assert_eq!(pipeline(3, 8), ("1010".into(), "+--+".into(), 1));
        assert_eq!(pipeline(7, 16), ("10010".into(), "+---+".into(), 1));
        assert_eq!(pipeline(55, 256), ("110010010".into(), "+-+++---+".into(), 1));
    }

    #[test]
    fn periodic_angles_carry_a_star() {
        assert_eq!(pipeline(0, 1).0, "*");
        assert_eq!(pipeline(1, 7).0, "11*");
        assert_eq!(pipeline(2, 5).0, "101*");
    }

    #[test]
    fn zero_itinerary_is_a_single_plus() {
        assert_eq!(pipeline(0, 1), ("*".into(), "+".into(), 1));
    }

    #[test]
    fn star_repeats_the_running_sign() {
        assert_eq!(Sign::Plus.step(KneadingSymbol::Star), Sign::Plus);
        assert_eq!(Sign::Minus.step(KneadingSymbol::One), Sign::Plus);
        assert_eq!(Sign::Minus.step(KneadingSymbol::Zero), Sign::Minus);
    }
}
