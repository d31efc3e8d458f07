//! Orbits of rational angles under the doubling map `x ↦ 2x mod 1`.
//!
//! All arithmetic is exact ([`Rational`] = `Ratio<i64>`). Periodicity is
//! detected by exact equality, so floating point never enters this module.
//!
//! # Layout of an orbit
//!
//! ```text
//! θ, 2θ, 4θ, …, x_s, …, x_{s+p-1}, x_s
//! └── preperiod ──┘└──── period ────┘└ repeat (first revisit)
//! ```
//!
//! The orbit stops at the first revisited value, so its last entry always
//! duplicates the entry at `start_index`, and
//! `start_index + length + 1 == orbit.len()`.

use hashbrown::HashMap;
use num_rational::Ratio;

/// Exact rational number used for every point on the circle.
pub type Rational = Ratio<i64>;

/// One application of the doubling map on the circle `[0, 1)`.
///
/// `1/1` maps to `0`, matching the identification of the circle endpoints.
pub fn double_mod_one(x: &Rational) -> Rational {
    (*x * 2).fract()
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// Period of an orbit and the index at which the periodic cycle begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Period {
    /// Number of distinct points on the periodic cycle (always ≥ 1).
    pub length: usize,
    /// Index of the first periodic point. `0` for purely periodic angles.
    pub start_index: usize,
}

impl Period {
    /// `true` when the orbit has no preperiodic prefix.
    pub fn is_purely_periodic(&self) -> bool {
        self.start_index == 0
    }
}

// ─── Orbit ───────────────────────────────────────────────────────────────────

/// Forward orbit of an angle under doubling, truncated at the first repeat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Orbit {
    points: Vec<Rational>,
    period: Period,
}

impl Orbit {
    /// Iterate the doubling map from `seed` until a value repeats.
    ///
    /// Terminates for every rational seed: all iterates share the reduced
    /// denominator of the seed (up to powers of two), so there are finitely
    /// many of them.
    pub fn of(seed: Rational) -> Self {
        let mut seen: HashMap<Rational, usize> = HashMap::new();
        let mut points = Vec::new();
        let mut current = seed;

        let start_index = loop {
            if let Some(&first) = seen.get(&current) {
                points.push(current);
                break first;
            }
            seen.insert(current, points.len());
            points.push(current);
            current = double_mod_one(&current);
        };

        let length = points.len() - start_index - 1;
        tracing::debug!(
            seed = %seed,
            len = points.len(),
            period = length,
            start_index,
            "doubling orbit computed"
        );
        Self {
            points,
            period: Period { length, start_index },
        }
    }

    /// All orbit points, including the final repeated value.
    pub fn points(&self) -> &[Rational] {
        &self.points
    }

    /// Number of stored points (one more than the number of distinct points).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: an orbit holds at least its seed and the first repeat.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Period length and start index of the cycle.
    pub fn period(&self) -> Period {
        self.period
    }

    /// Points strictly before the cycle.
    pub fn preperiodic_part(&self) -> &[Rational] {
        &self.points[..self.period.start_index]
    }

    /// One full turn of the cycle (the trailing repeat excluded).
    pub fn periodic_part(&self) -> &[Rational] {
        &self.points[self.period.start_index..self.points.len() - 1]
    }

    /// Binary expansion written as `<preperiodic digits>p<periodic digits>`.
    ///
    /// The n-th binary digit of θ is `1` exactly when `2^n θ mod 1 ≥ 1/2`,
    /// so each orbit point contributes one digit.
    ///
    /// ```text
    /// 1/2 → "1p0"    1/6 → "0p01"    1/7 → "p001"    0/1 → "p0"
    /// ```
    pub fn binary_expansion(&self) -> String {
        let half = Rational::new(1, 2);
        let digit = |x: &Rational| if *x >= half { '1' } else { '0' };

        let mut out = String::with_capacity(self.points.len() + 1);
        out.extend(self.preperiodic_part().iter().map(digit));
        out.push('p');
        out.extend(self.periodic_part().iter().map(digit));
        out
    }
}
