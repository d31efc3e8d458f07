//! Core entropy of a rational angle via the wedge adjacency matrix.
//!
//! # The wedge
//!
//! Vertices are index pairs `(i, j)`, `1 ≤ i < j ≤ orbit.len() − 1`, standing
//! for the pair of orbit points `(x_{i-1}, x_{j-1})`. The angle splits the
//! circle into the arcs
//!
//! ```text
//! inner = [θ/2, (θ+1)/2)        outer = [(θ+1)/2, 1) ∪ [0, θ/2)
//! ```
//!
//! A pair is *non-separated* when both points lie in the same arc; it maps to
//! the single pair `(i+1, j+1)`. A *separated* pair maps to both `(1, i+1)`
//! and `(1, j+1)`. An index that runs off the end of the orbit wraps back to
//! `period_start + 1`.
//!
//! # Entropy
//!
//! The core entropy reported here is the growth rate `e^h`: the largest
//! real eigenvalue of the wedge adjacency matrix among the few eigenvalues
//! closest to a fixed shift. `1/2` gives 2 and `0/1`, `1/1` give 1 in
//! closed form.
//!
//! Missing successor targets and eigen-solve failures are not errors: the
//! first skips the edge with a warning, the second falls back to `1.0`.

use hashbrown::HashMap;
use nalgebra::{DMatrix, Schur};
use num_complex::Complex64;

use crate::angle::Angle;
use crate::error::DynamicsResult;
use crate::orbit::{Orbit, Rational};

/// Value returned whenever the eigenvalue computation cannot produce an answer.
pub const FALLBACK_ENTROPY: f64 = 1.0;

/// Tuning for [`CoreEntropyEngine`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreEntropyConfig {
    /// Eigenvalues are ranked by their distance to this shift. Default: 1.7999999.
    pub shift: f64,
    /// Number of eigenvalues closest to the shift that are kept (capped at
    /// `vertex_count − 2`). Default: 2.
    pub eigenvalue_count: usize,
    /// Largest imaginary part still counted as real. Default: 1e-4.
    pub imaginary_tolerance: f64,
    /// Iteration cap for the Schur decomposition (0 = unbounded). Default: 10 000.
    pub max_schur_iterations: usize,
}

impl Default for CoreEntropyConfig {
    fn default() -> Self {
        Self {
            shift: 1.799_999_9,
            eigenvalue_count: 2,
            imaginary_tolerance: 1e-4,
            max_schur_iterations: 10_000,
        }
    }
}

// ─── Wedge ───────────────────────────────────────────────────────────────────

/// Which side of the angle's partition an orbit point falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Arc {
    Inner,
    Outer,
}

impl Arc {
    fn of(x: &Rational, lower: &Rational, upper: &Rational) -> Self {
        if lower <= x && x < upper {
            Arc::Inner
        } else {
            Arc::Outer
        }
    }
}

/// A wedge vertex: a pair of 1-based orbit indices with `i < j`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPair {
    /// Smaller index.
    pub i: usize,
    /// Larger index.
    pub j: usize,
}

impl IndexPair {
    /// Pair the two indices in increasing order.
    pub fn ordered(a: usize, b: usize) -> Self {
        if a < b {
            Self { i: a, j: b }
        } else {
            Self { i: b, j: a }
        }
    }
}

impl core::fmt::Display for IndexPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.i, self.j)
    }
}

/// The wedge graph of an angle with its sparse 0/1 adjacency (CSR layout).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wedge {
    vertices: Vec<IndexPair>,
    separated: Vec<bool>,
    indptr: Vec<usize>,
    indices: Vec<usize>,
}

impl Wedge {
    /// Enumerate the vertex pairs of `orbit` and wire up their successors.
    pub fn build(orbit: &Orbit, angle: &Rational) -> Self {
        let points = orbit.points();
        let max_index = points.len() - 1;
        let wrap_to = orbit.period().start_index + 1;
        let lower = *angle / 2;
        let upper = (*angle + 1) / 2;

        let vertices: Vec<IndexPair> = (1..=max_index)
            .flat_map(|i| ((i + 1)..=max_index).map(move |j| IndexPair { i, j }))
            .collect();
        let lookup: HashMap<IndexPair, usize> =
            vertices.iter().enumerate().map(|(k, &p)| (p, k)).collect();

        let successor = |k: usize| if k < max_index { k + 1 } else { wrap_to };

        let mut separated = Vec::with_capacity(vertices.len());
        let mut indptr = Vec::with_capacity(vertices.len() + 1);
        let mut indices = Vec::new();
        indptr.push(0);

        for &pair in &vertices {
            let arc_i = Arc::of(&points[pair.i - 1], &lower, &upper);
            let arc_j = Arc::of(&points[pair.j - 1], &lower, &upper);

            // Successor indices, as raw pairs: a wrapped separated target may
            // degenerate to (1, 1), which is never a vertex.
            let targets: Vec<(usize, usize)> = if arc_i == arc_j {
                let t = IndexPair::ordered(successor(pair.i), successor(pair.j));
                vec![(t.i, t.j)]
            } else {
                vec![(1, successor(pair.i)), (1, successor(pair.j))]
            };
            tracing::debug!(
                vertex = %pair,
                separated = arc_i != arc_j,
                ?targets,
                "wedge vertex classified"
            );

            for (a, b) in targets {
                match lookup.get(&IndexPair { i: a, j: b }) {
                    Some(&col) => indices.push(col),
                    None => tracing::warn!(
                        angle = %angle,
                        vertex = %pair,
                        successor = ?(a, b),
                        "wedge successor is not a vertex; edge skipped"
                    ),
                }
            }
            separated.push(arc_i != arc_j);
            indptr.push(indices.len());
        }

        Self {
            vertices,
            separated,
            indptr,
            indices,
        }
    }

    /// Vertex pairs in row order.
    pub fn vertices(&self) -> &[IndexPair] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// `true` if the pair at `row` straddles the partition.
    pub fn is_separated(&self, row: usize) -> bool {
        self.separated[row]
    }

    /// Column indices of the outgoing edges of `row`.
    pub fn successors(&self, row: usize) -> &[usize] {
        &self.indices[self.indptr[row]..self.indptr[row + 1]]
    }

    /// CSR row pointer.
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// CSR column indices.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.indices.len()
    }

    /// Dense adjacency matrix; repeated entries are summed.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.vertex_count();
        let mut m = DMatrix::<f64>::zeros(n, n);
        for row in 0..n {
            for &col in self.successors(row) {
                m[(row, col)] += 1.0;
            }
        }
        m
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Computes core entropy from an angle's orbit.
#[derive(Clone, Debug, Default)]
pub struct CoreEntropyEngine {
    config: CoreEntropyConfig,
}

impl CoreEntropyEngine {
    /// Construct an engine with explicit configuration.
    pub fn new(config: CoreEntropyConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &CoreEntropyConfig {
        &self.config
    }

    /// Core entropy of `angle`, as a growth rate.
    pub fn core_entropy(&self, angle: &Angle) -> f64 {
        self.core_entropy_of(angle.value(), angle.orbit())
    }

    /// Core entropy from an exact angle and its doubling orbit.
    pub fn core_entropy_of(&self, angle: &Rational, orbit: &Orbit) -> f64 {
        if *angle == Rational::new(1, 2) {
            return 2.0;
        }
        if *angle == Rational::new(0, 1) || *angle == Rational::new(1, 1) {
            return 1.0;
        }
        let wedge = Wedge::build(orbit, angle);
        self.dominant_eigenvalue(&wedge)
    }

    /// Largest near-real eigenvalue among those closest to the shift.
    pub fn dominant_eigenvalue(&self, wedge: &Wedge) -> f64 {
        let n = wedge.vertex_count();
        let k = self.config.eigenvalue_count.min(n.saturating_sub(2));
        if k == 0 {
            tracing::warn!(vertices = n, "wedge too small for the eigen-solve; using fallback");
            return FALLBACK_ENTROPY;
        }

        let Some(schur) = Schur::try_new(
            wedge.to_dense(),
            f64::EPSILON,
            self.config.max_schur_iterations,
        ) else {
            tracing::warn!(vertices = n, "eigenvalue computation did not converge; using fallback");
            return FALLBACK_ENTROPY;
        };

        let shift = Complex64::new(self.config.shift, 0.0);
        let mut eigenvalues: Vec<Complex64> = schur.complex_eigenvalues().iter().copied().collect();
        eigenvalues.sort_by(|a, b| (a - shift).norm().total_cmp(&(b - shift).norm()));

        let dominant = eigenvalues
            .iter()
            .take(k)
            .filter(|z| z.im.abs() < self.config.imaginary_tolerance)
            .map(|z| z.re)
            .max_by(f64::total_cmp);

        match dominant {
            Some(lambda) => lambda,
            None => {
                let nearest = &eigenvalues[..k];
                tracing::warn!(
                    ?nearest,
                    "no real eigenvalue near the shift; using fallback"
                );
                FALLBACK_ENTROPY
            }
        }
    }
}

/// Core entropy of `angle` with the default engine.
pub fn core_entropy(angle: &Angle) -> f64 {
    angle.core_entropy()
}

/// Core entropy of `num/den`, validating the fraction first.
pub fn core_entropy_from_fraction(num: i64, den: i64) -> DynamicsResult<f64> {
    Ok(Angle::from_fraction(num, den)?.core_entropy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wedge(num: i64, den: i64) -> Wedge {
        let angle = Rational::new(num, den);
        Wedge::build(&Orbit::of(angle), &angle)
    }

    #[test]
    fn quarter_wedge_has_three_vertices() {
        // orbit 1/4, 1/2, 0, 0; inner arc [1/8, 5/8)
        let w = wedge(1, 4);
        assert_eq!(
            w.vertices(),
            &[
                IndexPair { i: 1, j: 2 },
                IndexPair { i: 1, j: 3 },
                IndexPair { i: 2, j: 3 }
            ]
        );
        // 1/4 and 1/2 share the inner arc: (1,2) → (2,3)
        assert!(!w.is_separated(0));
        assert_eq!(w.successors(0), &[2]);
    }

    #[test]
    fn separated_pairs_have_two_successors() {
        let w = wedge(1, 4);
        // (1,3): 1/4 inner, 0 outer → (1,2) and (1,4) wrapped to (1,3)
        assert!(w.is_separated(1));
        assert_eq!(w.successors(1), &[0, 1]);
        // (2,3) hits (1,3) twice
        assert_eq!(w.successors(2), &[1, 1]);
        assert_eq!(w.to_dense()[(2, 1)], 2.0);
    }

    #[test]
    fn quarter_growth_rate_solves_the_cubic() {
        // adjacency has characteristic polynomial λ³ − λ² − 2
        let lambda = CoreEntropyEngine::default().dominant_eigenvalue(&wedge(1, 4));
        assert!((lambda.powi(3) - lambda.powi(2) - 2.0).abs() < 1e-9);
        assert!((lambda - 1.695_620_769_559_862).abs() < 1e-9);
    }

    #[test]
    fn missing_targets_are_skipped() {
        // 1/5 is periodic from the start: wrapped separated targets become (1, 1).
        let w = wedge(1, 5);
        let rows_with_one_edge = (0..w.vertex_count())
            .filter(|&r| w.is_separated(r) && w.successors(r).len() < 2)
            .count();
        assert!(rows_with_one_edge > 0);
    }

    #[test]
    fn closed_form_base_cases() {
        let engine = CoreEntropyEngine::default();
        let half = Rational::new(1, 2);
        assert_eq!(engine.core_entropy_of(&half, &Orbit::of(half)), 2.0);
        let zero = Rational::new(0, 1);
        assert_eq!(engine.core_entropy_of(&zero, &Orbit::of(zero)), 1.0);
        let one = Rational::new(1, 1);
        assert_eq!(engine.core_entropy_of(&one, &Orbit::of(one)), 1.0);
    }

    #[test]
    fn tiny_wedges_fall_back() {
        // 1/3: orbit 1/3, 2/3, 1/3 → a single vertex
        let engine = CoreEntropyEngine::default();
        assert_eq!(engine.dominant_eigenvalue(&wedge(1, 3)), FALLBACK_ENTROPY);
    }

    #[test]
    fn dense_matrix_sums_duplicates() {
        let w = wedge(1, 6);
        let dense = w.to_dense();
        let total: f64 = dense.iter().sum();
        assert_eq!(total as usize, w.edge_count());
    }
}
