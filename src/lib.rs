//! # kneading-core
//!
//! Combinatorial and numeric invariants of quadratic dynamics indexed by
//! rational external angles.
//!
//! ---
//!
//! ## Two pipelines
//!
//! **The angle pipeline.** A rational angle θ = p/q is doubled around the
//! circle until its orbit repeats. The orbit, read against the partition at
//! `θ/2` and `(θ+1)/2`, gives a kneading sequence; the kneading sequence
//! gives a sign itinerary; the itinerary gives a polynomial whose unique root
//! inside `|x| ≤ 2^(-1/2)` is the parameter associated with θ. The same orbit
//! also drives the core-entropy computation: a wedge graph over pairs of
//! orbit indices whose adjacency matrix has the entropy as its dominant real
//! eigenvalue.
//!
//! **The neighbor graph.** A complex parameter `c` is explored breadth-first
//! under three Möbius-type maps. Points that coincide after rounding collapse
//! into one node, so the graph can close up into cycles, which is how
//! renormalization shows up.
//!
//! ```text
//! Angle ─→ Orbit ─→ KneadingSequence ─→ Itinerary ─→ ItineraryPolynomial ─→ AssociatedRoot
//!            │                                                                   ┆
//!            └──→ Wedge ─→ core entropy                    c ┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┘
//!                                                          └─→ NeighborGraph
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`orbit`] | [`Orbit`], [`Period`] | Exact doubling orbits, period detection, binary expansion |
//! | [`kneading`] | [`KneadingSequence`], [`Itinerary`] | Kneading symbols and the sign itinerary |
//! | [`polynomial`] | [`ItineraryPolynomial`] | Factored numerator, exact coefficient expansion |
//! | [`roots`] | [`RootLocator`], [`AssociatedRoot`] | Companion-matrix roots filtered to the target disc |
//! | [`entropy`] | [`CoreEntropyEngine`], [`Wedge`] | Wedge adjacency and its dominant eigenvalue |
//! | [`neighbor`] | [`NeighborGraphBuilder`], [`NeighborGraph`] | Breadth-first neighbor graph with deduplication and pruning |
//! | [`angle`] | [`Angle`] | Validated angle value with memoized invariants |
//! | [`survey`] | [`AngleRecord`] | Batch tabulation of candidate angles |
//! | [`error`] | [`DynamicsError`] | Input-validation errors |
//!
//! ## Diagnostics
//!
//! Numerical edge cases never fail: a missing root yields
//! [`AssociatedRoot::NotFound`], a degenerate eigen-solve yields `1.0`. Both
//! are reported through [`tracing`]; install a subscriber to see them.
//!
//! ## Features
//!
//! - `serde` derives `Serialize`/`Deserialize` on configurations, symbols and
//!   [`AngleRecord`].
//! - `python-ffi` builds the PyO3 extension module `kneading_core`.
//!
//! ## License
//!
//! Business Source License 1.1.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod angle;
pub mod entropy;
pub mod error;
pub mod kneading;
pub mod neighbor;
pub mod orbit;
pub mod polynomial;
pub mod roots;
pub mod survey;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use angle::Angle;
pub use entropy::{core_entropy, core_entropy_from_fraction, CoreEntropyConfig, CoreEntropyEngine, Wedge};
pub use error::{DynamicsError, DynamicsResult};
pub use kneading::{Itinerary, KneadingSequence, KneadingSymbol, Sign};
pub use neighbor::{
    neighbor_graph, neighbor_graph_from_str, NeighborGraph, NeighborGraphBuilder, NeighborGraphConfig,
    Transform,
};
pub use orbit::{Orbit, Period, Rational};
pub use polynomial::{ItineraryPolynomial, PowerNotation};
pub use roots::{AssociatedRoot, RootLocator, RootLocatorConfig};
pub use survey::AngleRecord;
