// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Bounded costs and composable functions assigning them to edges.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;
use std::sync::Arc;

use crate::geometry::{earth_distance, Location};
use crate::Graph;

/// A non-negative, finite scalar describing how expensive something is.
///
/// All arithmetic saturates at [Cost::MAXIMUM], so costs always stay comparable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cost(f64);

impl Cost {
    pub const ZERO: Self = Self(0.0);

    /// The largest representable cost. Edges with this cost are never traversed.
    pub const MAXIMUM: Self = Self(f64::MAX);

    /// Creates a new cost.
    ///
    /// Panics if `value` is negative, NaN or infinite - shortest path search
    /// is only correct with non-negative costs. `-0.0` is accepted and stored as `0.0`.
    pub fn of(value: f64) -> Self {
        assert!(
            value >= 0.0 && value.is_finite(),
            "cost must be finite and non-negative, got {}",
            value
        );
        Self(value + 0.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_maximum(&self) -> bool {
        self.0 >= f64::MAX
    }

    pub fn plus(self, other: Cost) -> Self {
        Self::saturate(self.0 + other.0)
    }

    pub fn times(self, multiplier: f64) -> Self {
        assert!(
            multiplier >= 0.0,
            "cost multiplier must be non-negative, got {}",
            multiplier
        );
        if self.0 == 0.0 || multiplier == 0.0 {
            return Self::ZERO;
        }
        Self::saturate(self.0 * multiplier)
    }

    /// Same as [Cost::times], meant for weights in `[0, 1]`.
    pub fn weighted(self, weight: f64) -> Self {
        self.times(weight)
    }

    /// `self * (1 - weight) + other * weight`.
    pub fn weighted_sum(self, weight: f64, other: Cost) -> Self {
        self.weighted(1.0 - weight).plus(other.weighted(weight))
    }

    pub fn minimum(self, other: Cost) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    pub fn maximum(self, other: Cost) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// `1 - self`, for costs normalized into `[0, 1]` which express "goodness".
    pub fn inverse(self) -> Self {
        Self::of(1.0 - self.0)
    }

    fn saturate(value: f64) -> Self {
        if value.is_finite() {
            Self(value + 0.0)
        } else {
            Self::MAXIMUM
        }
    }
}

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        self.plus(rhs)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_maximum() {
            f.write_str("maximum")
        } else {
            write!(f, "{:.3}", self.0)
        }
    }
}

/// Assigns a [Cost] to every edge of a [Graph].
///
/// Implementations must be pure with respect to the search: they must not
/// return negative costs and must tolerate being called concurrently from
/// multiple routing requests.
pub trait CostFunction<G: Graph> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost;
}

/// Combinators building expression trees out of [CostFunction]s.
///
/// Implemented for every sized type; the result is a [CostFunction]
/// whenever the operands are.
pub trait Compose: Sized {
    fn plus<O>(self, other: O) -> Plus<Self, O> {
        Plus(self, other)
    }

    /// # Panics
    ///
    /// Panics if `weight` is negative.
    fn weighted(self, weight: f64) -> Weighted<Self> {
        assert!(weight >= 0.0, "weight must be non-negative, got {}", weight);
        Weighted(self, weight)
    }

    fn minimum<O>(self, other: O) -> Minimum<Self, O> {
        Minimum(self, other)
    }

    fn maximum<O>(self, other: O) -> Maximum<Self, O> {
        Maximum(self, other)
    }

    /// `self.weighted(1 - weight).plus(other.weighted(weight))`.
    ///
    /// # Panics
    ///
    /// Panics if `weight` is outside of `[0, 1]`.
    fn weighted_sum<O>(self, weight: f64, other: O) -> Plus<Weighted<Self>, Weighted<O>> {
        self.weighted(1.0 - weight).plus(other.weighted(weight))
    }

    fn inverse(self) -> Inverse<Self> {
        Inverse(self)
    }
}

impl<T> Compose for T {}

impl<G: Graph, C: CostFunction<G> + ?Sized> CostFunction<G> for &C {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        (**self).cost(graph, edge)
    }
}

impl<G: Graph, C: CostFunction<G> + ?Sized> CostFunction<G> for Box<C> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        (**self).cost(graph, edge)
    }
}

impl<G: Graph, C: CostFunction<G> + ?Sized> CostFunction<G> for Arc<C> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        (**self).cost(graph, edge)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Plus<A, B>(A, B);

impl<G: Graph, A: CostFunction<G>, B: CostFunction<G>> CostFunction<G> for Plus<A, B> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        self.0.cost(graph, edge).plus(self.1.cost(graph, edge))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Weighted<C>(C, f64);

impl<G: Graph, C: CostFunction<G>> CostFunction<G> for Weighted<C> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        self.0.cost(graph, edge).weighted(self.1)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Minimum<A, B>(A, B);

impl<G: Graph, A: CostFunction<G>, B: CostFunction<G>> CostFunction<G> for Minimum<A, B> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        self.0.cost(graph, edge).minimum(self.1.cost(graph, edge))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Maximum<A, B>(A, B);

impl<G: Graph, A: CostFunction<G>, B: CostFunction<G>> CostFunction<G> for Maximum<A, B> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        self.0.cost(graph, edge).maximum(self.1.cost(graph, edge))
    }
}

/// `1 - cost`, see [Cost::inverse]. The wrapped function must return costs in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Inverse<C>(C);

impl<G: Graph, C: CostFunction<G>> CostFunction<G> for Inverse<C> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        self.0.cost(graph, edge).inverse()
    }
}

/// Same cost for every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub Cost);

impl<G: Graph> CostFunction<G> for Constant {
    fn cost(&self, _: &G, _: G::Edge) -> Cost {
        self.0
    }
}

/// Edge length in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Length;

impl<G: Graph> CostFunction<G> for Length {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        Cost::of(graph.length(edge))
    }
}

/// Adapts a closure into a [CostFunction].
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

/// Creates a [CostFunction] calling the provided closure.
pub fn from_fn<G, F>(f: F) -> FromFn<F>
where
    G: Graph,
    F: Fn(&G, G::Edge) -> Cost,
{
    FromFn(f)
}

impl<G: Graph, F: Fn(&G, G::Edge) -> Cost> CostFunction<G> for FromFn<F> {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        (self.0)(graph, edge)
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn")
    }
}

/// Heuristic estimating the remaining cost as the crow-flies distance (in meters)
/// between the far end of the relaxed edge and a target location.
///
/// Admissible whenever the real cost of an edge is at least its length in meters,
/// for example with [Length].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemainingDistance {
    target: Location,
    towards_head: bool,
}

impl RemainingDistance {
    /// Heuristic for a forward search: measures from the edge's to vertex.
    pub fn forward(destination: Location) -> Self {
        Self {
            target: destination,
            towards_head: true,
        }
    }

    /// Heuristic for a backward search: measures from the edge's from vertex.
    pub fn backward(origin: Location) -> Self {
        Self {
            target: origin,
            towards_head: false,
        }
    }
}

impl<G: Graph> CostFunction<G> for RemainingDistance {
    fn cost(&self, graph: &G, edge: G::Edge) -> Cost {
        let vertex = if self.towards_head {
            graph.to_vertex(edge)
        } else {
            graph.from_vertex(edge)
        };
        Cost::of(earth_distance(graph.location(vertex), self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::grid;
    use crate::EdgeId;
    use proptest::prelude::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-6),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn valid_cost() -> impl Strategy<Value = Cost> {
        prop_oneof![
            (0.0f64..1e12).prop_map(Cost::of),
            Just(Cost::ZERO),
            Just(Cost::MAXIMUM),
        ]
    }

    proptest! {
        #[test]
        fn arithmetic_stays_bounded(a in valid_cost(), b in valid_cost(), m in 0.0f64..1e300) {
            for c in [a.plus(b), a + b, a.times(m), a.weighted_sum(0.5, b)] {
                prop_assert!(c >= Cost::ZERO);
                prop_assert!(c <= Cost::MAXIMUM);
                prop_assert!(c.value().is_finite());
            }
        }

        #[test]
        fn double_inverse_is_identity(v in 0.0f64..=1.0) {
            let twice = Cost::of(v).inverse().inverse();
            prop_assert!((twice.value() - v).abs() < 1e-12);
        }

        #[test]
        fn weighted_sum_matches_manual_composition(
            a in 0.0f64..1e6,
            b in 0.0f64..1e6,
            w in 0.0f64..=1.0,
        ) {
            let (a, b) = (Cost::of(a), Cost::of(b));
            let manual = a.weighted(w).plus(b.weighted(1.0 - w));
            let composed = a.weighted_sum(1.0 - w, b);
            prop_assert!((manual.value() - composed.value()).abs() <= 1e-9 * (1.0 + manual.value()));
        }

        #[test]
        fn minimum_and_maximum_pick_operands(a in valid_cost(), b in valid_cost()) {
            prop_assert_eq!(a.minimum(b), a.min(b));
            prop_assert_eq!(a.maximum(b), a.max(b));
        }
    }

    #[test]
    fn saturates_at_maximum() {
        assert_eq!(Cost::MAXIMUM.plus(Cost::of(1.0)), Cost::MAXIMUM);
        assert_eq!(Cost::MAXIMUM.times(2.0), Cost::MAXIMUM);
        assert_eq!(Cost::MAXIMUM.times(0.0), Cost::ZERO);
        assert!(Cost::MAXIMUM.is_maximum());
        assert_eq!(Cost::MAXIMUM.to_string(), "maximum");
    }

    #[test]
    fn negative_zero_is_zero() {
        let c = Cost::of(-0.0);
        assert_eq!(c, Cost::ZERO);
        assert_eq!(c.cmp(&Cost::ZERO), Ordering::Equal);
        assert_eq!(c.partial_cmp(&Cost::ZERO), Some(Ordering::Equal));
        assert!(c.value().is_sign_positive());
        assert_eq!(c.minimum(Cost::ZERO).cmp(&Cost::ZERO.maximum(c)), Ordering::Equal);
    }

    #[test]
    #[should_panic]
    fn weighted_function_with_negative_weight_panics() {
        let _ = Length.weighted(-0.5);
    }

    #[test]
    #[should_panic]
    fn weighted_sum_function_with_weight_above_one_panics() {
        let _ = Length.weighted_sum(1.5, Length);
    }

    #[test]
    #[should_panic]
    fn negative_cost_panics() {
        Cost::of(-1.0);
    }

    #[test]
    #[should_panic]
    fn nan_cost_panics() {
        Cost::of(f64::NAN);
    }

    #[test]
    fn composed_functions() {
        let g = grid(2, 2, 100.0);
        let edge = EdgeId(0);
        let length = Length.cost(&g, edge).value();
        assert_almost_eq!(length, 100.0);

        assert_almost_eq!(Length.plus(Constant(Cost::of(5.0))).cost(&g, edge).value(), 105.0);
        assert_almost_eq!(Length.weighted(0.5).cost(&g, edge).value(), 50.0);
        assert_almost_eq!(Length.minimum(Constant(Cost::of(7.0))).cost(&g, edge).value(), 7.0);
        assert_almost_eq!(Length.maximum(Constant(Cost::of(7.0))).cost(&g, edge).value(), length);
        assert_almost_eq!(
            Length
                .weighted_sum(0.25, Constant(Cost::of(20.0)))
                .cost(&g, edge)
                .value(),
            0.75 * length + 0.25 * 20.0
        );
        assert_almost_eq!(Constant(Cost::of(0.2)).inverse().cost(&g, edge).value(), 0.8);

        let doubled = from_fn(|g: &crate::MemoryGraph, e: EdgeId| Cost::of(g.length(e) * 2.0));
        assert_almost_eq!(doubled.cost(&g, edge).value(), 200.0);

        let boxed: Box<dyn CostFunction<crate::MemoryGraph>> = Box::new(Length);
        assert_almost_eq!(boxed.cost(&g, edge).value(), length);
        assert_almost_eq!((&boxed).plus(Length).cost(&g, edge).value(), 2.0 * length);
    }

    #[test]
    fn remaining_distance_measures_from_the_far_end() {
        let g = grid(1, 3, 100.0);
        // Edge 0 goes from the first to the second vertex of the row
        let first = g.location(g.from_vertex(EdgeId(0)));
        let second = g.location(g.to_vertex(EdgeId(0)));

        let forward = RemainingDistance::forward(first);
        assert_almost_eq!(forward.cost(&g, EdgeId(0)).value(), earth_distance(second, first));

        let backward = RemainingDistance::backward(first);
        assert_almost_eq!(backward.cost(&g, EdgeId(0)).value(), 0.0);
    }
}
