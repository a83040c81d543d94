// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::frontier::{Direction, Frontier};
use crate::{Cost, Graph, Route};

/// A vertex settled by both the forward and the backward frontier,
/// together with the end-to-end route through it.
///
/// Two meets are equal if their routes are identical, regardless of the meeting vertex.
#[derive(Debug, Clone)]
pub struct Meet<V, E> {
    pub vertex: V,
    pub cost: Cost,
    pub route: Route<V, E>,
}

impl<V: PartialEq, E: PartialEq> PartialEq for Meet<V, E> {
    fn eq(&self, other: &Self) -> bool {
        self.route == other.route
    }
}

impl<V, E> Meet<V, E> {
    pub fn is_cheaper_than(&self, other: &Self) -> bool {
        self.cost < other.cost
    }
}

impl<V: Copy + PartialEq, E: Copy> Meet<V, E> {
    /// Assembles the meet at `vertex` out of both frontiers' routes.
    /// Returns `None` if the vertex isn't settled on both sides.
    pub(crate) fn assemble<G>(
        forward: &Frontier<'_, G>,
        backward: &Frontier<'_, G>,
        vertex: V,
    ) -> Option<Self>
    where
        G: Graph<Vertex = V, Edge = E>,
    {
        debug_assert_eq!(forward.direction(), Direction::Forward);
        debug_assert_eq!(backward.direction(), Direction::Backward);

        let cost = forward.settled_cost(vertex)? + backward.settled_cost(vertex)?;
        let route = forward
            .route_to(vertex)?
            .concatenate(backward.route_to(vertex)?)?;
        Some(Self {
            vertex,
            cost,
            route,
        })
    }
}
