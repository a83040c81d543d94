// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Cost, Graph};

/// Strategy restricting which edges a frontier expands as it grows, e.g. to
/// move a long search onto higher road classes once it leaves the neighborhood
/// of its origin.
pub trait LevelPromoter<G: Graph> {
    /// Whether `edge` may be relaxed from a vertex settled at `cost`.
    fn admits(&self, graph: &G, edge: G::Edge, cost: Cost) -> bool;
}

/// Admits every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoPromotion;

impl<G: Graph> LevelPromoter<G> for NoPromotion {
    fn admits(&self, _: &G, _: G::Edge, _: Cost) -> bool {
        true
    }
}
