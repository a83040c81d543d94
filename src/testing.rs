// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Fixtures shared by the unit tests.

use crate::{Cost, Debugger, GraphResponse, Location, MemoryGraph, Route, VertexId};

pub fn vertex(id: i64) -> VertexId {
    VertexId(id)
}

/// Builds a `rows` × `cols` grid of two-way streets, `spacing` meters apart.
///
/// Vertex ids go row by row, starting from 1 in the south-west corner:
///
/// ```text
/// 4 - 5 - 6
/// |   |   |
/// 1 - 2 - 3
/// ```
///
/// East-west edges are added first (so edge 0 is `1 -> 2`), then the north-south ones.
pub fn grid(rows: usize, cols: usize, spacing: f64) -> MemoryGraph {
    let origin = Location::new(52.0, 21.0);
    let id = |r: usize, c: usize| vertex((r * cols + c + 1) as i64);

    let mut g = MemoryGraph::new();
    for r in 0..rows {
        for c in 0..cols {
            g.set_vertex(
                id(r, c),
                origin.offset(r as f64 * spacing, c as f64 * spacing),
            );
        }
    }

    for r in 0..rows {
        for c in 1..cols {
            g.add_two_way_edge(id(r, c - 1), id(r, c)).unwrap();
        }
    }

    for r in 1..rows {
        for c in 0..cols {
            g.add_two_way_edge(id(r - 1, c), id(r, c)).unwrap();
        }
    }

    g
}

/// Remembers every event it receives.
#[derive(Debug, Default)]
pub struct RecordingDebugger {
    pub started: Option<(VertexId, VertexId)>,
    pub relaxed: Vec<(Route<VertexId, crate::EdgeId>, Cost)>,
    pub settled: Vec<VertexId>,
    pub ended: Option<GraphResponse<MemoryGraph>>,
}

impl Debugger<MemoryGraph> for RecordingDebugger {
    fn on_start(&mut self, start: VertexId, end: VertexId) {
        self.started = Some((start, end));
    }

    fn on_relaxed(&mut self, route: &Route<VertexId, crate::EdgeId>, cost: Cost) {
        self.relaxed.push((route.clone(), cost));
    }

    fn on_settled(&mut self, vertex: VertexId, _: Cost) {
        self.settled.push(vertex);
    }

    fn on_end(&mut self, response: &GraphResponse<MemoryGraph>) {
        self.ended = Some(response.clone());
    }
}
