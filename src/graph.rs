// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::borrow::Cow;
use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt::Debug;
use std::hash::Hash;

use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{Heading, Location, Polyline, Rectangle};

/// Means of transport used to decide whether an edge is navigable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Car,
    Bus,
    Bicycle,
    Foot,
    Railway,
    Tram,
    Subway,
}

impl TransportMode {
    pub const ALL: [TransportMode; 7] = [
        TransportMode::Car,
        TransportMode::Bus,
        TransportMode::Bicycle,
        TransportMode::Foot,
        TransportMode::Railway,
        TransportMode::Tram,
        TransportMode::Subway,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Read-only view of a road network, consumed by the routing and snapping code.
///
/// Vertices and edges are opaque handles - the routing code only uses them as keys.
/// Edges are directed: `from_vertex(e) -> to_vertex(e)`.
///
/// Implementations must be safe to query concurrently from multiple routing requests,
/// which is guaranteed for any `Sync` implementation, as all methods take `&self`.
pub trait Graph {
    type Vertex: Copy + Eq + Hash + Ord + Debug;
    type Edge: Copy + Eq + Hash + Ord + Debug;

    /// Checks if a vertex exists in the graph.
    fn contains_vertex(&self, vertex: Self::Vertex) -> bool;

    /// Edges leaving `vertex`.
    fn outgoing(&self, vertex: Self::Vertex) -> impl Iterator<Item = Self::Edge> + '_;

    /// Edges arriving at `vertex`.
    fn incoming(&self, vertex: Self::Vertex) -> impl Iterator<Item = Self::Edge> + '_;

    fn from_vertex(&self, edge: Self::Edge) -> Self::Vertex;

    fn to_vertex(&self, edge: Self::Edge) -> Self::Vertex;

    fn location(&self, vertex: Self::Vertex) -> Location;

    /// Geometric shape of the edge, starting at its from vertex.
    fn shape(&self, edge: Self::Edge) -> Cow<'_, Polyline>;

    /// Length of the edge in meters.
    fn length(&self, edge: Self::Edge) -> f64 {
        self.shape(edge).length()
    }

    /// Heading at the start of the edge.
    fn heading(&self, edge: Self::Edge) -> Heading {
        self.shape(edge).initial_heading()
    }

    fn is_navigable(&self, edge: Self::Edge, mode: TransportMode) -> bool;

    /// All edges whose shape may intersect the provided rectangle.
    /// Returning extra edges is allowed, missing edges is not.
    fn edges_intersecting(&self, bounds: &Rectangle) -> Vec<Self::Edge>;
}

/// Identifier of a vertex in a [MemoryGraph].
///
/// Zero is reserved to signify absence of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub i64);

/// Identifier of an edge in a [MemoryGraph].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

#[derive(Debug, Clone)]
struct VertexRecord {
    location: Location,
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    from: VertexId,
    to: VertexId,
    shape: Polyline,
    length: f64,
    modes: u8,
}

#[derive(Debug, Clone, PartialEq)]
struct IndexedEdge {
    id: EdgeId,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn to_aabb(r: &Rectangle) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [r.bottom_left.longitude, r.bottom_left.latitude],
        [r.top_right.longitude, r.top_right.latitude],
    )
}

/// Simple in-memory road network, with an [R-tree](https://en.wikipedia.org/wiki/R-tree)
/// over edge bounding boxes to answer [Graph::edges_intersecting].
///
/// Edges can only be added, never removed, so that [EdgeId]s stay stable.
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    vertices: BTreeMap<VertexId, VertexRecord>,
    edges: Vec<EdgeRecord>,
    index: RTree<IndexedEdge>,
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self {
            vertices: BTreeMap::default(),
            edges: Vec::default(),
            index: RTree::new(),
        }
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all vertex ids in the graph.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// Creates or moves a vertex.
    ///
    /// All outgoing and incoming edges are preserved, but their shapes are not updated.
    pub fn set_vertex(&mut self, id: VertexId, location: Location) {
        assert_ne!(id.0, 0);

        match self.vertices.entry(id) {
            Entry::Vacant(e) => {
                e.insert(VertexRecord {
                    location,
                    outgoing: Vec::default(),
                    incoming: Vec::default(),
                });
            }
            Entry::Occupied(mut e) => {
                e.get_mut().location = location;
            }
        }
    }

    /// Adds a straight edge navigable by all [TransportMode]s.
    /// Returns `None` if either vertex doesn't exist.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        let shape = Polyline::segment(
            self.vertices.get(&from)?.location,
            self.vertices.get(&to)?.location,
        );
        self.add_shaped_edge(from, to, shape, &TransportMode::ALL)
    }

    /// Adds a pair of straight edges, `from -> to` and `to -> from`.
    pub fn add_two_way_edge(&mut self, from: VertexId, to: VertexId) -> Option<(EdgeId, EdgeId)> {
        let forward = self.add_edge(from, to)?;
        let backward = self.add_edge(to, from)?;
        Some((forward, backward))
    }

    /// Adds an edge with an explicit shape, navigable only by the provided modes.
    /// Returns `None` if either vertex doesn't exist.
    pub fn add_shaped_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        shape: Polyline,
        modes: &[TransportMode],
    ) -> Option<EdgeId> {
        if !self.vertices.contains_key(&from) || !self.vertices.contains_key(&to) {
            return None;
        }

        let id = EdgeId(self.edges.len() as u32);
        self.index.insert(IndexedEdge {
            id,
            envelope: to_aabb(&shape.bounds()),
        });
        self.edges.push(EdgeRecord {
            from,
            to,
            length: shape.length(),
            shape,
            modes: modes.iter().fold(0, |acc, m| acc | m.bit()),
        });

        if let Some(v) = self.vertices.get_mut(&from) {
            v.outgoing.push(id);
        }
        if let Some(v) = self.vertices.get_mut(&to) {
            v.incoming.push(id);
        }

        Some(id)
    }

    fn edge(&self, id: EdgeId) -> &EdgeRecord {
        &self.edges[id.0 as usize]
    }
}

impl Graph for MemoryGraph {
    type Vertex = VertexId;
    type Edge = EdgeId;

    fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains_key(&vertex)
    }

    fn outgoing(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices
            .get(&vertex)
            .map(|v| v.outgoing.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
    }

    fn incoming(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices
            .get(&vertex)
            .map(|v| v.incoming.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
    }

    fn from_vertex(&self, edge: EdgeId) -> VertexId {
        self.edge(edge).from
    }

    fn to_vertex(&self, edge: EdgeId) -> VertexId {
        self.edge(edge).to
    }

    fn location(&self, vertex: VertexId) -> Location {
        self.vertices
            .get(&vertex)
            .map(|v| v.location)
            .unwrap_or_default()
    }

    fn shape(&self, edge: EdgeId) -> Cow<'_, Polyline> {
        Cow::Borrowed(&self.edge(edge).shape)
    }

    fn length(&self, edge: EdgeId) -> f64 {
        self.edge(edge).length
    }

    fn is_navigable(&self, edge: EdgeId, mode: TransportMode) -> bool {
        self.edge(edge).modes & mode.bit() != 0
    }

    fn edges_intersecting(&self, bounds: &Rectangle) -> Vec<EdgeId> {
        let mut edges = self
            .index
            .locate_in_envelope_intersecting(&to_aabb(bounds))
            .map(|indexed| indexed.id)
            .collect::<Vec<_>>();

        // R-tree iteration order depends on insertion history
        edges.sort_unstable();
        edges
    }
}
