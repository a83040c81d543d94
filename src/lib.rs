// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Bidirectional routing and map matching over road networks.
//!
//! The crate doesn't store road networks itself; any type implementing the [Graph]
//! trait can be routed over. [MemoryGraph] is a simple in-memory implementation,
//! good enough for small networks and tests.
//!
//! Raw coordinates are turned into graph vertices by the [Snapper], and routes between
//! vertices are found by a [Router] - usually the [BidirectionalRouter], which runs
//! two A* searches (one from each end) and stops shortly after they meet.
//! Edge costs are provided by composable [cost functions](crate::cost).
//!
//! # Example
//!
//! ```
//! use roadroute::{
//!     BidirectionalRouter, Location, MemoryGraph, Router, RouterOptions, RoutingRequest,
//!     SnapOptions, Snapper, StepLimiter, VertexId, Length,
//! };
//!
//! let mut g = MemoryGraph::new();
//! let a = Location::new(43.7384, 7.4246);
//! g.set_vertex(VertexId(1), a);
//! g.set_vertex(VertexId(2), a.offset(0.0, 250.0));
//! g.set_vertex(VertexId(3), a.offset(250.0, 250.0));
//! g.add_two_way_edge(VertexId(1), VertexId(2)).unwrap();
//! g.add_two_way_edge(VertexId(2), VertexId(3)).unwrap();
//!
//! let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();
//! let start = snapper.snap(a.offset(5.0, 10.0), None).unwrap().nearest_vertex(&g);
//! let end = snapper.snap(a.offset(240.0, 255.0), None).unwrap().nearest_vertex(&g);
//!
//! let request = RoutingRequest::builder(start, end)
//!     .cost_function(&Length)
//!     .limiter(StepLimiter::default())
//!     .build()
//!     .unwrap();
//! let router = BidirectionalRouter::new(&g, RouterOptions::default()).unwrap();
//! let response = router.find_route(request).expect("invalid request");
//!
//! let route = response.route.expect("no route");
//! assert_eq!(route.vertices(&g), vec![VertexId(1), VertexId(2), VertexId(3)]);
//! ```

pub mod cost;
mod debugger;
mod error;
pub mod geometry;
mod graph;
mod limiter;
mod permission;
mod search;
mod snap;

#[cfg(test)]
mod testing;

pub use cost::{Compose, Constant, Cost, CostFunction, Length, RemainingDistance};
pub use debugger::{Debugger, LogDebugger, NullDebugger};
pub use error::RoutingError;
pub use geometry::{earth_distance, Heading, Location, Polyline, PolylineSnap, Rectangle};
pub use graph::{EdgeId, Graph, MemoryGraph, TransportMode, VertexId};
pub use limiter::{
    DistanceLimiter, Limiter, Progress, StepLimiter, TimeLimiter, Unlimited, DEFAULT_STEP_LIMIT,
    UNLIMITED,
};
pub use permission::{
    AllowAllEdges, AllowAllRoutes, EdgePermission, EdgePermissionGate, RouteFilter,
    RoutePermission,
};
pub use search::{
    BidirectionalRouter, DijkstraRouter, Direction, FrontierStatus, GraphResponse, GraphRoute,
    LevelPromoter, Meet, NoPromotion, Route, Router, RouterOptions, RoutingRequest,
    RoutingRequestBuilder, RoutingResponse,
};
pub use snap::{GraphSnap, SnapOptions, Snapper};
