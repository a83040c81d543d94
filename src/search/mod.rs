// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod bidirectional;
mod dijkstra;
mod frontier;
mod meet;
mod promoter;
mod request;
mod route;

pub use bidirectional::{BidirectionalRouter, RouterOptions};
pub use dijkstra::DijkstraRouter;
pub use frontier::{Direction, FrontierStatus};
pub use meet::Meet;
pub use promoter::{LevelPromoter, NoPromotion};
pub use request::{RoutingRequest, RoutingRequestBuilder};
pub use route::{GraphResponse, GraphRoute, Route, RoutingResponse};

use crate::{Graph, RoutingError};

/// Something capable of answering [RoutingRequest]s over a [Graph].
pub trait Router<G: Graph> {
    /// Consumes the request and searches for a route between its start and end vertices.
    ///
    /// Failing to find a route is not an error; check [RoutingResponse::is_success].
    /// Errors are only returned for invalid requests, e.g. a start or end vertex
    /// missing from the graph.
    fn find_route(&self, request: RoutingRequest<'_, G>) -> Result<GraphResponse<G>, RoutingError>;
}
