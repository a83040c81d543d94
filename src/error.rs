// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Configuration errors, reported before any search or snap starts.
///
/// Not finding a route is not an error - it is reported through
/// [RoutingResponse::is_success](crate::RoutingResponse::is_success).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoutingError {
    /// The start or end vertex doesn't exist in the graph.
    #[error("invalid vertex: {0}")]
    InvalidReference(String),

    /// A [RoutingRequest](crate::RoutingRequest) was built without a cost function.
    #[error("routing request has no cost function")]
    MissingCostFunction,

    /// A router or snapper option is out of its allowed range.
    #[error("invalid {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl RoutingError {
    pub(crate) fn invalid_option(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}
