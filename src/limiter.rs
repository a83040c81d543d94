// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Effort budgets which can stop a search early.

use std::time::{Duration, Instant};

use crate::Cost;

/// Recommended number of allowed vertex settlements for a [StepLimiter].
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Snapshot of the search effort, passed to [Limiter::can_continue]
/// right before a vertex is settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Vertices settled so far by all frontiers of the request.
    pub vertices_settled: usize,

    /// Time since the request was started.
    pub elapsed: Duration,

    /// Cost of the vertex about to be settled, from its frontier's origin.
    pub cost: Cost,

    /// Length in meters of the path to the vertex about to be settled.
    pub distance: f64,
}

/// A budget policy attached to a single routing request.
///
/// Cancellation is cooperative: the search polls [Limiter::can_continue]
/// once per vertex it is about to settle, so implementations must be cheap.
pub trait Limiter {
    /// Called once when the request starts; captures any baseline needed.
    fn start(&mut self) {}

    /// Returns `false` to stop the search.
    fn can_continue(&mut self, progress: &Progress) -> bool;
}

impl<L: Limiter + ?Sized> Limiter for &mut L {
    fn start(&mut self) {
        (**self).start()
    }

    fn can_continue(&mut self, progress: &Progress) -> bool {
        (**self).can_continue(progress)
    }
}

impl<L: Limiter + ?Sized> Limiter for Box<L> {
    fn start(&mut self) {
        (**self).start()
    }

    fn can_continue(&mut self, progress: &Progress) -> bool {
        (**self).can_continue(progress)
    }
}

/// Never stops the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unlimited;

pub const UNLIMITED: Unlimited = Unlimited;

impl Limiter for Unlimited {
    fn can_continue(&mut self, _: &Progress) -> bool {
        true
    }
}

/// Stops the search after a number of vertices have been settled.
///
/// Concluding that no route exists requires settling every vertex reachable
/// from the start, which can take very long on large graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLimiter {
    pub maximum_steps: usize,
}

impl Default for StepLimiter {
    fn default() -> Self {
        Self {
            maximum_steps: DEFAULT_STEP_LIMIT,
        }
    }
}

impl Limiter for StepLimiter {
    fn can_continue(&mut self, progress: &Progress) -> bool {
        progress.vertices_settled < self.maximum_steps
    }
}

/// Stops the search once its wall-clock budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimiter {
    budget: Duration,
    deadline: Option<Instant>,
}

impl TimeLimiter {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            deadline: None,
        }
    }
}

impl Limiter for TimeLimiter {
    fn start(&mut self) {
        self.deadline = Some(Instant::now() + self.budget);
    }

    fn can_continue(&mut self, progress: &Progress) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() < deadline,
            None => progress.elapsed < self.budget,
        }
    }
}

/// Stops the search once it settles a vertex further (along the path) than
/// a number of meters from its frontier's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceLimiter {
    pub maximum_distance: f64,
}

impl Limiter for DistanceLimiter {
    fn can_continue(&mut self, progress: &Progress) -> bool {
        progress.distance <= self.maximum_distance
    }
}
