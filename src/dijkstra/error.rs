// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::time::Instant;

/// Recommended number of allowed node settlements in
/// [find_path_with_limits](crate::find_path_with_limits)
/// before [RouteError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions which may occur during [find_nearest](crate::find_nearest),
/// [find_path](crate::find_path) or [route](crate::route).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Nearest-node lookup was invoked without any candidate nodes.
    #[error("no candidate nodes")]
    EmptyInput,

    /// There is no path between the start and end nodes.
    #[error("end node is unreachable from start node")]
    Unreachable,

    /// Route search has exceeded its limit of steps.
    /// Either the nodes are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole connected
    /// component of the start node, which can be very time-consuming
    /// on large graphs. The step limit protects against resource exhaustion.
    #[error("step limit exceeded")]
    StepLimitExceeded,

    /// Route search did not finish before its deadline.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Bounds on the amount of work a single search may perform.
///
/// The default value imposes no limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nodes which may be settled before
    /// [RouteError::StepLimitExceeded] is returned. The recommended value is
    /// [DEFAULT_STEP_LIMIT].
    pub step_limit: usize,

    /// Point in time after which the search is abandoned with
    /// [RouteError::DeadlineExceeded].
    pub deadline: Option<Instant>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            step_limit: usize::MAX,
            deadline: None,
        }
    }
}

impl Limits {
    /// Checks whether the search may continue after settling `steps` nodes.
    pub(super) fn check(&self, steps: usize) -> Result<(), RouteError> {
        if steps > self.step_limit {
            return Err(RouteError::StepLimitExceeded);
        }

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(RouteError::DeadlineExceeded);
            }
        }

        Ok(())
    }
}
