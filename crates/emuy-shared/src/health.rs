//! Result of probing a service's health endpoint

use std::fmt::Display;

use emuy_time::{Milliseconds, Timestamp};

use crate::errors::RequestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// Answered but not with a success status
    Unhealthy { status: u16 },
    /// Did not answer within the health check timeout
    TimedOut,
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    pub name: String,
    pub url: String,
    pub status: HealthStatus,
    pub latency: Milliseconds,
    pub checked_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthSummary {
    pub healthy: usize,
    pub total: usize,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Maps the outcome of a probe. Any 2xx counts as healthy.
    pub fn from_probe(outcome: Result<u16, RequestError>) -> Self {
        match outcome {
            Ok(status) if (200..300).contains(&status) => Self::Healthy,
            Ok(status) => Self::Unhealthy { status },
            Err(RequestError::Status { status, .. }) => Self::Unhealthy { status },
            Err(RequestError::Timeout) => Self::TimedOut,
            Err(e) => Self::Unreachable(e.to_string()),
        }
    }
}

impl Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Unhealthy { status } => write!(f, "Unhealthy ({status})"),
            HealthStatus::TimedOut => write!(f, "Timed out"),
            HealthStatus::Unreachable(reason) => write!(f, "Unreachable: {reason}"),
        }
    }
}

impl HealthSummary {
    pub fn from_results(results: &[ServiceHealth]) -> Self {
        Self {
            healthy: results.iter().filter(|r| r.status.is_healthy()).count(),
            total: results.len(),
        }
    }

    pub fn all_healthy(&self) -> bool {
        self.healthy == self.total
    }
}
