//! Prometheus metrics for gateway and upstream traffic.

use std::time::Duration;

use metrics::{counter, histogram};

/// How an upstream WFS call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Success,
    HttpStatus,
    Timeout,
    Network,
}

impl UpstreamOutcome {
    pub fn from_error(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamOutcome::Timeout
        } else if err.is_status() {
            UpstreamOutcome::HttpStatus
        } else {
            UpstreamOutcome::Network
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamOutcome::Success => "success",
            UpstreamOutcome::HttpStatus => "http_status",
            UpstreamOutcome::Timeout => "timeout",
            UpstreamOutcome::Network => "network",
        }
    }
}

/// Record one upstream WFS request (`request` is the WFS operation name).
pub fn record_upstream_request(request: &'static str, outcome: UpstreamOutcome, elapsed: Duration) {
    counter!(
        "wfs_upstream_requests_total",
        "request" => request,
        "outcome" => outcome.as_str()
    )
    .increment(1);
    histogram!("wfs_upstream_request_duration_seconds", "request" => request)
        .record(elapsed.as_secs_f64());
}

/// Record one request to a gateway route.
pub fn record_gateway_request(route: &'static str, status: u16) {
    counter!(
        "wfs_gateway_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(UpstreamOutcome::Success.as_str(), "success");
        assert_eq!(UpstreamOutcome::HttpStatus.as_str(), "http_status");
        assert_eq!(UpstreamOutcome::Timeout.as_str(), "timeout");
        assert_eq!(UpstreamOutcome::Network.as_str(), "network");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_upstream_request("GetFeature", UpstreamOutcome::Success, Duration::from_millis(5));
        record_gateway_request("items", 200);
    }
}
