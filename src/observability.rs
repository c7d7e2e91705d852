//! Vendor call counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    vendor_requests: AtomicU64,
    vendor_rejections: AtomicU64,
    transport_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vendor_request(&self) {
        self.vendor_requests.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "vendor_requests", "Metric incremented");
    }

    pub fn vendor_rejection(&self) {
        self.vendor_rejections.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "vendor_rejections", "Metric incremented");
    }

    pub fn transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "transport_failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            vendor_requests: self.vendor_requests.load(Ordering::Relaxed),
            vendor_rejections: self.vendor_rejections.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub vendor_requests: u64,
    pub vendor_rejections: u64,
    pub transport_failures: u64,
}
