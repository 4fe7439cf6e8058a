//! Prometheus projection of collection passes
//!
//! Every scrape gets a fresh [`Registry`], so a connection or peer that
//! disappeared between passes also disappears from the output. Only the
//! per-user records are projected; the tunnel record is reachable through
//! the summary entry (empty `user` label).

mod server;

pub use server::{ExporterState, handle_request, serve};

use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::collector::StatusSnapshot;
use crate::constants::metrics::{
    BYTES_IN, BYTES_OUT, LABEL_TUNNEL, LABEL_USER, PACKETS_IN, PACKETS_OUT, STATUS, UP,
};

const LABELS: &[&str] = &[LABEL_TUNNEL, LABEL_USER];

/// The six metric families of one scrape
#[derive(Debug)]
pub struct StatusMetrics {
    registry: Registry,
    up: GaugeVec,
    status: GaugeVec,
    bytes_in: IntCounterVec,
    bytes_out: IntCounterVec,
    packets_in: IntCounterVec,
    packets_out: IntCounterVec,
}

fn gauge(registry: &Registry, name: &str, help: &str) -> prometheus::Result<GaugeVec> {
    let vec = GaugeVec::new(Opts::new(name, help), LABELS)?;
    registry.register(Box::new(vec.clone()))?;
    Ok(vec)
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounterVec> {
    let vec = IntCounterVec::new(Opts::new(name, help), LABELS)?;
    registry.register(Box::new(vec.clone()))?;
    Ok(vec)
}

impl StatusMetrics {
    /// Register empty metric families in a new registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        Ok(Self {
            up: gauge(&registry, UP, "value indicating a successful scrape")?,
            status: gauge(&registry, STATUS, "ipsec status value")?,
            bytes_in: counter(&registry, BYTES_IN, "received bytes per tunnel")?,
            bytes_out: counter(&registry, BYTES_OUT, "sent bytes per tunnel")?,
            packets_in: counter(&registry, PACKETS_IN, "received packets per tunnel")?,
            packets_out: counter(&registry, PACKETS_OUT, "sent packets per tunnel")?,
            registry,
        })
    }

    /// Record one sample per family for every user record in `snapshot`
    pub fn observe(&self, snapshot: &StatusSnapshot) {
        for (tunnel, users) in &snapshot.users {
            for (identity, user) in users {
                let labels = [tunnel.as_str(), identity.as_str()];
                self.up
                    .with_label_values(&labels)
                    .set(if user.up { 1.0 } else { 0.0 });
                self.status
                    .with_label_values(&labels)
                    .set(f64::from(user.status.code()));
                self.bytes_in
                    .with_label_values(&labels)
                    .inc_by(user.counters.bytes_in);
                self.bytes_out
                    .with_label_values(&labels)
                    .inc_by(user.counters.bytes_out);
                self.packets_in
                    .with_label_values(&labels)
                    .inc_by(user.counters.packets_in);
                self.packets_out
                    .with_label_values(&labels)
                    .inc_by(user.counters.packets_out);
            }
        }
    }

    /// Encode the registry in the Prometheus text exposition format
    pub fn encode(&self) -> prometheus::Result<Vec<u8>> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(buf)
    }
}

/// Render `snapshot` as a complete text-format scrape body
pub fn render(snapshot: &StatusSnapshot) -> prometheus::Result<Vec<u8>> {
    let metrics = StatusMetrics::new()?;
    metrics.observe(snapshot);
    metrics.encode()
}

/// Content type of [`render`] output
#[must_use]
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_string()
}
