//! Observability: runtime telemetry for engine operations.
//!
//! Engine logic never touches counter state directly; all instrumentation
//! flows through [`sink::emit`] as [`MetricsEvent`]s.

pub(crate) mod metrics;
pub(crate) mod sink;

pub use metrics::EventReport;
pub use sink::{ExecKind, MetricsEvent, MetricsSink, metrics_report, metrics_reset, set_sink};
