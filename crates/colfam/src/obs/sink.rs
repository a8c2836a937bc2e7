//! Metrics sink boundary.
//!
//! The thread-local default sink feeds the in-process counters; tests or
//! hosts may install their own sink to capture raw events.

use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecKind {
    Persist,
    Load,
    Query,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    ExecStart {
        kind: ExecKind,
        entity_path: &'static str,
    },
    ExecFinish {
        kind: ExecKind,
        entity_path: &'static str,
        rows: u64,
        ok: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: &MetricsEvent);
}

/// Install (or clear) the calling thread's metrics sink.
pub fn set_sink(sink: Option<Rc<dyn MetricsSink>>) {
    SINK.with(|cell| *cell.borrow_mut() = sink);
}

/// Route one event to the counters and any installed sink.
pub(crate) fn emit(event: &MetricsEvent) {
    metrics::record(event);
    SINK.with(|cell| {
        if let Some(sink) = cell.borrow().as_ref() {
            sink.record(event);
        }
    });
}

/// Snapshot the calling thread's counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the calling thread's counters.
pub fn metrics_reset() {
    metrics::reset();
}
