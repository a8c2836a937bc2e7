use crate::obs::sink::{ExecKind, MetricsEvent};
use std::cell::Cell;

///
/// EventReport
///
/// Point-in-time counter snapshot for one thread.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EventReport {
    pub persists: u64,
    pub loads: u64,
    pub queries: u64,
    pub rows: u64,
    pub failures: u64,
}

thread_local! {
    static STATE: Cell<EventReport> = const { Cell::new(EventReport {
        persists: 0,
        loads: 0,
        queries: 0,
        rows: 0,
        failures: 0,
    }) };
}

pub(crate) fn record(event: &MetricsEvent) {
    let MetricsEvent::ExecFinish { kind, rows, ok, .. } = event else {
        return;
    };

    STATE.with(|state| {
        let mut report = state.get();
        match kind {
            ExecKind::Persist => report.persists += 1,
            ExecKind::Load => report.loads += 1,
            ExecKind::Query => report.queries += 1,
        }
        report.rows += rows;
        if !ok {
            report.failures += 1;
        }
        state.set(report);
    });
}

pub(crate) fn report() -> EventReport {
    STATE.with(Cell::get)
}

pub(crate) fn reset() {
    STATE.with(|state| state.set(EventReport::default()));
}
