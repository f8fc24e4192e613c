//! Integration tests for sirocco-telemetry.

use std::cell::RefCell;
use std::rc::Rc;

use sirocco_telemetry::{CaptureSink, EventBus, EventKind, EventSink, MotionEvent};

/// A sink sharing its record with the test body (delivery is synchronous
/// and single-threaded, so `Rc<RefCell<..>>` is enough).
struct SharedSink(Rc<RefCell<Vec<MotionEvent>>>);

impl EventSink for SharedSink {
    fn handle(&mut self, event: &MotionEvent) {
        self.0.borrow_mut().push(event.clone());
    }
    fn name(&self) -> &str {
        "shared"
    }
}

// ─── EventBus Tests ───────────────────────────────────────────

#[test]
fn bus_delivers_synchronously_in_order() {
    let record = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(SharedSink(Rc::clone(&record))));
    assert_eq!(bus.sink_count(), 1);

    bus.emit(MotionEvent::new(0, 0, EventKind::SubstageBegin { rk_time: 0.25 }));
    // Delivered at the emission point, no flush step.
    assert_eq!(record.borrow().len(), 1);

    bus.emit(MotionEvent::new(
        0,
        0,
        EventKind::DeformIteration {
            increment: 0,
            n_increments: 4,
            linear_iters: 12,
            min_vol: 0.125,
            tolerance: 1.0e-3,
        },
    ));
    let events = record.borrow();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0].kind, EventKind::SubstageBegin { .. }));
    assert!(matches!(events[1].kind, EventKind::DeformIteration { .. }));
}

#[test]
fn disabled_bus_silences_sinks_but_still_counts() {
    let record = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(SharedSink(Rc::clone(&record))));
    bus.set_enabled(false);
    assert!(!bus.is_enabled());

    bus.emit(MotionEvent::new(1, 2, EventKind::NegativeVolume {
        min_vol: -1.0e-4,
        cell_count: 3,
    }));

    assert!(record.borrow().is_empty());
    // The grid-health contract: the counter advances even when silenced.
    assert_eq!(bus.counters().negative_volumes, 1);
}

#[test]
fn counters_track_recoverable_failures() {
    let mut bus = EventBus::new();

    bus.emit(MotionEvent::new(0, 0, EventKind::DegenerateElement {
        cell: 4,
        det: -1.0e-16,
        count: 1,
    }));
    bus.emit(MotionEvent::new(0, 0, EventKind::DegenerateElement {
        cell: 9,
        det: 0.0,
        count: 2,
    }));
    bus.emit(MotionEvent::new(
        0,
        0,
        EventKind::SolverConvergence {
            iterations: 100,
            final_residual: 1.0e-2,
            tolerance: 1.0e-6,
            converged: false,
        },
    ));
    // A converged solve is not a failure.
    bus.emit(MotionEvent::new(
        0,
        1,
        EventKind::SolverConvergence {
            iterations: 12,
            final_residual: 1.0e-9,
            tolerance: 1.0e-6,
            converged: true,
        },
    ));

    let counters = bus.counters();
    assert_eq!(counters.degenerate_elements, 2);
    assert_eq!(counters.solver_failures, 1);
    assert_eq!(counters.negative_volumes, 0);
}

#[test]
fn finalize_reaches_every_sink() {
    struct FinalizeProbe(Rc<RefCell<u32>>);
    impl EventSink for FinalizeProbe {
        fn handle(&mut self, _event: &MotionEvent) {}
        fn finalize(&mut self) {
            *self.0.borrow_mut() += 1;
        }
        fn name(&self) -> &str {
            "probe"
        }
    }

    let count = Rc::new(RefCell::new(0));
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(FinalizeProbe(Rc::clone(&count))));
    bus.add_sink(Box::new(FinalizeProbe(Rc::clone(&count))));
    bus.finalize();
    assert_eq!(*count.borrow(), 2);
}

// ─── Sink Tests ───────────────────────────────────────────────

#[test]
fn capture_sink_records_the_stream() {
    let mut sink = CaptureSink::new();
    sink.handle(&MotionEvent::new(2, 0, EventKind::DegenerateElement {
        cell: 17,
        det: -2.0e-6,
        count: 1,
    }));
    sink.handle(&MotionEvent::new(2, 1, EventKind::MeshWritten {
        path: "wing_000000002.msh".into(),
    }));

    assert_eq!(sink.events.len(), 2);
    assert_eq!(sink.events[0].iter, 2);
    match &sink.events[0].kind {
        EventKind::DegenerateElement { cell, .. } => assert_eq!(*cell, 17),
        _ => panic!("wrong event kind"),
    }
    assert_eq!(sink.events[1].rk_step, 1);
}

#[test]
fn event_carries_substage_tag() {
    let ev = MotionEvent::new(
        5,
        3,
        EventKind::SolverConvergence {
            iterations: 40,
            final_residual: 1.0e-9,
            tolerance: 1.0e-6,
            converged: true,
        },
    );
    assert_eq!(ev.iter, 5);
    assert_eq!(ev.rk_step, 3);
}
