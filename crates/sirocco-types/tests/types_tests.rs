//! Integration tests for sirocco-types.

use sirocco_types::{BoundaryKind, EdgeId, SiroccoError, VertexId};

// ─── Id Tests ─────────────────────────────────────────────────

#[test]
fn vertex_id_roundtrip() {
    let id = VertexId::from(42_u32);
    assert_eq!(id.index(), 42);
    assert_eq!(id, VertexId(42));
}

#[test]
fn ids_are_distinct_types() {
    // Compile-time property: EdgeId and VertexId cannot be compared.
    let v = VertexId(3);
    let e = EdgeId(3);
    assert_eq!(v.index(), e.index());
}

#[test]
fn vertex_ids_sort_by_index() {
    let mut ids = vec![VertexId(5), VertexId(1), VertexId(3)];
    ids.sort();
    assert_eq!(ids, vec![VertexId(1), VertexId(3), VertexId(5)]);
}

// ─── BoundaryKind Tests ───────────────────────────────────────

#[test]
fn boundary_codes_roundtrip() {
    for kind in BoundaryKind::ALL {
        assert_eq!(BoundaryKind::from_code(kind.code()), Some(kind));
        assert_eq!(BoundaryKind::from_name(kind.name()), Some(kind));
    }
}

#[test]
fn boundary_wire_codes_are_stable() {
    assert_eq!(BoundaryKind::SlipWall.code(), 7);
    assert_eq!(BoundaryKind::Cyclic.code(), 9);
    assert_eq!(BoundaryKind::IsothermMove.code(), 13);
    assert_eq!(BoundaryKind::AdiabatMove.code(), 14);
    assert_eq!(BoundaryKind::AdWall.code(), 50);
    assert_eq!(BoundaryKind::from_code(8), None);
}

#[test]
fn moving_wall_kinds() {
    assert!(BoundaryKind::IsothermMove.is_moving_wall());
    assert!(BoundaryKind::AdiabatMove.is_moving_wall());
    assert!(!BoundaryKind::SlipWall.is_moving_wall());
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display_carries_context() {
    let err = SiroccoError::DegenerateElement { cell: 7, det: -1.5e-3 };
    let msg = format!("{err}");
    assert!(msg.contains('7'));
    assert!(msg.contains("-1.5"));

    let err = SiroccoError::SolverNonConvergence {
        iterations: 100,
        residual: 1.0e-3,
        tolerance: 1.0e-6,
    };
    assert!(format!("{err}").contains("100"));
}
