//! Sculpt Tests - Strokes Through the Session
//!
//! Drives the brush with pointer events and a real camera, the way a viewport
//! does, and checks displacement, normals and renderer hand-off.

use glam::{Mat4, Vec2, Vec3};
use voxsculpt_engine::camera::Camera;
use voxsculpt_engine::config::EditorConfig;
use voxsculpt_engine::input::{EditTool, Modifiers, PointerEvent};
use voxsculpt_engine::mesh::{Mesh, TopologyIndex, generate_plane_grid, generate_sphere, recompute_all};
use voxsculpt_engine::sculpt::{BrushSettings, SampleOutcome};
use voxsculpt_engine::session::{EditOutcome, EditSession};

fn sculpt_session(radius: f32, strength: f32) -> EditSession {
    let mut config = EditorConfig::default();
    config.brush.radius = radius;
    config.brush.strength = strength;
    let mut session = EditSession::new(config);
    session.set_tool(EditTool::Sculpt);
    *session.camera_mut() = Camera {
        // straight down, aimed between mesh edges
        position: Vec3::new(0.13, 10.0, 0.071),
        target: Vec3::new(0.13, 0.0, 0.07),
        ..Camera::default()
    };
    session
}

fn down(ndc: Vec2) -> PointerEvent {
    PointerEvent::Down {
        ndc,
        modifiers: Modifiers::new(),
    }
}

// ============================================================================
// Strokes
// ============================================================================

#[test]
fn test_stroke_raises_plane_under_cursor() {
    let mut session = sculpt_session(1.5, 0.25);
    session.bind_mesh(generate_plane_grid(Vec3::ZERO, 8, 0.5), Mat4::IDENTITY);

    let outcome = session.handle_pointer(down(Vec2::ZERO));
    assert!(matches!(outcome, EditOutcome::Sculpt(SampleOutcome::Applied { displaced }) if displaced > 0));
    assert_eq!(session.handle_pointer(PointerEvent::Up), EditOutcome::StrokeEnded);

    let mesh = session.mesh().unwrap();
    let (lowest, highest) = mesh
        .positions()
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    assert_eq!(lowest, 0.0);
    assert!(highest > 0.2 && highest <= 0.25 + 1e-6);

    // corners are far outside the brush
    assert_eq!(mesh.positions()[0].y, 0.0);
}

#[test]
fn test_negative_strength_digs_in() {
    let mut session = sculpt_session(1.0, -0.4);
    session.bind_mesh(generate_plane_grid(Vec3::ZERO, 4, 1.0), Mat4::IDENTITY);
    session.handle_pointer(down(Vec2::ZERO));
    let center = session.mesh().unwrap().positions()[12];
    assert!(center.y < -0.3);
}

#[test]
fn test_missed_samples_keep_stroke_alive() {
    let mut session = sculpt_session(0.75, 0.1);
    session.bind_mesh(generate_plane_grid(Vec3::ZERO, 4, 1.0), Mat4::IDENTITY);

    session.handle_pointer(down(Vec2::ZERO));
    // far corner of the viewport looks past the small plane
    let outcome = session.handle_pointer(PointerEvent::Move { ndc: Vec2::new(1.0, 1.0) });
    assert_eq!(outcome, EditOutcome::Sculpt(SampleOutcome::Missed));
    assert!(session.sculpt().is_active());

    let outcome = session.handle_pointer(PointerEvent::Move { ndc: Vec2::new(0.02, 0.0) });
    assert!(matches!(outcome, EditOutcome::Sculpt(SampleOutcome::Applied { .. })));
}

#[test]
fn test_down_off_mesh_stays_idle() {
    let mut session = sculpt_session(1.0, 0.1);
    session.bind_mesh(generate_plane_grid(Vec3::ZERO, 2, 1.0), Mat4::IDENTITY);
    let outcome = session.handle_pointer(down(Vec2::new(1.0, 1.0)));
    assert_eq!(outcome, EditOutcome::Sculpt(SampleOutcome::Missed));
    assert_eq!(session.handle_pointer(PointerEvent::Move { ndc: Vec2::ZERO }), EditOutcome::None);
}

#[test]
fn test_switching_tool_ends_stroke() {
    let mut session = sculpt_session(1.0, 0.1);
    session.bind_mesh(generate_plane_grid(Vec3::ZERO, 4, 1.0), Mat4::IDENTITY);
    session.handle_pointer(down(Vec2::ZERO));
    assert!(session.sculpt().is_active());
    session.set_tool(EditTool::Voxel);
    assert!(!session.sculpt().is_active());
}

// ============================================================================
// Normals after sculpting
// ============================================================================

#[test]
fn test_stroke_normals_match_full_recompute_on_displaced_region() {
    let mut session = sculpt_session(0.8, 0.3);
    session.bind_mesh(generate_sphere(Vec3::ZERO, 2.0, 20), Mat4::IDENTITY);

    session.handle_pointer(down(Vec2::ZERO));
    session.handle_pointer(PointerEvent::Up);
    let dirty = session.take_dirty_vertices();
    assert!(!dirty.is_empty());

    let sculpted = session.mesh().unwrap().clone();
    let mut reference = sculpted.clone();
    recompute_all(&mut reference);

    // every displaced vertex was rebuilt from all of its incident faces
    for &v in &dirty {
        let a = sculpted.normals()[v as usize];
        let b = reference.normals()[v as usize];
        assert!((a - b).length() < 1e-5, "vertex {v}: {a} vs {b}");
    }

    // without the neighbor refresh, the ring just outside keeps stale normals
    let topo = TopologyIndex::build(&sculpted);
    let ring = topo.expand_one_ring(&dirty);
    let stale = ring
        .iter()
        .filter(|&&v| !dirty.contains(&v))
        .any(|&v| (sculpted.normals()[v as usize] - reference.normals()[v as usize]).length() > 1e-6);
    assert!(stale);
}

#[test]
fn test_neighbor_refresh_matches_full_recompute_everywhere() {
    let mut session = sculpt_session(0.8, 0.3);
    session.set_brush(BrushSettings {
        refresh_neighbor_normals: true,
        ..session.brush()
    });
    session.bind_mesh(generate_sphere(Vec3::ZERO, 2.0, 20), Mat4::IDENTITY);

    session.handle_pointer(down(Vec2::ZERO));
    session.handle_pointer(PointerEvent::Up);

    let sculpted: &Mesh = session.mesh().unwrap();
    let mut reference = sculpted.clone();
    recompute_all(&mut reference);
    for (i, (a, b)) in sculpted.normals().iter().zip(reference.normals()).enumerate() {
        assert!((*a - *b).length() < 1e-5, "vertex {i}: {a} vs {b}");
    }
}

#[test]
fn test_unbind_returns_sculpted_mesh() {
    let mut session = sculpt_session(1.0, 0.5);
    session.bind_mesh(generate_plane_grid(Vec3::ZERO, 4, 1.0), Mat4::IDENTITY);
    session.handle_pointer(down(Vec2::ZERO));
    let mesh = session.unbind_mesh().unwrap();
    assert!(mesh.positions()[12].y > 0.4);
    assert!(session.mesh().is_none());
    assert!(!session.sculpt().is_active());
}
