//! Voxel Tests - Grid Editing, Picking and Voxelization
//!
//! End-to-end checks through the public API: pointer clicks resolved against
//! the grid, and meshes voxelized into it.

use glam::{Mat4, Vec2, Vec3};
use voxsculpt_engine::camera::{Camera, Ray};
use voxsculpt_engine::config::EditorConfig;
use voxsculpt_engine::input::{Modifiers, PointerEvent};
use voxsculpt_engine::mesh::{Mesh, generate_box, generate_sphere};
use voxsculpt_engine::session::{EditOutcome, EditSession};
use voxsculpt_engine::voxel::{VoxelCoord, VoxelEvent, VoxelGrid, VoxelizeCommand, VoxelizeEvent, VoxelizeWorker, Voxelizer, voxelize};

fn camera_looking(from: Vec3, at: Vec3) -> Camera {
    Camera {
        position: from,
        target: at,
        ..Camera::default()
    }
}

fn click(ndc: Vec2, modifiers: Modifiers) -> PointerEvent {
    PointerEvent::Down { ndc, modifiers }
}

// ============================================================================
// Pointer editing
// ============================================================================

#[test]
fn test_click_on_plus_x_face_adds_neighbor() {
    let mut session = EditSession::default();
    session.grid_mut().add(VoxelCoord::new(0, 0, 0));
    *session.camera_mut() = camera_looking(Vec3::new(6.0, 0.5, 0.5), Vec3::new(0.0, 0.5, 0.5));

    let outcome = session.handle_pointer(click(Vec2::ZERO, Modifiers::new()));
    assert_eq!(outcome, EditOutcome::VoxelAdded(VoxelCoord::new(1, 0, 0)));
    assert!(session.grid().contains(VoxelCoord::new(0, 0, 0)));
    assert_eq!(session.grid().len(), 2);
}

#[test]
fn test_repeated_clicks_grow_a_column_toward_camera() {
    let mut session = EditSession::default();
    session.grid_mut().add(VoxelCoord::new(0, 0, 0));
    *session.camera_mut() = camera_looking(Vec3::new(0.5, 0.5, 10.0), Vec3::new(0.5, 0.5, 0.0));

    for z in 1..=3 {
        let outcome = session.handle_pointer(click(Vec2::ZERO, Modifiers::new()));
        assert_eq!(outcome, EditOutcome::VoxelAdded(VoxelCoord::new(0, 0, z)));
    }
}

#[test]
fn test_modifier_click_removes_owner_of_hit_face() {
    let mut session = EditSession::default();
    session.grid_mut().add(VoxelCoord::new(0, 0, 0));
    session.grid_mut().add(VoxelCoord::new(0, 1, 0));
    *session.camera_mut() = camera_looking(Vec3::new(0.5, 8.0, 0.5), Vec3::new(0.5, 0.0, 0.5));
    session.drain_voxel_events();

    let outcome = session.handle_pointer(click(Vec2::ZERO, Modifiers::shift()));
    assert_eq!(outcome, EditOutcome::VoxelRemoved(VoxelCoord::new(0, 1, 0)));
    assert_eq!(
        session.drain_voxel_events(),
        vec![VoxelEvent::Dematerialize {
            coord: VoxelCoord::new(0, 1, 0)
        }]
    );
}

#[test]
fn test_click_into_empty_sky_is_noop() {
    let mut session = EditSession::default();
    *session.camera_mut() = camera_looking(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 10.0, 0.0));
    let outcome = session.handle_pointer(click(Vec2::ZERO, Modifiers::new()));
    assert_eq!(outcome, EditOutcome::None);
    assert!(session.grid().is_empty());
}

#[test]
fn test_click_with_unvalidated_huge_ray_distance() {
    let mut config = EditorConfig::default();
    config.voxel.max_ray_distance = 1e30;
    let mut session = EditSession::new(config);
    session.grid_mut().add(VoxelCoord::new(0, 0, 0));
    let down = Ray::new(Vec3::new(0.5, 5.0, 0.5), Vec3::NEG_Y);

    let outcome = session.click_voxel(&down, Modifiers::new());
    assert_eq!(outcome, EditOutcome::VoxelAdded(VoxelCoord::new(0, 1, 0)));

    // empty sky: the traversal gives up without reaching the distance
    let up = Ray::new(Vec3::new(0.5, 5.0, 0.5), Vec3::Y);
    assert_eq!(session.click_voxel(&up, Modifiers::new()), EditOutcome::None);
}

#[test]
fn test_move_and_up_do_nothing_in_voxel_mode() {
    let mut session = EditSession::default();
    assert_eq!(session.handle_pointer(PointerEvent::Move { ndc: Vec2::ZERO }), EditOutcome::None);
    assert_eq!(session.handle_pointer(PointerEvent::Up), EditOutcome::None);
}

// ============================================================================
// Grid ray traversal
// ============================================================================

#[test]
fn test_raycast_reports_nearest_of_several() {
    let mut grid = VoxelGrid::new();
    grid.add(VoxelCoord::new(0, 0, -5));
    grid.add(VoxelCoord::new(0, 0, -2));
    let ray = Ray::new(Vec3::new(0.5, 0.5, 3.0), Vec3::NEG_Z);
    let hit = grid.raycast(ray.origin, ray.direction, 100.0).unwrap();
    assert_eq!(hit.coord, VoxelCoord::new(0, 0, -2));
    assert_eq!(hit.normal, glam::IVec3::Z);
    assert!((hit.distance - 4.0).abs() < 1e-5);
}

#[test]
fn test_raycast_diagonal() {
    let mut grid = VoxelGrid::new();
    grid.add(VoxelCoord::new(3, 3, 3));
    let hit = grid
        .raycast(Vec3::splat(0.5), Vec3::ONE, 20.0)
        .expect("diagonal ray should reach (3,3,3)");
    assert_eq!(hit.coord, VoxelCoord::new(3, 3, 3));
}

// ============================================================================
// Voxelization
// ============================================================================

#[test]
fn test_voxelize_zero_triangles_is_empty() {
    assert!(voxelize(&Mesh::new(), 1.0).is_empty());
}

#[test]
fn test_voxelize_filled_unit_cube() {
    let grid = voxelize(&generate_box(Vec3::splat(0.5), Vec3::splat(0.5)), 1.0);
    assert_eq!(grid.sorted_coords(), vec![VoxelCoord::new(0, 0, 0)]);
}

#[test]
fn test_voxelize_sphere_is_symmetric_and_bounded() {
    let grid = voxelize(&generate_sphere(Vec3::ZERO, 3.0, 16), 1.0);
    assert!(!grid.is_empty());
    for (c, _) in grid.values() {
        assert!((-3..3).contains(&c.x) && (-3..3).contains(&c.y) && (-3..3).contains(&c.z));
    }
    // poles sit in the top and bottom cells
    assert!(grid.contains(VoxelCoord::new(0, 2, 0)));
    assert!(grid.contains(VoxelCoord::new(-1, -3, -1)));
}

#[test]
fn test_session_voxelize_respects_placement() {
    let mut session = EditSession::default();
    session.bind_mesh(
        generate_box(Vec3::splat(0.5), Vec3::splat(0.5)),
        Mat4::from_translation(Vec3::new(-4.0, 2.0, 0.0)),
    );
    assert!(session.voxelize_target());
    assert_eq!(session.grid().sorted_coords(), vec![VoxelCoord::new(-4, 2, 0)]);
}

#[test]
fn test_background_voxelize_applies_newest_only() {
    let mut session = EditSession::default();
    session.bind_mesh(generate_box(Vec3::splat(0.5), Vec3::splat(0.5)), Mat4::IDENTITY);
    assert!(session.voxelize_target_async().unwrap());
    assert!(session.voxelize_target_async().unwrap());
    assert!(session.wait_voxelize());
    assert_eq!(session.grid().len(), 1);
    // the superseded result is discarded
    assert!(!session.poll_voxelize());
}

#[test]
fn test_worker_direct_use() {
    let worker = VoxelizeWorker::spawn().unwrap();
    let mesh = generate_box(Vec3::ONE, Vec3::ONE);
    worker.send(VoxelizeCommand::Voxelize {
        mesh,
        voxelizer: Voxelizer::new(2.0),
        generation: 1,
    });
    let Some(VoxelizeEvent::Finished { grid, .. }) = worker.recv() else {
        panic!("no result");
    };
    assert_eq!(grid.sorted_coords(), vec![VoxelCoord::new(0, 0, 0)]);
}
