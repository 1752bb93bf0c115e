//! Edit Session
//!
//! The explicit editing context: owns the configuration, camera, voxel grid,
//! the optional sculpt target and the sculpt engine, and routes pointer
//! events to whichever tool is active. Nothing here is global; a viewport
//! creates one session and drives it from its input callbacks.

use glam::{Mat4, Vec3};

use crate::camera::{Camera, Ray, ray_plane_y};
use crate::config::EditorConfig;
use crate::input::{EditTool, Modifiers, PointerEvent};
use crate::mesh::Mesh;
use crate::sculpt::{BrushSettings, SampleOutcome, SculptEngine, SculptTarget};
use crate::voxel::{
    VoxelCoord, VoxelEvent, VoxelGrid, VoxelizeCommand, VoxelizeEvent, VoxelizeWorker, Voxelizer,
};

/// What a pointer event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing changed.
    None,
    VoxelAdded(VoxelCoord),
    VoxelRemoved(VoxelCoord),
    Sculpt(SampleOutcome),
    StrokeEnded,
}

pub struct EditSession {
    config: EditorConfig,
    camera: Camera,
    grid: VoxelGrid,
    target: Option<SculptTarget>,
    sculpt: SculptEngine,
    tool: EditTool,
    worker: Option<VoxelizeWorker>,
    /// Generation of the newest voxelization request
    generation: u64,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            camera: Camera::from_config(&config.camera),
            grid: VoxelGrid::with_cell_size(config.voxel.cell_size),
            target: None,
            sculpt: SculptEngine::new(BrushSettings::from(&config.brush)),
            tool: EditTool::default(),
            worker: None,
            generation: 0,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Viewport navigation writes the pose here before pointer events are fed in.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut VoxelGrid {
        &mut self.grid
    }

    pub fn tool(&self) -> EditTool {
        self.tool
    }

    /// Switch tools. Any running stroke ends.
    pub fn set_tool(&mut self, tool: EditTool) {
        if tool != self.tool {
            self.sculpt.end_stroke();
            log::debug!("tool -> {:?}", tool);
            self.tool = tool;
        }
    }

    pub fn brush(&self) -> BrushSettings {
        self.sculpt.settings
    }

    pub fn set_brush(&mut self, settings: BrushSettings) {
        self.sculpt.settings = settings;
    }

    pub fn sculpt(&self) -> &SculptEngine {
        &self.sculpt
    }

    // ------------------------------------------------------------------------
    // Mesh binding
    // ------------------------------------------------------------------------

    /// Bind `mesh` as the sculpt and voxelize target, replacing any previous one.
    pub fn bind_mesh(&mut self, mesh: Mesh, transform: Mat4) {
        self.sculpt.end_stroke();
        self.sculpt.clear_dirty();
        log::info!(
            "bound mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        self.target = Some(SculptTarget::new(mesh, transform));
    }

    /// Release the bound mesh.
    pub fn unbind_mesh(&mut self) -> Option<Mesh> {
        self.sculpt.end_stroke();
        self.sculpt.clear_dirty();
        self.target.take().map(SculptTarget::into_mesh)
    }

    pub fn target(&self) -> Option<&SculptTarget> {
        self.target.as_ref()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.target.as_ref().map(SculptTarget::mesh)
    }

    // ------------------------------------------------------------------------
    // Pointer routing
    // ------------------------------------------------------------------------

    pub fn handle_pointer(&mut self, event: PointerEvent) -> EditOutcome {
        match (self.tool, event) {
            (EditTool::Voxel, PointerEvent::Down { ndc, modifiers }) => {
                let ray = self.camera.ray_from_ndc(ndc);
                self.click_voxel(&ray, modifiers)
            }
            (EditTool::Voxel, _) => EditOutcome::None,
            (EditTool::Sculpt, PointerEvent::Down { ndc, .. }) => {
                let ray = self.camera.ray_from_ndc(ndc);
                EditOutcome::Sculpt(self.sculpt.begin_stroke(self.target.as_mut(), &ray))
            }
            (EditTool::Sculpt, PointerEvent::Move { ndc }) => {
                if !self.sculpt.is_active() {
                    return EditOutcome::None;
                }
                let ray = self.camera.ray_from_ndc(ndc);
                EditOutcome::Sculpt(self.sculpt.sample(self.target.as_mut(), &ray))
            }
            (EditTool::Sculpt, PointerEvent::Up) => {
                if self.sculpt.end_stroke() {
                    EditOutcome::StrokeEnded
                } else {
                    EditOutcome::None
                }
            }
        }
    }

    /// Voxel click along `ray`: remove the hit voxel when a removing modifier
    /// is held, otherwise add the neighbor across the hit face. With nothing
    /// hit, a non-removing click may land on the ground plane.
    pub fn click_voxel(&mut self, ray: &Ray, modifiers: Modifiers) -> EditOutcome {
        if !ray.is_valid() {
            return EditOutcome::None;
        }
        let max_dist = self.config.voxel.max_ray_distance;

        if let Some(hit) = self.grid.raycast(ray.origin, ray.direction, max_dist) {
            if modifiers.removes() {
                return match self.grid.remove(hit.coord) {
                    Some(_) => EditOutcome::VoxelRemoved(hit.coord),
                    None => EditOutcome::None,
                };
            }
            return match self.grid.place_from_hit(&hit) {
                Some(coord) if self.grid.add(coord) => EditOutcome::VoxelAdded(coord),
                _ => EditOutcome::None,
            };
        }

        if modifiers.removes() || !self.config.voxel.ground_plane {
            return EditOutcome::None;
        }
        self.place_on_ground(ray, max_dist)
    }

    fn place_on_ground(&mut self, ray: &Ray, max_dist: f32) -> EditOutcome {
        if ray.origin.y <= 0.0 {
            return EditOutcome::None;
        }
        let Some(t) = ray_plane_y(ray, 0.0).filter(|&t| t <= max_dist) else {
            return EditOutcome::None;
        };
        let cell = self.grid.cell_size();
        let coord = VoxelCoord::from_world(ray.at(t) + Vec3::Y * (0.5 * cell), cell);
        if self.grid.add(coord) {
            EditOutcome::VoxelAdded(coord)
        } else {
            EditOutcome::None
        }
    }

    // ------------------------------------------------------------------------
    // Voxelization
    // ------------------------------------------------------------------------

    fn voxelizer(&self) -> Option<(Voxelizer, &SculptTarget)> {
        let target = self.target.as_ref()?;
        let voxelizer = Voxelizer::new(self.config.voxel.cell_size).with_transform(target.transform());
        Some((voxelizer, target))
    }

    /// Replace the grid with a voxelization of the bound mesh.
    /// Returns `false` when no mesh is bound.
    pub fn voxelize_target(&mut self) -> bool {
        let Some((voxelizer, target)) = self.voxelizer() else {
            log::debug!("voxelize requested without a bound mesh");
            return false;
        };
        let grid = voxelizer.run(target.mesh());
        // Pending background results are now stale.
        self.generation += 1;
        log::info!("voxelized bound mesh into {} voxels", grid.len());
        self.grid.replace_with(grid);
        true
    }

    /// Start voxelizing the bound mesh on the worker thread. The result is
    /// applied by [`poll_voxelize`](Self::poll_voxelize).
    pub fn voxelize_target_async(&mut self) -> std::io::Result<bool> {
        let Some((voxelizer, target)) = self.voxelizer() else {
            return Ok(false);
        };
        let mesh = target.mesh().clone();
        if self.worker.is_none() {
            self.worker = Some(VoxelizeWorker::spawn()?);
        }
        self.generation += 1;
        let generation = self.generation;
        let sent = self.worker.as_ref().is_some_and(|worker| {
            worker.send(VoxelizeCommand::Voxelize {
                mesh,
                voxelizer,
                generation,
            })
        });
        if !sent {
            log::warn!("voxelize worker disconnected; restarting on next request");
            self.worker = None;
        }
        Ok(sent)
    }

    /// Apply the newest finished background voxelization, if any.
    /// Results from superseded requests are dropped.
    pub fn poll_voxelize(&mut self) -> bool {
        let Some(worker) = self.worker.as_ref() else {
            return false;
        };
        let mut newest = None;
        while let Some(VoxelizeEvent::Finished { generation, grid }) = worker.try_recv() {
            if generation == self.generation {
                newest = Some(grid);
            } else {
                log::debug!("dropping stale voxelization {generation}");
            }
        }
        match newest {
            Some(grid) => {
                log::info!("applied background voxelization: {} voxels", grid.len());
                self.grid.replace_with(grid);
                true
            }
            None => false,
        }
    }

    /// Block until the newest background voxelization lands.
    pub fn wait_voxelize(&mut self) -> bool {
        loop {
            let Some(worker) = self.worker.as_ref() else {
                return false;
            };
            match worker.recv() {
                Some(VoxelizeEvent::Finished { generation, grid }) if generation == self.generation => {
                    self.grid.replace_with(grid);
                    return true;
                }
                Some(_) => continue,
                None => {
                    log::warn!("voxelize worker exited before finishing");
                    self.worker = None;
                    return false;
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Renderer hand-off
    // ------------------------------------------------------------------------

    pub fn drain_voxel_events(&mut self) -> Vec<VoxelEvent> {
        self.grid.drain_events()
    }

    pub fn take_dirty_vertices(&mut self) -> Vec<u32> {
        self.sculpt.take_dirty_vertices()
    }

    pub fn clear_voxels(&mut self) {
        self.grid.clear();
    }
}
