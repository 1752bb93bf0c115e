//! Voxsculpt - Headless Editing Demo
//!
//! Drives an edit session the way a viewport would: binds a sphere, runs a
//! short sculpt stroke through pointer events, voxelizes the result on the
//! worker thread and writes the exports.
//!
//! Run with: `cargo run --bin voxsculpt -- [--config PATH] [--out DIR]`
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use glam::{Mat4, Vec2, Vec3};

use voxsculpt_engine::config::EditorConfig;
use voxsculpt_engine::export::{geometry_from_grid, write_mesh_obj, write_voxels_obj};
use voxsculpt_engine::input::{EditTool, Modifiers, PointerEvent};
use voxsculpt_engine::mesh::generate_sphere;
use voxsculpt_engine::sculpt::SampleOutcome;
use voxsculpt_engine::session::{EditOutcome, EditSession};

struct Args {
    config: Option<PathBuf>,
    out: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        out: PathBuf::from("."),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--out" => {
                let dir = iter.next().ok_or("--out needs a directory")?;
                args.out = PathBuf::from(dir);
            }
            "-h" | "--help" => {
                return Err("usage: voxsculpt [--config PATH] [--out DIR]".to_string());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let mut session = EditSession::new(config);

    session.bind_mesh(generate_sphere(Vec3::ZERO, 2.0, 24), Mat4::IDENTITY);
    session.set_tool(EditTool::Sculpt);

    // Drag across the front of the sphere.
    let mut applied = 0;
    let down = PointerEvent::Down {
        ndc: Vec2::ZERO,
        modifiers: Modifiers::new(),
    };
    let moves = (1..=8).map(|i| PointerEvent::Move {
        ndc: Vec2::new(i as f32 * 0.02, i as f32 * 0.01),
    });
    for event in std::iter::once(down).chain(moves).chain(std::iter::once(PointerEvent::Up)) {
        if let EditOutcome::Sculpt(SampleOutcome::Applied { .. }) = session.handle_pointer(event) {
            applied += 1;
        }
    }
    let dirty = session.take_dirty_vertices();
    log::info!("stroke applied {applied} samples, {} vertices to re-upload", dirty.len());

    if session.voxelize_target_async()? && !session.wait_voxelize() {
        log::warn!("background voxelization failed, running inline");
        session.voxelize_target();
    }
    let events = session.drain_voxel_events();
    log::info!("grid holds {} voxels ({} renderer events)", session.grid().len(), events.len());

    std::fs::create_dir_all(&args.out)?;

    let voxels_path = args.out.join("voxels.obj");
    write_voxels_obj(session.grid(), BufWriter::new(File::create(&voxels_path)?))?;
    log::info!("wrote {}", voxels_path.display());

    if let Some(mesh) = session.mesh() {
        let mesh_path = args.out.join("mesh.obj");
        write_mesh_obj(mesh, BufWriter::new(File::create(&mesh_path)?))?;
        log::info!("wrote {}", mesh_path.display());
    }

    let geometry_path = args.out.join("geometry.json");
    let json = geometry_from_grid(session.grid(), "voxsculpt")?.to_json_string()?;
    std::fs::write(&geometry_path, json)?;
    log::info!("wrote {}", geometry_path.display());

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
