//! Background voxelization.
//!
//! Runs [`Voxelizer::run`] on its own thread so a large lattice never stalls
//! input handling. Results come back tagged with the request generation; the
//! caller applies only the newest one with [`VoxelGrid::replace_with`].

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::grid::VoxelGrid;
use super::voxelizer::Voxelizer;
use crate::mesh::Mesh;

pub enum VoxelizeCommand {
    Voxelize {
        mesh: Mesh,
        voxelizer: Voxelizer,
        generation: u64,
    },
    Shutdown,
}

pub enum VoxelizeEvent {
    Finished { generation: u64, grid: VoxelGrid },
}

pub struct VoxelizeWorker {
    tx_cmd: Sender<VoxelizeCommand>,
    rx_evt: Receiver<VoxelizeEvent>,
    thread: Option<JoinHandle<()>>,
}

impl VoxelizeWorker {
    pub fn spawn() -> std::io::Result<Self> {
        let (tx_cmd, rx_cmd) = mpsc::channel::<VoxelizeCommand>();
        let (tx_evt, rx_evt) = mpsc::channel::<VoxelizeEvent>();

        let thread = thread::Builder::new()
            .name("voxelize-worker".to_string())
            .spawn(move || worker_loop(rx_cmd, tx_evt))?;

        Ok(Self {
            tx_cmd,
            rx_evt,
            thread: Some(thread),
        })
    }

    /// Queue a job. Returns `false` if the worker thread is gone.
    pub fn send(&self, cmd: VoxelizeCommand) -> bool {
        self.tx_cmd.send(cmd).is_ok()
    }

    pub fn try_recv(&self) -> Option<VoxelizeEvent> {
        self.rx_evt.try_recv().ok()
    }

    /// Block until the next result arrives or the worker exits.
    pub fn recv(&self) -> Option<VoxelizeEvent> {
        self.rx_evt.recv().ok()
    }
}

impl Drop for VoxelizeWorker {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(VoxelizeCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn worker_loop(rx_cmd: Receiver<VoxelizeCommand>, tx_evt: Sender<VoxelizeEvent>) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Some(cores) = core_affinity::get_core_ids()
            && cores.len() > 1
        {
            let _ = core_affinity::set_for_current(cores[cores.len() - 1]);
        }
    }

    while let Ok(cmd) = rx_cmd.recv() {
        match cmd {
            VoxelizeCommand::Voxelize {
                mesh,
                voxelizer,
                generation,
            } => {
                let grid = voxelizer.run(&mesh);
                if tx_evt.send(VoxelizeEvent::Finished { generation, grid }).is_err() {
                    break;
                }
            }
            VoxelizeCommand::Shutdown => break,
        }
    }
}
