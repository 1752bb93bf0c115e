//! Input Module
//!
//! Platform-agnostic pointer input for the editor, plus the active tool
//! selection. Windowing code feeds pixel positions and button changes into a
//! [`PointerTracker`] and forwards the resulting [`PointerEvent`]s to the
//! session.
//!
//! # Example
//!
//! ```rust,ignore
//! use voxsculpt_engine::input::{Modifiers, MouseButton, PointerTracker};
//!
//! let mut tracker = PointerTracker::new(1280, 720);
//! tracker.moved(640.0, 360.0);
//! if let Some(event) = tracker.pressed(MouseButton::Left, Modifiers::new()) {
//!     session.handle_pointer(event);
//! }
//! ```

pub mod pointer;

pub use pointer::{Modifiers, MouseButton, PointerEvent, PointerTracker};

/// Which editor the pointer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditTool {
    /// Click to add voxels, modifier-click to remove
    #[default]
    Voxel,
    /// Drag to push the mesh surface
    Sculpt,
}

impl EditTool {
    /// Keyboard shortcut label for UI display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Voxel => "1: Voxel",
            Self::Sculpt => "2: Sculpt",
        }
    }

    /// Return all tool variants in order
    pub fn all() -> [EditTool; 2] {
        [Self::Voxel, Self::Sculpt]
    }
}
