//! Pointer Input
//!
//! Turns raw window pointer callbacks into the three editor signals: down,
//! move and up. Decoupled from any windowing system; pixel coordinates come in
//! with a top-left origin and leave as normalized device coordinates.

use glam::Vec2;

use crate::camera::ndc_from_screen;

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

/// State of keyboard modifier keys at the time of a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modifiers with only shift held.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }

    /// Whether a voxel click should remove instead of add.
    pub fn removes(&self) -> bool {
        self.shift || self.ctrl
    }
}

/// Editor pointer signal in normalized device coordinates (x right, y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { ndc: Vec2, modifiers: Modifiers },
    Move { ndc: Vec2 },
    Up,
}

/// Tracks the primary button and viewport size to produce [`PointerEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    width: u32,
    height: u32,
    /// Last pointer position in pixels
    position: Option<Vec2>,
    pressed: bool,
}

impl PointerTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Current pointer position in NDC, if known and the viewport is non-empty.
    pub fn ndc(&self) -> Option<Vec2> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let p = self.position?;
        Some(ndc_from_screen(p.x, p.y, self.width as f32, self.height as f32))
    }

    /// Pointer moved to pixel `(x, y)`.
    pub fn moved(&mut self, x: f32, y: f32) -> Option<PointerEvent> {
        self.position = Some(Vec2::new(x, y));
        let ndc = self.ndc()?;
        Some(PointerEvent::Move { ndc })
    }

    /// Button pressed. Only the left button edits.
    pub fn pressed(&mut self, button: MouseButton, modifiers: Modifiers) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }
        let ndc = self.ndc()?;
        self.pressed = true;
        Some(PointerEvent::Down { ndc, modifiers })
    }

    pub fn released(&mut self, button: MouseButton) -> Option<PointerEvent> {
        if button != MouseButton::Left || !self.pressed {
            return None;
        }
        self.pressed = false;
        Some(PointerEvent::Up)
    }
}
