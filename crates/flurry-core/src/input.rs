//! Input events delivered to the active scene.

/// Host input translated into scene terms.
///
/// Pointer coordinates are normalized to 0.0-1.0 of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    PointerMoved { x: f32, y: f32 },
    PointerDown { x: f32, y: f32 },
    PointerUp,
    /// Jump key went down; begins charging.
    JumpPressed,
    /// Jump key came up; releases the charge.
    JumpReleased,
}
