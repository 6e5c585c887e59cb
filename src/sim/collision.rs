//! Exit detection
//!
//! A balloon pops once it has fully left the layer sideways, dipped to the
//! ground, or cleared the top by its own height. Bounds are inclusive.

use glam::Vec2;

/// Which edge the balloon left through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitEdge {
    Left,
    Right,
    Bottom,
    Top,
}

/// Check whether a balloon at `pos` with `size` has left a `layer`
pub fn check_exit(pos: Vec2, size: Vec2, layer: Vec2) -> Option<ExitEdge> {
    if pos.x <= -size.x {
        Some(ExitEdge::Left)
    } else if pos.x >= layer.x + size.x {
        Some(ExitEdge::Right)
    } else if pos.y <= 0.0 {
        Some(ExitEdge::Bottom)
    } else if pos.y >= layer.y + size.y {
        Some(ExitEdge::Top)
    } else {
        None
    }
}
