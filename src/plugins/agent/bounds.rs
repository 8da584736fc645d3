//! Keeping the body sprite on screen.

use bevy::prelude::*;

use crate::common::tunables::BorderInsets;

/// Clamp `pos` so a body of half-size `half` centered on it stays inside `view`.
///
/// Each inset lets that edge of the sprite (transparent trim) hang past the view
/// edge by the inset amount. Axes are independent; per axis only one edge can be
/// violated, which requires the trimmed body to be smaller than the view.
pub fn clamp_to_view(pos: Vec2, half: Vec2, insets: BorderInsets, view: Rect) -> Vec2 {
    debug_assert!(
        2.0 * half.x - insets.left - insets.right < view.width(),
        "agent wider than the viewport"
    );
    debug_assert!(
        2.0 * half.y - insets.bottom - insets.top < view.height(),
        "agent taller than the viewport"
    );

    let min = pos - half;
    let max = pos + half;
    let mut out = pos;

    if max.x > view.max.x + insets.right {
        out.x = view.max.x - half.x + insets.right;
    } else if min.x + insets.left < view.min.x {
        out.x = view.min.x + half.x - insets.left;
    }

    if max.y > view.max.y + insets.top {
        out.y = view.max.y - half.y + insets.top;
    } else if min.y + insets.bottom < view.min.y {
        out.y = view.min.y + half.y - insets.bottom;
    }

    out
}
