//! Pointer sampling and the press/release control gesture.
//!
//! ```text
//! read_window_pointer   Window + mouse/touch  -> PointerInput, PointerGesture
//! capture_camera_bounds MainCamera            -> CameraBounds (once)
//! sample_pointer        PointerInput + bounds -> PointerTarget
//! apply_control         PointerGesture        -> Locomotion.moving
//! ```
//!
//! Headless apps have no window or camera; tests write `PointerInput`,
//! `CameraBounds` and `PointerGesture` directly.

use bevy::prelude::*;

use crate::plugins::camera::MainCamera;

use super::components::{Agent, AgentState, AnimFlags, Locomotion};
use super::messages::{Notices, PointerGesture};

/// Raw pointer in screen space (origin top-left, y down).
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PointerInput {
    pub screen: Option<Vec2>,
    pub viewport: Vec2,
}

/// World-space rectangle covered by the main camera (`min` = LB, `max` = RT).
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CameraBounds(pub Option<Rect>);

/// This frame's pointer, clamped to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPointer {
    pub screen: Vec2,
    pub world: Vec2,
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PointerTarget(pub Option<SampledPointer>);

/// Decides whether the pointer may drive the agent this frame.
///
/// Chosen once at startup for the input modality in use.
#[derive(Resource, Debug, Clone, Default)]
pub enum InputGate {
    /// Mouse: the pointer always drives movement and aim.
    #[default]
    Desktop,
    /// Touch: UI regions swallow the pointer, and movement also needs
    /// the player to have switched into move mode.
    Touch { move_mode: bool, ui_rects: Vec<Rect> },
}

impl InputGate {
    fn over_ui(&self, screen: Vec2) -> bool {
        match self {
            Self::Desktop => false,
            Self::Touch { ui_rects, .. } => ui_rects.iter().any(|r| r.contains(screen)),
        }
    }

    pub fn drives_movement(&self, screen: Vec2) -> bool {
        match self {
            Self::Desktop => true,
            Self::Touch { move_mode, .. } => *move_mode && !self.over_ui(screen),
        }
    }

    pub fn drives_view(&self, screen: Vec2) -> bool {
        !self.over_ui(screen)
    }
}

#[inline]
pub fn clamp_to_screen(p: Vec2, viewport: Vec2) -> Vec2 {
    p.clamp(Vec2::ZERO, viewport.max(Vec2::ZERO))
}

/// Map a (clamped) screen point onto the camera's world rectangle.
pub fn screen_to_world(p: Vec2, viewport: Vec2, bounds: Rect) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return bounds.center();
    }
    let t = p / viewport;
    Vec2::new(
        bounds.min.x + t.x * bounds.width(),
        bounds.max.y - t.y * bounds.height(),
    )
}

pub fn read_window_pointer(
    windows: Query<&Window>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    mut pointer: ResMut<PointerInput>,
    mut gestures: MessageWriter<PointerGesture>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    pointer.viewport = Vec2::new(window.width(), window.height());

    let touch_pos = touches.as_ref().and_then(|t| t.first_pressed_position());
    if let Some(p) = window.cursor_position().or(touch_pos) {
        pointer.screen = Some(p);
    }

    let pressed = buttons.as_ref().is_some_and(|b| b.just_pressed(MouseButton::Left))
        || touches.as_ref().is_some_and(|t| t.any_just_pressed());
    let released = buttons.as_ref().is_some_and(|b| b.just_released(MouseButton::Left))
        || touches.as_ref().is_some_and(|t| t.any_just_released());

    if pressed {
        gestures.write(PointerGesture::Press);
    } else if released {
        gestures.write(PointerGesture::Release);
    }
}

/// Cache the camera's world rectangle the first time the camera can answer.
pub fn capture_camera_bounds(
    mut bounds: ResMut<CameraBounds>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    if bounds.0.is_some() {
        return;
    }

    let Ok((camera, camera_tf)) = q_camera.single() else {
        return;
    };
    let Some(size) = camera.logical_viewport_size() else {
        return;
    };

    let lb = camera.viewport_to_world_2d(camera_tf, Vec2::new(0.0, size.y));
    let rt = camera.viewport_to_world_2d(camera_tf, Vec2::new(size.x, 0.0));
    match (lb, rt) {
        (Ok(lb), Ok(rt)) => {
            debug!("camera bounds captured: LB={lb:?} RT={rt:?}");
            bounds.0 = Some(Rect::from_corners(lb, rt));
        }
        (Err(e), _) | (_, Err(e)) => debug!("viewport_to_world_2d failed: {e:?}"),
    }
}

pub fn sample_pointer(
    pointer: Res<PointerInput>,
    bounds: Res<CameraBounds>,
    mut target: ResMut<PointerTarget>,
) {
    target.0 = match (pointer.screen, bounds.0) {
        (Some(raw), Some(rect)) => {
            let screen = clamp_to_screen(raw, pointer.viewport);
            Some(SampledPointer {
                screen,
                world: screen_to_world(screen, pointer.viewport, rect),
            })
        }
        _ => None,
    };
}

/// Start moving on press, stop on release. Inert while the agent is stopped.
pub fn apply_control(
    gate: Res<InputGate>,
    target: Res<PointerTarget>,
    mut gestures: MessageReader<PointerGesture>,
    mut notices: Notices,
    mut q_agent: Query<(&AgentState, &mut Locomotion, &mut AnimFlags), With<Agent>>,
) {
    let Ok((state, mut loco, mut flags)) = q_agent.single_mut() else {
        gestures.clear();
        return;
    };
    if *state == AgentState::Stopped {
        gestures.clear();
        return;
    }

    let allowed = target.0.is_none_or(|p| gate.drives_movement(p.screen));
    for gesture in gestures.read() {
        if !allowed {
            continue;
        }
        let moving = matches!(gesture, PointerGesture::Press);
        notices.set_moving(&mut loco, &mut flags, moving);
    }
}
