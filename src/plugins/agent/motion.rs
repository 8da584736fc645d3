//! Pointer-following motion.

use bevy::prelude::*;

use crate::common::tunables::Tunables;

use super::bounds::clamp_to_view;
use super::components::{
    Agent, AgentParts, AgentState, AnimFlags, BodyExtents, BodySprite, Facing, HandAnchors,
    Locomotion,
};
use super::input::{CameraBounds, PointerTarget};
use super::messages::Notices;
use super::orientation::{facing_flip, flip_parts};
use super::scale::AgentScale;

/// Advance the agent toward the pointer while the movement flag is set.
///
/// Per frame: flip facing if warranted, step along the direction from the hand to
/// the pointer, keep the body on screen, and stop once the hand has arrived.
pub fn move_agent(
    time: Res<Time>,
    tunables: Res<Tunables>,
    bounds: Res<CameraBounds>,
    target: Res<PointerTarget>,
    mut notices: Notices,
    mut q_agent: Query<
        (
            &mut Transform,
            &mut Locomotion,
            &mut Facing,
            &mut AnimFlags,
            &AgentState,
            &AgentScale,
            &HandAnchors,
            &BodyExtents,
            &AgentParts,
        ),
        With<Agent>,
    >,
    mut q_parts: Query<&mut Transform, Without<Agent>>,
    mut q_body_sprite: Query<&mut Sprite, With<BodySprite>>,
) {
    let Some(pointer) = target.0 else {
        return;
    };
    let Ok((mut tf, mut loco, mut facing, mut flags, state, scale, anchors, extents, parts)) =
        q_agent.single_mut()
    else {
        return;
    };
    if !loco.moving || *state != AgentState::Normal {
        return;
    }

    let direction = pointer.world - hand_of(&tf, scale.0, parts.hand, &q_parts);

    if let Some(right) = facing_flip(facing.right, direction.x, tunables.flip_deadzone, scale.0) {
        flip_parts(right, anchors, parts, &mut q_parts, &mut q_body_sprite);
        facing.right = right;
    }

    let step = direction.normalize_or_zero() * loco.speed * time.delta_secs();
    let mut pos = tf.translation.truncate() + step;
    if let Some(view) = bounds.0 {
        pos = clamp_to_view(pos, extents.half_size * scale.0, extents.insets, view);
    }
    tf.translation.x = pos.x;
    tf.translation.y = pos.y;

    if pointer.world.distance(hand_of(&tf, scale.0, parts.hand, &q_parts)) <= tunables.arrive_distance {
        debug!("agent arrived at pointer");
        notices.set_moving(&mut loco, &mut flags, false);
    }
}

/// World position of a hand anchor that sits under the scale carrier.
///
/// Uses `AgentScale` rather than the carrier transform, which is only synced at
/// the end of the frame.
#[inline]
pub fn hand_world(root: &Transform, scale: f32, hand_local: Vec3) -> Vec2 {
    root.transform_point(hand_local * Vec3::new(scale, scale, 1.0)).truncate()
}

fn hand_of(root: &Transform, scale: f32, hand: Entity, q_parts: &Query<&mut Transform, Without<Agent>>) -> Vec2 {
    q_parts
        .get(hand)
        .map(|hand_tf| hand_world(root, scale, hand_tf.translation))
        .unwrap_or(root.translation.truncate())
}
