//! Hand aim, arm reach and left/right facing.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use crate::common::tunables::Tunables;

use super::components::{
    Agent, AgentParts, Aim, Arm, BodySprite, Facing, Hand, HandAnchors, HandReach,
    HandTip, Locomotion,
};
use super::input::{InputGate, PointerTarget};
use super::motion::hand_world;
use super::scale::AgentScale;

pub(super) const ARM_THICKNESS: f32 = 6.0;

/// Shortest signed difference `target - current`, wrapped to `(-PI, PI]`.
#[inline]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let d = (target - current).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

/// Critically damped approach of `current` toward `target`.
///
/// `max_speed` bounds how far the target may be from the current value
/// (`max_speed * smooth_time`), which bounds the resulting velocity. The result
/// never passes the target.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut out = clamped_target + (change + temp) * decay;

    // No overshoot.
    if (target - current > 0.0) == (out > target) {
        out = target;
        *velocity = 0.0;
    }
    out
}

/// `smooth_damp` over angles in radians, taking the short way round.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, max_speed, dt)
}

/// New facing if the horizontal offset to the pointer warrants a flip.
///
/// Inside the dead-zone (`|dx| < deadzone * scale`) facing is left alone so the
/// sprite does not flicker while the pointer hovers over the agent.
pub fn facing_flip(facing_right: bool, dx: f32, deadzone: f32, scale: f32) -> Option<bool> {
    if dx.abs() < deadzone * scale {
        return None;
    }
    let right = dx > 0.0;
    (right != facing_right).then_some(right)
}

/// Arm length in the carrier's (scaled) space, so the tip lands on the pointer
/// at any scale.
#[inline]
pub fn hand_reach(distance: f32, ratio: f32, scale: f32) -> f32 {
    distance * ratio / scale
}

/// Mirror the agent: sprite flip, hand anchor swap, collider offset negation.
pub fn flip_parts(
    right: bool,
    anchors: &HandAnchors,
    parts: &AgentParts,
    q_parts: &mut Query<&mut Transform, Without<Agent>>,
    q_body_sprite: &mut Query<&mut Sprite, With<BodySprite>>,
) {
    if let Ok(mut sprite) = q_body_sprite.get_mut(parts.body_sprite) {
        sprite.flip_x = !right;
    }
    if let Ok(mut tf) = q_parts.get_mut(parts.hand) {
        let anchor = anchors.for_facing(right);
        tf.translation.x = anchor.x;
        tf.translation.y = anchor.y;
    }
    if let Ok(mut tf) = q_parts.get_mut(parts.body_collider) {
        tf.translation.x = -tf.translation.x;
    }
}

/// Rotate the hand toward the pointer and report the arm reach.
pub fn update_view(
    time: Res<Time>,
    tunables: Res<Tunables>,
    gate: Res<InputGate>,
    target: Res<PointerTarget>,
    mut q_agent: Query<(&Transform, &Locomotion, &AgentScale, &mut Aim, &AgentParts), With<Agent>>,
    mut q_hand: Query<(&mut Transform, &mut HandReach), (With<Hand>, Without<Agent>)>,
) {
    let Some(pointer) = target.0 else {
        return;
    };
    if !gate.drives_view(pointer.screen) {
        return;
    }
    let Ok((root_tf, loco, scale, mut aim, parts)) = q_agent.single_mut() else {
        return;
    };
    let Ok((mut hand_tf, mut reach)) = q_hand.get_mut(parts.hand) else {
        return;
    };

    let direction = pointer.world - hand_world(root_tf, scale.0, hand_tf.translation);

    let target_angle = direction.y.atan2(direction.x);
    let mut velocity = aim.velocity;
    aim.angle = smooth_damp_angle(
        aim.angle,
        target_angle,
        &mut velocity,
        tunables.turn_smooth_time,
        loco.turn_rate,
        time.delta_secs(),
    );
    aim.velocity = velocity;
    hand_tf.rotation = Quat::from_rotation_z(aim.angle);

    reach.0 = hand_reach(direction.length(), tunables.hand_reach_ratio, scale.0);
}

/// Stretch the arm sprite and move the hand tip collider to the reported reach.
pub fn stretch_arm(
    q_hand: Query<&HandReach, (With<Hand>, Changed<HandReach>)>,
    q_agent: Query<&AgentParts, With<Agent>>,
    mut q_arm: Query<(&mut Transform, &mut Sprite), (With<Arm>, Without<HandTip>)>,
    mut q_tip: Query<&mut Transform, (With<HandTip>, Without<Arm>)>,
) {
    for parts in &q_agent {
        let Ok(reach) = q_hand.get(parts.hand) else {
            continue;
        };
        if let Ok((mut tf, mut sprite)) = q_arm.get_mut(parts.arm) {
            tf.translation.x = reach.0 * 0.5;
            sprite.custom_size = Some(Vec2::new(reach.0, ARM_THICKNESS));
        }
        if let Ok(mut tf) = q_tip.get_mut(parts.hand_tip) {
            tf.translation.x = reach.0;
        }
    }
}
