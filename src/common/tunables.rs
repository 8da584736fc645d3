//! Tunable gameplay constants.
//!
//! Values are authored in meters (and seconds) and stored in world units,
//! i.e. already multiplied by `pixels_per_meter`.

use bevy::prelude::*;

const PIXELS_PER_METER: f32 = 100.0;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,

    // Motion / orientation
    pub base_speed: f32,
    /// Max turn rate in radians per second.
    pub base_turn_rate: f32,
    pub turn_smooth_time: f32,
    pub arrive_distance: f32,
    /// Facing flips only past `flip_deadzone * scale`.
    pub flip_deadzone: f32,
    pub hand_reach_ratio: f32,

    // Health
    pub max_health: i32,
    pub hit_cooldown: f32,

    // Fever
    pub fever_time: f32,
    pub fever_extend: f32,
    pub fever_extend_last_stage: f32,
    pub fever_speed_ratio: f32,
    pub fever_scale: f32,

    // Scale
    pub initial_scale: f32,
    pub grow_step: f32,
    pub grow_delay: f32,

    // Body geometry at scale 1.
    pub body_half_size: Vec2,
    pub body_insets: BorderInsets,
    pub body_collider_radius: f32,
    pub body_collider_offset: Vec2,

    // Hand anchors in agent-local space.
    pub hand_anchor_right: Vec2,
    pub hand_anchor_left: Vec2,
    pub hand_tip_radius: f32,
}

/// Transparent margins around the body sprite, per edge, in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderInsets {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl BorderInsets {
    pub fn uniform(v: f32) -> Self {
        Self { left: v, bottom: v, right: v, top: v }
    }
}

impl Default for Tunables {
    fn default() -> Self {
        let m = PIXELS_PER_METER;
        Self {
            pixels_per_meter: m,

            base_speed: 5.0 * m,
            base_turn_rate: 10_000_f32.to_radians(),
            turn_smooth_time: 0.001,
            arrive_distance: 0.1 * m,
            flip_deadzone: 0.6 * m,
            hand_reach_ratio: 1.0,

            max_health: 3,
            hit_cooldown: 2.0,

            fever_time: 3.0,
            fever_extend: 0.05,
            fever_extend_last_stage: 0.005,
            fever_speed_ratio: 4.0,
            fever_scale: 4.0,

            initial_scale: 1.0,
            grow_step: 0.1,
            grow_delay: 0.5,

            body_half_size: Vec2::splat(0.5 * m),
            body_insets: BorderInsets::uniform(0.1 * m),
            body_collider_radius: 0.35 * m,
            body_collider_offset: Vec2::new(0.05 * m, -0.05 * m),

            hand_anchor_right: Vec2::new(0.3 * m, 0.1 * m),
            hand_anchor_left: Vec2::new(-0.3 * m, 0.1 * m),
            hand_tip_radius: 0.15 * m,
        }
    }
}
