//! Agent plugin: the pointer-driven player character.
//!
//! Pipeline (Update, one ordered chain, InGame only):
//! - input: read window pointer, capture camera bounds, sample pointer, press/release
//! - motion: flip facing, step toward the pointer, clamp on screen, arrive
//! - view: smooth the hand angle, report arm reach
//! - commands: reset first, then hit / fever / state / end-of-level in arrival order
//! - timers: the deferred scale job, then cooldown (priority) or fever; a job
//!   scheduled by fever expiry starts counting on the next frame
//! - presentation: push scale to the carrier, stretch the arm
//!
//! FixedPostUpdate: physics contacts on the body / hand tip become messages.
//!
//! Movement and view both read the single `PointerTarget` sampled at the top of the
//! chain, so they never disagree about where the pointer is within one frame.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{state::GameState, tunables::Tunables};

pub mod bounds;
pub mod components;
pub mod contact;
pub mod input;
pub mod messages;
pub mod motion;
pub mod orientation;
pub mod scale;
pub mod status;

use components::*;
use input::{CameraBounds, InputGate, PointerInput, PointerTarget};
use messages::Notices;
use scale::{AgentScale, DeferredScale};
use status::{StageInfo, StatusTimers};

pub fn plugin(app: &mut App) {
    messages::register(app);

    app.init_resource::<PointerInput>()
        .init_resource::<CameraBounds>()
        .init_resource::<PointerTarget>()
        .init_resource::<InputGate>()
        .init_resource::<StageInfo>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            Update,
            (
                input::read_window_pointer,
                input::capture_camera_bounds,
                input::sample_pointer,
                input::apply_control,
                motion::move_agent,
                orientation::update_view,
                status::reset_agent,
                status::apply_agent_commands,
                scale::tick_deferred_scale,
                status::tick_status,
                scale::apply_scale,
                orientation::stretch_arm,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            contact::route_agent_contacts
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>, mut notices: Notices) {
    let t = &*tunables;

    let root = commands
        .spawn((
            Name::new("Agent"),
            Agent,
            (
                AgentState::Stopped,
                Health::new(t.max_health),
                StatusTimers::default(),
                Locomotion {
                    moving: false,
                    speed: t.base_speed,
                    turn_rate: t.base_turn_rate,
                },
                Facing::default(),
                Aim::default(),
                AnimFlags::default(),
                AgentScale(t.initial_scale),
                DeferredScale::default(),
            ),
            HandAnchors {
                right: t.hand_anchor_right,
                left: t.hand_anchor_left,
            },
            BodyExtents {
                half_size: t.body_half_size,
                insets: t.body_insets,
            },
            Transform::from_xyz(0.0, 0.0, 1.0),
            Visibility::default(),
            RigidBody::Kinematic,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    let carrier = commands
        .spawn((
            Name::new("ScaleCarrier"),
            ScaleCarrier,
            Transform::from_scale(Vec3::new(t.initial_scale, t.initial_scale, 1.0)),
            Visibility::default(),
            ChildOf(root),
        ))
        .id();

    let body_sprite = commands
        .spawn((
            Name::new("BodySprite"),
            BodySprite,
            Sprite {
                color: Color::srgb(0.95, 0.75, 0.55),
                custom_size: Some(t.body_half_size * 2.0),
                ..default()
            },
            Transform::default(),
            ChildOf(carrier),
        ))
        .id();

    let body_collider = commands
        .spawn((
            Name::new("BodyCollider"),
            BodyCollider,
            InteractionClass::Body,
            InteractionClass::Body.layers(),
            Collider::circle(t.body_collider_radius),
            Sensor,
            CollisionEventsEnabled,
            Transform::from_translation(t.body_collider_offset.extend(0.0)),
            ChildOf(carrier),
        ))
        .id();

    let hand = commands
        .spawn((
            Name::new("Hand"),
            Hand,
            HandReach::default(),
            Transform::from_translation(t.hand_anchor_right.extend(0.5)),
            Visibility::default(),
            ChildOf(carrier),
        ))
        .id();

    let arm = commands
        .spawn((
            Name::new("Arm"),
            Arm,
            Sprite {
                color: Color::srgb(0.9, 0.65, 0.45),
                custom_size: Some(Vec2::new(0.0, orientation::ARM_THICKNESS)),
                ..default()
            },
            Transform::default(),
            ChildOf(hand),
        ))
        .id();

    let hand_tip = commands
        .spawn((
            Name::new("HandTip"),
            HandTip,
            Collider::circle(t.hand_tip_radius),
            hand_tip_layers(),
            Sensor,
            CollisionEventsEnabled,
            Transform::default(),
            ChildOf(hand),
        ))
        .id();

    commands.entity(root).insert(AgentParts {
        carrier,
        body_sprite,
        body_collider,
        hand,
        arm,
        hand_tip,
    });

    notices.health(t.max_health, t.max_health);
}
