//! Agent components.
//!
//! The agent is a small hierarchy:
//!
//! ```text
//! Agent (root: position, kinematic body)
//! └── ScaleCarrier (uniform scale)
//!     ├── BodySprite
//!     ├── BodyCollider (InteractionClass, CollisionLayers)
//!     └── Hand (anchor position, aim rotation)
//!         ├── Arm (sprite stretched to the pointer)
//!         └── HandTip (collider at the end of the arm)
//! ```
//!
//! Child handles are cached once in `AgentParts` at spawn, so per-frame systems
//! go straight to `get_mut(entity)` instead of scanning.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::BorderInsets;

#[derive(Component, Debug, Clone, Copy)]
pub struct Agent;

#[derive(Component, Debug, Clone, Copy)]
pub struct ScaleCarrier;

#[derive(Component, Debug, Clone, Copy)]
pub struct BodySprite;

#[derive(Component, Debug, Clone, Copy)]
pub struct BodyCollider;

#[derive(Component, Debug, Clone, Copy)]
pub struct Hand;

#[derive(Component, Debug, Clone, Copy)]
pub struct Arm;

#[derive(Component, Debug, Clone, Copy)]
pub struct HandTip;

/// Something that hurts the agent's body on contact.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hazard;

/// Something the hand can pick up.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup;

/// Cached child entities of one agent.
#[derive(Component, Debug, Clone, Copy)]
pub struct AgentParts {
    pub carrier: Entity,
    pub body_sprite: Entity,
    pub body_collider: Entity,
    pub hand: Entity,
    pub arm: Entity,
    pub hand_tip: Entity,
}

/// Entity-level lifecycle. Orthogonal to the cooldown / fever timers.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    Normal,
    #[default]
    Stopped,
}

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
    dead: bool,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { hp: max, max, dead: false }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Remove one point. Returns `true` only for the decrement that kills.
    pub fn take_one(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.hp = (self.hp - 1).max(0);
        if self.hp == 0 {
            self.dead = true;
        }
        self.dead
    }

    pub fn restore(&mut self) {
        self.hp = self.max;
        self.dead = false;
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Locomotion {
    pub moving: bool,
    pub speed: f32,
    pub turn_rate: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facing {
    pub right: bool,
}

impl Default for Facing {
    fn default() -> Self {
        Self { right: true }
    }
}

/// Smoothed hand angle (radians) and its angular velocity.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Aim {
    pub angle: f32,
    pub velocity: f32,
}

/// Pre-registered positions of the hand for each facing, at scale 1.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HandAnchors {
    pub right: Vec2,
    pub left: Vec2,
}

impl HandAnchors {
    #[inline]
    pub fn for_facing(&self, right: bool) -> Vec2 {
        if right { self.right } else { self.left }
    }
}

/// Body sprite half-size at scale 1 plus its transparent trim margins.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BodyExtents {
    pub half_size: Vec2,
    pub insets: BorderInsets,
}

/// Arm length toward the pointer, in hand-local units.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct HandReach(pub f32);

/// What the body collider counts as.
///
/// Switching class swaps the collider's layer membership in the same write,
/// so physics and gameplay never disagree about it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionClass {
    #[default]
    Body,
    Hand,
}

impl InteractionClass {
    pub fn layers(self) -> CollisionLayers {
        match self {
            Self::Body => CollisionLayers::new(Layer::Agent, [Layer::Hazard]),
            Self::Hand => CollisionLayers::new(Layer::Hand, [Layer::Hazard, Layer::Pickup]),
        }
    }
}

pub fn hand_tip_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Hand, [Layer::Hazard, Layer::Pickup])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimFlag {
    Moving,
    Fever,
    Hit,
    /// Terminal pose at end of level.
    Finished,
}

/// Boolean parameters consumed by the animation collaborator.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimFlags {
    pub moving: bool,
    pub fever: bool,
    pub hit: bool,
    pub finished: bool,
}

impl AnimFlags {
    /// Returns `true` when the stored value actually changed.
    pub fn set(&mut self, flag: AnimFlag, value: bool) -> bool {
        let slot = match flag {
            AnimFlag::Moving => &mut self.moving,
            AnimFlag::Fever => &mut self.fever,
            AnimFlag::Hit => &mut self.hit,
            AnimFlag::Finished => &mut self.finished,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }
}
