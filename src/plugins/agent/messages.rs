//! Agent message surface.
//!
//! Inbound: `AgentCommand` and `PointerGesture` are the only ways the rest of the
//! game drives the agent. Outbound: everything HUD, audio, animation and the run
//! manager need is published as a message; the agent holds no handles to them.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::components::{AgentState, AnimFlag, AnimFlags, Locomotion};
use super::scale::AgentScale;

// -----------------------------------------------------------------------------
// Inbound
// -----------------------------------------------------------------------------

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub enum AgentCommand {
    /// Body took damage. Ignored during the hit cooldown.
    Hit,
    /// Start or re-trigger fever.
    TriggerFever,
    /// Small top-up of a running fever.
    ExtendFever,
    SetState(AgentState),
    EndLevel,
    /// Back to the level-start configuration, cancelling all timers.
    Reset,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerGesture {
    Press,
    Release,
}

// -----------------------------------------------------------------------------
// Outbound
// -----------------------------------------------------------------------------

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthChanged {
    pub hp: i32,
    pub max: i32,
}

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct FeverStatus {
    pub active: bool,
    pub remaining: f32,
    pub max: f32,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimFlagChanged {
    pub flag: AnimFlag,
    pub value: bool,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    Hurt,
    FeverEnd,
}

/// Cosmetic pulse played whenever the agent's scale is set.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct ScalePulse {
    pub scale: f32,
}

/// Terminal notification. Written at most once per life.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentDied;

/// The empowered body or the hand tip touched a hazard.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HazardGrabbed {
    pub hazard: Entity,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickupTouched {
    pub pickup: Entity,
}

pub(super) fn register(app: &mut App) {
    app.add_message::<AgentCommand>()
        .add_message::<PointerGesture>()
        .add_message::<HealthChanged>()
        .add_message::<FeverStatus>()
        .add_message::<AnimFlagChanged>()
        .add_message::<AudioCue>()
        .add_message::<ScalePulse>()
        .add_message::<AgentDied>()
        .add_message::<HazardGrabbed>()
        .add_message::<PickupTouched>();
}

/// Every outbound writer the agent systems share.
#[derive(SystemParam)]
pub struct Notices<'w> {
    health: MessageWriter<'w, HealthChanged>,
    fever: MessageWriter<'w, FeverStatus>,
    anim: MessageWriter<'w, AnimFlagChanged>,
    audio: MessageWriter<'w, AudioCue>,
    pulse: MessageWriter<'w, ScalePulse>,
    died: MessageWriter<'w, AgentDied>,
}

impl Notices<'_> {
    pub fn health(&mut self, hp: i32, max: i32) {
        self.health.write(HealthChanged { hp, max });
    }

    pub fn fever(&mut self, active: bool, remaining: f32, max: f32) {
        self.fever.write(FeverStatus { active, remaining, max });
    }

    pub fn audio(&mut self, cue: AudioCue) {
        self.audio.write(cue);
    }

    pub fn died(&mut self) {
        self.died.write(AgentDied);
    }

    /// Set an animation flag, publishing only real changes.
    pub fn anim(&mut self, flags: &mut AnimFlags, flag: AnimFlag, value: bool) {
        if flags.set(flag, value) {
            self.anim.write(AnimFlagChanged { flag, value });
        }
    }

    /// Movement flag and its animation mirror always change together.
    pub fn set_moving(&mut self, loco: &mut Locomotion, flags: &mut AnimFlags, moving: bool) {
        loco.moving = moving;
        self.anim(flags, AnimFlag::Moving, moving);
    }

    /// Immediate scale change plus its cosmetic pulse.
    pub fn set_scale(&mut self, scale: &mut AgentScale, value: f32) {
        debug_assert!(value > 0.0, "agent scale must stay positive, got {value}");
        scale.0 = value;
        self.pulse.write(ScalePulse { scale: value });
    }
}
