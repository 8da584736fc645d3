//! Hit cooldown, fever, and the commands that drive them.
//!
//! Two timers with a fixed tick priority: while the cooldown runs, fever is frozen.
//!
//! ```text
//!             Hit (cooldown == 0)                 cooldown <= 0
//!   Idle/Fever ───────────────────> Cooldown ───────────────────> (Fever if fever > 0, else Idle)
//!
//!             TriggerFever                        fever <= 0
//!   any ──────────────────────────> fever += T  ──────────────────> Idle + deferred grow
//! ```

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

use super::components::{
    Agent, AgentParts, AgentState, Aim, AnimFlag, AnimFlags, BodyCollider, BodySprite, Facing,
    HandAnchors, Health, InteractionClass, Locomotion,
};
use super::messages::{AgentCommand, AudioCue, Notices};
use super::orientation::flip_parts;
use super::scale::{AgentScale, DeferredScale};

/// Whether the current stage is the last (hardest) one. Written by the run manager.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct StageInfo {
    pub is_last_stage: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    Cooldown,
    Fever,
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitOutcome {
    Ignored,
    Hurt { hp: i32 },
    Died,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerTick {
    Idle,
    CooldownRunning,
    CooldownEnded,
    FeverRunning { remaining: f32 },
    FeverEnded,
}

/// Cooldown and fever bookkeeping. Neither timer ever goes negative.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct StatusTimers {
    pub cooldown: f32,
    pub fever: f32,
    /// Longest fever remaining seen in this fever run; caps extensions.
    pub fever_max: f32,
    /// Scale when the current fever run started.
    pub snapshot_scale: f32,
    /// Fever triggers since the run started.
    pub retriggers: u32,
}

impl StatusTimers {
    /// Which timer runs this frame. Cooldown wins over fever.
    pub fn phase(&self) -> TimerPhase {
        if self.cooldown > 0.0 {
            TimerPhase::Cooldown
        } else if self.fever > 0.0 {
            TimerPhase::Fever
        } else {
            TimerPhase::Idle
        }
    }

    pub fn hit(&mut self, health: &mut Health, cooldown: f32) -> HitOutcome {
        if self.cooldown > 0.0 || health.is_dead() {
            return HitOutcome::Ignored;
        }
        if health.take_one() {
            return HitOutcome::Died;
        }
        self.cooldown = cooldown;
        HitOutcome::Hurt { hp: health.hp }
    }

    /// Start or re-trigger fever; returns the new remaining time.
    pub fn trigger_fever(&mut self, current_scale: f32, duration: f32) -> f32 {
        if self.fever <= 0.0 {
            self.snapshot_scale = current_scale;
            self.retriggers = 0;
        }
        self.retriggers += 1;
        self.fever += duration;
        self.fever_max = self.fever;
        self.fever
    }

    /// Top up a running fever, never past `fever_max`. No-op when fever is off.
    pub fn extend_fever(&mut self, amount: f32) -> Option<f32> {
        if self.fever <= 0.0 {
            return None;
        }
        self.fever = (self.fever + amount).min(self.fever_max);
        Some(self.fever)
    }

    /// Scale the agent grows into once fever has worn off.
    pub fn grown_scale(&self, step: f32) -> f32 {
        self.snapshot_scale + step * self.retriggers as f32
    }

    /// Advance whichever timer `phase` says is live. Fever is frozen during cooldown.
    pub fn tick(&mut self, dt: f32) -> TimerTick {
        match self.phase() {
            TimerPhase::Cooldown => {
                self.cooldown -= dt;
                if self.cooldown <= 0.0 {
                    self.cooldown = 0.0;
                    return TimerTick::CooldownEnded;
                }
                TimerTick::CooldownRunning
            }
            TimerPhase::Fever => {
                self.fever -= dt;
                if self.fever <= 0.0 {
                    self.fever = 0.0;
                    return TimerTick::FeverEnded;
                }
                TimerTick::FeverRunning { remaining: self.fever }
            }
            TimerPhase::Idle => TimerTick::Idle,
        }
    }
}

fn set_class(
    class: InteractionClass,
    body: Entity,
    q_body: &mut Query<(&mut InteractionClass, &mut CollisionLayers), With<BodyCollider>>,
) {
    if let Ok((mut current, mut layers)) = q_body.get_mut(body) {
        *current = class;
        *layers = class.layers();
    }
}

fn base_locomotion(loco: &mut Locomotion, tunables: &Tunables) {
    loco.speed = tunables.base_speed;
    loco.turn_rate = tunables.base_turn_rate;
}

pub fn apply_agent_commands(
    mut commands: Commands,
    tunables: Res<Tunables>,
    stage: Res<StageInfo>,
    mut reader: MessageReader<AgentCommand>,
    mut notices: Notices,
    mut q_agent: Query<
        (
            &mut AgentState,
            &mut Health,
            &mut StatusTimers,
            &mut Locomotion,
            &mut AnimFlags,
            &mut AgentScale,
            &mut DeferredScale,
            &AgentParts,
        ),
        With<Agent>,
    >,
    mut q_body: Query<(&mut InteractionClass, &mut CollisionLayers), With<BodyCollider>>,
) {
    let Ok((mut state, mut health, mut timers, mut loco, mut flags, mut scale, mut deferred, parts)) =
        q_agent.single_mut()
    else {
        if !reader.is_empty() {
            debug!("agent commands dropped: no agent");
        }
        reader.clear();
        return;
    };

    for command in reader.read() {
        match *command {
            AgentCommand::Hit => match timers.hit(&mut health, tunables.hit_cooldown) {
                HitOutcome::Ignored => {}
                HitOutcome::Hurt { hp } => {
                    debug!("agent hurt, hp={hp}");
                    notices.health(hp, health.max);
                    notices.anim(&mut flags, AnimFlag::Hit, true);
                    notices.audio(AudioCue::Hurt);
                    commands.entity(parts.body_collider).insert(ColliderDisabled);
                }
                HitOutcome::Died => {
                    info!("agent died");
                    notices.health(health.hp, health.max);
                    notices.anim(&mut flags, AnimFlag::Hit, true);
                    notices.died();
                }
            },
            AgentCommand::TriggerFever => {
                deferred.cancel();
                let remaining = timers.trigger_fever(scale.0, tunables.fever_time);
                info!("fever on: {remaining:.2}s (x{})", timers.retriggers);

                set_class(InteractionClass::Hand, parts.body_collider, &mut q_body);
                loco.speed = tunables.base_speed * tunables.fever_speed_ratio;
                loco.turn_rate = tunables.base_turn_rate * tunables.fever_speed_ratio;
                notices.anim(&mut flags, AnimFlag::Fever, true);
                notices.fever(true, remaining, timers.fever_max);
                notices.set_scale(&mut scale, tunables.fever_scale);
            }
            AgentCommand::ExtendFever => {
                let amount = if stage.is_last_stage {
                    tunables.fever_extend_last_stage
                } else {
                    tunables.fever_extend
                };
                if let Some(remaining) = timers.extend_fever(amount) {
                    notices.fever(true, remaining, timers.fever_max);
                }
            }
            AgentCommand::SetState(next) => {
                debug!("agent state {:?} -> {next:?}", *state);
                *state = next;
            }
            AgentCommand::EndLevel => {
                info!("agent finished level");
                *state = AgentState::Stopped;
                notices.set_moving(&mut loco, &mut flags, false);
                notices.anim(&mut flags, AnimFlag::Finished, true);
            }
            // Handled up front by `reset_agent`.
            AgentCommand::Reset => {}
        }
    }
}

/// Advance cooldown, or fever when no cooldown is running.
pub fn tick_status(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut notices: Notices,
    mut q_agent: Query<
        (
            &mut StatusTimers,
            &mut Locomotion,
            &mut AnimFlags,
            &mut AgentScale,
            &mut DeferredScale,
            &AgentParts,
        ),
        With<Agent>,
    >,
    mut q_body: Query<(&mut InteractionClass, &mut CollisionLayers), With<BodyCollider>>,
) {
    let dt = time.delta_secs();
    for (mut timers, mut loco, mut flags, mut scale, mut deferred, parts) in &mut q_agent {
        match timers.tick(dt) {
            TimerTick::Idle | TimerTick::CooldownRunning => {}
            TimerTick::CooldownEnded => {
                debug!("hit cooldown over");
                commands.entity(parts.body_collider).remove::<ColliderDisabled>();
                notices.anim(&mut flags, AnimFlag::Hit, false);
            }
            TimerTick::FeverRunning { remaining } => {
                notices.fever(true, remaining, timers.fever_max);
            }
            TimerTick::FeverEnded => {
                let grown = timers.grown_scale(tunables.grow_step);
                info!("fever off, growing to {grown:.2} in {}s", tunables.grow_delay);

                set_class(InteractionClass::Body, parts.body_collider, &mut q_body);
                notices.fever(false, 0.0, timers.fever_max);
                notices.anim(&mut flags, AnimFlag::Fever, false);
                notices.set_scale(&mut scale, tunables.initial_scale);
                deferred.schedule(grown, tunables.grow_delay);
                base_locomotion(&mut loco, &tunables);
                notices.audio(AudioCue::FeverEnd);
            }
        }
    }
}

/// Handle `AgentCommand::Reset`: level-start configuration, every timer cleared.
pub fn reset_agent(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut reader: MessageReader<AgentCommand>,
    mut notices: Notices,
    mut q_agent: Query<
        (
            &mut Transform,
            &mut AgentState,
            &mut Health,
            &mut StatusTimers,
            &mut Locomotion,
            &mut Facing,
            &mut Aim,
            &mut AnimFlags,
            &mut AgentScale,
            &mut DeferredScale,
            &HandAnchors,
            &AgentParts,
        ),
        With<Agent>,
    >,
    mut q_body: Query<(&mut InteractionClass, &mut CollisionLayers), With<BodyCollider>>,
    mut q_parts: Query<&mut Transform, Without<Agent>>,
    mut q_body_sprite: Query<&mut Sprite, With<BodySprite>>,
) {
    let resets = reader.read().filter(|c| **c == AgentCommand::Reset).count();
    if resets == 0 {
        return;
    }
    let Ok((
        mut tf,
        mut state,
        mut health,
        mut timers,
        mut loco,
        mut facing,
        mut aim,
        mut flags,
        mut scale,
        mut deferred,
        anchors,
        parts,
    )) = q_agent.single_mut()
    else {
        return;
    };

    info!("agent reset");
    if timers.fever > 0.0 {
        notices.fever(false, 0.0, 0.0);
    }
    deferred.cancel();
    *timers = StatusTimers::default();
    *state = AgentState::Stopped;
    health.restore();
    base_locomotion(&mut loco, &tunables);
    *aim = default();
    tf.translation.x = 0.0;
    tf.translation.y = 0.0;
    scale.0 = tunables.initial_scale;

    facing.right = true;
    flip_parts(true, anchors, parts, &mut q_parts, &mut q_body_sprite);
    if let Ok(mut collider_tf) = q_parts.get_mut(parts.body_collider) {
        collider_tf.translation.x = tunables.body_collider_offset.x;
        collider_tf.translation.y = tunables.body_collider_offset.y;
    }
    set_class(InteractionClass::Body, parts.body_collider, &mut q_body);
    commands.entity(parts.body_collider).remove::<ColliderDisabled>();

    notices.set_moving(&mut loco, &mut flags, false);
    for flag in [AnimFlag::Fever, AnimFlag::Hit, AnimFlag::Finished] {
        notices.anim(&mut flags, flag, false);
    }
    notices.health(health.hp, health.max);
}
