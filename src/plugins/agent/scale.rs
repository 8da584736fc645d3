//! Scale sequencing: immediate scale changes plus one cancellable deferred change.
//!
//! The deferred change runs on the same frame clock as the status timers. Each
//! scheduled job carries the generation it was created under. Cancelling only
//! bumps the generation: the stale job stays in its slot until its next tick,
//! which drops it without applying.

use bevy::prelude::*;

use super::components::{Agent, AgentParts, ScaleCarrier};
use super::messages::Notices;

/// Current uniform scale of the agent. Always positive.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AgentScale(pub f32);

impl Default for AgentScale {
    fn default() -> Self {
        Self(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleJob {
    pub target: f32,
    pub remaining: f32,
    generation: u64,
}

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct DeferredScale {
    generation: u64,
    job: Option<ScaleJob>,
}

impl DeferredScale {
    /// Replace any pending job with a new one.
    pub fn schedule(&mut self, target: f32, delay: f32) {
        self.generation = self.generation.wrapping_add(1);
        self.job = Some(ScaleJob {
            target,
            remaining: delay.max(0.0),
            generation: self.generation,
        });
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// The live job, if any. A cancelled job is never reported.
    #[inline]
    pub fn pending(&self) -> Option<&ScaleJob> {
        self.job.as_ref().filter(|job| job.generation == self.generation)
    }

    /// Advance the pending job. Returns the target scale on the tick it fires.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        let generation = self.generation;
        let job = self.job.as_mut()?;
        if job.generation != generation {
            self.job = None;
            return None;
        }
        job.remaining -= dt;
        if job.remaining > 0.0 {
            return None;
        }
        self.job.take().map(|job| job.target)
    }
}

pub fn tick_deferred_scale(
    time: Res<Time>,
    mut notices: Notices,
    mut q: Query<(&mut DeferredScale, &mut AgentScale), With<Agent>>,
) {
    let dt = time.delta_secs();
    for (mut deferred, mut scale) in &mut q {
        if let Some(target) = deferred.tick(dt) {
            debug!("deferred scale fired: {} -> {}", scale.0, target);
            notices.set_scale(&mut scale, target);
        }
    }
}

/// Push `AgentScale` onto the scale carrier's transform.
pub fn apply_scale(
    q_agent: Query<(&AgentScale, &AgentParts), (With<Agent>, Changed<AgentScale>)>,
    mut q_carrier: Query<&mut Transform, (With<ScaleCarrier>, Without<Agent>)>,
) {
    for (scale, parts) in &q_agent {
        if let Ok(mut tf) = q_carrier.get_mut(parts.carrier) {
            tf.scale = Vec3::new(scale.0, scale.0, 1.0);
        }
    }
}
