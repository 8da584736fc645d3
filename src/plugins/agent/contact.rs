//! Contact routing: physics contacts on the agent become gameplay messages.
//!
//! The agent never reacts to a contact directly. A hazard touching the vulnerable
//! body becomes an `AgentCommand::Hit`, which goes through the same cooldown gate
//! as any other hit. Everything else is reported outward.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{BodyCollider, HandTip, Hazard, InteractionClass, Pickup};
use super::messages::{AgentCommand, HazardGrabbed, PickupTouched};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentSide {
    Body(InteractionClass),
    Tip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtherSide {
    Hazard(Entity),
    Pickup(Entity),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactRoute {
    Hit,
    Grab(Entity),
    Touch(Entity),
}

pub fn route(agent: AgentSide, other: OtherSide) -> Option<ContactRoute> {
    match (agent, other) {
        (AgentSide::Body(InteractionClass::Body), OtherSide::Hazard(_)) => Some(ContactRoute::Hit),
        (AgentSide::Body(InteractionClass::Body), OtherSide::Pickup(_)) => None,
        (_, OtherSide::Hazard(e)) => Some(ContactRoute::Grab(e)),
        (_, OtherSide::Pickup(e)) => Some(ContactRoute::Touch(e)),
    }
}

pub fn route_agent_contacts(
    mut started: MessageReader<CollisionStart>,
    q_body: Query<&InteractionClass, With<BodyCollider>>,
    q_tip: Query<(), With<HandTip>>,
    q_hazard: Query<(), With<Hazard>>,
    q_pickup: Query<(), With<Pickup>>,
    mut agent_commands: MessageWriter<AgentCommand>,
    mut grabbed: MessageWriter<HazardGrabbed>,
    mut touched: MessageWriter<PickupTouched>,
) {
    let agent_side = |e: Entity| {
        q_body
            .get(e)
            .ok()
            .map(|class| AgentSide::Body(*class))
            .or_else(|| q_tip.contains(e).then_some(AgentSide::Tip))
    };
    let other_side = |e: Entity| {
        if q_hazard.contains(e) {
            Some(OtherSide::Hazard(e))
        } else if q_pickup.contains(e) {
            Some(OtherSide::Pickup(e))
        } else {
            None
        }
    };

    for ev in started.read() {
        let (a, b) = (ev.collider1, ev.collider2);
        let pair = match (agent_side(a), agent_side(b)) {
            (Some(agent), None) => other_side(b).map(|other| (agent, other)),
            (None, Some(agent)) => other_side(a).map(|other| (agent, other)),
            _ => None,
        };
        let Some((agent, other)) = pair else {
            continue;
        };

        match route(agent, other) {
            Some(ContactRoute::Hit) => {
                agent_commands.write(AgentCommand::Hit);
            }
            Some(ContactRoute::Grab(hazard)) => {
                grabbed.write(HazardGrabbed { hazard });
            }
            Some(ContactRoute::Touch(pickup)) => {
                touched.write(PickupTouched { pickup });
            }
            None => {}
        }
    }
}
