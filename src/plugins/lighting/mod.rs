//! Lighting plugin (Firefly) (render-only).
//!
//! A light rides on the agent; its reach follows the agent's scale and it warms up
//! while fever is active.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::agent::components::{Agent, AnimFlags};
use crate::plugins::agent::scale::AgentScale;

const BASE_RANGE: f32 = 450.0;

#[derive(Component)]
pub struct AgentLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, follow_agent_light.run_if(in_state(GameState::InGame)));
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("AgentLight"),
        AgentLight,
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            radius: BASE_RANGE,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn light_for(scale: f32, fever: bool) -> (f32, Color) {
    let color = if fever {
        Color::srgb(1.0, 0.55, 0.25)
    } else {
        Color::srgb(1.0, 0.9, 0.75)
    };
    (BASE_RANGE * scale.max(1.0), color)
}

fn follow_agent_light(
    q_agent: Query<(&Transform, &AgentScale, &AnimFlags), (With<Agent>, Without<AgentLight>)>,
    mut q_light: Query<(&mut Transform, &mut PointLight2d), (With<AgentLight>, Without<Agent>)>,
) {
    let Ok((tf_agent, scale, flags)) = q_agent.single() else {
        return;
    };
    let Ok((mut tf_light, mut light)) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_agent.translation.x;
    tf_light.translation.y = tf_agent.translation.y;

    let (range, color) = light_for(scale.0, flags.fever);
    light.radius = range;
    light.color = color;
}
