//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: includes DefaultPlugins (window/render) + game plugins.
//! - `configure_headless`: minimal configuration for integration tests.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::GameState;
use crate::plugins;
use crate::plugins::agent::input::InputGate;
use crate::plugins::agent::messages::AgentCommand;

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Fever Hand".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));

    // Mouse drives the agent; a touch build would insert `InputGate::Touch` instead.
    app.insert_resource(InputGate::Desktop);

    configure_game(app);
    plugins::register_render(app);

    // Without a run manager, start the level as soon as the agent exists.
    app.add_systems(OnEnter(GameState::InGame), start_level);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (Firefly/camera).
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}

fn start_level(mut agent_commands: MessageWriter<AgentCommand>) {
    agent_commands.write(AgentCommand::SetState(plugins::agent::components::AgentState::Normal));
}
