//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `fever_hand::game::configure_headless` to install gameplay plugins.
//! - there is no window or camera, so tests provide `CameraBounds` / `PointerInput`.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::ecs::message::Message;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use fever_hand::plugins::agent::components::Agent;
use fever_hand::plugins::agent::input::{CameraBounds, PointerInput};

pub const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    fever_hand::game::configure_headless(&mut app);
    // `App::run` would finish plugin setup; tests drive `update()` directly.
    app.finish();
    app.cleanup();
    app
}

/// Headless app with a 1280x720 playfield centered on the origin, fixed frame
/// time, and the agent already spawned.
pub fn app_with_playfield(frame: Duration) -> App {
    let mut app = app_headless();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(frame));
    app.insert_resource(CameraBounds(Some(Rect::from_corners(
        -VIEWPORT * 0.5,
        VIEWPORT * 0.5,
    ))));
    app.insert_resource(PointerInput { screen: None, viewport: VIEWPORT });
    app.update();
    app
}

pub fn agent(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Agent>>()
        .single(app.world())
        .expect("one agent")
}

pub fn get<C: Component + Clone>(app: &App, e: Entity) -> C {
    app.world().get::<C>(e).expect("component present").clone()
}

/// Everything of type `M` still buffered (this frame and the previous one).
pub fn messages<M: Message + Clone>(app: &mut App) -> Vec<M> {
    app.world_mut()
        .run_system_once(|mut r: MessageReader<M>| r.read().cloned().collect::<Vec<M>>())
        .expect("reader system")
}

pub fn send<M: Message>(app: &mut App, m: M) {
    app.world_mut().write_message(m);
}
