//! End-to-end agent behaviour through the real schedule.

mod common;

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;

use fever_hand::plugins::agent::components::*;
use fever_hand::plugins::agent::input::PointerInput;
use fever_hand::plugins::agent::messages::*;
use fever_hand::plugins::agent::scale::{AgentScale, DeferredScale};

fn start(app: &mut App) {
    common::send(app, AgentCommand::SetState(AgentState::Normal));
    app.update();
}

fn point_at_screen(app: &mut App, screen: Vec2) {
    app.world_mut().resource_mut::<PointerInput>().screen = Some(screen);
}

#[test]
fn press_walks_agent_to_pointer_and_stops() {
    let mut app = common::app_with_playfield(Duration::from_millis(10));
    let agent = common::agent(&mut app);
    start(&mut app);

    // Screen (960, 360) is world (320, 0).
    point_at_screen(&mut app, Vec2::new(960.0, 360.0));
    common::send(&mut app, PointerGesture::Press);
    app.update();
    assert!(common::get::<Locomotion>(&app, agent).moving);

    let mut frames = 0;
    while common::get::<Locomotion>(&app, agent).moving && frames < 500 {
        app.update();
        frames += 1;
    }
    assert!(!common::get::<Locomotion>(&app, agent).moving, "never arrived");

    let parts = common::get::<AgentParts>(&app, agent);
    let root = common::get::<Transform>(&app, agent);
    let hand = common::get::<Transform>(&app, parts.hand);
    let hand_world = root.transform_point(hand.translation).truncate();
    assert!(hand_world.distance(Vec2::new(320.0, 0.0)) <= 10.0 + 1e-3, "{hand_world:?}");
}

#[test]
fn release_stops_movement() {
    let mut app = common::app_with_playfield(Duration::from_millis(10));
    let agent = common::agent(&mut app);
    start(&mut app);

    point_at_screen(&mut app, Vec2::new(1200.0, 100.0));
    common::send(&mut app, PointerGesture::Press);
    app.update();
    app.update();
    let moved_to = common::get::<Transform>(&app, agent).translation;
    assert!(moved_to.x > 0.0);

    common::send(&mut app, PointerGesture::Release);
    app.update();
    let stopped_at = common::get::<Transform>(&app, agent).translation;
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(common::get::<Transform>(&app, agent).translation, stopped_at);
}

#[test]
fn pointer_far_off_screen_keeps_agent_inside() {
    let mut app = common::app_with_playfield(Duration::from_millis(50));
    let agent = common::agent(&mut app);
    start(&mut app);

    point_at_screen(&mut app, Vec2::new(99_999.0, -99_999.0));
    common::send(&mut app, PointerGesture::Press);
    for _ in 0..100 {
        app.update();
    }

    let pos = common::get::<Transform>(&app, agent).translation.truncate();
    assert!(pos.x <= 640.0 && pos.y <= 360.0, "{pos:?}");
}

#[test]
fn hit_cooldown_spans_frames() {
    let mut app = common::app_with_playfield(Duration::from_millis(100));
    let agent = common::agent(&mut app);

    common::send(&mut app, AgentCommand::Hit);
    app.update();
    assert_eq!(common::get::<Health>(&app, agent).hp, 2);

    common::send(&mut app, AgentCommand::Hit);
    app.update();
    assert_eq!(common::get::<Health>(&app, agent).hp, 2);

    for _ in 0..25 {
        app.update();
    }
    let parts = common::get::<AgentParts>(&app, agent);
    assert!(app.world().get::<ColliderDisabled>(parts.body_collider).is_none());

    common::send(&mut app, AgentCommand::Hit);
    app.update();
    assert_eq!(common::get::<Health>(&app, agent).hp, 1);
}

#[test]
fn triple_fever_settles_at_grown_scale() {
    let mut app = common::app_with_playfield(Duration::from_millis(100));
    let agent = common::agent(&mut app);

    for _ in 0..3 {
        common::send(&mut app, AgentCommand::TriggerFever);
    }
    app.update();
    assert_eq!(common::get::<AgentScale>(&app, agent).0, 4.0);
    assert!(common::get::<AnimFlags>(&app, agent).fever);

    let mut frames = 0;
    while common::get::<AnimFlags>(&app, agent).fever && frames < 200 {
        app.update();
        frames += 1;
    }
    assert!(!common::get::<AnimFlags>(&app, agent).fever);
    assert!(common::messages::<AudioCue>(&mut app).contains(&AudioCue::FeverEnd));

    for _ in 0..10 {
        app.update();
    }
    assert!(common::get::<DeferredScale>(&app, agent).pending().is_none());
    let scale = common::get::<AgentScale>(&app, agent).0;
    assert!((scale - 1.3).abs() < 1e-4, "{scale}");

    let parts = common::get::<AgentParts>(&app, agent);
    let carrier = common::get::<Transform>(&app, parts.carrier);
    assert!((carrier.scale.x - 1.3).abs() < 1e-4);
}

#[test]
fn growth_waits_the_full_delay_after_fever_expires() {
    // Quarter-second frames: the 0.5 s delay spans exactly two frames after expiry.
    let mut app = common::app_with_playfield(Duration::from_millis(250));
    let agent = common::agent(&mut app);

    for _ in 0..3 {
        common::send(&mut app, AgentCommand::TriggerFever);
    }
    app.update();

    let mut frames = 0;
    while common::get::<AnimFlags>(&app, agent).fever && frames < 100 {
        app.update();
        frames += 1;
    }
    assert!(!common::get::<AnimFlags>(&app, agent).fever);
    assert_eq!(common::get::<AgentScale>(&app, agent).0, 1.0);
    assert!(common::get::<DeferredScale>(&app, agent).pending().is_some());

    // expiry + (delay - dt)
    app.update();
    assert_eq!(common::get::<AgentScale>(&app, agent).0, 1.0);

    // expiry + delay
    app.update();
    let scale = common::get::<AgentScale>(&app, agent).0;
    assert!((scale - 1.3).abs() < 1e-4, "{scale}");
}

#[test]
fn injected_hazard_contact_hurts_once() {
    let mut app = common::app_with_playfield(Duration::from_millis(100));
    let agent = common::agent(&mut app);
    let parts = common::get::<AgentParts>(&app, agent);
    let hazard = app.world_mut().spawn(Hazard).id();

    common::send(
        &mut app,
        CollisionStart { collider1: hazard, collider2: parts.body_collider, body1: None, body2: None },
    );
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(common::get::<Health>(&app, agent).hp, 2);
}

#[test]
fn reset_after_death_gives_a_fresh_life() {
    let mut app = common::app_with_playfield(Duration::from_millis(100));
    let agent = common::agent(&mut app);

    for _ in 0..3 {
        common::send(&mut app, AgentCommand::Hit);
        for _ in 0..25 {
            app.update();
        }
    }
    assert!(common::get::<Health>(&app, agent).is_dead());

    common::send(&mut app, AgentCommand::Reset);
    app.update();
    let health = common::get::<Health>(&app, agent);
    assert_eq!(health.hp, health.max);
    assert!(!health.is_dead());

    common::send(&mut app, AgentCommand::Hit);
    app.update();
    assert_eq!(common::get::<Health>(&app, agent).hp, health.max - 1);
}
