//! Fever Hand: a pointer-directed agent with hit cooldown, fever and growth.
//!
//! Integration tests in `tests/` are compiled as separate crates and import
//! `game::configure_headless` plus the agent types from here.

pub mod game;
pub mod common;
pub mod plugins;
