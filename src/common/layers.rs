//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    /// Agent body in its normal (vulnerable) classification.
    Agent,
    /// Agent body while empowered, and the hand tip.
    Hand,
    Hazard,
    Pickup,
}
