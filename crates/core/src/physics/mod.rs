//! Fire behavior physics

pub mod rothermel;

pub use rothermel::{
    calculate_for_fuel, classify_fire_type, moisture_damping, FireType, RateOfSpreadModel,
    SpreadBehaviorResult, SpreadConditions,
};
