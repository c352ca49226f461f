pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{name} must be greater than zero")]
    NotPositive { name: &'static str },
    #[display("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[display("min_drop_interval_ms ({min}) must not exceed initial_drop_interval_ms ({initial})")]
    DropIntervalRange { min: u64, initial: u64 },
    #[display("max_catch_up_ms ({max}) must be at least tick_ms ({tick})")]
    CatchUpBelowTick { tick: u64, max: u64 },
}
