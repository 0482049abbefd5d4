// Core data models for mmboard
// These structs represent the board's domain entities

pub mod stage;
pub mod client;
pub mod snapshot;

pub use stage::*;
pub use client::*;
pub use snapshot::*;
