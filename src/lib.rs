//! Eco City Simulation Library
//!
//! A small city simulation of traffic, signals and growing trees that can run
//! headless or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
