#![doc = include_str!("../README.md")]
pub mod config;
pub mod error;
pub mod logging;
pub mod simulation;
pub mod util;

pub use ringchord_core as core;
