//! Compressed-sensing basis preparation for an Arduino acquisition rig.
//!
//! This library loads a measurement ("basis") matrix from a delimited text
//! file, derives a stable identifier from its contents, renders an Arduino
//! sketch embedding the quantized matrix in flash, and checks an injected
//! hardware host for the presence and readiness of the acquisition hub.
//! It is used by the `compsens` command-line binary and can be embedded in
//! a larger control application.

pub mod basis;
pub mod config;
pub mod error;
pub mod firmware;
pub mod hardware;
pub mod session;
