//! ngrok-ctl: Command-line interface for the local ngrok agent API
//!
//! Provides the `ngrok-ctl` binary for inspecting and stopping tunnels of a
//! running agent.

pub mod commands;
pub mod config;
pub mod output;
