//! meetpanel core library
//!
//! Headless building blocks for two meeting side-panel features: poll
//! aggregation/lifecycle and HLS stream readiness probing. Rendering, media
//! transport, and call signaling live outside this crate; components here are
//! pure functions of host-supplied context plus an outbound event channel.

pub mod cli;
pub mod config;
pub mod context;
pub mod events;
pub mod hls;
pub mod logging;
pub mod polls;
