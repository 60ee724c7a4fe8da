//! Real-time simulation core of a top-down wave survival shooter.
//!
//! `compute` drives a frame; the other modules are the systems it calls.
//! Nothing here touches a terminal, a file handle, or wall-clock time
//! directly except `config` loaders and `clock::SystemClock`.

pub mod ai;
pub mod camera;
pub mod clock;
pub mod combat;
pub mod compute;
pub mod config;
pub mod constants;
pub mod entities;
pub mod hooks;
pub mod input;
pub mod powerups;
pub mod progression;
pub mod timers;
pub mod waves;
