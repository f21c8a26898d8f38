//! Floating terminal session windows for remote compute instances.
//!
//! The crate keeps three pieces of state consistent while the user opens,
//! drags, resizes and closes windows and while terminal transports report
//! connection changes at arbitrary times:
//!
//! - window geometry, clamped to the current viewport (`layout`)
//! - an immutable, insertion-ordered session registry (`session`)
//! - per-session connection status fed through channels (`session::status`)
//!
//! `host::SessionHost` composes them and mounts one `window::WindowFrame` per
//! live session. Terminal transports plug in through `connector`.

pub mod component_context;
pub mod components;
pub mod config;
pub mod connector;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod host;
pub mod layout;
pub mod pty;
pub mod runner;
pub mod session;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
