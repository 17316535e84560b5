//! Autopower firmware library.
//!
//! Automatic PSU control: decides on a fixed cadence whether the main
//! power rail is needed and sequences it on or off.  Exposes the
//! pure-logic modules for integration testing; hardware is reached only
//! through the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod power;
pub mod time;
