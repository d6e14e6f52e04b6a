//! # social-session
//!
//! Session and theme state for the demo social network client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The feed, profile and settings screens all read from two stores: the
//! auth store (who is signed in) and the theme store (light/dark). Both
//! persist to durable key/value storage so a reload restores them, and the
//! bootstrap wires them together once per application load. Users come from
//! a fixed mock directory; there is no backend.

pub mod bootstrap;
pub mod config;
pub mod directory;
pub mod state;
pub mod storage;
pub mod types;
