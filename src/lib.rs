//! View-state engine for the interactive AI API market poster.
//!
//! The poster has three pieces of live state: the chart's active point, the
//! flip flag of each provider card, and the entrance phase of each visual
//! group. Each is owned by one controller in [`engine`] and driven by
//! discrete input events; [`render`] derives the presentation from the
//! current state and the read-only [`data::Dataset`].

pub mod config;
pub mod data;
pub mod engine;
pub mod logging;
pub mod render;
pub mod runtime;
pub mod verify;
