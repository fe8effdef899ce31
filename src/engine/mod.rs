//! Event-driven view-state engine with deterministic replay semantics.
//!
//! Architecture:
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Pointer/click│────►│  Event Bus   │────►│   Reducer    │
//! │ viewport/    │     │   (FIFO)     │     │  (pure fn)   │
//! │ timer/logo   │     └──────────────┘     └──────────────┘
//! └──────────────┘                                 │
//!        ▲                                         ▼
//!        │             ┌──────────────┐     ┌──────────────┐
//!        └─────────────│   Commands   │◄────│  ViewState   │
//!                      │ timers/logos │     │  (hashed)    │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! Slices and their single owners:
//! - hover: [`chart::ChartController`]
//! - flip flags: [`flip::FlipRegistry`]
//! - entrance phases: [`animation::AnimationOrchestrator`]
//! - logo load states: [`resource::LogoRegistry`]
//! - write-up disclosure: [`accordion::Accordion`]

pub mod accordion;
pub mod animation;
pub mod bus;
pub mod chart;
pub mod events;
pub mod flip;
pub mod reducer;
pub mod resource;
pub mod session;
pub mod state;
