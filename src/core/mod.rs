//! Core dial engine – wrapping counter, roller window, motion physics,
//! geometry and settle notification.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Drawing
//! goes through the [`render::DialCanvas`] and [`render::TextMeasure`]
//! traits, which the host implements.

pub mod counter;
pub mod dial;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod notify;
pub mod physics;
pub mod render;
pub mod roller;
pub mod velocity;
