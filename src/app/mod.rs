//! Application orchestration: state, event loop plumbing, input handling
//! and the bits of the outside world the dial talks to.

pub mod event;
pub mod handler;
pub mod haptics;
pub mod persist;
pub mod state;
