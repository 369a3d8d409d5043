//! Carousel - headless dashboard rotation daemon
//!
//! Cycles a display through an ordered list of dashboard URLs pushed from an
//! external configuration source, optionally asking a locally-reachable LLM
//! backend to reorder the rotation by priority.

pub mod cli;
pub mod config;
pub mod logging;
pub mod rotation;
pub mod selector;
pub mod shelf;
pub mod store;
