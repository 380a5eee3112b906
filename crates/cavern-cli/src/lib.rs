//! Cavern CLI library.
//!
//! This crate provides command-line interface utilities for the cavern
//! planner, including terminal styling and report formatting.

pub mod output;
pub mod terminal;
