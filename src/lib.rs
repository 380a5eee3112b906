//! Workspace tooling package.
//!
//! Holds the `rusty-hook` pre-commit configuration; all functionality lives in
//! `crates/cavern-lib` and `crates/cavern-cli`.
