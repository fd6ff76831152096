//! # System Interaction Layer
//!
//! The boundary between the core registry logic and the operating system.
//!
//! - **`executor`**: spawns external processes from plain argument vectors
//!   (never through a shell) and captures their output. Its `CommandRunner`
//!   trait is the seam the registry is tested through.

pub mod executor;
