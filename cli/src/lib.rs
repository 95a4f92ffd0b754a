// SPDX-License-Identifier: MIT OR Apache-2.0

//! Headless front-end for P2P checkers
//!
//! Turn orchestration and ASCII rendering around the rule engine; the
//! binary in `main.rs` wires these to stdin and the network channel.

pub mod render;
pub mod session;
