// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkers Network - move transport between two rule-engine instances
//!
//! This crate provides the networking functionality including:
//! - A host/client TCP channel carrying one move per message
//! - Background accept and receive tasks with prompt cancellation
//! - A thread-safe FIFO queue of decoded incoming moves

#![deny(unsafe_code)]

pub mod channel;
pub mod net_util;
pub mod wire;

pub use channel::{NetworkChannel, NetworkStatus, DEFAULT_PORT};
pub use net_util::CancellationToken;
