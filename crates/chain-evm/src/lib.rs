//! EVM primitives for the browser-wallet session core.
//!
//! This crate provides:
//! - The static network catalog mapping chain identifiers to display names
//! - Ethereum address validation (with EIP-55 checksums)
//! - Wei <-> decimal-ether conversion with exact round-tripping
//!
//! Everything here is pure: no provider access, no session state.

pub mod address;
pub mod chains;
pub mod error;
pub mod units;
