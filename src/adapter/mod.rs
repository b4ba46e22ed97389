//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving adapters: the command-line interface
//! - [`outbound`] - Driven adapters: the Binance exchange client

pub mod inbound;
pub mod outbound;
