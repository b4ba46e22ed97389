//! Binance exchange integration.

pub mod client;
pub mod dto;
pub mod exchange;
pub mod settings;

pub use client::BinanceClient;
pub use exchange::BinanceExchange;
pub use settings::{BinanceConfig, BinanceCredentials, BinanceHttpConfig};
