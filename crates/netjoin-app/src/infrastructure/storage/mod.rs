//! Persistent storage adapters.
//!
//! - **`config`** – TOML configuration file (`netjoin.toml`).

pub mod config;
