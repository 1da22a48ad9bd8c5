//! Polymarket Gamma API adapter.

mod client;
mod parse;

pub use client::GammaFetcher;
