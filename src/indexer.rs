//! # Indexer Resolver
//!
//! An [`AssetResolver`](crate::AssetResolver) backed by [`IndexerClient`], a
//! typed client for Blockfrost-compatible indexers.
//!
//! The client exposes each list endpoint both one page at a time and as an
//! all-pages stream. The resolver only uses the streams, draining each one
//! and giving up at the first failed page.

mod client;
mod resolver;

pub use self::client::{IndexerClient, Settings};
pub use self::resolver::IndexerResolver;
