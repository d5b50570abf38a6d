//! # Cardano Handle
//!
//! Resolve Cardano handles to addresses and addresses back to handles.
//!
//! A handle such as `$alice` is a non-fungible token minted under a policy id
//! that is fixed per network. The token's asset name is the hex encoding of
//! the handle's UTF-8 bytes, so resolving a handle means finding the single
//! address that currently holds `policy_id || hex(handle)`.
//!
//! Chain state is read from a Blockfrost-compatible indexer through an
//! [`AssetResolver`]. Three resolvers are provided:
//!
//! * [`http::HttpResolver`] issues hand-built requests and pages manually.
//! * [`indexer::IndexerResolver`] drives the typed [`indexer::IndexerClient`]
//!   and drains its all-pages streams.
//! * [`test_utils::MockResolver`] serves a fixed in-memory set of handles.
//!
//! ```no_run
//! use cardano_handle::http::HttpResolver;
//! use cardano_handle::{Environment, HandleClient};
//!
//! # async fn run() -> cardano_handle::Result<()> {
//! let resolver = HttpResolver::new("mainnetXXXXXXXXXXXXXXXX")?;
//! let client = HandleClient::new(Environment::Mainnet, resolver);
//!
//! let address = client.resolve_address("$alice").await?;
//! let handles = client.lookup_handles(&address).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod client;
pub mod error;
pub mod http;
pub mod indexer;
pub mod page;
mod policy;
mod resolver;
pub mod test_utils;

#[doc(hidden)]
pub use tracing;

pub use self::client::{HandleClient, asset_name, handle_from_unit};
pub use self::error::{Err, Error};
pub use self::policy::{Environment, MAINNET_POLICY_ID, TESTNET_POLICY_ID, policy_id};
pub use self::resolver::{AddressKind, AssetAddress, AssetQuantity, AssetResolver};

/// Result type for the crate.
pub type Result<T, E = error::Error> = core::result::Result<T, E>;
