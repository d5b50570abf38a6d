//! # Asset Resolver
//!
//! The contract every chain-state backend implements.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::Err;

/// The address currently holding an asset.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AssetAddress {
    /// Bech32 address holding one unit of the asset.
    pub address: String,
}

/// An asset held by an address, and how much of it.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AssetQuantity {
    /// Asset unit: policy id concatenated with the hex asset name. The
    /// lovelace entry of a UTXO uses the unit `lovelace`.
    pub asset: String,

    /// Decimal quantity, as reported by the indexer.
    pub quantity: String,
}

/// [`AssetResolver`] is used to look up asset ownership on chain.
///
/// Implementers fetch state from wherever they like (an indexer, a node, a
/// fixture) but must page through complete result sets: callers always get
/// every matching row or an error, never a truncated list.
pub trait AssetResolver: Send + Sync {
    /// Find the single address holding the asset `policy_id || asset_name_hex`.
    ///
    /// # Errors
    ///
    /// Returns [`Err::NotFound`] when no address holds the asset and
    /// [`Err::MultipleOwners`] when more than one does. Transport and decoding
    /// failures are returned as-is.
    fn find_asset(
        &self, policy_id: &str, asset_name_hex: &str,
    ) -> impl Future<Output = Result<AssetAddress>> + Send;

    /// Enumerate every asset held by `address`.
    ///
    /// Stake addresses return the assets held across all payment addresses
    /// under the stake key. Payment addresses return one entry per asset per
    /// UTXO; entries with the same unit are not summed.
    ///
    /// # Errors
    ///
    /// Returns [`Err::UnrecognizedAddress`] if the address is neither a stake
    /// nor a payment address. Any failed page aborts the whole lookup.
    fn lookup_address(
        &self, address: &str,
    ) -> impl Future<Output = Result<Vec<AssetQuantity>>> + Send;
}

/// Address families distinguished by their human-readable prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressKind {
    /// `stake...` reward address.
    Stake,

    /// `addr...` payment address.
    Payment,
}

impl AddressKind {
    /// Classify an address by prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Err::UnrecognizedAddress`] for any other prefix.
    pub fn classify(address: &str) -> Result<Self> {
        if address.starts_with("stake") {
            Ok(Self::Stake)
        } else if address.starts_with("addr") {
            Ok(Self::Payment)
        } else {
            crate::tracerr!(Err::UnrecognizedAddress, "unrecognized address format {address}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefixes() {
        let kind = AddressKind::classify("stake1uxyz").expect("should classify");
        assert_eq!(kind, AddressKind::Stake);
        let kind = AddressKind::classify("stake_test1uxyz").expect("should classify");
        assert_eq!(kind, AddressKind::Stake);
        let kind = AddressKind::classify("addr1qxyz").expect("should classify");
        assert_eq!(kind, AddressKind::Payment);
        let kind = AddressKind::classify("addr_test1qxyz").expect("should classify");
        assert_eq!(kind, AddressKind::Payment);
    }

    #[test]
    fn classify_rejects_others() {
        for address in ["", "DdzFF", "Ae2td", "$alice", " addr1q"] {
            let err = AddressKind::classify(address).expect_err("should reject");
            assert!(err.is(Err::UnrecognizedAddress));
        }
    }
}
