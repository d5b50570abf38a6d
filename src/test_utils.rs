//! Resolver implementation that can be used for testing.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Err;
use crate::{AssetAddress, AssetQuantity, AssetResolver, Environment, Result, tracerr};

/// In-memory resolver serving a fixed set of handles for one environment.
///
/// Clones share the same handle set. Lookups iterate handles in sorted order,
/// so results are deterministic.
#[derive(Clone, Debug, Default)]
pub struct MockResolver {
    env: Environment,
    handles: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MockResolver {
    /// Create a resolver for `env` seeded with `(handle, address)` pairs.
    /// Handles are given without the `$` prefix.
    pub fn new<H, A>(env: Environment, pairs: impl IntoIterator<Item = (H, A)>) -> Self
    where
        H: Into<String>,
        A: Into<String>,
    {
        let handles = pairs.into_iter().map(|(h, a)| (h.into(), a.into())).collect();
        Self {
            env,
            handles: Arc::new(RwLock::new(handles)),
        }
    }

    /// The environment the seeded handles belong to.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.env
    }

    /// Point `handle` at `address`, adding the handle if it is not known.
    pub fn set_address(&self, handle: impl Into<String>, address: impl Into<String>) {
        let mut handles = self.handles.write().unwrap_or_else(PoisonError::into_inner);
        handles.insert(handle.into(), address.into());
    }
}

impl AssetResolver for MockResolver {
    async fn find_asset(&self, policy_id: &str, asset_name_hex: &str) -> Result<AssetAddress> {
        if policy_id != self.env.policy_id() {
            let env = self.env;
            tracerr!(Err::WrongPolicy, "wrong policyId ({policy_id}) for environment ({env})");
        }
        let Ok(bytes) = hex::decode(asset_name_hex) else {
            tracerr!(Err::InvalidAssetName, "invalid asset name {asset_name_hex}");
        };
        let handle = String::from_utf8_lossy(&bytes);

        let handles = self.handles.read().unwrap_or_else(PoisonError::into_inner);
        let Some(address) = handles.get(&*handle) else {
            tracerr!(Err::NotFound, "handle not found: {handle}");
        };
        Ok(AssetAddress {
            address: address.clone(),
        })
    }

    async fn lookup_address(&self, address: &str) -> Result<Vec<AssetQuantity>> {
        let policy_id = self.env.policy_id();
        let handles = self.handles.read().unwrap_or_else(PoisonError::into_inner);

        Ok(handles
            .iter()
            .filter(|(_, held_by)| *held_by == address)
            .map(|(handle, _)| AssetQuantity {
                asset: format!("{policy_id}{}", hex::encode(handle)),
                quantity: "1".to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAINNET_POLICY_ID, TESTNET_POLICY_ID};

    #[tokio::test]
    async fn find_seeded() {
        let mock = MockResolver::new(Environment::Mainnet, [("abc", "addr1xyz")]);

        let found = mock.find_asset(MAINNET_POLICY_ID, "616263").await.expect("should find");
        assert_eq!(found.address, "addr1xyz");

        let err = mock.find_asset(MAINNET_POLICY_ID, "78797a").await.expect_err("should miss");
        assert!(err.is(Err::NotFound));
    }

    #[tokio::test]
    async fn rejects_other_policy() {
        let mock = MockResolver::new(Environment::Mainnet, [("abc", "addr1xyz")]);
        let err = mock.find_asset(TESTNET_POLICY_ID, "616263").await.expect_err("should reject");
        assert!(err.is(Err::WrongPolicy));
    }

    #[tokio::test]
    async fn rejects_bad_hex() {
        let mock = MockResolver::new(Environment::Preview, [("abc", "addr_test1xyz")]);
        let err = mock.find_asset(TESTNET_POLICY_ID, "6162zz").await.expect_err("should reject");
        assert!(err.is(Err::InvalidAssetName));
    }

    #[tokio::test]
    async fn set_address_shared_by_clones() {
        let mock = MockResolver::new(Environment::Testnet, Vec::<(String, String)>::new());
        let clone = mock.clone();
        clone.set_address("abc", "addr_test1abc");

        let found = mock.find_asset(TESTNET_POLICY_ID, "616263").await.expect("should find");
        assert_eq!(found.address, "addr_test1abc");
    }

    #[tokio::test]
    async fn lookup_synthesizes_units() {
        let mock = MockResolver::new(
            Environment::Mainnet,
            [("xyz", "addr1xyz"), ("abc", "addr1xyz"), ("www", "addr1www")],
        );

        let assets = mock.lookup_address("addr1xyz").await.expect("should lookup");
        assert_eq!(
            assets,
            vec![
                AssetQuantity {
                    asset: format!("{MAINNET_POLICY_ID}616263"),
                    quantity: "1".to_string(),
                },
                AssetQuantity {
                    asset: format!("{MAINNET_POLICY_ID}78797a"),
                    quantity: "1".to_string(),
                },
            ]
        );
        assert!(mock.lookup_address("addr1none").await.expect("should lookup").is_empty());
    }
}
