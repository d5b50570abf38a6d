//! # Handle Client
//!
//! Converts between handles and asset names and delegates chain lookups to an
//! [`AssetResolver`].

use crate::error::Err;
use crate::{AssetResolver, Environment, Result, tracerr};

/// Resolves handles for a single environment.
///
/// The client holds no state beyond its configuration, so one instance can
/// serve concurrent calls whenever the resolver can.
#[derive(Clone, Debug)]
pub struct HandleClient<R> {
    env: Environment,
    resolver: R,
}

impl<R: AssetResolver> HandleClient<R> {
    /// Create a client resolving handles minted for `environment`.
    pub const fn new(environment: Environment, resolver: R) -> Self {
        Self {
            env: environment,
            resolver,
        }
    }

    /// The environment handles are resolved in.
    pub const fn environment(&self) -> Environment {
        self.env
    }

    /// The policy id handles are minted under in this client's environment.
    pub const fn policy_id(&self) -> &'static str {
        self.env.policy_id()
    }

    /// The resolver used for chain lookups.
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolve a handle to the address currently holding it.
    ///
    /// The leading `$` is optional: `$alice` and `alice` resolve the same.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error, wrapped with the handle, when the handle
    /// cannot be found or is held by more than one address.
    pub async fn resolve_address(&self, handle: &str) -> Result<String> {
        let handle = handle.strip_prefix('$').unwrap_or(handle);
        let policy_id = self.policy_id();

        tracing::debug!(env = %self.env, handle, "resolving handle");
        let asset = self
            .resolver
            .find_asset(policy_id, &hex::encode(handle))
            .await
            .map_err(|e| e.wrap(format!("unable to resolve handle {handle}")))?;

        Ok(asset.address)
    }

    /// Find every handle held by `address`.
    ///
    /// Assets minted under other policies are ignored. The order of the
    /// returned handles is whatever order the resolver reports assets in.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error, wrapped with the address, if the lookup
    /// fails. Returns [`Err::InvalidAssetName`] if any asset under the handle
    /// policy has a name that is not valid hex: one bad entry fails the whole
    /// lookup.
    pub async fn lookup_handles(&self, address: &str) -> Result<Vec<String>> {
        let policy_id = self.policy_id();

        tracing::debug!(env = %self.env, address, "looking up handles");
        let assets = self
            .resolver
            .lookup_address(address)
            .await
            .map_err(|e| e.wrap(format!("unable to lookup address {address}")))?;

        let mut handles = Vec::new();
        for asset in assets {
            if let Some(handle) = handle_from_unit(policy_id, &asset.asset)? {
                handles.push(handle);
            }
        }
        Ok(handles)
    }
}

/// Hex asset name of a handle, with any leading `$` removed.
#[must_use]
pub fn asset_name(handle: &str) -> String {
    hex::encode(handle.strip_prefix('$').unwrap_or(handle))
}

/// Recover the handle from an asset unit.
///
/// Returns `None` when the unit is not minted under `policy_id`. Names that
/// are not UTF-8, such as CIP-68 labelled names (`000de140...`), decode with
/// replacement characters. An empty name decodes to an empty handle.
///
/// # Errors
///
/// Returns [`Err::InvalidAssetName`] if the name following the policy id is
/// not valid hex.
pub fn handle_from_unit(policy_id: &str, unit: &str) -> Result<Option<String>> {
    let Some(name_hex) = unit.strip_prefix(policy_id) else {
        return Ok(None);
    };
    let Ok(bytes) = hex::decode(name_hex) else {
        tracerr!(Err::InvalidAssetName, "invalid handle {name_hex}: not hex");
    };
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAINNET_POLICY_ID, TESTNET_POLICY_ID};

    #[test]
    fn asset_name_strips_prefix() {
        assert_eq!(asset_name("$abc"), "616263");
        assert_eq!(asset_name("abc"), "616263");
        // only one `$` is removed
        assert_eq!(asset_name("$$abc"), "24616263");
    }

    #[test]
    fn unit_round_trip() {
        let unit = format!("{MAINNET_POLICY_ID}{}", asset_name("$sundae"));
        let handle = handle_from_unit(MAINNET_POLICY_ID, &unit).expect("should decode");
        assert_eq!(handle.as_deref(), Some("sundae"));
    }

    #[test]
    fn other_policy_ignored() {
        let unit = format!("{TESTNET_POLICY_ID}616263");
        assert_eq!(handle_from_unit(MAINNET_POLICY_ID, &unit).expect("should skip"), None);
        assert_eq!(handle_from_unit(MAINNET_POLICY_ID, "lovelace").expect("should skip"), None);
    }

    #[test]
    fn malformed_names() {
        for name in ["6", "zz", "61626", "0x61"] {
            let unit = format!("{MAINNET_POLICY_ID}{name}");
            let err = handle_from_unit(MAINNET_POLICY_ID, &unit).expect_err("should fail");
            assert!(err.is(Err::InvalidAssetName), "{name}: {err}");
        }
    }

    #[test]
    fn non_utf8_names_decode_lossily() {
        let unit = format!("{MAINNET_POLICY_ID}000de140{}", asset_name("bob"));
        let handle = handle_from_unit(MAINNET_POLICY_ID, &unit).expect("should decode");
        assert_eq!(handle.as_deref(), Some("\0\r\u{fffd}@bob"));

        let handle = handle_from_unit(MAINNET_POLICY_ID, MAINNET_POLICY_ID).expect("should decode");
        assert_eq!(handle.as_deref(), Some(""));
    }
}
