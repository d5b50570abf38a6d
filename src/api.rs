//! # Indexer API
//!
//! Network selection and the JSON shapes returned by a Blockfrost-compatible
//! indexer.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Err;
use crate::{AssetAddress, AssetQuantity, Environment, Result, tracerr};

/// Header carrying the project id (API key) on every request.
pub const PROJECT_ID_HEADER: &str = "project_id";

/// Query parameter selecting the page of a list endpoint.
pub const PAGE_PARAM: &str = "page";

/// The environment a project id was issued for.
///
/// Project ids self-declare their network with a prefix such as
/// `mainnet...` or `preprod...`.
///
/// # Errors
///
/// Returns [`Err::UnrecognizedEnvironment`] if the prefix is not one of
/// `mainnet`, `testnet`, `preview` or `preprod`.
pub fn environment(project_id: &str) -> Result<Environment> {
    let Some(env) = Environment::ALL.into_iter().find(|env| project_id.starts_with(env.as_str()))
    else {
        tracerr!(Err::UnrecognizedEnvironment, "unrecognized environment for project id");
    };
    Ok(env)
}

/// Hosted indexer base URL for an environment.
#[must_use]
pub const fn base_url(env: Environment) -> &'static str {
    match env {
        Environment::Mainnet => "https://cardano-mainnet.blockfrost.io/api/v0",
        Environment::Testnet => "https://cardano-testnet.blockfrost.io/api/v0",
        Environment::Preview => "https://cardano-preview.blockfrost.io/api/v0",
        Environment::Preprod => "https://cardano-preprod.blockfrost.io/api/v0",
    }
}

/// Parse a base URL, ensuring it can be extended with endpoint paths.
///
/// # Errors
///
/// Returns [`Err::InvalidConfig`] if `base` is not an absolute URL.
pub fn parse_base_url(base: &str) -> Result<Url> {
    let Ok(mut url) = Url::parse(base) else {
        tracerr!(Err::InvalidConfig, "invalid base URL {base}");
    };
    if url.cannot_be_a_base() {
        tracerr!(Err::InvalidConfig, "base URL {base} cannot have path segments");
    }
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&path);
    Ok(url)
}

/// Build the URL of an endpoint below `base`.
///
/// `segments` are appended as individual path segments, so values taken from
/// callers (addresses, asset units) are percent-encoded.
///
/// # Errors
///
/// Returns [`Err::InvalidConfig`] if `base` cannot carry path segments.
pub fn endpoint(base: &Url, segments: &[&str], page: Option<u32>) -> Result<Url> {
    let mut url = base.clone();
    {
        let Ok(mut path) = url.path_segments_mut() else {
            tracerr!(Err::InvalidConfig, "base URL {base} cannot have path segments");
        };
        path.pop_if_empty().extend(segments);
    }
    if let Some(page) = page {
        url.query_pairs_mut().append_pair(PAGE_PARAM, &page.to_string());
    }
    Ok(url)
}

/// Check the status of a response and decode its body.
///
/// # Errors
///
/// Returns [`Err::ApiError`] for a non-success status (with the indexer's
/// message when it sent one) and [`Err::DeserializationError`] when the body
/// does not match `T`.
pub fn decode<T: DeserializeOwned>(url: &Url, status: StatusCode, body: &[u8]) -> Result<T> {
    if !status.is_success() {
        let detail = serde_json::from_slice::<ApiErrorResponse>(body)
            .map(|e| format!("{}: {}", e.error, e.message))
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());
        tracerr!(Err::ApiError, "{status} from {}: {detail}", redact(url));
    }
    serde_json::from_slice(body).map_err(|e| {
        let msg = format!("failed to deserialize response from {}: {e}", redact(url));
        tracing::debug!("{msg}");
        crate::Error::from(Err::DeserializationError).wrap(msg)
    })
}

// The URL without its query, for messages.
fn redact(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Error body returned by the indexer alongside a non-success status.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status_code: u16,

    /// Short error name, e.g. "Not Found".
    pub error: String,

    /// Human-readable explanation.
    pub message: String,
}

/// A row of `/assets/{unit}/addresses`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AssetAddressRow {
    /// Address holding the asset.
    pub address: String,

    /// Quantity held at the address.
    #[serde(default)]
    pub quantity: String,
}

/// A row of `/accounts/{stake_address}/addresses/assets`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AccountAsset {
    /// Asset unit (policy id + hex asset name).
    pub unit: String,

    /// Quantity held across the account's addresses.
    pub quantity: String,
}

/// A row of `/addresses/{address}/utxos`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AddressUtxo {
    /// Transaction that created the output.
    #[serde(default)]
    pub tx_hash: String,

    /// Index of the output in the transaction.
    #[serde(default)]
    pub output_index: u32,

    /// Assets (and lovelace) locked in the output.
    pub amount: Vec<Amount>,
}

/// An amount of a single asset.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Amount {
    /// Asset unit, or `lovelace`.
    pub unit: String,

    /// Decimal quantity.
    pub quantity: String,
}

impl From<Amount> for AssetQuantity {
    fn from(amount: Amount) -> Self {
        Self {
            asset: amount.unit,
            quantity: amount.quantity,
        }
    }
}

impl From<AccountAsset> for AssetQuantity {
    fn from(asset: AccountAsset) -> Self {
        Self {
            asset: asset.unit,
            quantity: asset.quantity,
        }
    }
}

/// Reduce the holders of an asset to its single owner.
///
/// # Errors
///
/// Returns [`Err::NotFound`] when no address holds the asset and
/// [`Err::MultipleOwners`] when more than one does.
pub fn single_owner(
    policy_id: &str, asset_name_hex: &str, mut rows: Vec<AssetAddressRow>,
) -> Result<AssetAddress> {
    match rows.len() {
        1 => Ok(AssetAddress {
            address: rows.swap_remove(0).address,
        }),
        0 => tracerr!(
            Err::NotFound,
            "no address holds asset with policyId {policy_id} and assetName {asset_name_hex}"
        ),
        n => tracerr!(
            Err::MultipleOwners,
            "{n} addresses hold asset with policyId {policy_id} and assetName {asset_name_hex}"
        ),
    }
}

/// Flatten UTXOs into one entry per asset per output. Entries sharing a unit
/// are kept separate.
#[must_use]
pub fn flatten_utxos(utxos: Vec<AddressUtxo>) -> Vec<AssetQuantity> {
    utxos.into_iter().flat_map(|utxo| utxo.amount).map(AssetQuantity::from).collect()
}
