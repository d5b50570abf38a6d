//! # Indexer Client

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use futures_util::Stream;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{self, AccountAsset, AddressUtxo, AssetAddressRow, PROJECT_ID_HEADER};
use crate::error::Err;
use crate::{Environment, Result, page, tracerr};

const USER_AGENT: &str = concat!("cardano-handle/", env!("CARGO_PKG_VERSION"));

/// Options used when constructing an [`IndexerClient`].
#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// Network to query. Derived from the project id prefix when unset.
    pub network: Option<Environment>,

    /// Indexer base URL. Defaults to the hosted indexer for the network.
    pub base_url: Option<String>,

    /// Per-request timeout. No timeout when unset.
    pub timeout: Option<Duration>,

    /// `User-Agent` header value. Defaults to the crate name and version.
    pub user_agent: Option<String>,
}

impl Settings {
    /// Default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Query `network` regardless of the project id prefix.
    #[must_use]
    pub const fn network(mut self, network: Environment) -> Self {
        self.network = Some(network);
        self
    }

    /// Send requests to `base_url`.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Fail any single request that takes longer than `timeout`.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Identify requests with `user_agent`.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Typed client for a Blockfrost-compatible indexer.
///
/// Every list endpoint has a single-page method taking a 1-based page number
/// and an `_all` method streaming every page in order. Streams end after the
/// first empty page or after the first error.
#[derive(Clone)]
pub struct IndexerClient {
    network: Environment,
    base_url: Url,
    http: reqwest::Client,
}

impl IndexerClient {
    /// Create a client authenticating with `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Err::UnrecognizedEnvironment`] if no network is set and the
    /// project id prefix does not name one, and [`Err::InvalidConfig`] if the
    /// base URL, project id or user agent cannot be used.
    pub fn new(project_id: &str, settings: Settings) -> Result<Self> {
        let network = match settings.network {
            Some(network) => network,
            None => api::environment(project_id)?,
        };
        let base_url = match &settings.base_url {
            Some(base_url) => api::parse_base_url(base_url)?,
            None => api::parse_base_url(api::base_url(network))?,
        };

        let Ok(mut key) = HeaderValue::from_str(project_id) else {
            tracerr!(Err::InvalidConfig, "project id is not a valid header value");
        };
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(PROJECT_ID_HEADER, key);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(settings.user_agent.as_deref().unwrap_or(USER_AGENT));
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = match builder.build() {
            Ok(http) => http,
            Err(e) => tracerr!(Err::InvalidConfig, "failed to create HTTP client: {e}"),
        };

        Ok(Self {
            network,
            base_url,
            http,
        })
    }

    /// The network this client queries.
    #[must_use]
    pub const fn network(&self) -> Environment {
        self.network
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// One page of the addresses holding `asset` (policy id + hex name).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the indexer answers with an
    /// error status, or the response cannot be decoded.
    pub async fn asset_addresses(&self, asset: &str, page: u32) -> Result<Vec<AssetAddressRow>> {
        self.get(&["assets", asset, "addresses"], page).await
    }

    /// One page of the assets held across all addresses of a stake account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the indexer answers with an
    /// error status, or the response cannot be decoded.
    pub async fn account_addresses_assets(
        &self, stake_address: &str, page: u32,
    ) -> Result<Vec<AccountAsset>> {
        self.get(&["accounts", stake_address, "addresses", "assets"], page).await
    }

    /// One page of the UTXOs at a payment address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the indexer answers with an
    /// error status, or the response cannot be decoded.
    pub async fn address_utxos(&self, address: &str, page: u32) -> Result<Vec<AddressUtxo>> {
        self.get(&["addresses", address, "utxos"], page).await
    }

    /// Every page of [`IndexerClient::asset_addresses`].
    pub fn asset_addresses_all<'a>(
        &'a self, asset: &'a str,
    ) -> impl Stream<Item = Result<Vec<AssetAddressRow>>> + Send + 'a {
        page::paginate(move |page| self.asset_addresses(asset, page))
    }

    /// Every page of [`IndexerClient::account_addresses_assets`].
    pub fn account_addresses_assets_all<'a>(
        &'a self, stake_address: &'a str,
    ) -> impl Stream<Item = Result<Vec<AccountAsset>>> + Send + 'a {
        page::paginate(move |page| self.account_addresses_assets(stake_address, page))
    }

    /// Every page of [`IndexerClient::address_utxos`].
    pub fn address_utxos_all<'a>(
        &'a self, address: &'a str,
    ) -> impl Stream<Item = Result<Vec<AddressUtxo>>> + Send + 'a {
        page::paginate(move |page| self.address_utxos(address, page))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], page: u32) -> Result<T> {
        let url = api::endpoint(&self.base_url, segments, Some(page))?;
        tracing::trace!(%url, "indexer request");

        let response = match self.http.get(url.clone()).send().await {
            Ok(res) => res,
            Err(e) => tracerr!(Err::RequestError, "unable to make request to {url}: {e}"),
        };
        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => tracerr!(Err::RequestError, "unable to read response from {url}: {e}"),
        };
        api::decode(&url, status, &body)
    }
}

impl Debug for IndexerClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexerClient")
            .field("network", &self.network)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
