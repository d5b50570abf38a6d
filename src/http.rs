//! # HTTP Resolver
//!
//! A minimal [`AssetResolver`] that builds each indexer request by hand and
//! walks list endpoints with an explicit page counter.
//!
//! The indexer base URL is derived from the project id prefix (`mainnet`,
//! `testnet`, `preview` or `preprod`) unless one is set with
//! [`HttpResolver::with_base_url`].

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{self, AccountAsset, AddressUtxo, AssetAddressRow, PROJECT_ID_HEADER};
use crate::error::Err;
use crate::{AddressKind, AssetAddress, AssetQuantity, AssetResolver, Result, page, tracerr};

/// Resolver issuing plain HTTP requests against a Blockfrost-compatible
/// indexer.
#[derive(Clone)]
pub struct HttpResolver {
    project_id: String,
    base_url: Option<Url>,
    timeout: Option<Duration>,
    http: reqwest::Client,
}

impl HttpResolver {
    /// Create a resolver authenticating with `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Err::InvalidConfig`] if the HTTP client cannot be created.
    pub fn new(project_id: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = match reqwest::Client::builder().default_headers(headers).build() {
            Ok(http) => http,
            Err(e) => tracerr!(Err::InvalidConfig, "failed to create HTTP client: {e}"),
        };

        Ok(Self {
            project_id: project_id.into(),
            base_url: None,
            timeout: None,
            http,
        })
    }

    /// Send requests to `base_url` instead of the hosted indexer selected by
    /// the project id.
    ///
    /// # Errors
    ///
    /// Returns [`Err::InvalidConfig`] if `base_url` is not an absolute URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Some(api::parse_base_url(base_url)?);
        Ok(self)
    }

    /// Fail any single request that takes longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The base URL requests are sent to.
    ///
    /// # Errors
    ///
    /// Returns [`Err::UnrecognizedEnvironment`] if no base URL was set and the
    /// project id prefix does not name a network.
    pub fn base_url(&self) -> Result<Url> {
        if let Some(base) = &self.base_url {
            return Ok(base.clone());
        }
        let env = api::environment(&self.project_id)?;
        api::parse_base_url(api::base_url(env))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "querying indexer");

        let mut request = self.http.get(url.clone()).header(PROJECT_ID_HEADER, &self.project_id);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = match request.send().await {
            Ok(res) => res,
            Err(e) => tracerr!(Err::RequestError, "failed to query {url}: {e}"),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => tracerr!(Err::RequestError, "failed to read response from {url}: {e}"),
        };
        api::decode(&url, status, &body)
    }

    async fn account_assets(
        &self, base: &Url, address: &str, page: u32,
    ) -> Result<Vec<AccountAsset>> {
        let url = api::endpoint(base, &["accounts", address, "addresses", "assets"], Some(page))?;
        self.get(url).await
    }

    async fn utxos(&self, base: &Url, address: &str, page: u32) -> Result<Vec<AddressUtxo>> {
        let url = api::endpoint(base, &["addresses", address, "utxos"], Some(page))?;
        self.get(url).await
    }
}

impl AssetResolver for HttpResolver {
    /// Reads a single page of holders. Unlike the lookups, this does not page:
    /// a first page with two or more rows already rules out a unique owner.
    async fn find_asset(&self, policy_id: &str, asset_name_hex: &str) -> Result<AssetAddress> {
        let base = self.base_url()?;
        let unit = format!("{policy_id}{asset_name_hex}");
        let url = api::endpoint(&base, &["assets", &unit, "addresses"], None)?;

        let rows: Vec<AssetAddressRow> = self.get(url).await?;
        api::single_owner(policy_id, asset_name_hex, rows)
    }

    async fn lookup_address(&self, address: &str) -> Result<Vec<AssetQuantity>> {
        let base = &self.base_url()?;

        match AddressKind::classify(address)? {
            AddressKind::Stake => {
                let pages = page::paginate(move |page| self.account_assets(base, address, page));
                let assets = page::drain(pages)
                    .await
                    .map_err(|e| e.wrap(format!("unable to fetch assets for {address}")))?;
                Ok(assets.into_iter().map(AssetQuantity::from).collect())
            }
            AddressKind::Payment => {
                let pages = page::paginate(move |page| self.utxos(base, address, page));
                let utxos = page::drain(pages)
                    .await
                    .map_err(|e| e.wrap(format!("unable to fetch utxos for {address}")))?;
                Ok(api::flatten_utxos(utxos))
            }
        }
    }
}

impl Debug for HttpResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResolver")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_from_project_id() {
        let resolver = HttpResolver::new("preprodAbc123").expect("should create");
        let base = resolver.base_url().expect("should derive");
        assert_eq!(base.as_str(), "https://cardano-preprod.blockfrost.io/api/v0");

        let resolver = HttpResolver::new("mainnetAbc123").expect("should create");
        let base = resolver.base_url().expect("should derive");
        assert_eq!(base.as_str(), "https://cardano-mainnet.blockfrost.io/api/v0");
    }

    #[test]
    fn base_url_override() {
        let resolver = HttpResolver::new("nonsense")
            .expect("should create")
            .with_base_url("http://127.0.0.1:3000/api/v0/")
            .expect("should parse");
        let base = resolver.base_url().expect("should use override");
        assert_eq!(base.as_str(), "http://127.0.0.1:3000/api/v0");
    }

    #[test]
    fn debug_hides_project_id() {
        let resolver = HttpResolver::new("mainnetSECRET").expect("should create");
        assert!(!format!("{resolver:?}").contains("SECRET"));
    }

    #[tokio::test]
    async fn unrecognized_project_id() {
        let resolver = HttpResolver::new("devnetAbc123").expect("should create");

        let err = resolver.find_asset("p", "616263").await.expect_err("should fail");
        assert!(err.is(Err::UnrecognizedEnvironment));
        let err = resolver.lookup_address("addr1xyz").await.expect_err("should fail");
        assert!(err.is(Err::UnrecognizedEnvironment));
    }
}
