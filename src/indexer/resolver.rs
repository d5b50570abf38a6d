use crate::api;
use crate::indexer::{IndexerClient, Settings};
use crate::page::drain;
use crate::{AddressKind, AssetAddress, AssetQuantity, AssetResolver, Result};

/// [`AssetResolver`] draining the all-pages streams of an [`IndexerClient`].
#[derive(Clone, Debug)]
pub struct IndexerResolver {
    client: IndexerClient,
}

impl IndexerResolver {
    /// Create a resolver for `project_id` with default client settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created. See
    /// [`IndexerClient::new`].
    pub fn new(project_id: &str) -> Result<Self> {
        Ok(Self::with_client(IndexerClient::new(project_id, Settings::default())?))
    }

    /// Create a resolver using an existing client.
    #[must_use]
    pub const fn with_client(client: IndexerClient) -> Self {
        Self { client }
    }

    /// The underlying indexer client.
    #[must_use]
    pub const fn client(&self) -> &IndexerClient {
        &self.client
    }
}

impl AssetResolver for IndexerResolver {
    async fn find_asset(&self, policy_id: &str, asset_name_hex: &str) -> Result<AssetAddress> {
        let unit = format!("{policy_id}{asset_name_hex}");
        let rows = drain(self.client.asset_addresses_all(&unit))
            .await
            .map_err(|e| e.wrap("unable to fetch asset addresses from indexer"))?;
        api::single_owner(policy_id, asset_name_hex, rows)
    }

    async fn lookup_address(&self, address: &str) -> Result<Vec<AssetQuantity>> {
        match AddressKind::classify(address)? {
            AddressKind::Stake => {
                let assets = drain(self.client.account_addresses_assets_all(address))
                    .await
                    .map_err(|e| e.wrap("unable to fetch associated assets"))?;
                Ok(assets.into_iter().map(AssetQuantity::from).collect())
            }
            AddressKind::Payment => {
                let utxos = drain(self.client.address_utxos_all(address))
                    .await
                    .map_err(|e| e.wrap("unable to fetch utxos for address"))?;
                Ok(api::flatten_utxos(utxos))
            }
        }
    }
}
