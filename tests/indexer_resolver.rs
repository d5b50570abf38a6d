//! Tests for the indexer client and resolver against a fake indexer.

use std::pin::pin;

use cardano_handle::indexer::{IndexerClient, IndexerResolver, Settings};
use cardano_handle::{Environment, Err, HandleClient, TESTNET_POLICY_ID, asset_name};
use futures_util::TryStreamExt;
use serde_json::{Value, json};
use test_utils::{FakeIndexer, Reply, StatusCode};

const KEY: &str = "preprodTEST";

async fn setup() -> (FakeIndexer, IndexerClient) {
    let indexer = FakeIndexer::start(KEY).await;
    let settings = Settings::new().base_url(indexer.base_url());
    let client = IndexerClient::new(KEY, settings).expect("should create");
    (indexer, client)
}

fn unit(handle: &str) -> String {
    format!("{TESTNET_POLICY_ID}{}", asset_name(handle))
}

fn holders(addresses: &[&str]) -> Value {
    let rows: Vec<Value> =
        addresses.iter().map(|a| json!({"address": a, "quantity": "1"})).collect();
    Value::Array(rows)
}

// Single-page calls return exactly the requested page.
#[tokio::test]
async fn single_page() {
    let (indexer, client) = setup().await;
    assert_eq!(client.network(), Environment::Preprod);

    let path = "/addresses/addr_test1xyz/utxos";
    indexer.pages(
        path,
        vec![
            json!([{"tx_hash": "aa", "output_index": 0, "amount": []}]),
            json!([{"tx_hash": "bb", "output_index": 3, "amount": [{"unit": "lovelace", "quantity": "5"}]}]),
        ],
    );

    let utxos = client.address_utxos("addr_test1xyz", 2).await.expect("should fetch");
    assert_eq!(utxos.len(), 1);
    assert_eq!(utxos[0].tx_hash, "bb");
    assert_eq!(utxos[0].output_index, 3);
    assert_eq!(utxos[0].amount[0].quantity, "5");
    assert_eq!(indexer.requests(path), vec![2]);
}

// The all-pages stream yields each page in order and stops at the empty one.
#[tokio::test]
async fn stream_pages() {
    let (indexer, client) = setup().await;
    let path = format!("/assets/{}/addresses", unit("abc"));
    indexer.pages(&path, vec![holders(&["addr_test1a"]), holders(&["addr_test1b"])]);

    let asset = unit("abc");
    let pages: Vec<_> =
        client.asset_addresses_all(&asset).try_collect().await.expect("should stream");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1][0].address, "addr_test1b");
    assert_eq!(indexer.requests(&path), vec![1, 2, 3]);
}

// The stream ends after the first error.
#[tokio::test]
async fn stream_stops_on_error() {
    let (indexer, client) = setup().await;
    let path = "/accounts/stake_test1abc/addresses/assets";
    indexer.replies(
        path,
        vec![
            Reply::Json(json!([{"unit": unit("a"), "quantity": "1"}])),
            Reply::Status(StatusCode::TOO_MANY_REQUESTS),
            Reply::Json(json!([{"unit": unit("c"), "quantity": "1"}])),
        ],
    );

    let mut stream = pin!(client.account_addresses_assets_all("stake_test1abc"));
    let first = stream.try_next().await.expect("first page").expect("should have a page");
    assert_eq!(first.len(), 1);
    let err = stream.try_next().await.expect_err("second page should fail");
    assert!(err.is(Err::ApiError));
    assert!(stream.try_next().await.expect("should be finished").is_none());
    assert_eq!(indexer.requests(path), vec![1, 2]);
}

// Resolving through the indexer resolver drains every page of holders.
#[tokio::test]
async fn resolve_across_pages() {
    let (indexer, client) = setup().await;
    let path = format!("/assets/{}/addresses", unit("split"));
    indexer.pages(&path, vec![holders(&["addr_test1a"]), holders(&["addr_test1b"])]);
    let single = format!("/assets/{}/addresses", unit("single"));
    indexer.pages(&single, vec![holders(&["addr_test1only"])]);

    let handles = HandleClient::new(Environment::Preprod, IndexerResolver::with_client(client));

    let err = handles.resolve_address("$split").await.expect_err("should fail");
    assert!(err.is(Err::MultipleOwners));

    let addr = handles.resolve_address("$single").await.expect("should resolve");
    assert_eq!(addr, "addr_test1only");

    let err = handles.resolve_address("$unknown").await.expect_err("should fail");
    assert!(err.is(Err::ApiError));
}

// Reverse lookup by stake and by payment address.
#[tokio::test]
async fn lookup_handles() {
    let (indexer, client) = setup().await;
    indexer.pages(
        "/accounts/stake_test1abc/addresses/assets",
        vec![json!([
            {"unit": unit("alice"), "quantity": "1"},
            {"unit": "lovelace", "quantity": "1"}
        ])],
    );
    indexer.pages(
        "/addresses/addr_test1xyz/utxos",
        vec![
            json!([{"tx_hash": "aa", "output_index": 0, "amount": [{"unit": unit("bob"), "quantity": "1"}]}]),
            json!([{"tx_hash": "bb", "output_index": 0, "amount": [{"unit": unit("carol"), "quantity": "1"}]}]),
        ],
    );

    let resolver = IndexerResolver::with_client(client);
    assert_eq!(resolver.client().network(), Environment::Preprod);
    let handles = HandleClient::new(Environment::Preprod, resolver);

    let found = handles.lookup_handles("stake_test1abc").await.expect("should lookup");
    assert_eq!(found, vec!["alice"]);
    let found = handles.lookup_handles("addr_test1xyz").await.expect("should lookup");
    assert_eq!(found, vec!["bob", "carol"]);

    let err = handles.lookup_handles("pool1xyz").await.expect_err("should fail");
    assert!(err.is(Err::UnrecognizedAddress));
}

// A malformed page fails the lookup with a decoding error.
#[tokio::test]
async fn malformed_page() {
    let (indexer, client) = setup().await;
    indexer.replies(
        "/addresses/addr_test1xyz/utxos",
        vec![Reply::Json(json!({"unexpected": "object"}))],
    );

    let handles = HandleClient::new(Environment::Preprod, IndexerResolver::with_client(client));
    let err = handles.lookup_handles("addr_test1xyz").await.expect_err("should fail");
    assert!(err.is(Err::DeserializationError));
}

// Requests made with the wrong project id are refused by the indexer.
#[tokio::test]
async fn wrong_project_id() {
    let indexer = FakeIndexer::start(KEY).await;
    let settings = Settings::new().base_url(indexer.base_url());
    let client = IndexerClient::new("preprodWRONG", settings).expect("should create");

    let err = client.asset_addresses(&unit("abc"), 1).await.expect_err("should be refused");
    assert!(err.is(Err::ApiError));
    assert!(format!("{err:#}").contains("403"));
}
