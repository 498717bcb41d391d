use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seller_sync::config::{EconomicsConfig, WeightsConfig};
use seller_sync::enrichment::{OfferSource, WeightSource};
use seller_sync::lookup::UrlLookup;
use seller_sync::pipeline::{run_economics, run_weights};
use seller_sync::storage::Store;

use super::*;

const SUPPLIER: &str = "http://supplier.test/catalog/";

async fn mount_rates(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/tariffs/box"))
        .and(query_param("date", "2025-02-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"data": {"warehouseList": [
                {"warehouseName": "Коледино", "boxDeliveryBase": "48", "boxDeliveryLiter": "11,2"},
                {"warehouseName": "Маркетплейс", "boxDeliveryBase": "40,25", "boxDeliveryLiter": "5"}
            ]}}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/list/goods/filter"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"listGoods": [{
                "nmID": 11,
                "vendorCode": "box_501_3",
                "sizes": [{"sizeID": 1, "price": 1500, "discountedPrice": 1200, "clubDiscountedPrice": 1099}]
            }]}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tariffs/commission"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "report": [{"subjectID": 3979, "kgvpMarketplace": 19.5, "subjectName": "Коробки"}]
        })))
        .mount(server)
        .await;
}

async fn mount_cards(server: &MockServer, cards: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/content/v2/get/cards/list"))
        .respond_with(CursorPager::new(vec![
            ResponseTemplate::new(200).set_body_json(cards_page(cards, ("", 0))),
        ]))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_economics_run_end_to_end() {
    let server = MockServer::start().await;
    mount_rates(&server).await;
    mount_cards(
        &server,
        vec![
            card_json(11, "box_501_3", (10, 20, 30), &["2040000000011"]),
            card_json(12, "box_501_10", (10, 10, 10), &["2040000000012"]),
            card_json(13, "bag_7_1", (10, 10, 10), &["2040000000013"]),
        ],
    )
    .await;

    let loader = FixtureLoader::new(&[(
        "http://supplier.test/catalog/501/",
        offer_page("199.4", 2).as_str(),
    )]);
    let store = Store::in_memory().await.unwrap();

    let config = EconomicsConfig {
        vendor_code_patterns: vec![r"^box_\d+(_\d+)?$".to_string()],
        ..EconomicsConfig::default()
    };

    let summary = run_economics(
        &test_client(&server.uri()),
        &store,
        OfferSource::new(loader.clone(), SUPPLIER),
        &config,
        100,
    )
    .await
    .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.enriched_from_cache, 1);

    // Both codes share product 501: one page load, one row holding the later card.
    assert_eq!(loader.loads(), 1);
    assert_eq!(store.count_products().await.unwrap(), 1);

    let row = store.get_product("501").await.unwrap().unwrap();
    assert_eq!(row.vendor_code, "box_501_10");
    assert_eq!(row.pcs, 10);
    assert_eq!(row.cost, 2000);
    assert_eq!(row.tariff, 40.25);
    assert_eq!(row.available_count, 2);
    // Not in the price list.
    assert_eq!(row.club_discounted_price, 0.0);
    assert_eq!(row.commission, 0);
}

#[tokio::test]
async fn test_economics_row_uses_rates_and_prices() {
    let server = MockServer::start().await;
    mount_rates(&server).await;
    mount_cards(
        &server,
        vec![card_json(11, "box_501_3", (10, 20, 30), &["2040000000011"])],
    )
    .await;

    let loader = FixtureLoader::new(&[(
        "http://supplier.test/catalog/501/",
        offer_page("199.4", 3).as_str(),
    )]);
    let store = Store::in_memory().await.unwrap();

    run_economics(
        &test_client(&server.uri()),
        &store,
        OfferSource::new(loader, SUPPLIER),
        &EconomicsConfig::default(),
        100,
    )
    .await
    .unwrap();

    let row = store.get_product("501").await.unwrap().unwrap();
    assert_eq!(row.nm_id, 11);
    assert_eq!(row.cost, 600);
    assert_eq!(row.tariff, 65.25);
    assert_eq!(row.price, 1500.0);
    assert_eq!(row.club_discounted_price, 1099.0);
    assert_eq!(row.commission, 208);
    assert_eq!(row.available_count, 3);
}

#[tokio::test]
async fn test_economics_survives_failed_lookups() {
    let server = MockServer::start().await;
    // No tariff, price or commission endpoints: every lookup answers 404.
    mount_cards(
        &server,
        vec![
            card_json(11, "box_501_3", (10, 10, 10), &["1"]),
            card_json(12, "box_777_1", (10, 10, 10), &["2"]),
        ],
    )
    .await;

    let loader = FixtureLoader::new(&[(
        "http://supplier.test/catalog/501/",
        offer_page("100", 1).as_str(),
    )]);
    let store = Store::in_memory().await.unwrap();

    let summary = run_economics(
        &test_client(&server.uri()),
        &store,
        OfferSource::new(loader, SUPPLIER),
        &EconomicsConfig::default(),
        100,
    )
    .await
    .unwrap();

    assert_eq!(summary.saved, 1);
    assert_eq!(summary.failed, 1);

    let row = store.get_product("501").await.unwrap().unwrap();
    assert_eq!(row.cost, 300);
    assert_eq!(row.tariff, 0.0);
    assert_eq!(row.commission, 0);
    assert!(store.get_product("777").await.unwrap().is_none());
}

#[tokio::test]
async fn test_economics_default_rules_skip_malformed_code_and_continue() {
    let server = MockServer::start().await;
    mount_cards(
        &server,
        vec![
            card_json(11, "korob_501_3", (10, 10, 10), &["1"]),
            card_json(12, "xyz", (10, 10, 10), &["2"]),
            card_json(13, "box_502_1", (10, 10, 10), &["3"]),
        ],
    )
    .await;

    let loader = FixtureLoader::new(&[
        ("http://supplier.test/catalog/501/", offer_page("199.4", 1).as_str()),
        ("http://supplier.test/catalog/502/", offer_page("50", 4).as_str()),
    ]);
    let store = Store::in_memory().await.unwrap();

    let summary = run_economics(
        &test_client(&server.uri()),
        &store,
        OfferSource::new(loader.clone(), SUPPLIER),
        &EconomicsConfig::default(),
        100,
    )
    .await
    .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(loader.loads(), 2);

    let first = store.get_product("501").await.unwrap().unwrap();
    assert_eq!(first.vendor_code, "korob_501_3");
    assert_eq!(first.cost, 600);

    let last = store.get_product("502").await.unwrap().unwrap();
    assert_eq!(last.vendor_code, "box_502_1");
    assert_eq!(last.cost, 50);
    assert_eq!(store.count_products().await.unwrap(), 2);
}

fn weight_fixtures() -> (FixtureLoader, UrlLookup) {
    let loader = FixtureLoader::new(&[
        (
            "http://supplier.test/catalog/501/",
            catalog_weight_page("145").as_str(),
        ),
        (
            "http://packio.test/19323",
            "<table><tr><td>Вес, кг</td><td>0,004</td></tr></table>",
        ),
    ]);
    let lookup = UrlLookup::from_iter([(
        "bubblebags_19323".to_string(),
        "http://packio.test/19323".to_string(),
    )]);
    (loader, lookup)
}

fn weight_cards() -> Vec<Value> {
    vec![
        card_json(11, "box_501_3", (10, 10, 10), &["2040000000011"]),
        card_json(12, "bubblebags_19323_50", (10, 10, 1), &["2040000000012"]),
        card_json(13, "bubblebags_9001_100", (10, 10, 1), &["2040000000013", "2040000000014"]),
    ]
}

#[tokio::test]
async fn test_weights_run_skips_ambiguous_sku() {
    let server = MockServer::start().await;
    mount_cards(&server, weight_cards()).await;

    let (loader, lookup) = weight_fixtures();
    let store = Store::in_memory().await.unwrap();

    let summary = run_weights(
        &test_client(&server.uri()),
        &store,
        WeightSource::new(loader.clone(), SUPPLIER, lookup).unwrap(),
        &WeightsConfig::default(),
        100,
    )
    .await
    .unwrap();

    assert_eq!(summary.matched, 3);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(loader.loads(), 2);

    let boxed = store.get_weight("box_501_3").await.unwrap().unwrap();
    assert_eq!(boxed.weight, "145");
    assert_eq!(boxed.sku, "2040000000011");

    let bag = store.get_weight("bubblebags_19323_50").await.unwrap().unwrap();
    assert_eq!(bag.weight, "4");
    assert_eq!(bag.pcs, 50);

    assert!(store.get_weight("bubblebags_9001_100").await.unwrap().is_none());
}

#[tokio::test]
async fn test_weights_run_strict_sku_is_fatal() {
    let server = MockServer::start().await;
    mount_cards(&server, weight_cards()).await;

    let (loader, lookup) = weight_fixtures();
    let store = Store::in_memory().await.unwrap();
    let config = WeightsConfig {
        strict_sku: true,
        ..WeightsConfig::default()
    };

    let result = run_weights(
        &test_client(&server.uri()),
        &store,
        WeightSource::new(loader, SUPPLIER, lookup).unwrap(),
        &config,
        100,
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::AmbiguousSku { count: 2, .. })
    ));
}
