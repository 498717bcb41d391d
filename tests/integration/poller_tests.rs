use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seller_sync::config::{PollerConfig, TelegramConfig};
use seller_sync::notifier::TelegramNotifier;
use seller_sync::orders::{OrderFeed, WildberriesFeed};
use seller_sync::scheduler::OrderPoller;

use super::*;

fn wb_feed(server: &MockServer) -> Box<dyn OrderFeed> {
    Box::new(WildberriesFeed::new(test_client(&server.uri())))
}

#[tokio::test]
async fn test_no_new_orders_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/orders/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orders": []})))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::default();
    let mut poller = OrderPoller::new(
        vec![wb_feed(&server)],
        Box::new(notifier.clone()),
        &PollerConfig::default(),
    );
    poller.tick().await;

    assert!(notifier.messages().is_empty());
    assert_eq!(poller.stats().feeds_polled, 1);
}

#[tokio::test]
async fn test_new_orders_become_one_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/orders/new"))
        .and(header("Authorization", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [
                {"id": 1, "article": "box_501_3", "salePrice": 1099, "ddate": "18.10.2026"},
                {"id": 2, "article": "box_502_1", "salePrice": 450, "ddate": "19.10.2026"}
            ]
        })))
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::default();
    let mut poller = OrderPoller::new(
        vec![wb_feed(&server)],
        Box::new(notifier.clone()),
        &PollerConfig::default(),
    );
    poller.tick().await;

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("📦 Новые заказы на Wildberries:\n"));
    assert!(messages[0].contains("🔹 ID: 1, Артикул: box_501_3, Цена: 1099₽"));
    assert!(messages[0].contains("🔹 ID: 2, Артикул: box_502_1, Цена: 450₽"));
}

#[tokio::test]
async fn test_feed_failure_is_counted_and_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/orders/new"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::default();
    let mut poller = OrderPoller::new(
        vec![wb_feed(&server)],
        Box::new(notifier.clone()),
        &PollerConfig::default(),
    );
    poller.tick().await;

    assert!(notifier.messages().is_empty());
    assert_eq!(poller.stats().feed_failures, 1);
}

#[tokio::test]
async fn test_orders_reach_telegram() {
    let marketplace = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/orders/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [{"id": 7, "article": "box_501_3", "salePrice": 1099, "ddate": ""}]
        })))
        .mount(&marketplace)
        .await;

    let telegram = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTOKEN/sendMessage"))
        .and(body_string_contains("chat_id=42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&telegram)
        .await;

    let notifier = TelegramNotifier::new(
        &TelegramConfig {
            api_url: telegram.uri(),
        },
        "TOKEN",
        "42",
        std::time::Duration::from_secs(5),
    )
    .unwrap();

    let mut poller = OrderPoller::new(
        vec![wb_feed(&marketplace)],
        Box::new(notifier),
        &PollerConfig::default(),
    );
    poller.tick().await;

    assert_eq!(poller.stats().messages_sent, 1);
}
