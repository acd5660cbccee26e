use divest::core::{PriceCache, PriceSource};
use divest::core::cache::Store;
use divest::store::KeyValueStore;
use std::path::Path;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_quote_server(status: u16, body: &str, expected_calls: u64) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/quote/SCHD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(expected_calls)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let data_path = dir.join("data");
        let config_content = format!(
            r#"
symbol: "SCHD"
investment: 10000
method: forward
fallback_price: 27.50
providers:
  quote:
    base_url: {}
data_path: "{}"
dividends:
  - date: 2025-06-25
    amount: 0.2602
  - date: 2025-03-26
    amount: 0.2488
  - date: 2024-12-11
    amount: 0.2645
  - date: 2024-09-25
    amount: 0.2499
  - date: 2024-06-26
    amount: 0.2541
  - date: 2024-03-20
    amount: 0.2035
  - date: 2023-12-06
    amount: 0.2377
  - date: 2023-09-20
    amount: 0.2216
"#,
            base_url,
            data_path.display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

async fn cached_price(data_path: &Path) -> Option<f64> {
    let store = KeyValueStore::open(data_path);
    let collection = store.get_collection("quote", true, true)?;
    PriceCache::new(collection).read().await.map(|entry| entry.price)
}

#[test_log::test(tokio::test)]
async fn test_estimate_fetches_and_caches_price() {
    let mock_server = test_utils::create_quote_server(200, r#"{"price": 27.41}"#, 1).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let result = divest::run_command(
        divest::AppCommand::Estimate(divest::EstimateOptions::default()),
        config_path.to_str(),
    )
    .await;
    assert!(
        result.is_ok(),
        "Estimate failed with: {:?}",
        result.err()
    );

    let price = cached_price(&temp_dir.path().join("data")).await;
    info!(?price, "Cached price after first run");
    assert_eq!(price, Some(27.41));
}

#[test_log::test(tokio::test)]
async fn test_second_run_uses_cached_price() {
    // Only one request across both runs
    let mock_server = test_utils::create_quote_server(200, r#"{"price": 27.41}"#, 1).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    for _ in 0..2 {
        let result = divest::run_command(divest::AppCommand::Price, config_path.to_str()).await;
        assert!(result.is_ok(), "Price failed with: {:?}", result.err());
    }
}

#[test_log::test(tokio::test)]
async fn test_server_error_falls_back_without_caching() {
    let mock_server =
        test_utils::create_quote_server(500, r#"{"error": "upstream unavailable"}"#, 1).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let estimate = divest::estimate(&divest::EstimateOptions::default(), config_path.to_str())
        .await
        .expect("Estimate failed");

    assert_eq!(estimate.source, PriceSource::Fallback);
    assert_eq!(estimate.share_price, 27.50);
    assert!(!estimate.loading);
    let error = estimate.fetch_error.as_deref().expect("fetch error recorded");
    assert!(error.contains("500"), "{error}");
    let notice = estimate.fetch_notice().expect("fallback notice");
    assert!(notice.contains("$27.50"), "{notice}");
    // 0.2602 * 4 / 27.50
    assert!((estimate.yield_percent - 3.7847).abs() < 1e-3);

    assert_eq!(cached_price(&temp_dir.path().join("data")).await, None);
}

#[test_log::test(tokio::test)]
async fn test_estimate_returns_live_price() {
    let mock_server = test_utils::create_quote_server(200, r#"{"price": 27.41}"#, 1).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let estimate = divest::estimate(&divest::EstimateOptions::default(), config_path.to_str())
        .await
        .expect("Estimate failed");

    assert_eq!(estimate.source, PriceSource::Live);
    assert_eq!(estimate.share_price, 27.41);
    assert!(estimate.fetch_error.is_none());
    assert!(estimate.fetch_notice().is_none());
}

#[test_log::test(tokio::test)]
async fn test_manual_price_skips_network() {
    let mock_server = test_utils::create_quote_server(200, r#"{"price": 27.41}"#, 0).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let options = divest::EstimateOptions {
        amount: Some(5000.0),
        price: Some(26.10),
        method: Some(divest::core::YieldMethod::TrailingTwelveMonths),
        json: true,
    };
    let result =
        divest::run_command(divest::AppCommand::Estimate(options), config_path.to_str()).await;
    assert!(
        result.is_ok(),
        "Estimate failed with: {:?}",
        result.err()
    );
    assert_eq!(cached_price(&temp_dir.path().join("data")).await, None);
}

#[test_log::test(tokio::test)]
async fn test_history_needs_no_provider() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), "http://127.0.0.1:1");

    let result = divest::run_command(divest::AppCommand::History, config_path.to_str()).await;
    assert!(result.is_ok(), "History failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_is_an_error() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("absent.yaml");

    let result = divest::run_command(divest::AppCommand::History, missing.to_str()).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
