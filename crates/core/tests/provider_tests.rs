// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Binance, Finnhub synthesis, fixed-ILS rule,
// open.er-api FX (wiremock-backed where HTTP is involved)
// ═══════════════════════════════════════════════════════════════════

use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portfolio_tracker_core::errors::CoreError;
use portfolio_tracker_core::models::asset::Asset;
use portfolio_tracker_core::providers::binance::BinanceProvider;
use portfolio_tracker_core::providers::exchange_rate::OpenErApiProvider;
use portfolio_tracker_core::providers::finnhub::FinnhubProvider;
use portfolio_tracker_core::providers::fixed_ils::FixedIlsProvider;
use portfolio_tracker_core::providers::traits::{
    FxRateProvider, PriceHistoryProvider, QuoteProvider,
};

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Millisecond open-time for a daily candle on `date`.
fn candle_ts(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

// ═══════════════════════════════════════════════════════════════════
// FixedIlsProvider
// ═══════════════════════════════════════════════════════════════════

mod fixed_ils {
    use super::*;

    #[tokio::test]
    async fn synthesizes_one_ils_per_day_ending_today() {
        let provider = FixedIlsProvider::new();
        let series = provider
            .fetch_daily_history(Asset::Pension, 30)
            .await
            .unwrap();

        assert_eq!(series.len(), 30);
        assert_eq!(series.last().unwrap().date, today());
        assert_eq!(series.first().unwrap().date, today() - Duration::days(29));
        for (i, point) in series.iter().enumerate() {
            assert_eq!(point.price, 1.0);
            if i > 0 {
                assert_eq!(point.date, series[i - 1].date + Duration::days(1));
            }
        }
    }

    #[test]
    fn covers_exactly_the_israeli_holdings() {
        let provider = FixedIlsProvider::new();
        assert_eq!(
            provider.supported_assets(),
            vec![Asset::Nadlan, Asset::Pension, Asset::Hishtalmut]
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// BinanceProvider
// ═══════════════════════════════════════════════════════════════════

mod binance {
    use super::*;

    fn klines_body(days: u32) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = (0..days)
            .map(|i| {
                let date = today() - Duration::days(i64::from(days - 1 - i));
                json!([
                    candle_ts(date),
                    "41000.0",
                    "43000.0",
                    "40000.0",
                    format!("{}", 42000 + i64::from(i)),
                    "12345.6"
                ])
            })
            .collect();
        json!(rows)
    }

    #[tokio::test]
    async fn parses_daily_close_prices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/klines"))
            .and(query_param("symbol", "BTCUSDT"))
            .and(query_param("interval", "1d"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(klines_body(5)))
            .mount(&server)
            .await;

        let provider = BinanceProvider::with_base_url(server.uri());
        let series = provider.fetch_daily_history(Asset::Btc, 5).await.unwrap();

        assert_eq!(series.len(), 5);
        assert_eq!(series[0].price, 42000.0);
        assert_eq!(series[4].price, 42004.0);
        assert_eq!(series[4].date, today());
        for pair in series.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[tokio::test]
    async fn short_candle_history_is_data_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/klines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(klines_body(3)))
            .mount(&server)
            .await;

        let provider = BinanceProvider::with_base_url(server.uri());
        let err = provider
            .fetch_daily_history(Asset::Eth, 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::DataUnavailable {
                asset: Asset::Eth,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unreachable_venue_is_data_unavailable() {
        // nothing is listening on this port
        let provider = BinanceProvider::with_base_url("http://127.0.0.1:9");
        let err = provider
            .fetch_daily_history(Asset::Btc, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn quote_parses_price_and_change() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ticker/24hr"))
            .and(query_param("symbol", "ETHUSDT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "lastPrice": "2500.50",
                "priceChangePercent": "-1.25"
            })))
            .mount(&server)
            .await;

        let provider = BinanceProvider::with_base_url(server.uri());
        let quote = provider.fetch_quote(Asset::Eth).await.unwrap();
        assert_eq!(quote.price_usd, 2500.5);
        assert_eq!(quote.change_24h, -1.25);
    }

    #[tokio::test]
    async fn unsupported_asset_has_no_pair() {
        let provider = BinanceProvider::new();
        let err = provider.fetch_daily_history(Asset::Spy, 5).await.unwrap_err();
        assert!(matches!(err, CoreError::DataUnavailable { .. }));
    }
}

// ═══════════════════════════════════════════════════════════════════
// FinnhubProvider
// ═══════════════════════════════════════════════════════════════════

mod finnhub {
    use super::*;

    async fn quote_server(c: f64, dp: f64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", "SPY"))
            .and(query_param("token", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "c": c, "dp": dp })),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn quote_reads_current_price_and_change() {
        let server = quote_server(580.0, 1.2).await;
        let provider = FinnhubProvider::with_base_url(server.uri(), "test-key");

        let quote = provider.fetch_quote(Asset::Spy).await.unwrap();
        assert_eq!(quote.price_usd, 580.0);
        assert_eq!(quote.change_24h, 1.2);
    }

    #[tokio::test]
    async fn zero_quote_is_data_unavailable() {
        let server = quote_server(0.0, 0.0).await;
        let provider = FinnhubProvider::with_base_url(server.uri(), "test-key");

        let err = provider.fetch_quote(Asset::Spy).await.unwrap_err();
        assert!(matches!(err, CoreError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn history_extrapolates_backward_from_the_quote() {
        let server = quote_server(580.0, 1.2).await;
        let provider =
            FinnhubProvider::with_base_url(server.uri(), "test-key").with_jitter(0.0);

        let series = provider.fetch_daily_history(Asset::Spy, 90).await.unwrap();

        assert_eq!(series.len(), 90);
        assert_eq!(series.last().unwrap().date, today());
        assert_eq!(series.last().unwrap().price, 580.0);
        // assumed constant growth: strictly older days are never pricier
        for pair in series.windows(2) {
            assert!(pair[0].price <= pair[1].price);
            assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
        }
        // 89 days back at 10% annual growth is ~567
        let oldest = series.first().unwrap().price;
        assert!(oldest < 580.0 && oldest > 500.0);
    }

    #[tokio::test]
    async fn jitterless_synthesis_is_deterministic() {
        let server = quote_server(580.0, 1.2).await;
        let provider =
            FinnhubProvider::with_base_url(server.uri(), "test-key").with_jitter(0.0);

        let first = provider.fetch_daily_history(Asset::Spy, 30).await.unwrap();
        let second = provider.fetch_daily_history(Asset::Spy, 30).await.unwrap();
        assert_eq!(first, second);
    }
}

// ═══════════════════════════════════════════════════════════════════
// OpenErApiProvider (FX)
// ═══════════════════════════════════════════════════════════════════

mod exchange_rate {
    use super::*;

    #[tokio::test]
    async fn reads_the_ils_rate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "rates": { "ILS": 3.61, "EUR": 0.92 }
            })))
            .mount(&server)
            .await;

        let provider = OpenErApiProvider::with_base_url(server.uri());
        assert_eq!(provider.usd_to_ils().await.unwrap(), 3.61);
    }

    #[tokio::test]
    async fn missing_ils_field_is_rate_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "rates": { "EUR": 0.92 }
            })))
            .mount(&server)
            .await;

        let provider = OpenErApiProvider::with_base_url(server.uri());
        let err = provider.usd_to_ils().await.unwrap_err();
        assert!(matches!(err, CoreError::RateUnavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_source_is_rate_unavailable() {
        let provider = OpenErApiProvider::with_base_url("http://127.0.0.1:9");
        let err = provider.usd_to_ils().await.unwrap_err();
        assert!(matches!(err, CoreError::RateUnavailable(_)));
    }

    #[tokio::test]
    async fn non_positive_rate_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rates": { "ILS": -1.0 }
            })))
            .mount(&server)
            .await;

        let provider = OpenErApiProvider::with_base_url(server.uri());
        let err = provider.usd_to_ils().await.unwrap_err();
        assert!(matches!(err, CoreError::RateUnavailable(_)));
    }
}
