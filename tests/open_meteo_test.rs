// Open-Meteo client tests against a mock HTTP server
// Uses mockito for HTTP mocking

use mockito::{Matcher, Server};

use cuaca_service::db::Region;
use cuaca_service::weather::{
    ForecastProvider, ForecastSource, OpenMeteoClient, SyntheticForecaster,
};

fn region(id: &str, lat: f64, lon: f64) -> Region {
    Region {
        id: id.to_string(),
        nama: format!("Wilayah {}", id),
        lat,
        lon,
        admin_level: 2,
    }
}

/// Response body with the exact shape of the real feed, one entry per region.
fn forecast_body(regions: &[Region]) -> String {
    let forecasts = SyntheticForecaster::new().generate(regions);
    serde_json::to_string(&forecasts).expect("serializable forecasts")
}

#[tokio::test]
async fn test_one_request_covers_the_whole_batch() {
    let mut server = Server::new_async().await;
    let regions = vec![
        region("31.71", -6.2, 106.8),
        region("34.71", -7.8, 110.4),
        region("51.71", -8.65, 115.2),
    ];

    let mock = server
        .mock("GET", "/v1/forecast")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("latitude".into(), "-6.2,-7.8,-8.65".into()),
            Matcher::UrlEncoded("longitude".into(), "106.8,110.4,115.2".into()),
            Matcher::UrlEncoded("timezone".into(), "auto".into()),
            Matcher::UrlEncoded("forecast_days".into(), "7".into()),
            Matcher::UrlEncoded("past_days".into(), "7".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(forecast_body(&regions))
        .expect(1)
        .create_async()
        .await;

    let client = OpenMeteoClient::new(format!("{}/v1/forecast", server.url()));
    let forecasts = client.fetch_forecasts(&regions).await.unwrap();

    mock.assert_async().await;
    assert_eq!(forecasts.len(), 3);
    assert_eq!(forecasts[0].hourly.time.len(), 336);
    assert_eq!(forecasts[0].daily.time.len(), 14);
}

#[tokio::test]
async fn test_provider_keys_records_by_region_id() {
    let mut server = Server::new_async().await;
    let regions = vec![region("A", -6.2, 106.8), region("B", -7.8, 110.4)];

    server
        .mock("GET", "/v1/forecast")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(forecast_body(&regions))
        .create_async()
        .await;

    let provider =
        ForecastProvider::OpenMeteo(OpenMeteoClient::new(format!("{}/v1/forecast", server.url())));
    let records = provider.fetch_batch(&regions).await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(records.contains_key("A"));
    assert!(records.contains_key("B"));
    assert_eq!(records["A"].hourly.time.len(), 336);
}

#[tokio::test]
async fn test_single_region_object_response() {
    let mut server = Server::new_async().await;
    let regions = vec![region("31.71", -6.2, 106.8)];

    // A one-coordinate query gets a bare object rather than an array.
    let single = SyntheticForecaster::new().generate(&regions).remove(0);
    server
        .mock("GET", "/v1/forecast")
        .match_query(Matcher::UrlEncoded("latitude".into(), "-6.2".into()))
        .with_status(200)
        .with_body(serde_json::to_string(&single).unwrap())
        .create_async()
        .await;

    let client = OpenMeteoClient::new(format!("{}/v1/forecast", server.url()));
    let forecasts = client.fetch_forecasts(&regions).await.unwrap();

    assert_eq!(forecasts.len(), 1);
    assert_eq!(forecasts[0].timezone, "Asia/Singapore");
}

#[tokio::test]
async fn test_upstream_error_status_fails_the_batch() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/v1/forecast")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let client = OpenMeteoClient::new(format!("{}/v1/forecast", server.url()));
    let result = client.fetch_forecasts(&[region("A", -6.2, 106.8)]).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_malformed_body_fails_the_batch() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/v1/forecast")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"reason": "maintenance"}"#)
        .create_async()
        .await;

    let client = OpenMeteoClient::new(format!("{}/v1/forecast", server.url()));
    let result = client.fetch_forecasts(&[region("A", -6.2, 106.8)]).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_batch_never_calls_upstream() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/forecast")
        .expect(0)
        .create_async()
        .await;

    let client = OpenMeteoClient::new(format!("{}/v1/forecast", server.url()));
    let forecasts = client.fetch_forecasts(&[]).await.unwrap();

    mock.assert_async().await;
    assert!(forecasts.is_empty());
}
