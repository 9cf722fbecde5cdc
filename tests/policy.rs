//! Cross-origin and rate-limit policy in front of the relay.

use axum::http::StatusCode;

mod common;

use common::{client, gateway_config, start_fixed_backend, start_gateway};

const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

#[tokio::test]
async fn test_requests_past_limit_never_reach_upstream() {
    let (upstream, log) = start_fixed_backend(200, r#"{"results":[]}"#).await;
    let gateway = start_gateway(gateway_config(upstream)).await;
    let client = client();
    let url = format!("http://{}/api/games?search=doom", gateway);

    for i in 1..=100 {
        let res = client.get(&url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "request {} should pass", i);
    }

    for _ in 0..5 {
        let res = client.get(&url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(res.headers().contains_key("retry-after"));
        assert_eq!(res.text().await.unwrap(), RATE_LIMIT_MESSAGE);
    }

    assert_eq!(log.count(), 100, "upstream must not see rejected requests");
}

#[tokio::test]
async fn test_rate_limit_headers_count_down() {
    let (upstream, _log) = start_fixed_backend(200, "{}").await;
    let mut config = gateway_config(upstream);
    config.rate_limit.max_requests = 3;
    let gateway = start_gateway(config).await;
    let client = client();
    let url = format!("http://{}/api/games?search=a", gateway);

    let mut remaining = Vec::new();
    for _ in 0..3 {
        let res = client.get(&url).send().await.unwrap();
        assert_eq!(res.headers()["x-ratelimit-limit"], "3");
        remaining.push(res.headers()["x-ratelimit-remaining"].to_str().unwrap().to_string());
    }
    assert_eq!(remaining, vec!["2", "1", "0"]);
}

#[tokio::test]
async fn test_disallowed_origin_gets_no_allow_header() {
    let (upstream, _log) = start_fixed_backend(200, "{}").await;
    let mut config = gateway_config(upstream);
    config.cors.allowed_origin = Some("https://games.example.com".to_string());
    let gateway = start_gateway(config).await;
    let url = format!("http://{}/api/games?search=a", gateway);

    let res = client()
        .get(&url)
        .header("Origin", "https://intruder.example.net")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("access-control-allow-origin").is_none());

    let res = client()
        .get(&url)
        .header("Origin", "https://games.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "https://games.example.com"
    );
}

#[tokio::test]
async fn test_any_origin_allowed_without_client_domain() {
    let (upstream, _log) = start_fixed_backend(200, "{}").await;
    let gateway = start_gateway(gateway_config(upstream)).await;

    let res = client()
        .get(format!("http://{}/api/games?search=a", gateway))
        .header("Origin", "https://somewhere.example.org")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_preflight_is_answered_without_upstream_call() {
    let (upstream, log) = start_fixed_backend(200, "{}").await;
    let mut config = gateway_config(upstream);
    config.cors.allowed_origin = Some("https://games.example.com".to_string());
    let gateway = start_gateway(config).await;

    let res = client()
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}/api/games", gateway),
        )
        .header("Origin", "https://games.example.com")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "https://games.example.com"
    );
    assert_eq!(log.count(), 0);
}
