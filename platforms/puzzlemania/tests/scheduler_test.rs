use core_logic::{ConfigError, ManualClock, ProxyDescriptor};
use puzzlemania::config::PuzzleConfig;
use puzzlemania::identity::{build_identities, Identity};
use puzzlemania::scheduler::Scheduler;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Well-known development keys, never funded
const KEY_A: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ADDR_A: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const KEY_B: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
const ADDR_B: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

fn test_config(server: &MockServer) -> PuzzleConfig {
    let mut config = PuzzleConfig::default();
    config.api.auth_base_url = server.uri();
    config.api.campaign_url = format!("{}/", server.uri());
    config.retry.max_attempts = 2;
    config.retry.delay_ms = 5;
    config.timing.pacing_delay_ms = 3000;
    config
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/siwe/init"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nonce": "test-nonce" })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/siwe/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "external-token",
            "user": { "linked_accounts": [
                { "type": "twitter_oauth", "name": "tester | og" }
            ]}
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": "UserLogin" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "userLogin": "platform-token" }
        })))
        .mount(server)
        .await;
}

async fn mount_engine(server: &MockServer, activities: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": "UserMe" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "userMe": { "campaignSpot": { "points": 42, "records": [] } } }
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": "Campaign" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "campaign": { "activities": activities } }
        })))
        .mount(server)
        .await;
}

/// Addresses of SIWE init requests, in arrival order.
async fn init_request_addresses(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/api/v1/siwe/init")
        .map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            body["address"].as_str().unwrap().to_string()
        })
        .collect()
}

// Scenario A: two identities, both logins succeed on the first proxied
// attempt, processed in input order with a pacing delay after each.
#[tokio::test]
async fn two_identities_processed_in_order_with_pacing() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = Arc::new(ManualClock::new());

    mount_login(&server).await;
    mount_engine(&server, json!([])).await;

    // The mock server doubles as an HTTP proxy to itself: plain-HTTP proxying
    // sends absolute-form requests it still matches, so the proxied dialer is
    // genuinely exercised. One bare ip:port shape, one pre-formed URL.
    let addr = server.address();
    let proxies = vec![
        format!("{}:{}", addr.ip(), addr.port()),
        format!("http://{}:{}", addr.ip(), addr.port()),
    ];
    let mut keys = vec![KEY_A.to_string(), KEY_B.to_string()];
    let identities = build_identities(&mut keys, &proxies).unwrap();
    let pool: Vec<ProxyDescriptor> = proxies
        .iter()
        .map(|line| ProxyDescriptor::parse(line).unwrap())
        .collect();

    let scheduler = Scheduler::new(config, identities, pool, clock.clone());
    scheduler.run_pass().await;

    // Input order preserved, one handshake each
    assert_eq!(init_request_addresses(&server).await, vec![ADDR_A, ADDR_B]);
    // Exactly one pacing delay per identity, nothing else slept
    assert_eq!(clock.recorded_sleeps(), vec![3000, 3000]);
}

// Scenario B: four proxied attempts fail on a dead proxy, the fifth (direct)
// succeeds and the engine runs exactly once.
#[tokio::test]
async fn direct_fallback_after_proxy_failures() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = Arc::new(ManualClock::new());

    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": "UserMe" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "userMe": { "campaignSpot": { "points": 0, "records": [] } } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": "Campaign" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "campaign": { "activities": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut keys = vec![KEY_A.to_string()];
    let proxies = vec!["127.0.0.1:9".to_string()];
    let identities = build_identities(&mut keys, &proxies).unwrap();
    // Pool of one dead proxy: attempts 1-4 fail, attempt 5 runs direct
    let pool = vec![ProxyDescriptor::parse("127.0.0.1:9").unwrap()];

    let scheduler = Scheduler::new(config, identities, pool, clock.clone());
    scheduler.run_pass().await;

    // Only the direct attempt reached the auth host
    assert_eq!(init_request_addresses(&server).await, vec![ADDR_A]);
}

// Scenario C: identity/proxy count mismatch is fatal before any network call.
#[tokio::test]
async fn count_mismatch_fails_before_any_network_call() {
    let server = MockServer::start().await;

    let mut keys = vec![KEY_A.to_string(), KEY_B.to_string(), KEY_A.to_string()];
    let proxies = vec!["10.0.0.1:8080".to_string(), "10.0.0.2:8080".to_string()];
    let err = build_identities(&mut keys, &proxies).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::CountMismatch {
            identities: 3,
            proxies: 2
        })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// Scenario D: snapshot fetch fails after login; no task is verified and the
// scheduler still proceeds to the next identity.
#[tokio::test]
async fn snapshot_failure_skips_report_and_continues() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = Arc::new(ManualClock::new());

    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": "UserMe" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "userMe": { "campaignSpot": { "points": 1, "records": [] } } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": "Campaign" })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": "VerifyActivity" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let identities = vec![
        Identity::from_key(KEY_A, None).unwrap(),
        Identity::from_key(KEY_B, None).unwrap(),
    ];
    let scheduler = Scheduler::new(config, identities, Vec::new(), clock.clone());
    scheduler.run_pass().await;

    // Both identities logged in despite the first one's aborted cycle
    assert_eq!(init_request_addresses(&server).await, vec![ADDR_A, ADDR_B]);
    assert_eq!(clock.recorded_sleeps(), vec![3000, 3000]);
}
