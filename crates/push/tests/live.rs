//! Live delivery test against real FCM.
//!
//! Requires credentials and a registered device token. Run with:
//!
//! ```bash
//! FCM_PROJECT_ID=... FCM_ACCESS_TOKEN=... TEST_DEVICE_TOKEN=... \
//!   cargo test -p herald-push --test live -- --ignored --nocapture
//! ```

use herald_common::config::AppConfig;
use herald_common::types::Notification;
use herald_engine::collaborators::PushTransport;
use herald_push::FcmClient;

#[tokio::test]
#[ignore]
async fn test_send_to_real_device() {
    let config = AppConfig {
        doc_store_url: "http://unused".to_string(),
        fcm_project_id: std::env::var("FCM_PROJECT_ID").unwrap(),
        fcm_access_token: std::env::var("FCM_ACCESS_TOKEN").unwrap(),
        fcm_endpoint: "https://fcm.googleapis.com".to_string(),
        http_port: 0,
    };
    let token = std::env::var("TEST_DEVICE_TOKEN").unwrap();

    let client = FcmClient::new(&config);
    let notification = Notification {
        title: "HearthHerald test".to_string(),
        body: "Delivery check".to_string(),
        data: Default::default(),
    };

    let outcomes = client
        .send_multicast(&[token], &notification)
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].success, "outcome: {:?}", outcomes[0]);
}
