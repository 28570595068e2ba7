mod fixtures;

use api_billing::{BillingService, NewProfile};
use common::AppError;
use fixtures::{SubscriptionParams, api, default_profile, form_of, pair, plans, profile_data, success};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(default_profile()))
        .expect(1)
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));
    let data = NewProfile {
        plan: Some("simple".to_string()),
        period: Some("monthly".to_string()),
        ..NewProfile::new(1, "ru")
    };
    let profile = service.create_profile(&data).await.unwrap();

    assert_eq!(profile.profile_id(), 1);
    assert_eq!(profile.user_id(), 1);
    assert_eq!(profile.profile_region(), Some("ru"));
    assert_eq!(profile.currency(), Some("rub"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        form_of(&requests[0]),
        vec![
            pair("balance", "0"),
            pair("period", "monthly"),
            pair("plan", "simple"),
            pair("region", "ru"),
            pair("trial", "0"),
            pair("user_id", "1"),
        ]
    );
}

#[tokio::test]
async fn test_create_profile_without_region_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(path("/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(default_profile()))
        .expect(0)
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));
    let data = NewProfile {
        user_id: Some(1),
        ..Default::default()
    };

    let result = service.create_profile(&data).await;
    assert!(matches!(result, Err(AppError::InvalidArgument(field)) if field.contains("region")));
}

#[tokio::test]
async fn test_create_profile_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/profiles"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "user_id": ["The user id has already been taken."],
        })))
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));
    let result = service.create_profile(&NewProfile::new(1, "ru")).await;

    assert!(matches!(
        result,
        Err(AppError::ProfileWasNotCreated { status: 422 })
    ));
}

#[tokio::test]
async fn test_get_profile_by_id_and_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(default_profile()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(default_profile()))
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));

    let profile = service.get_profile_by_id(1).await.unwrap();
    assert_eq!(profile.profile_id(), 1);
    assert_eq!(profile.billing_plan(), Some("free"));
    assert_eq!(profile.billing_plan_id(), 1);
    assert_eq!(profile.billing_period(), Some("monthly"));
    assert_eq!(profile.balance(), Some("0 руб."));
    assert!(profile.has_subscription());

    let profile = service.get_profile_by_user_id(1).await.unwrap();
    assert_eq!(profile.user_id(), 1);
}

#[tokio::test]
async fn test_missing_profiles_raise_not_found() {
    let server = MockServer::start().await;
    Mock::given(path("/profiles/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": 404 })))
        .mount(&server)
        .await;
    Mock::given(path("/users/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": 404 })))
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));

    match service.get_profile_by_id(2).await {
        Err(AppError::ProfileWasNotFound { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("\"2\""));
        }
        _ => panic!("profile #2 should not be found"),
    }

    assert!(matches!(
        service.get_profile_by_user_id(2).await,
        Err(AppError::ProfileWasNotFound { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_get_profiles_in_bulk() {
    let server = MockServer::start().await;
    let second = json!({ "id": 2, "user_id": 5, "region": "ua", "subscription": [] });
    Mock::given(method("GET"))
        .and(path("/profiles"))
        .and(query_param("ids", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([
            profile_data(0, &SubscriptionParams::default()),
            second.clone(),
        ]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("user_ids", "1,5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([
            profile_data(0, &SubscriptionParams::default()),
            second,
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));

    let profiles = service.get_profiles_by_ids(&[1, 0, 2, -3]).await.unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[1].profile_id(), 2);
    assert!(!profiles[1].has_subscription());

    let profiles = service.get_profiles_by_user_ids(&[1, 5]).await.unwrap();
    assert_eq!(profiles[1].user_id(), 5);
}

#[tokio::test]
async fn test_get_profiles_keyed_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles"))
        .and(query_param("ids", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "1": profile_data(0, &SubscriptionParams::default()),
            "2": { "id": 2, "user_id": 5, "region": "ua", "subscription": [] },
        }))))
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));
    let profiles = service.get_profiles_by_ids(&[1, 2]).await.unwrap();

    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].profile_id(), 1);
    assert_eq!(profiles[1].user_id(), 5);
}

#[tokio::test]
async fn test_bulk_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(path("/profiles"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": 500 })))
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));
    let result = service.get_profiles_by_ids(&[1]).await;

    assert!(matches!(
        result,
        Err(AppError::ProfileWasNotFound { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_plans_are_priced_for_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plans()))
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));
    let plans = service.plans("ru").await.unwrap();

    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].name.as_deref(), Some("free"));
    assert_eq!(plans[0].prices["monthly"].as_ref().map(|p| p.raw), Some(0));

    let other = &plans[1];
    let monthly = other.prices["monthly"].as_ref().unwrap();
    assert_eq!(monthly.raw, 150000);
    assert_eq!(monthly.formatted.as_deref(), Some("1500 руб."));
    assert_eq!(other.prices["yearly"], None);
    assert_eq!(other.features["first"].excess_price.raw, 1500);
}

#[tokio::test]
async fn test_plans_request_failure() {
    let server = MockServer::start().await;
    Mock::given(path("/plans"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "error": 503 })))
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));

    assert!(matches!(
        service.plans("ru").await,
        Err(AppError::PlansRequestFailed { status: 503 })
    ));
}

#[tokio::test]
async fn test_unconfigured_service_reports_missing_profile() {
    let service = BillingService::new(common::api::HttpApiProvider::new(None, None).into_api());

    assert!(matches!(
        service.get_profile_by_id(1).await,
        Err(AppError::ProfileWasNotFound { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_create_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "id": 1,
            "actor_type": "profile",
            "actor_id": 1,
            "event": "subscription.renewed",
            "url": "https://example.org/webhook",
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let service = BillingService::new(api(&server));
    let webhook = service
        .create_webhook("profile", 1, "subscription.renewed", "https://example.org/webhook")
        .await
        .unwrap();

    assert_eq!(webhook.actor_type.as_deref(), Some("profile"));
    assert_eq!(webhook.url.as_deref(), Some("https://example.org/webhook"));
}
