use serde_json::json;
use skinpredict_core::analysis::{SkinAnalysisResult, SkinTypeAssessment, UserProfile};
use skinpredict_core::catalog::{Localization, PriceTier, PriceTierThresholds};
use skinpredict_core::gateway::{GatewayError, GeolocationProvider, NearbySearch, SkinServiceGateway};
use skinpredict_core::location::LocationError;
use skinpredict_interaction::{HttpSkinGateway, IpApiLocator};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

fn oily_profile() -> UserProfile {
    UserProfile {
        skin_type: "Oily".into(),
        skin_issues: vec!["Acne".into()],
        gender: None,
        age_group: None,
    }
}

fn result() -> SkinAnalysisResult {
    SkinAnalysisResult {
        skin_type: SkinTypeAssessment {
            kind: "Oily".into(),
            confidence: 88.0,
        },
        skin_issues: vec![],
        ai_response: None,
        demographics: None,
        personalized_advice: None,
    }
}

#[tokio::test]
async fn test_analyze_posts_image_and_decodes_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_partial_json(json!({"image": "aGVsbG8=", "use_groq": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "skinType": {"type": "Oily", "confidence": 91.3},
            "skinIssues": [{"name": "Acne", "confidence": 64.0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpSkinGateway::new(server.uri());
    let analysis = gateway.analyze("aGVsbG8=", false).await.unwrap();

    assert_eq!(analysis.skin_type.kind, "Oily");
    assert_eq!(analysis.skin_issues[0].name, "Acne");
}

#[tokio::test]
async fn test_analyze_server_error_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let gateway = HttpSkinGateway::new(server.uri());
    let err = gateway.analyze("aGVsbG8=", true).await.unwrap_err();

    match &err {
        GatewayError::Status { status, message } => {
            assert_eq!(*status, 500);
            assert!(message.contains("model not loaded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_send_email_reports_success_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-email"))
        .and(body_partial_json(json!({"email": "amira@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let gateway = HttpSkinGateway::new(server.uri());
    assert!(gateway.send_email("amira@example.com", &result()).await.unwrap());
}

#[tokio::test]
async fn test_find_dermatologists_reads_places_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/find-dermatologists"))
        .and(query_param("lat", "0"))
        .and(query_param("lng", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {"name": "Dr. A", "vicinity": "Rue 1", "rating": 4.5, "place_id": "p1"},
                {"name": "Dr. B", "vicinity": "Rue 2", "place_id": "p2"}
            ]
        })))
        .mount(&server)
        .await;

    let gateway = HttpSkinGateway::new(server.uri());
    let doctors = gateway.find_dermatologists(0.0, 0.0).await.unwrap();

    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[1].rating, None);
}

#[tokio::test]
async fn test_nearby_products_regroups_backend_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nearby-products"))
        .and(query_param("skinType", "Oily"))
        .and(query_param("radius", "5000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{
                "name": "Gel", "brand": "B", "price": "9.00", "currency": "USD",
                "priceCategory": "Budget", "nearbyStores": []
            }],
            "nearbyStores": []
        })))
        .mount(&server)
        .await;

    let gateway = HttpSkinGateway::new(server.uri());
    let response = gateway
        .find_nearby_products(&NearbySearch {
            lat: 36.8,
            lng: 10.2,
            radius_m: 5000,
            profile: oily_profile(),
        })
        .await;

    assert_eq!(response.tier(PriceTier::Budget).len(), 1);
}

#[tokio::test]
async fn test_catalog_falls_back_when_backend_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nearby-products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product-recommendations"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let gateway = HttpSkinGateway::new(server.uri()).with_pricing(
        Localization {
            currency: "TND".into(),
            rate_from_usd: 3.1,
        },
        PriceTierThresholds::default(),
    );

    let nearby = gateway
        .find_nearby_products(&NearbySearch {
            lat: 0.0,
            lng: 0.0,
            radius_m: 5000,
            profile: oily_profile(),
        })
        .await;
    let premium = nearby.tier(PriceTier::Premium);
    assert_eq!(premium.len(), 1);
    assert_eq!(premium[0].product.currency, "TND");
    assert_eq!(premium[0].product.price, "263.50");

    let online = gateway
        .get_product_recommendations(Some("Tunisia"), &oily_profile())
        .await;
    let brands: Vec<&str> = online.iter().map(|p| p.brand.as_str()).collect();
    assert_eq!(brands, vec!["La Roche-Posay", "Lab Series"]);
}

#[tokio::test]
async fn test_nearby_stores_empty_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nearby-stores"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = HttpSkinGateway::new(server.uri());
    assert!(gateway.find_nearby_stores(1.0, 2.0, 5000, None).await.is_empty());
}

#[tokio::test]
async fn test_ip_locator_parses_ipapi_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": "Tunis", "country_name": "Tunisia",
            "latitude": 36.8065, "longitude": 10.1815
        })))
        .mount(&server)
        .await;

    let locator = IpApiLocator::new(format!("{}/json/", server.uri()));
    let location = locator.locate().await.unwrap();
    assert_eq!(location.country.as_deref(), Some("Tunisia"));
    assert_eq!(location.coordinates.lat, 36.8065);
}

#[tokio::test]
async fn test_ip_locator_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true, "reason": "RateLimited"
        })))
        .mount(&server)
        .await;

    let locator = IpApiLocator::new(format!("{}/json/", server.uri()));
    assert_eq!(
        locator.locate().await.unwrap_err(),
        LocationError::Unavailable("RateLimited".into())
    );
}
