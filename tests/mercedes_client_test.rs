use carchat::intent::DoorCommand;
use carchat::{MercedesClient, VehicleApi, VehicleApiError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";
const VEHICLE: &str = "WDD2221591A123456";

async fn client(server: &MockServer) -> MercedesClient {
    MercedesClient::with_base_url(TOKEN, &server.uri()).unwrap()
}

#[tokio::test]
async fn test_reads_use_bearer_token_and_vehicle_path() {
    let server = MockServer::start().await;
    let endpoints = ["tires", "doors", "location", "odometer", "fuel", "stateofcharge"];
    for endpoint in endpoints {
        Mock::given(method("GET"))
            .and(path(format!("/vehicles/{}/{}", VEHICLE, endpoint)))
            .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"endpoint": endpoint})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = client(&server).await;
    let answers = [
        api.tires_pressure(VEHICLE).await.unwrap(),
        api.doors_status(VEHICLE).await.unwrap(),
        api.location(VEHICLE).await.unwrap(),
        api.odometer_info(VEHICLE).await.unwrap(),
        api.fuel_level(VEHICLE).await.unwrap(),
        api.state_of_charge(VEHICLE).await.unwrap(),
    ];

    for (answer, endpoint) in answers.iter().zip(endpoints) {
        assert_eq!(answer["endpoint"], endpoint);
    }
}

#[tokio::test]
async fn test_vehicles_and_vehicle_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": VEHICLE}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/vehicles/{}", VEHICLE)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": VEHICLE, "fueltype": "GASOLIN"})),
        )
        .mount(&server)
        .await;

    let api = client(&server).await;
    assert_eq!(api.vehicles().await.unwrap(), json!([{"id": VEHICLE}]));
    assert_eq!(api.vehicle_info(VEHICLE).await.unwrap()["fueltype"], "GASOLIN");
}

#[tokio::test]
async fn test_door_command_is_posted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/vehicles/{}/doors", VEHICLE)))
        .and(body_json(json!({"command": "UNLOCK"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "INITIATED"})))
        .expect(1)
        .mount(&server)
        .await;

    let answer = client(&server)
        .await
        .set_doors_status(VEHICLE, &DoorCommand::Unlock)
        .await
        .unwrap();
    assert_eq!(answer, json!({"status": "INITIATED"}));
}

#[tokio::test]
async fn test_error_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let err = client(&server).await.fuel_level(VEHICLE).await.unwrap_err();
    match err {
        VehicleApiError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "invalid token");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).await.location(VEHICLE).await.unwrap_err();
    assert!(matches!(err, VehicleApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 1.
    let api = MercedesClient::with_base_url(TOKEN, "http://127.0.0.1:1").unwrap();
    let err = api.odometer_info(VEHICLE).await.unwrap_err();
    assert!(matches!(err, VehicleApiError::Transport(_)));
}
