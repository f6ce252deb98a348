mod common;

use carchat::formatter::{format_information_result, COMMAND_FAILED, DOORS_LOCKED, DOORS_UNLOCKED};
use carchat::intent::{Category, Intent, INFORMATION};
use carchat::{route, VehicleApiError};
use common::{RecordingVehicle, VEHICLE_ID};
use serde_json::json;

fn intent(value: serde_json::Value) -> Intent {
    Intent::from_value(&value)
}

#[tokio::test]
async fn test_each_category_calls_its_endpoint_once() {
    let cases = [
        (Category::Tires, "tires_pressure"),
        (Category::Doors, "doors_status"),
        (Category::Location, "location"),
        (Category::Odometer, "odometer_info"),
        (Category::Fuel, "fuel_level"),
        (Category::Charge, "state_of_charge"),
    ];

    for (category, method) in cases {
        let vehicle = RecordingVehicle::new();
        let outcome = route(&Intent::new().with(category, INFORMATION), &vehicle, VEHICLE_ID)
            .await
            .unwrap();

        assert_eq!(
            vehicle.calls(),
            vec![(method.to_string(), VEHICLE_ID.to_string())],
            "{} should call {}",
            category,
            method
        );
        assert_eq!(outcome.category, Some(category));
        assert!(outcome.result.is_some());
        assert_eq!(outcome.command_text, None);
    }
}

#[tokio::test]
async fn test_lock_command_initiated() {
    let vehicle = RecordingVehicle::new();
    let outcome = route(&intent(json!({"doors": "LOCK"})), &vehicle, VEHICLE_ID)
        .await
        .unwrap();

    assert_eq!(
        vehicle.calls(),
        vec![("set_doors_status:LOCK".to_string(), VEHICLE_ID.to_string())]
    );
    assert_eq!(outcome.result, Some(json!({"status": "INITIATED"})));
    assert_eq!(outcome.category, None);
    assert_eq!(outcome.command_text.as_deref(), Some(DOORS_LOCKED));
}

#[tokio::test]
async fn test_unlock_command_initiated() {
    let vehicle = RecordingVehicle::new();
    let outcome = route(&intent(json!({"doors": "UNLOCK"})), &vehicle, VEHICLE_ID)
        .await
        .unwrap();
    assert_eq!(outcome.command_text.as_deref(), Some(DOORS_UNLOCKED));
}

#[tokio::test]
async fn test_rejected_command_reports_failure() {
    let vehicle = RecordingVehicle::with_door_status("FAILED");
    let outcome = route(&intent(json!({"doors": "LOCK"})), &vehicle, VEHICLE_ID)
        .await
        .unwrap();
    assert_eq!(outcome.command_text.as_deref(), Some(COMMAND_FAILED));
}

#[tokio::test]
async fn test_unknown_key_makes_no_call() {
    let vehicle = RecordingVehicle::new();
    let outcome = route(&intent(json!({"windows": "information"})), &vehicle, VEHICLE_ID)
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert_eq!(outcome.category, None);
    assert!(vehicle.calls().is_empty());
}

#[tokio::test]
async fn test_non_information_value_outside_doors_makes_no_call() {
    let vehicle = RecordingVehicle::new();
    let outcome = route(&intent(json!({"fuel": "REFILL"})), &vehicle, VEHICLE_ID)
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert!(vehicle.calls().is_empty());
}

#[tokio::test]
async fn test_first_key_by_priority_wins() {
    let vehicle = RecordingVehicle::new();
    let outcome = route(
        &intent(json!({"fuel": "information", "tires": "information"})),
        &vehicle,
        VEHICLE_ID,
    )
    .await
    .unwrap();

    assert_eq!(outcome.category, Some(Category::Tires));
    assert_eq!(vehicle.calls().len(), 1);
    assert_eq!(vehicle.calls()[0].0, "tires_pressure");
}

#[tokio::test]
async fn test_vehicle_errors_are_passed_on() {
    let vehicle = RecordingVehicle::failing();
    let err = route(&intent(json!({"location": "information"})), &vehicle, VEHICLE_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, VehicleApiError::Status { .. }));
    assert_eq!(vehicle.calls().len(), 1);
}

#[tokio::test]
async fn test_routed_tires_format_in_wheel_order() {
    let vehicle = RecordingVehicle::new();
    let outcome = route(&intent(json!({"tires": "information"})), &vehicle, VEHICLE_ID)
        .await
        .unwrap();

    let text = format_information_result(outcome.category.unwrap(), &outcome.result.unwrap());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "Front left: 230 kPa");
    assert_eq!(lines[2], "Front right: 231 kPa");
    assert_eq!(lines[3], "Rear left: 240 kPa");
    assert_eq!(lines[4], "Rear right: 241 kPa");
}

#[tokio::test]
async fn test_routed_doors_count_open() {
    let vehicle = RecordingVehicle::new();
    let outcome = route(&intent(json!({"doors": "information"})), &vehicle, VEHICLE_ID)
        .await
        .unwrap();

    let text = format_information_result(Category::Doors, &outcome.result.unwrap());
    assert_eq!(text, "2 doors are open.");
}
