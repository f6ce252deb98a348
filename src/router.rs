//! Dispatches a car intent to exactly one vehicle API call.

use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

use crate::error::VehicleApiError;
use crate::formatter::format_command_result;
use crate::intent::{Category, DoorCommand, Intent, INFORMATION};
use crate::vehicle::VehicleApi;

pub type ReadFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, VehicleApiError>> + Send + 'a>>;

/// Read-only call answering an `information` request for one category.
pub type ReadHandler = for<'a> fn(&'a dyn VehicleApi, &'a str) -> ReadFuture<'a>;

fn read_tires<'a>(api: &'a dyn VehicleApi, vehicle_id: &'a str) -> ReadFuture<'a> {
    api.tires_pressure(vehicle_id)
}

fn read_doors<'a>(api: &'a dyn VehicleApi, vehicle_id: &'a str) -> ReadFuture<'a> {
    api.doors_status(vehicle_id)
}

fn read_location<'a>(api: &'a dyn VehicleApi, vehicle_id: &'a str) -> ReadFuture<'a> {
    api.location(vehicle_id)
}

fn read_odometer<'a>(api: &'a dyn VehicleApi, vehicle_id: &'a str) -> ReadFuture<'a> {
    api.odometer_info(vehicle_id)
}

fn read_fuel<'a>(api: &'a dyn VehicleApi, vehicle_id: &'a str) -> ReadFuture<'a> {
    api.fuel_level(vehicle_id)
}

fn read_charge<'a>(api: &'a dyn VehicleApi, vehicle_id: &'a str) -> ReadFuture<'a> {
    api.state_of_charge(vehicle_id)
}

/// Categories in priority order. When an intent carries several keys the
/// first entry of this list that is present wins, the rest are ignored.
pub static ROUTES: [(Category, ReadHandler); 6] = [
    (Category::Tires, read_tires as ReadHandler),
    (Category::Doors, read_doors as ReadHandler),
    (Category::Location, read_location as ReadHandler),
    (Category::Odometer, read_odometer as ReadHandler),
    (Category::Fuel, read_fuel as ReadHandler),
    (Category::Charge, read_charge as ReadHandler),
];

/// What [`route`] did with an intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOutcome {
    /// Raw vehicle API answer, `None` when no call was made.
    pub result: Option<Value>,
    /// Set for information requests only; tells the formatter which branch applies.
    pub category: Option<Category>,
    /// Ready-made confirmation for a door command.
    pub command_text: Option<String>,
}

impl RouteOutcome {
    /// No vehicle action was taken.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.result.is_none() && self.command_text.is_none()
    }
}

/// Performs the vehicle call an intent asks for.
///
/// Intents without a known key are not an error: the empty outcome comes
/// back and nothing is sent. Vehicle API failures are passed on untouched.
pub async fn route(
    intent: &Intent,
    api: &dyn VehicleApi,
    vehicle_id: &str,
) -> Result<RouteOutcome, VehicleApiError> {
    let Some((category, read)) = ROUTES.iter().find(|(c, _)| intent.contains(*c)) else {
        debug!(?intent, "Intent has no vehicle part");
        return Ok(RouteOutcome::none());
    };
    let category = *category;

    if intent.categories().len() > 1 {
        debug!(?intent, %category, "Intent names several vehicle parts, using the first by priority");
    }

    match intent.value(category) {
        Some(INFORMATION) => {
            debug!(%category, %vehicle_id, "Reading vehicle information");
            let result = read(api, vehicle_id).await?;
            Ok(RouteOutcome {
                result: Some(result),
                category: Some(category),
                command_text: None,
            })
        }
        Some(raw) if category == Category::Doors => {
            let command = DoorCommand::from(raw);
            debug!(%command, %vehicle_id, "Sending door command");
            let result = api.set_doors_status(vehicle_id, &command).await?;
            let text = format_command_result(Category::Doors, &result, &command);
            Ok(RouteOutcome {
                result: Some(result),
                category: None,
                command_text: Some(text),
            })
        }
        other => {
            debug!(%category, value = ?other, "Unsupported intent value");
            Ok(RouteOutcome::none())
        }
    }
}
