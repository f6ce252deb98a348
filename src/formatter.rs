//! Turns raw vehicle API answers into sentences for the chat window.
//!
//! Field extraction never fails. A value missing from the answer is rendered
//! as the literal `null`, a response the formatter does not understand falls
//! back to [`NOT_SUPPORTED`].

use serde_json::Value;

use crate::intent::{Category, DoorCommand};

pub const NOT_SUPPORTED: &str = "Sorry, this request is not supported yet by the Mercedes-Benz API";
pub const COMMAND_FAILED: &str = "Sorry, the command could not be executed. Please try again.";
pub const DOORS_LOCKED: &str = "Your cars doors are locked now.";
pub const DOORS_UNLOCKED: &str = "Your cars doors are unlocked now.";

/// Status reported by the API when it accepted a command.
const INITIATED: &str = "INITIATED";

/// Follows a dotted path (`"tirepressurefrontleft.value"`) into `value`.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |node, key| node.get(key))
}

/// Renders a looked-up value for interpolation: strings without quotes,
/// absent values and JSON null as `null`.
fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn field(result: &Value, path: &str) -> String {
    render(lookup(result, path))
}

/// Whether a vehicle answer carries anything worth reporting. `null` and
/// empty objects or arrays do not.
pub fn has_content(result: &Value) -> bool {
    match result {
        Value::Null => false,
        Value::Object(entries) => !entries.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Confirmation text for a command sent to the vehicle.
pub fn format_command_result(category: Category, result: &Value, command: &DoorCommand) -> String {
    match category {
        Category::Doors => {
            let status = lookup(result, "status").and_then(Value::as_str);
            if status != Some(INITIATED) {
                return COMMAND_FAILED.to_string();
            }
            match command {
                DoorCommand::Lock => DOORS_LOCKED.to_string(),
                DoorCommand::Unlock => DOORS_UNLOCKED.to_string(),
                DoorCommand::Other(_) => NOT_SUPPORTED.to_string(),
            }
        }
        _ => NOT_SUPPORTED.to_string(),
    }
}

/// Human readable report for an information request. Multi-line answers
/// use `\n`, the presenter turns each line into its own bubble.
pub fn format_information_result(category: Category, result: &Value) -> String {
    match category {
        Category::Tires => tires(result),
        Category::Doors => doors(result),
        Category::Location => format!(
            "Your car is at latitude: {} and longitude: {}.",
            field(result, "latitude.value"),
            field(result, "longitude.value")
        ),
        Category::Odometer => odometer(result),
        Category::Fuel => format!(
            "Your cars fuel level is at {} {}.",
            field(result, "fuellevelpercent.value"),
            field(result, "fuellevelpercent.unit")
        ),
        Category::Charge => format!(
            "Your cars state of charge is at {} {}.",
            field(result, "stateofcharge.value"),
            field(result, "stateofcharge.unit")
        ),
    }
}

fn tires(result: &Value) -> String {
    // The API reports one unit per wheel; the front left one speaks for all.
    let unit = field(result, "tirepressurefrontleft.unit");
    let wheels = [
        ("Front left", "tirepressurefrontleft.value"),
        ("Front right", "tirepressurefrontright.value"),
        ("Rear left", "tirepressurerearleft.value"),
        ("Rear right", "tirepressurerearright.value"),
    ];

    let mut lines = vec!["Your tires have the following pressure values:".to_string()];
    lines.extend(
        wheels
            .iter()
            .map(|(label, path)| format!("{}: {} {}", label, field(result, path), unit)),
    );
    lines.join("\n")
}

fn doors(result: &Value) -> String {
    // Counting nothing would claim the car is shut and locked.
    let Value::Object(entries) = result else {
        return NOT_SUPPORTED.to_string();
    };
    if entries.is_empty() {
        return NOT_SUPPORTED.to_string();
    }
    let statuses: Vec<&str> = entries
        .values()
        .filter_map(|entry| entry.get("value"))
        .filter_map(Value::as_str)
        .collect();
    let open = statuses.iter().filter(|s| **s == "OPEN").count();
    let unlocked = statuses.iter().filter(|s| **s == "UNLOCKED").count();

    match (open, unlocked) {
        (0, 0) => "All doors are closed and locked.".to_string(),
        (open, 0) => format!("{} doors are open.", open),
        (0, unlocked) => format!("{} doors are unlocked.", unlocked),
        (open, unlocked) => format!(
            "{} doors are open and {} doors are unlocked.",
            open, unlocked
        ),
    }
}

fn odometer(result: &Value) -> String {
    let unit = field(result, "distancesincereset.unit");
    [
        format!(
            "You have driven {} {} since you started,",
            field(result, "distancesincestart.value"),
            unit
        ),
        format!(
            "since the last reset you drove {} {},",
            field(result, "distancesincereset.value"),
            unit
        ),
        format!(
            "and you drove {} {} in total.",
            field(result, "odometer.value"),
            unit
        ),
    ]
    .join("\n")
}
