//! Weather-derived advisories.
//!
//! Pure rules over a client-supplied weather snapshot plus the stored crops
//! and tasks. No external weather API is involved.

use chrono::NaiveDate;
use shared::{parse_record_date, Advice, AdviceSeverity, Crop, Priority, Task, WeatherSnapshot};

const FROST_TEMP_C: f64 = 0.0;
const HEAT_TEMP_C: f64 = 35.0;
const HEAVY_RAIN_MM: f64 = 10.0;
const FUNGAL_RISK_HUMIDITY: f64 = 85.0;

/// Stages where a frost can kill the planting outright
const FROST_SENSITIVE_STAGES: [&str; 3] = ["planted", "germinated", "growing"];
/// Stages where sustained high humidity invites fungal disease
const HUMIDITY_SENSITIVE_STAGES: [&str; 2] = ["flowering", "fruiting"];

pub fn derive_advice(
    snapshot: &WeatherSnapshot,
    crops: &[Crop],
    tasks: &[Task],
    today: NaiveDate,
) -> Vec<Advice> {
    let mut advice = Vec::new();

    if snapshot.temperature_c <= FROST_TEMP_C {
        let at_risk = crop_names_in_stages(crops, &FROST_SENSITIVE_STAGES);
        if at_risk.is_empty() {
            advice.push(Advice {
                severity: AdviceSeverity::Warning,
                title: "Frost expected".to_string(),
                message: format!(
                    "Temperature of {:.1}°C brings frost risk. Protect any sensitive equipment and seedlings.",
                    snapshot.temperature_c
                ),
            });
        } else {
            advice.push(Advice {
                severity: AdviceSeverity::Critical,
                title: "Frost warning for young plantings".to_string(),
                message: format!(
                    "Temperature of {:.1}°C can kill young plants. Cover or protect: {}.",
                    snapshot.temperature_c,
                    at_risk.join(", ")
                ),
            });
        }
    }

    if snapshot.temperature_c >= HEAT_TEMP_C {
        advice.push(Advice {
            severity: AdviceSeverity::Warning,
            title: "Heat stress".to_string(),
            message: format!(
                "Temperature of {:.1}°C causes heat stress. Increase irrigation and avoid midday field work.",
                snapshot.temperature_c
            ),
        });
    }

    if snapshot.precipitation_mm >= HEAVY_RAIN_MM {
        let ready = crop_names_in_stages(crops, &["ready_to_harvest"]);
        if !ready.is_empty() {
            advice.push(Advice {
                severity: AdviceSeverity::Warning,
                title: "Delay harvest".to_string(),
                message: format!(
                    "{:.1}mm of rain expected. Wet-field harvesting risks crop damage for: {}.",
                    snapshot.precipitation_mm,
                    ready.join(", ")
                ),
            });
        }
    }

    if snapshot.humidity_percent >= FUNGAL_RISK_HUMIDITY {
        let susceptible = crop_names_in_stages(crops, &HUMIDITY_SENSITIVE_STAGES);
        if !susceptible.is_empty() {
            advice.push(Advice {
                severity: AdviceSeverity::Warning,
                title: "Fungal disease risk".to_string(),
                message: format!(
                    "Humidity at {:.0}% favors fungal disease. Inspect and consider treatment for: {}.",
                    snapshot.humidity_percent,
                    susceptible.join(", ")
                ),
            });
        }
    }

    let overdue = tasks
        .iter()
        .filter(|t| !t.completed && t.priority == Priority::High)
        .filter(|t| {
            parse_record_date(&t.due_date)
                .map(|due| due < today)
                .unwrap_or(false)
        })
        .count();
    if overdue > 0 {
        advice.push(Advice {
            severity: AdviceSeverity::Warning,
            title: "Overdue high-priority tasks".to_string(),
            message: format!(
                "{} high-priority task{} past due. Weather windows close fast; reschedule soon.",
                overdue,
                if overdue == 1 { " is" } else { "s are" }
            ),
        });
    }

    if advice.is_empty() {
        let conditions = snapshot.conditions.trim();
        let message = if conditions.is_empty() {
            "No weather concerns for the current crops and schedule.".to_string()
        } else {
            format!(
                "{} poses no concerns for the current crops and schedule.",
                capitalize(conditions)
            )
        };
        advice.push(Advice {
            severity: AdviceSeverity::Info,
            title: "Conditions look good".to_string(),
            message,
        });
    }

    advice
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn crop_names_in_stages(crops: &[Crop], stages: &[&str]) -> Vec<String> {
    crops
        .iter()
        .filter(|c| stages.contains(&c.growth_stage.as_str()))
        .map(|c| c.name.clone())
        .collect()
}
