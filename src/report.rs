//! Plain-text forecast report
//!
//! Renders today's conditions with its alerts, followed by a one-line summary
//! for each remaining day.

use crate::data::DailyForecast;

/// Width of today's rain probability bar in characters
const TODAY_BAR_WIDTH: usize = 20;
/// Width of the per-day rain bar in the outlook
const OUTLOOK_BAR_WIDTH: usize = 10;

/// Formats a temperature, or `--` when the provider had no reading
fn format_temp(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}°C", v),
        _ => "--".to_string(),
    }
}

fn format_rain(value: Option<i32>) -> String {
    match value {
        Some(p) => format!("{}%", p),
        None => "--".to_string(),
    }
}

/// Draws a bar like `[#####-----]`, clamping the percentage to 0-100
fn rain_bar(value: Option<i32>, width: usize) -> String {
    let pct = value.unwrap_or(0).clamp(0, 100) as usize;
    let filled = pct * width / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Render the full report
///
/// `days[0]` is treated as today; `alerts` are the messages produced for it.
pub fn render_report(title: &str, days: &[DailyForecast], alerts: &[String]) -> String {
    let mut lines = vec![format!("7-Day Forecast for {}", title), String::new()];

    if let Some(today) = days.first() {
        lines.push(format!("📅 {}", today.date));
        lines.push(format!("🌡 Max: {}", format_temp(today.temp_max_c)));
        lines.push(format!("❄ Min: {}", format_temp(today.temp_min_c)));
        lines.push("💧 Rain Probability".to_string());
        lines.push(format!(
            "{} {} chance of rain",
            rain_bar(today.rain_probability_pct, TODAY_BAR_WIDTH),
            format_rain(today.rain_probability_pct)
        ));
        lines.push(String::new());
    }

    lines.push("⚠️ Weather Alerts:".to_string());
    lines.extend(alerts.iter().map(|alert| format!("  • {}", alert)));

    if days.len() > 1 {
        lines.push(String::new());
        for day in &days[1..] {
            lines.push(format!(
                "{}  Max {:>7}  Min {:>7}  {} {} rain",
                day.date,
                format_temp(day.temp_max_c),
                format_temp(day.temp_min_c),
                rain_bar(day.rain_probability_pct, OUTLOOK_BAR_WIDTH),
                format_rain(day.rain_probability_pct)
            ));
        }
    }

    lines.join("\n")
}
