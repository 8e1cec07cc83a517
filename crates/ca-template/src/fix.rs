//! Normalization applied to every template before it is displayed.

use ca_config::Settings;
use ca_utils::version::{version_gt, version_lt};
use serde_json::Value;
use tracing::trace;

use crate::template::{coerce_bool, value_text, Template};

pub const DOCKER_MIN_VER: &str = "6.0";
pub const PLUGIN_MIN_VER: &str = "6.1";

/// Templates first seen before this moment predate first-seen tracking, so
/// they can never count as brand new.
pub const FIRST_SEEN_TRACKING_START: i64 = 1_538_357_652;

const BOOLEAN_KEYS: &[&str] = &["Blacklist", "Deprecated", "Plugin"];

/// Days since the epoch for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Parses a timestamp or a `YYYY-MM-DD` date (anything after the day is ignored).
pub fn parse_date(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = s.parse::<i64>() {
                return Some(ts);
            }
            let date = s.get(..10)?;
            let mut parts = date.splitn(3, '-');
            let year: i64 = parts.next()?.parse().ok()?;
            let month: i64 = parts.next()?.parse().ok()?;
            let day: i64 = parts.next()?.parse().ok()?;
            if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                return None;
            }
            Some(days_from_civil(year, month, day) * 86_400)
        }
        _ => None,
    }
}

/// Whether the template can run on the current OS version.
///
/// Fails when the installed plugin version is listed as incompatible, when
/// `MinVer` is newer than the OS, or when `MaxVer` is older.
pub fn version_check(template: &Template, settings: &Settings) -> bool {
    let os = settings.unraid_version.as_str();

    let plugin_version = template.text("pluginVersion");
    if !plugin_version.is_empty() {
        let incompatible = match template.get("IncompatibleVersion") {
            Some(Value::Array(list)) => list.iter().any(|v| value_text(v) == plugin_version),
            Some(value) => value_text(value) == plugin_version,
            None => false,
        };
        if incompatible {
            trace!("plugin version {} is marked incompatible", plugin_version);
            return false;
        }
    }

    let min_ver = template.text("MinVer");
    if !min_ver.is_empty() && version_gt(&min_ver, os) {
        return false;
    }

    let max_ver = template.text("MaxVer");
    if !max_ver.is_empty() && version_lt(&max_ver, os) {
        return false;
    }

    true
}

/// Fills defaults and coerces loosely typed fields.
pub fn fix_templates(mut template: Template, settings: &Settings) -> Template {
    for key in BOOLEAN_KEYS {
        if let Some(value) = template.get(key) {
            let flag = coerce_bool(value);
            template.set(*key, flag);
        }
    }

    if template.is_blank("MinVer") {
        let min_ver = if template.is_plugin() {
            PLUGIN_MIN_VER
        } else {
            DOCKER_MIN_VER
        };
        template.set("MinVer", min_ver);
    }

    let date = template.get("Date").and_then(parse_date);
    let first_seen = template.get("FirstSeen").and_then(parse_date);
    match (date, first_seen) {
        (Some(date), _) => template.set("Date", date),
        (None, Some(first_seen)) => template.set("Date", first_seen),
        (None, None) => {}
    }
    if let Some(first_seen) = first_seen {
        let date = date.unwrap_or(first_seen);
        if date == first_seen && first_seen >= FIRST_SEEN_TRACKING_START {
            template.set("BrandNewApp", true);
            template.set("Date", Value::Null);
        }
    }

    let deprecated_max = template.text("DeprecatedMaxVer");
    if !deprecated_max.is_empty() && version_gt(&settings.unraid_version, &deprecated_max) {
        template.set("Deprecated", true);
    }

    let compatible = version_check(&template, settings);
    template.set("Compatible", compatible);
    template
}
