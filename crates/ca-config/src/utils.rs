/// Interprets a settings value as a boolean.
///
/// Accepts `true`/`yes`/`on`/`1` and `false`/`no`/`off`/`0`/`""` in any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

pub fn flag_text(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
