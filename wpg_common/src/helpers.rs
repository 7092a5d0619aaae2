/// Interprets an environment-style boolean flag. Accepts `1`/`0`, `true`/`false`, `yes`/`no` and
/// `on`/`off` in any casing. An unset flag, or one that is none of those, yields `default`.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let normalized = value.map(|v| v.trim().to_ascii_lowercase());
    match normalized.as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
