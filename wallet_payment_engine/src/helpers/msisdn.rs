/// Converts a raw, user-supplied phone number into the canonical carrier form (`92` country code followed by the
/// ten-digit subscriber number, e.g. `923001234567`).
///
/// The rules, in order:
/// * `None` or an empty/whitespace-only string yields `None`.
/// * Every character that is not an ASCII digit is stripped, except a leading `+`.
/// * An international prefix is collapsed: a leading `00` is dropped, as is a leading `+`.
/// * The local mobile format `03XXXXXXXXX` (11 digits) is rewritten to `92XXXXXXXXX` (12 digits).
/// * A 12-digit string already starting with `92` passes through unchanged.
/// * Anything else passes through stripped but otherwise untouched. Best effort only; the result is not guaranteed
///   to be canonical in that case.
///
/// Pure and infallible. The result is stored alongside a submission but matching never depends on it.
pub fn normalize_msisdn(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut stripped = String::with_capacity(raw.len());
    for (i, c) in raw.chars().enumerate() {
        if c.is_ascii_digit() || (i == 0 && c == '+') {
            stripped.push(c);
        }
    }
    let digits = if let Some(rest) = stripped.strip_prefix("00") {
        rest.to_string()
    } else if let Some(rest) = stripped.strip_prefix('+') {
        rest.to_string()
    } else {
        stripped
    };
    if digits.is_empty() {
        return None;
    }
    if digits.len() == 11 && digits.starts_with("03") {
        return Some(format!("92{}", &digits[1..]));
    }
    Some(digits)
}
