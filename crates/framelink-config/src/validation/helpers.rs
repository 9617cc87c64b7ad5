//! Shared validation helpers.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error unless `value` is a plain CSS length (number with an
/// optional px, em, rem or % unit).
pub(crate) fn validate_css_length(errors: &mut Vec<String>, name: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(format!("{name} must not be empty"));
        return;
    }

    let numeric_part = trimmed
        .strip_suffix("rem")
        .or_else(|| trimmed.strip_suffix("px"))
        .or_else(|| trimmed.strip_suffix("em"))
        .or_else(|| trimmed.strip_suffix('%'))
        .unwrap_or(trimmed);

    match numeric_part.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => {}
        _ => errors.push(format!("{name} = \"{trimmed}\" is not a valid CSS length")),
    }
}
