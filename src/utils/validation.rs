use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// Render validation failures as one `- <field> <message>` line per violation.
///
/// Fields are listed alphabetically so the output is stable between requests.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    format_validation_errors_renamed(errors, &[])
}

/// Same as [`format_validation_errors`], reporting fields under their wire names.
///
/// `renames` maps Rust field names to the names clients send, e.g. `("time_zone", "timeZone")`.
pub fn format_validation_errors_renamed(
    errors: &ValidationErrors,
    renames: &[(&str, &str)],
) -> String {
    let mut entries: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field: &str = &field;
            let name = renames
                .iter()
                .find(|(rust_name, _)| *rust_name == field)
                .map_or(field, |(_, wire_name)| *wire_name)
                .to_string();
            field_errors
                .iter()
                .map(move |error| (name.clone(), describe(error)))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let lines: Vec<String> = entries
        .into_iter()
        .map(|(field, message)| format!("- {} {}", field, message))
        .collect();

    format_lines(&lines)
}

/// Wrap pre-rendered `- <field> <message>` lines in the bracketed envelope
pub fn format_lines(lines: &[String]) -> String {
    format!("validation error: [\n{}\n]", lines.join("\n"))
}

/// Build a `ValidationError` carrying a human readable message
pub fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}
