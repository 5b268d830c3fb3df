//! `{placeholder}` substitution for popup templates.

use regex::{Captures, Regex};
use std::collections::HashMap;
use thiserror::Error;

const PLACEHOLDER_PATTERN: &str = r"\{ *([\w -]+?) *\}";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("no value provided for template variable: {0}")]
    MissingValue(String),
    #[error("invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Replaces every `{key}` (surrounding spaces allowed) with its value.
///
/// A placeholder without a value is an error rather than being left in the
/// output.
pub fn render(template: &str, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
    let re = Regex::new(PLACEHOLDER_PATTERN)?;

    let mut missing = None;
    let rendered = re.replace_all(template, |caps: &Captures<'_>| {
        let key = &caps[1];
        match values.get(key) {
            Some(value) => value.clone(),
            None => {
                missing.get_or_insert_with(|| key.to_owned());
                String::new()
            }
        }
    });

    match missing {
        Some(key) => Err(TemplateError::MissingValue(key)),
        None => Ok(rendered.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> HashMap<&'static str, String> {
        HashMap::from([
            ("name", "Server room".to_owned()),
            ("description", "Hacking: 3".to_owned()),
        ])
    }

    #[test]
    fn substitutes_placeholders() {
        let rendered = render("{name}\n{description}", &values()).unwrap();

        assert_eq!(rendered, "Server room\nHacking: 3");
    }

    #[test]
    fn tolerates_spaces_inside_braces() {
        let rendered = render("<{ name }>", &values()).unwrap();

        assert_eq!(rendered, "<Server room>");
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = render("{name} {level}", &values()).unwrap_err();

        assert!(matches!(err, TemplateError::MissingValue(key) if key == "level"));
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        assert_eq!(render("plain", &values()).unwrap(), "plain");
    }
}
