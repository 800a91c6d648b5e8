use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected 'Category.option=value'.")]
    MissingEquals(String),

    #[error("Invalid option key '{0}'. Expected 'Category.option' (e.g., 'HelicalParameters.h_twist').")]
    InvalidKey(String),

    #[error("Component '{component}' cannot be empty in '{key}'.")]
    EmptyComponent { component: &'static str, key: String },

    #[error("Value for '{key}' is not valid YAML: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// One `-S Category.option=value` override.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionOverride {
    pub category: String,
    pub option: String,
    pub value: serde_yaml::Value,
}

/// Splits `Category.option=value`; the value is read as YAML so lists and
/// numbers keep their type.
pub fn parse_override(raw: &str) -> Result<OptionOverride, ParseError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ParseError::MissingEquals(raw.to_string()))?;
    let key = key.trim();

    let (category, option) = key
        .split_once('.')
        .ok_or_else(|| ParseError::InvalidKey(key.to_string()))?;
    if option.contains('.') {
        return Err(ParseError::InvalidKey(key.to_string()));
    }
    if category.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "category",
            key: key.to_string(),
        });
    }
    if option.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "option",
            key: key.to_string(),
        });
    }

    let value = serde_yaml::from_str(value).map_err(|e| ParseError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })?;

    Ok(OptionOverride {
        category: category.to_string(),
        option: option.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn list_values_keep_their_shape() {
        let parsed = parse_override("HelicalParameters.h_twist=[30, 36, 4]").unwrap();
        assert_eq!(parsed.category, "HelicalParameters");
        assert_eq!(parsed.option, "h_twist");
        let Value::Sequence(items) = parsed.value else {
            panic!("expected a sequence");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let parsed = parse_override("RuntimeParameters.type=a=b").unwrap();
        assert_eq!(parsed.value, Value::String("a=b".into()));
    }

    #[test]
    fn scalars_are_typed() {
        assert_eq!(
            parse_override("RuntimeParameters.is_hexad=true").unwrap().value,
            Value::Bool(true)
        );
        assert_eq!(
            parse_override("RuntimeParameters.strand=GCAT").unwrap().value,
            Value::String("GCAT".into())
        );
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert_eq!(
            parse_override("h_twist"),
            Err(ParseError::MissingEquals("h_twist".into()))
        );
        assert_eq!(
            parse_override("h_twist=3"),
            Err(ParseError::InvalidKey("h_twist".into()))
        );
        assert_eq!(
            parse_override("a.b.c=3"),
            Err(ParseError::InvalidKey("a.b.c".into()))
        );
        assert!(matches!(
            parse_override(".strand=GC"),
            Err(ParseError::EmptyComponent {
                component: "category",
                ..
            })
        ));
        assert!(matches!(
            parse_override("RuntimeParameters.=GC"),
            Err(ParseError::EmptyComponent {
                component: "option",
                ..
            })
        ));
    }

    #[test]
    fn unparsable_yaml_is_rejected() {
        assert!(matches!(
            parse_override("HelicalParameters.h_rise=[1, 2"),
            Err(ParseError::InvalidValue { .. })
        ));
    }
}
