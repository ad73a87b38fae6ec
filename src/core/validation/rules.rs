//! Declarative field rules
//!
//! A rule is plain data: a named predicate plus the key under which its
//! message lives in the [`MessageCatalog`](super::MessageCatalog). Rules are
//! written as short strings (`required`, `minlength:2`, `max:5`,
//! `pattern:^[a-z]+$`) so they can live in configuration files.

use crate::core::error::ConfigError;
use crate::core::field::FieldValue;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// A single validation rule
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rule {
    /// Value must not be null or the empty string
    Required,
    /// Text form must have at least this many characters
    MinLength(usize),
    /// Text form must have at most this many characters
    MaxLength(usize),
    /// Numeric value must be at least this
    Min(f64),
    /// Numeric value must be at most this
    Max(f64),
    /// Non-empty text must match the whole pattern
    Pattern(Pattern),
}

/// A compiled, fully anchored regular expression that remembers its source
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rule::Required, Rule::Required) => true,
            (Rule::MinLength(a), Rule::MinLength(b)) | (Rule::MaxLength(a), Rule::MaxLength(b)) => {
                a == b
            }
            (Rule::Min(a), Rule::Min(b)) | (Rule::Max(a), Rule::Max(b)) => a == b,
            (Rule::Pattern(a), Rule::Pattern(b)) => a == b,
            _ => false,
        }
    }
}

impl Rule {
    /// The message key used to look this rule up in a catalog
    pub fn key(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MinLength(_) => "minlength",
            Rule::MaxLength(_) => "maxlength",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Pattern(_) => "pattern",
        }
    }

    /// Check a value against this rule
    pub fn is_satisfied_by(&self, value: &FieldValue) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            // An empty value has length 0 and fails a positive minimum.
            Rule::MinLength(min) => value.char_len() >= *min,
            Rule::MaxLength(max) => value.char_len() <= *max,
            // Range and pattern rules leave empty or non-numeric input to `required`.
            Rule::Min(min) => value.as_number().is_none_or(|n| n >= *min),
            Rule::Max(max) => value.as_number().is_none_or(|n| n <= *max),
            Rule::Pattern(pattern) => {
                value.is_empty() || pattern.is_match(&value.to_string())
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("required"),
            Rule::MinLength(n) => write!(f, "minlength:{}", n),
            Rule::MaxLength(n) => write!(f, "maxlength:{}", n),
            Rule::Min(n) => write!(f, "min:{}", n),
            Rule::Max(n) => write!(f, "max:{}", n),
            Rule::Pattern(p) => write!(f, "pattern:{}", p.as_str()),
        }
    }
}

impl FromStr for Rule {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ConfigError::InvalidRule {
            rule: raw.to_string(),
            message: message.to_string(),
        };

        let (name, arg) = match raw.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg)),
            None => (raw.trim(), None),
        };

        let length = |arg: Option<&str>| -> Result<usize, ConfigError> {
            arg.ok_or_else(|| invalid("missing length"))?
                .trim()
                .parse()
                .map_err(|_| invalid("length must be a non-negative integer"))
        };

        let bound = |arg: Option<&str>| -> Result<f64, ConfigError> {
            let n: f64 = arg
                .ok_or_else(|| invalid("missing bound"))?
                .trim()
                .parse()
                .map_err(|_| invalid("bound must be a number"))?;
            if !n.is_finite() {
                return Err(invalid("bound must be a finite number"));
            }
            Ok(n)
        };

        match name.to_ascii_lowercase().as_str() {
            "required" if arg.is_none() => Ok(Rule::Required),
            "required" => Err(invalid("takes no argument")),
            "minlength" => Ok(Rule::MinLength(length(arg)?)),
            "maxlength" => Ok(Rule::MaxLength(length(arg)?)),
            "min" => Ok(Rule::Min(bound(arg)?)),
            "max" => Ok(Rule::Max(bound(arg)?)),
            "pattern" => {
                let source = arg.ok_or_else(|| invalid("missing pattern"))?;
                Pattern::new(source)
                    .map(Rule::Pattern)
                    .map_err(|e| invalid(&e.to_string()))
            }
            _ => Err(invalid("unknown rule")),
        }
    }
}

impl TryFrom<String> for Rule {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(raw: &str) -> Rule {
        raw.parse().unwrap()
    }

    // === parsing ===

    #[test]
    fn test_parse_known_rules() {
        assert_eq!(rule("required"), Rule::Required);
        assert_eq!(rule("minlength:2"), Rule::MinLength(2));
        assert_eq!(rule("maxLength: 25"), Rule::MaxLength(25));
        assert_eq!(rule("min:1"), Rule::Min(1.0));
        assert_eq!(rule("max:5"), Rule::Max(5.0));
        assert_eq!(rule("pattern:[a-z]+").key(), "pattern");
    }

    #[test]
    fn test_pattern_keeps_colons() {
        let r = rule("pattern:^\\d{2}:\\d{2}$");
        assert_eq!(r.to_string(), "pattern:^\\d{2}:\\d{2}$");
        assert!(r.is_satisfied_by(&FieldValue::from("12:30")));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("minlength".parse::<Rule>().is_err());
        assert!("minlength:-1".parse::<Rule>().is_err());
        assert!("max:lots".parse::<Rule>().is_err());
        assert!("required:yes".parse::<Rule>().is_err());
        assert!("pattern:(".parse::<Rule>().is_err());
        assert!("email".parse::<Rule>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_finite_bounds() {
        for raw in ["min:NaN", "max:inf", "max:-infinity"] {
            match raw.parse::<Rule>() {
                Err(ConfigError::InvalidRule { message, .. }) => {
                    assert_eq!(message, "bound must be a finite number")
                }
                other => panic!("expected {} to be rejected, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["required", "minlength:2", "maxlength:10", "min:1", "max:5"] {
            assert_eq!(rule(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_serde_uses_string_form() {
        let rules: Vec<Rule> = serde_json::from_str(r#"["required", "minlength:2"]"#).unwrap();
        assert_eq!(rules, vec![Rule::Required, Rule::MinLength(2)]);
        assert_eq!(
            serde_json::to_string(&rules).unwrap(),
            r#"["required","minlength:2"]"#
        );
    }

    // === predicates ===

    #[test]
    fn test_required() {
        assert!(!Rule::Required.is_satisfied_by(&FieldValue::Null));
        assert!(!Rule::Required.is_satisfied_by(&FieldValue::from("")));
        assert!(Rule::Required.is_satisfied_by(&FieldValue::from(" ")));
        assert!(Rule::Required.is_satisfied_by(&FieldValue::from(0i64)));
    }

    #[test]
    fn test_minlength_fails_on_empty() {
        let r = Rule::MinLength(2);
        assert!(!r.is_satisfied_by(&FieldValue::from("")));
        assert!(!r.is_satisfied_by(&FieldValue::from("A")));
        assert!(r.is_satisfied_by(&FieldValue::from("Al")));
    }

    #[test]
    fn test_maxlength() {
        let r = Rule::MaxLength(3);
        assert!(r.is_satisfied_by(&FieldValue::from("abc")));
        assert!(!r.is_satisfied_by(&FieldValue::from("abcd")));
        assert!(r.is_satisfied_by(&FieldValue::Null));
    }

    #[test]
    fn test_min_max() {
        assert!(Rule::Min(1.0).is_satisfied_by(&FieldValue::from(1i64)));
        assert!(!Rule::Min(1.0).is_satisfied_by(&FieldValue::from(0i64)));
        assert!(!Rule::Max(5.0).is_satisfied_by(&FieldValue::from("6")));
        assert!(Rule::Max(5.0).is_satisfied_by(&FieldValue::from("")));
        assert!(Rule::Max(5.0).is_satisfied_by(&FieldValue::from("n/a")));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let r = rule("pattern:[a-z]+");
        assert!(r.is_satisfied_by(&FieldValue::from("abc")));
        assert!(!r.is_satisfied_by(&FieldValue::from("abc1")));
        assert!(r.is_satisfied_by(&FieldValue::from("")));
    }
}
