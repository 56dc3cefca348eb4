//! Field validation rules.
//!
//! A field's rule chain is plain data: a list of [`Rule`] variants kept in
//! canonical order (required, minimum length, pattern, custom check) and a
//! single message shown when any non-required rule fails.

use std::fmt;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::FieldValues;

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// A compiled regex that serializes as its source text
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(source)?))
    }

    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Named predicates for checks that need more than the field's own value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomCheck {
    /// ISO date that is today or later
    NotBeforeToday,
    /// ISO date strictly later than the date in the named field
    AfterField(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    MinLength(usize),
    Pattern(Pattern),
    Custom(CustomCheck),
}

impl Rule {
    fn rank(&self) -> u8 {
        match self {
            Rule::Required => 0,
            Rule::MinLength(_) => 1,
            Rule::Pattern(_) => 2,
            Rule::Custom(_) => 3,
        }
    }
}

/// What a custom check may look at besides the value itself
pub struct RuleContext<'a> {
    pub values: &'a FieldValues,
    pub today: NaiveDate,
}

/// Parse an ISO `YYYY-MM-DD` date as entered in a date field
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

impl CustomCheck {
    #[must_use]
    pub fn holds(&self, value: &str, ctx: &RuleContext<'_>) -> bool {
        let Some(date) = parse_date(value) else {
            return false;
        };
        match self {
            CustomCheck::NotBeforeToday => date >= ctx.today,
            CustomCheck::AfterField(other) => ctx
                .values
                .get(other)
                .and_then(|v| parse_date(v))
                .is_some_and(|earlier| date > earlier),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(deserialize_with = "canonical_order")]
    rules: Vec<Rule>,
    pub message: String,
}

fn canonical_order<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Vec<Rule>, D::Error> {
    let mut rules = Vec::<Rule>::deserialize(deserializer)?;
    rules.sort_by_key(Rule::rank);
    Ok(rules)
}

impl FieldRule {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self.rules.sort_by_key(Rule::rank);
        self
    }

    #[must_use]
    pub fn required(self) -> Self {
        self.with(Rule::Required)
    }

    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.with(Rule::MinLength(min))
    }

    /// Adds a pattern rule.
    ///
    /// # Errors
    /// Returns the regex compile error for an invalid `source`.
    pub fn pattern(self, source: &str) -> Result<Self, regex::Error> {
        Ok(self.with(Rule::Pattern(Pattern::new(source)?)))
    }

    #[must_use]
    pub fn custom(self, check: CustomCheck) -> Self {
        self.with(Rule::Custom(check))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }

    /// Field this rule compares against, if any
    #[must_use]
    pub fn depends_on(&self) -> Option<&str> {
        self.rules.iter().find_map(|r| match r {
            Rule::Custom(CustomCheck::AfterField(other)) => Some(other.as_str()),
            _ => None,
        })
    }

    /// Run the chain against `value`, stopping at the first failure.
    ///
    /// An empty value only fails when the field is required; the remaining
    /// rules are not consulted for it.
    pub fn check(&self, value: &str, ctx: &RuleContext<'_>) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return if self.is_required() {
                Err(REQUIRED_MESSAGE.to_string())
            } else {
                Ok(())
            };
        }

        for rule in &self.rules {
            let ok = match rule {
                Rule::Required => true,
                Rule::MinLength(min) => value.chars().count() >= *min,
                Rule::Pattern(pattern) => pattern.is_match(value),
                Rule::Custom(check) => check.holds(value, ctx),
            };
            if !ok {
                return Err(self.message.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx(values: &FieldValues) -> RuleContext<'_> {
        RuleContext {
            values,
            today: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        }
    }

    fn name_rule() -> FieldRule {
        FieldRule::new("First name must be at least 2 characters and contain only letters")
            .required()
            .min_length(2)
            .pattern(r"^[a-zA-Z\s]+$")
            .unwrap()
    }

    #[rstest]
    #[case("A")]
    #[case("  B ")]
    #[case("é")]
    fn test_short_value_rejected_even_when_pattern_passes(#[case] value: &str) {
        let values = FieldValues::new();
        let rule = FieldRule::new("too short").min_length(2);
        assert_eq!(rule.check(value, &ctx(&values)), Err("too short".to_string()));
        let err = name_rule().check(value, &ctx(&values)).unwrap_err();
        assert!(err.contains("at least 2"));
    }

    #[test]
    fn test_required_message_wins_for_blank_values() {
        let values = FieldValues::new();
        assert_eq!(
            name_rule().check("   ", &ctx(&values)),
            Err(REQUIRED_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_optional_blank_value_skips_other_rules() {
        let values = FieldValues::new();
        let rule = FieldRule::new("bad").min_length(5);
        assert!(rule.check("", &ctx(&values)).is_ok());
    }

    #[rstest]
    #[case("Mary Ann", true)]
    #[case("R2D2", false)]
    #[case("Jo", true)]
    fn test_pattern(#[case] value: &str, #[case] ok: bool) {
        let values = FieldValues::new();
        assert_eq!(name_rule().check(value, &ctx(&values)).is_ok(), ok);
    }

    #[rstest]
    #[case("2025-01-09", false)]
    #[case("2025-01-10", false)]
    #[case("2025-01-11", true)]
    #[case("not a date", false)]
    fn test_return_date_after_departure(#[case] return_date: &str, #[case] ok: bool) {
        let mut values = FieldValues::new();
        values.insert("departureDate".to_string(), "2025-01-10".to_string());
        let rule = FieldRule::new("Return date must be after departure date")
            .required()
            .custom(CustomCheck::AfterField("departureDate".to_string()));
        assert_eq!(rule.check(return_date, &ctx(&values)).is_ok(), ok);
    }

    #[test]
    fn test_after_field_without_other_value_fails() {
        let values = FieldValues::new();
        let rule = FieldRule::new("after").custom(CustomCheck::AfterField("departureDate".into()));
        assert!(rule.check("2025-01-11", &ctx(&values)).is_err());
    }

    #[rstest]
    #[case("2025-01-04", false)]
    #[case("2025-01-05", true)]
    #[case("2026-03-01", true)]
    fn test_not_before_today(#[case] date: &str, #[case] ok: bool) {
        let values = FieldValues::new();
        let rule = FieldRule::new("future").custom(CustomCheck::NotBeforeToday);
        assert_eq!(rule.check(date, &ctx(&values)).is_ok(), ok);
    }

    #[test]
    fn test_rules_kept_in_canonical_order() {
        let rule = FieldRule::new("m")
            .custom(CustomCheck::NotBeforeToday)
            .min_length(3)
            .required();
        assert!(matches!(rule.rules()[0], Rule::Required));
        assert!(matches!(rule.rules()[1], Rule::MinLength(3)));
        assert!(matches!(rule.rules()[2], Rule::Custom(_)));
    }

    #[test]
    fn test_rule_loaded_from_json() {
        let json = r#"{
            "rules": [{"custom": {"after_field": "departureDate"}}, "required",
                      {"pattern": "^[a-z]+$"}, {"min_length": 2}],
            "message": "nope"
        }"#;
        let rule: FieldRule = serde_json::from_str(json).unwrap();
        assert!(rule.is_required());
        assert_eq!(rule.depends_on(), Some("departureDate"));
        assert_eq!(rule.rules()[2], Rule::Pattern(Pattern::new("^[a-z]+$").unwrap()));

        let bad = r#"{"rules": [{"pattern": "("}], "message": "x"}"#;
        assert!(serde_json::from_str::<FieldRule>(bad).is_err());
    }
}
