//! Form layout: which fields live on which step, and the rule table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rules::{CustomCheck, FieldRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Required marker on the step; only marked fields gate step navigation
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    #[must_use]
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            required: true,
        }
    }

    #[must_use]
    pub fn optional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl StepDefinition {
    #[must_use]
    pub fn new(title: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            title: title.to_string(),
            fields,
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub steps: Vec<StepDefinition>,
    #[serde(default)]
    pub rules: BTreeMap<String, FieldRule>,
}

impl FormDefinition {
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Step by 1-based number
    #[must_use]
    pub fn step(&self, number: usize) -> Option<&StepDefinition> {
        number.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    /// Whether `field` appears on some step or has a rule
    #[must_use]
    pub fn knows(&self, field: &str) -> bool {
        self.rules.contains_key(field) || self.field_spec(field).is_some()
    }

    /// Whether some step marks `field` as required
    #[must_use]
    pub fn marked_required(&self, field: &str) -> bool {
        self.field_spec(field).is_some_and(|spec| spec.required)
    }

    fn field_spec(&self, field: &str) -> Option<&FieldSpec> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == field)
    }

    /// Fields checked on submit: those with a rule or a required marker
    #[must_use]
    pub fn submit_checked_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        for spec in self.steps.iter().flat_map(|s| s.fields.iter()) {
            if spec.required && !names.contains(&spec.name.as_str()) {
                names.push(&spec.name);
            }
        }
        names
    }

    /// Fields whose rule compares against `field`
    pub fn dependents_of<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.rules
            .iter()
            .filter(move |(_, rule)| rule.depends_on() == Some(field))
            .map(|(name, _)| name.as_str())
    }

    /// The three-step travel booking form
    ///
    /// # Panics
    /// Only if one of the built-in patterns fails to compile.
    #[must_use]
    pub fn booking() -> Self {
        let name_pattern = r"^[a-zA-Z\s]+$";
        let mut rules = BTreeMap::new();

        rules.insert(
            "firstName".to_string(),
            FieldRule::new("First name must be at least 2 characters and contain only letters")
                .required()
                .min_length(2)
                .pattern(name_pattern)
                .expect("name pattern compiles"),
        );
        rules.insert(
            "lastName".to_string(),
            FieldRule::new("Last name must be at least 2 characters and contain only letters")
                .required()
                .min_length(2)
                .pattern(name_pattern)
                .expect("name pattern compiles"),
        );
        rules.insert(
            "email".to_string(),
            FieldRule::new("Please enter a valid email address")
                .required()
                .pattern(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
                .expect("email pattern compiles"),
        );
        rules.insert(
            "phone".to_string(),
            FieldRule::new("Please enter a valid phone number")
                .required()
                .pattern(r"^[\+]?[\d\s\-\(\)]{10,}$")
                .expect("phone pattern compiles"),
        );
        rules.insert(
            "destination".to_string(),
            FieldRule::new("Please enter your destination")
                .required()
                .min_length(2),
        );
        rules.insert(
            "travelers".to_string(),
            FieldRule::new("Please select number of travelers").required(),
        );
        rules.insert(
            "departureDate".to_string(),
            FieldRule::new("Departure date must be today or in the future")
                .required()
                .custom(CustomCheck::NotBeforeToday),
        );
        rules.insert(
            "returnDate".to_string(),
            FieldRule::new("Return date must be after departure date")
                .required()
                .custom(CustomCheck::AfterField("departureDate".to_string())),
        );

        Self {
            steps: vec![
                StepDefinition::new(
                    "Traveler",
                    vec![
                        FieldSpec::required("firstName"),
                        FieldSpec::required("lastName"),
                        FieldSpec::required("email"),
                        FieldSpec::required("phone"),
                    ],
                ),
                StepDefinition::new(
                    "Trip",
                    vec![
                        FieldSpec::required("destination"),
                        FieldSpec::required("travelers"),
                        FieldSpec::required("departureDate"),
                        FieldSpec::required("returnDate"),
                    ],
                ),
                StepDefinition::new(
                    "Preferences",
                    vec![
                        FieldSpec::optional("accommodation"),
                        FieldSpec::optional("budget"),
                        FieldSpec::optional("specialRequests"),
                    ],
                ),
            ],
            rules,
        }
    }
}
