//! Form descriptors.
//!
//! Each editable entity has a [`FormSpec`]: an explicit list of
//! [`FieldDescriptor`]s. [`render_form`] turns a spec plus the current values
//! and validation errors into a [`RenderedForm`] a client can draw.
//! [`check_fields`] and [`bind`] produce those errors from submitted values.

use std::collections::BTreeMap;

use gradebook_db::entities::activity::Category;
use sea_orm::Iterable;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use validator::Validate;

/// Error key for messages not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Input widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Decimal,
    Date,
    Select,
    MultiSelect,
}

/// Constraints a client may check before submitting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Description of a single form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub constraints: Constraints,
    pub choices: Vec<Choice>,
}

impl FieldDescriptor {
    /// A required field with no constraints.
    #[must_use]
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            constraints: Constraints {
                min_length: None,
                max_length: None,
                min: None,
                max: None,
                decimal_places: None,
            },
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.constraints.min_length = Some(min);
        self.constraints.max_length = Some(max);
        self
    }

    #[must_use]
    pub fn range(mut self, min: impl ToString, max: impl ToString, decimal_places: u32) -> Self {
        self.constraints.min = Some(min.to_string());
        self.constraints.max = Some(max.to_string());
        self.constraints.decimal_places = Some(decimal_places);
        self
    }

    #[must_use]
    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }
}

/// Field list for one form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormSpec {
    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Subject form.
    #[must_use]
    pub fn subject() -> Self {
        Self {
            name: "subject",
            title: "Subject",
            fields: vec![FieldDescriptor::new("name", "Name", FieldKind::Text).length(1, 100)],
        }
    }

    /// Student form. `subjects` are the acting teacher's subjects.
    #[must_use]
    pub fn student(subjects: Vec<Choice>) -> Self {
        Self {
            name: "student",
            title: "Student",
            fields: vec![
                FieldDescriptor::new("name", "Name", FieldKind::Text).length(1, 100),
                FieldDescriptor::new("email", "Email", FieldKind::Email).length(3, 254),
                FieldDescriptor::new("subject_ids", "Subjects", FieldKind::MultiSelect)
                    .choices(subjects),
            ],
        }
    }

    /// Activity form. `subjects` are the acting teacher's subjects.
    #[must_use]
    pub fn activity(subjects: Vec<Choice>) -> Self {
        let categories = Category::iter()
            .map(|c| Choice::new(c.as_str(), c.label()))
            .collect();

        Self {
            name: "activity",
            title: "Activity",
            fields: vec![
                FieldDescriptor::new("subject_id", "Subject", FieldKind::Select).choices(subjects),
                FieldDescriptor::new("name", "Name", FieldKind::Text).length(1, 100),
                FieldDescriptor::new("category", "Category", FieldKind::Select)
                    .choices(categories),
                FieldDescriptor::new("date", "Date", FieldKind::Date),
            ],
        }
    }

    /// Grade form, offering only the acting teacher's students and activities.
    #[must_use]
    pub fn grade(students: Vec<Choice>, activities: Vec<Choice>) -> Self {
        Self {
            name: "grade",
            title: "Grade",
            fields: vec![
                FieldDescriptor::new("student_id", "Student", FieldKind::Select).choices(students),
                FieldDescriptor::new("activity_id", "Activity", FieldKind::Select)
                    .choices(activities),
                FieldDescriptor::new("value", "Grade", FieldKind::Decimal).range(0, 10, 2),
            ],
        }
    }

    /// Teacher registration form.
    #[must_use]
    pub fn signup() -> Self {
        Self {
            name: "signup",
            title: "Sign up",
            fields: vec![
                FieldDescriptor::new("username", "Username", FieldKind::Text).length(1, 150),
                FieldDescriptor::new("email", "Email", FieldKind::Email).length(3, 254),
                FieldDescriptor::new("first_name", "First name", FieldKind::Text)
                    .optional()
                    .length(0, 150),
                FieldDescriptor::new("last_name", "Last name", FieldKind::Text)
                    .optional()
                    .length(0, 150),
                FieldDescriptor::new("password", "Password", FieldKind::Password).length(8, 128),
                FieldDescriptor::new(
                    "password_confirmation",
                    "Password confirmation",
                    FieldKind::Password,
                )
                .length(8, 128),
            ],
        }
    }
}

/// A field ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
    pub value: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// A form ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedForm {
    pub name: &'static str,
    pub title: &'static str,
    pub fields: Vec<RenderedField>,
    /// Errors not tied to a single field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl RenderedForm {
    /// Whether any field or form-level error is present.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.fields.iter().any(|f| !f.errors.is_empty())
    }
}

/// Render a form.
///
/// Values and errors are matched to fields by name. Password fields are never
/// echoed back. Errors keyed by a name that is not a field end up in
/// [`RenderedForm::errors`].
#[must_use]
pub fn render_form(
    spec: &FormSpec,
    values: &BTreeMap<String, Value>,
    errors: &BTreeMap<String, Vec<String>>,
) -> RenderedForm {
    let fields = spec
        .fields
        .iter()
        .map(|field| {
            let value = match field.kind {
                FieldKind::Password => Value::Null,
                _ => values.get(field.name).cloned().unwrap_or(Value::Null),
            };

            RenderedField {
                descriptor: field.clone(),
                value,
                errors: errors.get(field.name).cloned().unwrap_or_default(),
            }
        })
        .collect();

    let form_errors = errors
        .iter()
        .filter(|(name, _)| spec.field(name).is_none())
        .flat_map(|(_, messages)| messages.iter().cloned())
        .collect();

    RenderedForm {
        name: spec.name,
        title: spec.title,
        fields,
        errors: form_errors,
    }
}

/// Collect `validator` errors into the per-field map [`render_form`] takes.
#[must_use]
pub fn field_errors(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Strip surrounding whitespace from submitted text. Passwords are kept as
/// typed.
#[must_use]
pub fn clean_values(spec: &FormSpec, values: &BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    values
        .iter()
        .map(|(name, value)| {
            let password = spec
                .field(name)
                .is_some_and(|f| f.kind == FieldKind::Password);
            let value = match value {
                Value::String(s) if !password => Value::String(s.trim().to_string()),
                other => other.clone(),
            };
            (name.clone(), value)
        })
        .collect()
}

/// Check that required fields are filled and that selects hold one of their
/// choices.
#[must_use]
pub fn check_fields(
    spec: &FormSpec,
    values: &BTreeMap<String, Value>,
) -> BTreeMap<String, Vec<String>> {
    let mut errors = BTreeMap::new();

    for field in &spec.fields {
        let value = values.get(field.name).unwrap_or(&Value::Null);
        let message = if is_blank(value) {
            field.required.then_some("This field is required.")
        } else if matches!(field.kind, FieldKind::Select | FieldKind::MultiSelect)
            && !offers(field, value)
        {
            Some("Select a valid choice.")
        } else {
            None
        };

        if let Some(message) = message {
            errors.insert(field.name.to_string(), vec![message.to_string()]);
        }
    }

    errors
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn offers(field: &FieldDescriptor, value: &Value) -> bool {
    let offered = |v: &Value| {
        v.as_str().is_some_and(|v| {
            field
                .choices
                .iter()
                .any(|c| c.value.eq_ignore_ascii_case(v))
        })
    };

    match value {
        Value::Array(items) => items.iter().all(offered),
        other => offered(other),
    }
}

/// Deserialize submitted values into an input type and run its validation.
///
/// Type mismatches are reported under [`NON_FIELD_ERRORS`].
pub fn bind<T: DeserializeOwned + Validate>(
    values: &BTreeMap<String, Value>,
) -> Result<T, BTreeMap<String, Vec<String>>> {
    let object = values.clone().into_iter().collect::<serde_json::Map<_, _>>();
    let input: T = serde_json::from_value(Value::Object(object))
        .map_err(|e| BTreeMap::from([(NON_FIELD_ERRORS.to_string(), vec![e.to_string()])]))?;

    input.validate().map_err(|e| field_errors(&e))?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_render_fills_values_and_errors() {
        let spec = FormSpec::subject();
        let values = BTreeMap::from([("name".to_string(), json!(""))]);
        let errors = BTreeMap::from([("name".to_string(), vec!["required".to_string()])]);

        let form = render_form(&spec, &values, &errors);

        assert_eq!(form.name, "subject");
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].value, json!(""));
        assert_eq!(form.fields[0].errors, vec!["required"]);
        assert!(form.has_errors());
    }

    #[test]
    fn test_render_never_echoes_passwords() {
        let spec = FormSpec::signup();
        let values = BTreeMap::from([
            ("username".to_string(), json!("ana")),
            ("password".to_string(), json!("hunter22")),
        ]);

        let form = render_form(&spec, &values, &BTreeMap::new());

        let password = form.fields.iter().find(|f| f.descriptor.name == "password");
        assert_eq!(password.unwrap().value, Value::Null);
        assert!(!form.has_errors());
    }

    #[test]
    fn test_unknown_error_keys_become_form_errors() {
        let spec = FormSpec::subject();
        let errors = BTreeMap::from([("__all__".to_string(), vec!["nope".to_string()])]);

        let form = render_form(&spec, &BTreeMap::new(), &errors);

        assert_eq!(form.errors, vec!["nope"]);
    }

    #[test]
    fn test_activity_form_lists_every_category() {
        let spec = FormSpec::activity(vec![Choice::new("s1", "Math")]);

        let category = spec.field("category").unwrap();
        assert_eq!(category.choices.len(), 4);
        assert_eq!(category.choices[0], Choice::new("exam", "Exam"));
        assert_eq!(spec.field("subject_id").unwrap().choices.len(), 1);
    }

    #[test]
    fn test_grade_form_range() {
        let spec = FormSpec::grade(vec![], vec![]);
        let value = spec.field("value").unwrap();

        assert_eq!(value.kind, FieldKind::Decimal);
        assert_eq!(value.constraints.min.as_deref(), Some("0"));
        assert_eq!(value.constraints.max.as_deref(), Some("10"));
        assert_eq!(value.constraints.decimal_places, Some(2));
    }

    #[test]
    fn test_field_errors_from_validator() {
        #[derive(Validate)]
        struct Input {
            #[validate(length(min = 1, message = "Name is required"))]
            name: String,
        }

        let err = Input {
            name: String::new(),
        }
        .validate()
        .unwrap_err();

        let map = field_errors(&err);
        assert_eq!(map["name"], vec!["Name is required"]);
    }

    #[test]
    fn test_rendered_form_serializes_flat_fields() {
        let form = render_form(&FormSpec::subject(), &BTreeMap::new(), &BTreeMap::new());
        let json = serde_json::to_value(&form).unwrap();

        assert_eq!(json["fields"][0]["name"], "name");
        assert_eq!(json["fields"][0]["kind"], "text");
        assert_eq!(json["fields"][0]["constraints"]["max_length"], 100);
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_clean_values_keeps_passwords() {
        let spec = FormSpec::signup();
        let values = BTreeMap::from([
            ("username".to_string(), json!("  ana ")),
            ("password".to_string(), json!(" secret phrase ")),
        ]);

        let cleaned = clean_values(&spec, &values);

        assert_eq!(cleaned["username"], json!("ana"));
        assert_eq!(cleaned["password"], json!(" secret phrase "));
    }

    #[test]
    fn test_check_fields_required_and_choices() {
        let spec = FormSpec::student(vec![Choice::new("s1", "Math")]);
        let values = BTreeMap::from([
            ("name".to_string(), json!("Alice")),
            ("email".to_string(), json!("")),
            ("subject_ids".to_string(), json!(["s1", "s9"])),
        ]);

        let errors = check_fields(&spec, &values);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors["email"], vec!["This field is required."]);
        assert_eq!(errors["subject_ids"], vec!["Select a valid choice."]);
    }

    #[test]
    fn test_check_fields_skips_blank_optional_fields() {
        let spec = FormSpec::signup();
        let values = BTreeMap::from([
            ("username".to_string(), json!("ana")),
            ("email".to_string(), json!("ana@school.test")),
            ("first_name".to_string(), json!("")),
            ("password".to_string(), json!("correct horse")),
            ("password_confirmation".to_string(), json!("correct horse")),
        ]);

        assert!(check_fields(&spec, &values).is_empty());
    }

    #[test]
    fn test_category_choice_ignores_case() {
        let spec = FormSpec::activity(vec![Choice::new("s1", "Math")]);
        let values = BTreeMap::from([
            ("subject_id".to_string(), json!("s1")),
            ("name".to_string(), json!("Midterm")),
            ("category".to_string(), json!("Exam")),
            ("date".to_string(), json!("2024-03-01")),
        ]);

        assert!(check_fields(&spec, &values).is_empty());
    }

    #[test]
    fn test_bind_collects_validator_errors() {
        #[derive(Deserialize, Validate)]
        struct Input {
            #[validate(length(max = 3, message = "Too long"))]
            name: String,
        }

        let values = BTreeMap::from([("name".to_string(), json!("Alice"))]);
        let errors = bind::<Input>(&values).err().unwrap();
        assert_eq!(errors["name"], vec!["Too long"]);

        let values = BTreeMap::from([("name".to_string(), json!(7))]);
        let errors = bind::<Input>(&values).err().unwrap();
        assert!(errors.contains_key(NON_FIELD_ERRORS));

        let values = BTreeMap::from([("name".to_string(), json!("Al"))]);
        assert_eq!(bind::<Input>(&values).ok().map(|i| i.name), Some("Al".to_string()));
    }
}
