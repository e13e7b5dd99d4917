//! Form service.
//!
//! Fills the foreign-key choice lists of the entity forms from the acting
//! teacher's scope, then hands them to [`render_form`]. Submitted values can
//! be checked against a form, which comes back with per-field errors.

use std::collections::BTreeMap;

use gradebook_common::{AppError, AppResult};
use gradebook_db::{
    TeacherScope,
    repositories::{ActivityRepository, StudentRepository, SubjectRepository},
};
use serde_json::Value;

use super::{
    activity::{ActivityInput, parse_date},
    student::StudentInput,
    subject::SubjectInput,
    teacher::{SignupInput, check_password, check_username},
};
use crate::forms::{
    Choice, FormSpec, RenderedForm, bind, check_fields, clean_values, render_form,
};
use crate::grading::{self, RawGrade};

type FieldErrors = BTreeMap<String, Vec<String>>;

/// Forms that can be requested by name.
pub const FORM_NAMES: [&str; 5] = ["subject", "student", "activity", "grade", "signup"];

/// Service for rendering forms.
#[derive(Clone)]
pub struct FormService {
    subject_repo: SubjectRepository,
    student_repo: StudentRepository,
    activity_repo: ActivityRepository,
}

impl FormService {
    /// Create a new form service.
    #[must_use]
    pub const fn new(
        subject_repo: SubjectRepository,
        student_repo: StudentRepository,
        activity_repo: ActivityRepository,
    ) -> Self {
        Self {
            subject_repo,
            student_repo,
            activity_repo,
        }
    }

    /// Render a form by name, prefilled with `values`.
    ///
    /// The signup form is available without a teacher; every other form
    /// needs one to fill its choices.
    pub async fn render(
        &self,
        scope: Option<&TeacherScope>,
        name: &str,
        values: &BTreeMap<String, Value>,
    ) -> AppResult<RenderedForm> {
        let spec = self.spec(scope, name).await?;
        Ok(render_form(&spec, values, &BTreeMap::new()))
    }

    /// Check submitted values against a form without storing anything.
    ///
    /// The form comes back holding the cleaned values and the errors of every
    /// field that would be refused. Checks that need stored records (duplicate
    /// grades, enrollment, taken usernames or emails) run only on save.
    pub async fn check(
        &self,
        scope: Option<&TeacherScope>,
        name: &str,
        values: &BTreeMap<String, Value>,
    ) -> AppResult<RenderedForm> {
        let spec = self.spec(scope, name).await?;
        let values = clean_values(&spec, values);

        let mut errors = check_fields(&spec, &values);
        if errors.is_empty() {
            errors = input_errors(name, &values);
        }

        if !errors.is_empty() {
            tracing::debug!(form = name, fields = errors.len(), "Submitted form has errors");
        }

        Ok(render_form(&spec, &values, &errors))
    }

    async fn spec(&self, scope: Option<&TeacherScope>, name: &str) -> AppResult<FormSpec> {
        if !FORM_NAMES.contains(&name) {
            return Err(AppError::NotFound(format!("Form '{name}'")));
        }
        if name == "signup" {
            return Ok(FormSpec::signup());
        }

        let scope = scope.ok_or(AppError::Unauthorized)?;

        let spec = match name {
            "subject" => FormSpec::subject(),
            "student" => FormSpec::student(self.subject_choices(scope).await?),
            "activity" => FormSpec::activity(self.subject_choices(scope).await?),
            _ => {
                let students = self
                    .student_repo
                    .list(scope)
                    .await?
                    .into_iter()
                    .map(|s| Choice::new(s.id, format!("{} <{}>", s.name, s.email)))
                    .collect();
                let activities = self
                    .activity_repo
                    .list(scope)
                    .await?
                    .into_iter()
                    .map(|a| Choice::new(a.id, format!("{} ({})", a.name, a.date)))
                    .collect();
                FormSpec::grade(students, activities)
            }
        };

        Ok(spec)
    }

    async fn subject_choices(&self, scope: &TeacherScope) -> AppResult<Vec<Choice>> {
        Ok(self
            .subject_repo
            .list(scope)
            .await?
            .into_iter()
            .map(|s| Choice::new(s.id, s.name))
            .collect())
    }
}

fn input_errors(name: &str, values: &BTreeMap<String, Value>) -> FieldErrors {
    let outcome = match name {
        "subject" => bind::<SubjectInput>(values).map(|_| ()),
        "student" => bind::<StudentInput>(values).map(|_| ()),
        "activity" => bind::<ActivityInput>(values).and_then(|input| {
            parse_date(&input.date)
                .map(|_| ())
                .map_err(|e| on_field("date", e))
        }),
        "signup" => bind::<SignupInput>(values).and_then(|input| {
            check_username(&input.username).map_err(|e| on_field("username", e))?;
            check_password(&input.password, &input.password_confirmation)
                .map_err(|e| on_field("password_confirmation", e))
        }),
        _ => grade_value(values),
    };

    outcome.err().unwrap_or_default()
}

fn grade_value(values: &BTreeMap<String, Value>) -> Result<(), FieldErrors> {
    let raw = values.get("value").cloned().unwrap_or(Value::Null);
    let raw: RawGrade = serde_json::from_value(raw)
        .map_err(|_| on_field("value", AppError::Validation("Enter a number.".to_string())))?;

    grading::validate_value(&raw.as_text())
        .map(|_| ())
        .map_err(|rejection| on_field("value", rejection.into()))
}

fn on_field(field: &str, err: AppError) -> FieldErrors {
    let message = match err {
        AppError::Validation(message)
        | AppError::InvalidGrade(message)
        | AppError::GradeOutOfRange(message) => message,
        other => other.to_string(),
    };
    BTreeMap::from([(field.to_string(), vec![message])])
}
