//! Field checks for raw course records returned by the listing endpoint.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::Course;

/// Checked in this order; the first absent one is reported.
pub const REQUIRED_FIELDS: [&str; 5] = ["id", "name", "courseState", "ownerId", "creationTime"];
pub const OPTIONAL_FIELDS: [&str; 3] = ["section", "description", "descriptionHeading"];

/// Non-fatal finding: an optional field is absent or not a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalFieldMissing {
    pub field: &'static str,
    pub course_id: String,
    pub course_name: String,
}

impl OptionalFieldMissing {
    pub fn message(&self) -> String {
        format!(
            "{} field missing from course: {} id: {}",
            self.field, self.course_name, self.course_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCourse {
    pub course: Course,
    pub warnings: Vec<OptionalFieldMissing>,
}

pub fn validate(raw: &Value) -> Result<ValidatedCourse, ValidationError> {
    let record = raw.as_object().ok_or(ValidationError::MalformedCourse)?;

    let id = required(record, "id", None)?;
    let context = Some(id.clone());
    let name = required(record, "name", context.clone())?;
    let course_state = required(record, "courseState", context.clone())?;
    let owner_id = required(record, "ownerId", context.clone())?;
    let creation_time = required(record, "creationTime", context)?;

    let mut warnings = Vec::new();
    let [section, description, description_heading] = OPTIONAL_FIELDS.map(|field| {
        let value = string_field(record, field);
        if value.is_none() {
            warnings.push(OptionalFieldMissing {
                field,
                course_id: id.clone(),
                course_name: name.clone(),
            });
        }
        value
    });

    Ok(ValidatedCourse {
        course: Course {
            id,
            name,
            course_state,
            owner_id,
            creation_time,
            section,
            description,
            description_heading,
        },
        warnings,
    })
}

fn string_field(record: &Map<String, Value>, field: &str) -> Option<String> {
    record.get(field).and_then(Value::as_str).map(str::to_string)
}

fn required(
    record: &Map<String, Value>,
    field: &'static str,
    context: Option<String>,
) -> Result<String, ValidationError> {
    string_field(record, field).ok_or(ValidationError::MissingRequiredField { field, context })
}
