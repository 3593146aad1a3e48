use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A validated course as held in the store, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub course_state: String,
    pub owner_id: String,
    pub creation_time: String,
    pub section: Option<String>,
    pub description: Option<String>,
    pub description_heading: Option<String>,
}
