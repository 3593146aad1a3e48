use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesResponse {
    /// Kept raw; field checks happen in the validator.
    #[serde(default)]
    pub courses: Vec<Value>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListAliasesResponse {
    #[serde(default)]
    pub aliases: Vec<CourseAlias>,
}

#[derive(Debug, Deserialize)]
pub struct CourseAlias {
    pub alias: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListMembersResponse {
    #[serde(default)]
    pub students: Vec<Member>,
    #[serde(default)]
    pub teachers: Vec<Member>,
}

#[derive(Debug, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub email_address: Option<String>,
}
