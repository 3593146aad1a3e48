pub mod dto;
#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SyncError};
use crate::models::{CourseAliasRecord, Credential};

/// Which membership of `owner_id` a course listing filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRole {
    Teacher,
    Student,
}

impl OwnerRole {
    pub fn query_key(self) -> &'static str {
        match self {
            OwnerRole::Teacher => "teacherId",
            OwnerRole::Student => "studentId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Students,
    Teachers,
}

impl MemberKind {
    pub fn path(self) -> &'static str {
        match self {
            MemberKind::Students => "students",
            MemberKind::Teachers => "teachers",
        }
    }
}

/// One page of the course listing.
#[derive(Debug, Clone, Default)]
pub struct CoursePage {
    pub courses: Vec<Value>,
    /// `None` once the listing is exhausted.
    pub next_page_token: Option<String>,
}

#[async_trait]
pub trait ClassroomClient: Send + Sync {
    async fn list_courses_page(
        &self,
        credential: &Credential,
        role: OwnerRole,
        owner_id: &str,
        page_size: u32,
        page_token: &str,
    ) -> Result<CoursePage>;

    /// Raw alias strings of a course, in response order.
    async fn course_aliases(
        &self,
        credential: &Credential,
        course_id: &str,
    ) -> Result<CourseAliasRecord>;

    /// Email addresses of a course's members. `course_key` is either a course
    /// id or a full alias.
    async fn course_members(
        &self,
        credential: &Credential,
        course_key: &str,
        kind: MemberKind,
    ) -> Result<Vec<String>>;
}

pub struct ClassroomHttpClient {
    client: Client,
    base_url: String,
}

impl ClassroomHttpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Authenticated GET returning the parsed JSON body. Any non-2xx status
    /// becomes `RemoteRequestFailed` carrying the error body.
    pub async fn get(&self, path_and_query: &str, credential: &Credential) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, credential.bearer())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&body_text).unwrap_or(Value::String(body_text));
            return Err(SyncError::RemoteRequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body_text)
            .map_err(|e| SyncError::Decode(format!("{}: {}", url, e)))
    }

    async fn get_as<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        credential: &Credential,
    ) -> Result<T> {
        let value = self.get(path_and_query, credential).await?;
        serde_json::from_value(value).map_err(|e| SyncError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ClassroomClient for ClassroomHttpClient {
    async fn list_courses_page(
        &self,
        credential: &Credential,
        role: OwnerRole,
        owner_id: &str,
        page_size: u32,
        page_token: &str,
    ) -> Result<CoursePage> {
        let path = format!(
            "/courses?{}={}&pageSize={}&pageToken={}",
            role.query_key(),
            urlencoding::encode(owner_id),
            page_size,
            urlencoding::encode(page_token)
        );

        let page: dto::ListCoursesResponse = self.get_as(&path, credential).await?;
        Ok(CoursePage {
            courses: page.courses,
            next_page_token: page.next_page_token.filter(|token| !token.is_empty()),
        })
    }

    async fn course_aliases(
        &self,
        credential: &Credential,
        course_id: &str,
    ) -> Result<CourseAliasRecord> {
        let path = format!("/courses/{}/aliases", urlencoding::encode(course_id));
        let response: dto::ListAliasesResponse = self.get_as(&path, credential).await?;

        Ok(CourseAliasRecord {
            course_id: course_id.to_string(),
            aliases: response.aliases.into_iter().map(|a| a.alias).collect(),
        })
    }

    async fn course_members(
        &self,
        credential: &Credential,
        course_key: &str,
        kind: MemberKind,
    ) -> Result<Vec<String>> {
        let path = format!(
            "/courses/{}/{}",
            urlencoding::encode(course_key),
            kind.path()
        );
        let response: dto::ListMembersResponse = self.get_as(&path, credential).await?;

        let members = match kind {
            MemberKind::Students => response.students,
            MemberKind::Teachers => response.teachers,
        };

        Ok(members
            .into_iter()
            .filter_map(|m| m.profile.and_then(|p| p.email_address))
            .collect())
    }
}
