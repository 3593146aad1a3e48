//! Scripted in-process `ClassroomClient` shared by the service unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{ClassroomClient, CoursePage, MemberKind, OwnerRole};
use crate::error::{Result, SyncError};
use crate::models::{CourseAliasRecord, Credential};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCall {
    pub role: OwnerRole,
    pub owner_id: String,
    pub page_size: u32,
    pub page_token: String,
}

/// Listing calls walk `pages` in order and wrap around once exhausted; a
/// `None` page answers 500. Unknown course ids answer 404 for aliases and
/// unknown course keys answer 403 for members.
#[derive(Default)]
pub struct ScriptedClient {
    pages: Vec<Option<CoursePage>>,
    aliases: HashMap<String, Vec<String>>,
    members: HashMap<String, Vec<String>>,
    listings: AtomicUsize,
    page_calls: Mutex<Vec<PageCall>>,
    member_calls: Mutex<Vec<(String, MemberKind)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page of bare `{ "id": .. }` records.
    pub fn page(self, ids: &[&str], next: Option<&str>) -> Self {
        let courses = ids.iter().map(|id| json!({ "id": id })).collect();
        self.course_page(courses, next)
    }

    pub fn course_page(mut self, courses: Vec<Value>, next: Option<&str>) -> Self {
        self.pages.push(Some(CoursePage {
            courses,
            next_page_token: next.map(str::to_string),
        }));
        self
    }

    pub fn failing_page(mut self) -> Self {
        self.pages.push(None);
        self
    }

    pub fn aliases(mut self, course_id: &str, aliases: &[&str]) -> Self {
        self.aliases.insert(
            course_id.to_string(),
            aliases.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn members(mut self, course_key: &str, emails: &[&str]) -> Self {
        self.members.insert(
            course_key.to_string(),
            emails.iter().map(|e| e.to_string()).collect(),
        );
        self
    }

    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> Vec<PageCall> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn page_tokens(&self) -> Vec<String> {
        self.page_calls()
            .into_iter()
            .map(|call| call.page_token)
            .collect()
    }

    pub fn member_calls(&self) -> Vec<(String, MemberKind)> {
        self.member_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClassroomClient for ScriptedClient {
    async fn list_courses_page(
        &self,
        _credential: &Credential,
        role: OwnerRole,
        owner_id: &str,
        page_size: u32,
        page_token: &str,
    ) -> Result<CoursePage> {
        let call = self.listings.fetch_add(1, Ordering::SeqCst);
        self.page_calls.lock().unwrap().push(PageCall {
            role,
            owner_id: owner_id.to_string(),
            page_size,
            page_token: page_token.to_string(),
        });

        let scripted = if self.pages.is_empty() {
            Some(CoursePage::default())
        } else {
            self.pages[call % self.pages.len()].clone()
        };
        scripted.ok_or_else(|| SyncError::RemoteRequestFailed {
            status: 500,
            body: json!({ "error": { "status": "INTERNAL" } }),
        })
    }

    async fn course_aliases(
        &self,
        _credential: &Credential,
        course_id: &str,
    ) -> Result<CourseAliasRecord> {
        match self.aliases.get(course_id) {
            Some(aliases) => Ok(CourseAliasRecord {
                course_id: course_id.to_string(),
                aliases: aliases.clone(),
            }),
            None => Err(SyncError::RemoteRequestFailed {
                status: 404,
                body: json!({ "error": { "status": "NOT_FOUND" } }),
            }),
        }
    }

    async fn course_members(
        &self,
        _credential: &Credential,
        course_key: &str,
        kind: MemberKind,
    ) -> Result<Vec<String>> {
        self.member_calls
            .lock()
            .unwrap()
            .push((course_key.to_string(), kind));

        self.members
            .get(course_key)
            .cloned()
            .ok_or_else(|| SyncError::RemoteRequestFailed {
                status: 403,
                body: json!({ "error": { "status": "PERMISSION_DENIED" } }),
            })
    }
}
