//! In-process stand-in for the Classroom REST API, served by axum on an
//! ephemeral localhost port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use classroom_sync::logging::{LogOptions, LogSink};

#[derive(Default)]
pub struct FakeState {
    /// Listing body per incoming `pageToken`.
    pub pages: HashMap<String, (StatusCode, Value)>,
    /// Raw alias strings per course id.
    pub aliases: HashMap<String, Vec<String>>,
    pub alias_failures: HashMap<String, (StatusCode, Value)>,
    /// Member emails per (course key, "students" | "teachers").
    pub members: HashMap<(String, String), Vec<String>>,
    pub list_calls: Vec<HashMap<String, String>>,
    pub alias_calls: Vec<String>,
    pub headers: Vec<HeaderMap>,
}

#[derive(Clone, Default)]
pub struct FakeClassroom {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeClassroom {
    pub fn page(&self, token: &str, ids: &[Value], next: Option<&str>) -> &Self {
        let mut body = json!({ "courses": ids });
        if let Some(next) = next {
            body["nextPageToken"] = json!(next);
        }
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(token.to_string(), (StatusCode::OK, body));
        self
    }

    pub fn failing_page(&self, token: &str, status: StatusCode, body: Value) -> &Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(token.to_string(), (status, body));
        self
    }

    pub fn aliases(&self, course_id: &str, aliases: &[&str]) -> &Self {
        self.state.lock().unwrap().aliases.insert(
            course_id.to_string(),
            aliases.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn failing_aliases(&self, course_id: &str, status: StatusCode, body: Value) -> &Self {
        self.state
            .lock()
            .unwrap()
            .alias_failures
            .insert(course_id.to_string(), (status, body));
        self
    }

    pub fn members(&self, course_key: &str, kind: &str, emails: &[&str]) -> &Self {
        self.state.lock().unwrap().members.insert(
            (course_key.to_string(), kind.to_string()),
            emails.iter().map(|e| e.to_string()).collect(),
        );
        self
    }

    pub fn list_calls(&self) -> Vec<HashMap<String, String>> {
        self.state.lock().unwrap().list_calls.clone()
    }

    pub fn alias_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().alias_calls.clone()
    }

    pub fn headers(&self) -> Vec<HeaderMap> {
        self.state.lock().unwrap().headers.clone()
    }

    /// Starts serving and returns the API base URL.
    pub async fn serve(&self) -> String {
        let app = Router::new()
            .route("/v1/courses", get(list_courses))
            .route("/v1/courses/{id}/{resource}", get(course_resource))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Classroom API");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        format!("http://{}/v1", addr)
    }
}

async fn list_courses(
    State(fake): State<FakeClassroom>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = fake.state.lock().unwrap();
    state.headers.push(headers);
    state.list_calls.push(params.clone());

    let token = params.get("pageToken").cloned().unwrap_or_default();
    match state.pages.get(&token) {
        Some((status, body)) => (*status, Json(body.clone())).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": format!("unknown page token {}", token) } })),
        )
            .into_response(),
    }
}

async fn course_resource(
    State(fake): State<FakeClassroom>,
    headers: HeaderMap,
    Path((id, resource)): Path<(String, String)>,
) -> Response {
    let mut state = fake.state.lock().unwrap();
    state.headers.push(headers);

    match resource.as_str() {
        "aliases" => {
            state.alias_calls.push(id.clone());
            if let Some((status, body)) = state.alias_failures.get(&id) {
                return (*status, Json(body.clone())).into_response();
            }
            let aliases: Vec<Value> = state
                .aliases
                .get(&id)
                .map(|list| list.iter().map(|a| json!({ "alias": a })).collect())
                .unwrap_or_default();
            if aliases.is_empty() {
                return Json(json!({})).into_response();
            }
            Json(json!({ "aliases": aliases })).into_response()
        }
        "students" | "teachers" => {
            let members: Vec<Value> = state
                .members
                .get(&(id.clone(), resource.clone()))
                .map(|emails| {
                    emails
                        .iter()
                        .map(|e| json!({ "profile": { "emailAddress": e } }))
                        .collect()
                })
                .unwrap_or_default();
            let mut body = serde_json::Map::new();
            body.insert(resource.clone(), Value::Array(members));
            Json(Value::Object(body)).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "no such resource").into_response(),
    }
}

pub fn course(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Course {}", id),
        "courseState": "ACTIVE",
        "ownerId": "owner-1",
        "creationTime": "2024-08-01T12:00:00Z",
        "section": "Period 1",
        "description": "About the course",
        "descriptionHeading": "Heading"
    })
}

pub fn course_without(id: &str, fields: &[&str]) -> Value {
    let mut course = course(id);
    let record = course.as_object_mut().expect("course is an object");
    for field in fields {
        record.remove(*field);
    }
    course
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<(String, String, LogOptions)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(String, String, LogOptions)> {
        self.events.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, source: &str, message: &str, options: &LogOptions) {
        self.events
            .lock()
            .unwrap()
            .push((source.to_string(), message.to_string(), options.clone()));
    }
}
