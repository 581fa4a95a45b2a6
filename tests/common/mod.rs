#![allow(dead_code)]
//! Stateful in-process stand-in for the protection backend.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::{collections::HashMap, sync::Arc, time::Duration};
use wiremock::{matchers::any, Mock, MockServer, Request, Respond, ResponseTemplate};

use powerprotect::{ApiClient, AppContext, SelectionContext};

#[derive(Default)]
struct State {
    projects: Vec<Value>,
    equipments: Vec<Value>,
    curves: Vec<Value>,
    networks: Vec<Value>,
    /// Logical clock, seconds after the epoch base
    clock: i64,
    delays: HashMap<String, Duration>,
    requests: Vec<String>,
}

impl State {
    fn tick(&mut self) -> String {
        self.clock += 1;
        let base: DateTime<Utc> = "2024-03-01T10:00:00Z".parse().unwrap_or_default();
        (base + ChronoDuration::seconds(self.clock)).to_rfc3339()
    }
}

/// Backend whose records live in memory. Clones share state.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data, "success": true }))
}

fn created(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({ "data": data, "success": true }))
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "message": message, "success": false }))
}

fn not_found() -> ResponseTemplate {
    error(404, "Not found")
}

fn find<'a>(records: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    records.iter_mut().find(|r| r["id"] == id)
}

/// 422 message for a payload with an empty name or a non-positive rating
fn invalid(body: &Map<String, Value>, numeric: &[&str]) -> Option<String> {
    if let Some(name) = body.get("name") {
        if name.as_str().map_or(true, |n| n.trim().is_empty()) {
            return Some("name must not be empty".to_string());
        }
    }
    numeric.iter().find_map(|field| match body.get(*field) {
        Some(v) if v.as_f64().map_or(true, |n| n <= 0.0) => Some(format!("{field} must be positive")),
        _ => None,
    })
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount on a fresh server and return it with a client pointed at it.
    pub async fn start(&self) -> (MockServer, ApiClient) {
        let server = MockServer::builder().start().await;
        Mock::given(any())
            .respond_with(self.clone())
            .mount(&server)
            .await;
        let client = ApiClient::with_base_url(server.uri()).unwrap();
        (server, client)
    }

    /// Delay every response for `path`
    pub fn set_delay(&self, path: impl Into<String>, delay: Duration) {
        self.state.lock().delays.insert(path.into(), delay);
    }

    /// Requests received so far, as "METHOD /path"
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    fn route(&self, method: &str, segments: &[&str], body: Option<Map<String, Value>>) -> ResponseTemplate {
        let mut s = self.state.lock();
        match (method, segments) {
            ("GET", ["api", "projects"]) => ok(Value::Array(s.projects.clone())),
            ("POST", ["api", "projects"]) => {
                let Some(mut body) = body else { return error(400, "missing body") };
                if let Some(msg) = invalid(&body, &["voltage", "frequency"]) {
                    return error(422, &msg);
                }
                let now = s.tick();
                body.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
                body.insert("createdAt".into(), json!(now));
                body.insert("updatedAt".into(), json!(now));
                let record = Value::Object(body);
                s.projects.push(record.clone());
                created(record)
            }
            ("GET", ["api", "projects", id]) => match find(&mut s.projects, id) {
                Some(p) => ok(p.clone()),
                None => not_found(),
            },
            ("PUT", ["api", "projects", id]) => self.update(&mut s, "projects", id, body, &["voltage", "frequency"]),
            ("DELETE", ["api", "projects", id]) => {
                let before = s.projects.len();
                s.projects.retain(|p| p["id"] != *id);
                if s.projects.len() == before {
                    return not_found();
                }
                let orphaned: Vec<Value> = s
                    .equipments
                    .iter()
                    .filter(|e| e["projectId"] == *id)
                    .map(|e| e["id"].clone())
                    .collect();
                s.equipments.retain(|e| e["projectId"] != *id);
                s.curves.retain(|c| !orphaned.contains(&c["equipmentId"]));
                s.networks.retain(|n| n["projectId"] != *id);
                ResponseTemplate::new(204)
            }
            ("GET", ["api", "projects", id, "equipments"]) => {
                if find(&mut s.projects, id).is_none() {
                    return not_found();
                }
                let list: Vec<Value> = s
                    .equipments
                    .iter()
                    .filter(|e| e["projectId"] == *id)
                    .cloned()
                    .collect();
                ok(Value::Array(list))
            }
            ("GET", ["api", "projects", id, "network"]) => {
                match s.networks.iter().find(|n| n["projectId"] == *id) {
                    Some(n) => ok(n.clone()),
                    None => not_found(),
                }
            }
            ("POST", ["api", "projects", id, "network"]) => {
                if find(&mut s.projects, id).is_none() {
                    return not_found();
                }
                let Some(mut body) = body else { return error(400, "missing body") };
                let now = s.tick();
                let existing = s.networks.iter().position(|n| n["projectId"] == *id);
                let (network_id, created_at) = match existing {
                    Some(i) => (s.networks[i]["id"].clone(), s.networks[i]["createdAt"].clone()),
                    None => (json!(uuid::Uuid::new_v4().to_string()), json!(now)),
                };
                body.insert("id".into(), network_id);
                body.insert("projectId".into(), json!(id));
                body.insert("createdAt".into(), created_at);
                body.insert("updatedAt".into(), json!(now));
                let record = Value::Object(body);
                match existing {
                    Some(i) => s.networks[i] = record.clone(),
                    None => s.networks.push(record.clone()),
                }
                ok(record)
            }
            ("POST", ["api", "equipments"]) => {
                let Some(mut body) = body else { return error(400, "missing body") };
                if let Some(msg) = invalid(&body, &["nominalVoltage", "nominalCurrent"]) {
                    return error(422, &msg);
                }
                let parent = body.get("projectId").and_then(Value::as_str).unwrap_or_default().to_string();
                if find(&mut s.projects, &parent).is_none() {
                    return error(422, "unknown project");
                }
                let now = s.tick();
                body.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
                body.insert("createdAt".into(), json!(now));
                body.insert("updatedAt".into(), json!(now));
                let record = Value::Object(body);
                s.equipments.push(record.clone());
                created(record)
            }
            ("GET", ["api", "equipments", id]) => match find(&mut s.equipments, id) {
                Some(e) => ok(e.clone()),
                None => not_found(),
            },
            ("PUT", ["api", "equipments", id]) => {
                self.update(&mut s, "equipments", id, body, &["nominalVoltage", "nominalCurrent"])
            }
            ("DELETE", ["api", "equipments", id]) => {
                let before = s.equipments.len();
                s.equipments.retain(|e| e["id"] != *id);
                if s.equipments.len() == before {
                    return not_found();
                }
                s.curves.retain(|c| c["equipmentId"] != *id);
                ResponseTemplate::new(204)
            }
            ("GET", ["api", "equipments", id, "curves"]) => {
                if find(&mut s.equipments, id).is_none() {
                    return not_found();
                }
                let list: Vec<Value> = s
                    .curves
                    .iter()
                    .filter(|c| c["equipmentId"] == *id)
                    .cloned()
                    .collect();
                ok(Value::Array(list))
            }
            ("POST", ["api", "curves"]) => {
                let Some(mut body) = body else { return error(400, "missing body") };
                if let Some(msg) = invalid(&body, &[]) {
                    return error(422, &msg);
                }
                let now = s.tick();
                body.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
                body.insert("createdAt".into(), json!(now));
                body.insert("updatedAt".into(), json!(now));
                let record = Value::Object(body);
                s.curves.push(record.clone());
                created(record)
            }
            ("GET", ["api", "curves", id]) => match find(&mut s.curves, id) {
                Some(c) => ok(c.clone()),
                None => not_found(),
            },
            ("PUT", ["api", "curves", id]) => self.update(&mut s, "curves", id, body, &[]),
            ("DELETE", ["api", "curves", id]) => {
                let before = s.curves.len();
                s.curves.retain(|c| c["id"] != *id);
                if s.curves.len() == before {
                    return not_found();
                }
                ResponseTemplate::new(204)
            }
            _ => not_found(),
        }
    }

    fn update(
        &self,
        s: &mut State,
        family: &str,
        id: &str,
        body: Option<Map<String, Value>>,
        numeric: &[&str],
    ) -> ResponseTemplate {
        let Some(body) = body else { return error(400, "missing body") };
        if let Some(msg) = invalid(&body, numeric) {
            return error(422, &msg);
        }
        let now = s.tick();
        let records = match family {
            "projects" => &mut s.projects,
            "equipments" => &mut s.equipments,
            _ => &mut s.curves,
        };
        let Some(Value::Object(record)) = find(records, id) else {
            return not_found();
        };
        for (field, value) in body {
            if !matches!(field.as_str(), "id" | "createdAt" | "updatedAt") {
                record.insert(field, value);
            }
        }
        record.insert("updatedAt".into(), json!(now));
        ok(Value::Object(record.clone()))
    }
}

impl Respond for FakeBackend {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let method = request.method.as_str().to_uppercase();
        let path = request.url.path().to_string();
        let body = serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|v| v.as_object().cloned());
        let delay = {
            let mut s = self.state.lock();
            s.requests.push(format!("{method} {path}"));
            s.delays.get(&path).copied()
        };

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let response = self.route(&method, &segments, body);
        match delay {
            Some(delay) => response.set_delay(delay),
            None => response,
        }
    }
}

/// App context against a fake backend, with an in-memory selection
pub async fn context() -> (FakeBackend, MockServer, AppContext) {
    let backend = FakeBackend::new();
    let (server, client) = backend.start().await;
    let ctx = AppContext::new(client, SelectionContext::in_memory());
    (backend, server, ctx)
}
