//! Remote todo collection: wire records, the backend seam used by the
//! synced store, and the blocking HTTP implementation.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::model::task::{Priority, Task, TaskPatch};
use crate::ops::task_ops;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error type for remote calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid API url '{0}'")]
    InvalidUrl(String),
}

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// A todo as returned by `GET /todos`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTodo {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl RemoteTodo {
    /// Normalize into a local task: missing completed → false, missing or
    /// unknown priority → medium, unparseable date → none. A record with
    /// blank content is dropped.
    pub fn into_task(self) -> Option<Task> {
        let Some(text) = task_ops::normalize_text(&self.content).map(str::to_string) else {
            tracing::warn!(id = %self.id, "skipping todo with blank content");
            return None;
        };
        let priority = match self.priority.as_deref() {
            None => Priority::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(id = %self.id, priority = raw, "unknown priority, using medium");
                Priority::default()
            }),
        };
        let due_date = self.due_date.as_deref().and_then(|raw| {
            let parsed = parse_due_date(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                tracing::warn!(id = %self.id, due_date = raw, "ignoring unparseable due date");
            }
            parsed
        });
        Some(Task {
            id: self.id,
            text,
            completed: self.completed.unwrap_or(false),
            priority,
            due_date,
        })
    }
}

/// Body of a successful `POST /todos`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTodo {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub content: String,
}

impl CreatedTodo {
    /// The new task. Servers that echo no content get the text that was sent.
    pub fn into_task(self, sent: &str) -> Task {
        let text = task_ops::normalize_text(&self.content).unwrap_or(sent);
        Task::new(self.id, text)
    }
}

#[derive(Debug, Clone, Serialize)]
struct CreatePayload<'a> {
    content: &'a str,
}

/// Body of `PATCH /todos/{id}`. Only set fields are sent; a cleared due
/// date is sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
}

impl UpdatePayload {
    pub fn is_empty(&self) -> bool {
        *self == UpdatePayload::default()
    }
}

impl From<&TaskPatch> for UpdatePayload {
    fn from(patch: &TaskPatch) -> Self {
        UpdatePayload {
            content: patch
                .text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            completed: patch.completed,
            priority: patch.priority,
            due_date: patch
                .due_date
                .map(|d| d.map(|date| date.format(DATE_FORMAT).to_string())),
        }
    }
}

/// Accept either a JSON number or a string as an id.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp (taken as its UTC date).
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// Operations the synced store needs from the remote collection
pub trait TodoBackend {
    fn list(&mut self) -> Result<Vec<RemoteTodo>, ApiError>;
    fn create(&mut self, content: &str) -> Result<CreatedTodo, ApiError>;
    fn toggle(&mut self, id: &str) -> Result<(), ApiError>;
    fn update(&mut self, id: &str, payload: &UpdatePayload) -> Result<(), ApiError>;
    fn delete(&mut self, id: &str) -> Result<(), ApiError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Blocking JSON client for the `/todos` REST API
pub struct HttpBackend {
    agent: ureq::Agent,
    base: Url,
    token: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(HttpBackend {
            agent,
            base,
            token: token.into(),
        })
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<String, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        tracing::debug!(method, url, "api request");
        self.agent
            .request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
    }
}

/// Turn a ureq result into a 2xx response or an `ApiError`.
fn check(url: &str, result: Result<ureq::Response, ureq::Error>) -> Result<ureq::Response, ApiError> {
    let err = match result {
        Ok(resp) if (200..300).contains(&resp.status()) => return Ok(resp),
        Ok(resp) => ApiError::Status {
            status: resp.status(),
            url: url.to_string(),
        },
        Err(ureq::Error::Status(status, _)) => ApiError::Status {
            status,
            url: url.to_string(),
        },
        Err(ureq::Error::Transport(t)) => ApiError::Transport(t.to_string()),
    };
    tracing::warn!(url, error = %err, "api request failed");
    Err(err)
}

impl TodoBackend for HttpBackend {
    fn list(&mut self) -> Result<Vec<RemoteTodo>, ApiError> {
        let url = self.url(&["todos"])?;
        let resp = check(&url, self.request("GET", &url).call())?;
        resp.into_json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn create(&mut self, content: &str) -> Result<CreatedTodo, ApiError> {
        let url = self.url(&["todos"])?;
        let resp = check(
            &url,
            self.request("POST", &url).send_json(CreatePayload { content }),
        )?;
        resp.into_json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn toggle(&mut self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&["todos", id, "toggle"])?;
        check(&url, self.request("PATCH", &url).call())?;
        Ok(())
    }

    fn update(&mut self, id: &str, payload: &UpdatePayload) -> Result<(), ApiError> {
        let url = self.url(&["todos", id])?;
        check(&url, self.request("PATCH", &url).send_json(payload))?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&["todos", id])?;
        check(&url, self.request("DELETE", &url).call())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(base, "", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn remote_todo_minimal_record() {
        let todos: Vec<RemoteTodo> = serde_json::from_str(r#"[{"id":1,"content":"x"}]"#).unwrap();
        let task = todos.into_iter().next().unwrap().into_task();
        assert_eq!(task, Some(Task::new("1", "x")));
    }

    #[test]
    fn remote_todo_without_content_is_dropped() {
        let missing = serde_json::from_str::<RemoteTodo>(r#"{"id":6}"#).unwrap();
        assert_eq!(missing.into_task(), None);
        let blank = serde_json::from_str::<RemoteTodo>(r#"{"id":7,"content":"  "}"#).unwrap();
        assert_eq!(blank.into_task(), None);
    }

    #[test]
    fn remote_todo_content_is_trimmed() {
        let todo = serde_json::from_str::<RemoteTodo>(r#"{"id":8,"content":" Buy milk "}"#).unwrap();
        assert_eq!(todo.into_task().unwrap().text, "Buy milk");
    }

    #[test]
    fn created_todo_falls_back_to_sent_text() {
        let bare = serde_json::from_str::<CreatedTodo>(r#"{"id":5}"#).unwrap();
        assert_eq!(bare.into_task("Call mom"), Task::new("5", "Call mom"));

        let echoed = serde_json::from_str::<CreatedTodo>(r#"{"id":5,"content":"Call Mom"}"#).unwrap();
        assert_eq!(echoed.into_task("Call mom").text, "Call Mom");
    }

    #[test]
    fn remote_todo_full_record() {
        let json = r#"{"id":"a7","content":"Pay rent","completed":true,"priority":"high","dueDate":"2025-06-01"}"#;
        let task = serde_json::from_str::<RemoteTodo>(json).unwrap().into_task().unwrap();
        assert_eq!(task.id, "a7");
        assert!(task.completed);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[test]
    fn remote_todo_nulls_and_unknowns_normalize() {
        let json = r#"{"id":3,"content":"y","completed":null,"priority":"urgent","dueDate":"soon"}"#;
        let task = serde_json::from_str::<RemoteTodo>(json).unwrap().into_task().unwrap();
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn remote_todo_rejects_object_id() {
        assert!(serde_json::from_str::<RemoteTodo>(r#"{"id":{},"content":"x"}"#).is_err());
    }

    #[test]
    fn due_date_formats() {
        let may1 = NaiveDate::from_ymd_opt(2025, 5, 1);
        assert_eq!(parse_due_date("2025-05-01"), may1);
        assert_eq!(parse_due_date("2025-05-01T00:00:00.000Z"), may1);
        assert_eq!(parse_due_date("2025-05-01T23:30:00-02:00"), NaiveDate::from_ymd_opt(2025, 5, 2));
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("05/01/2025"), None);
    }

    #[test]
    fn update_payload_sends_only_set_fields() {
        let payload = UpdatePayload::from(&TaskPatch::priority(Priority::High));
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"priority":"high"}"#);

        let patch = TaskPatch {
            text: Some("  Walk dog ".into()),
            completed: Some(false),
            ..Default::default()
        };
        let payload = UpdatePayload::from(&patch);
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"content":"Walk dog","completed":false}"#
        );
    }

    #[test]
    fn update_payload_due_date_set_and_clear() {
        let set = UpdatePayload::from(&TaskPatch::due_date(NaiveDate::from_ymd_opt(2025, 12, 24)));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"{"dueDate":"2025-12-24"}"#);

        let clear = UpdatePayload::from(&TaskPatch::due_date(None));
        assert_eq!(serde_json::to_string(&clear).unwrap(), r#"{"dueDate":null}"#);
    }

    #[test]
    fn update_payload_blank_text_is_empty() {
        assert!(UpdatePayload::from(&TaskPatch::text("  ")).is_empty());
    }

    #[test]
    fn url_building() {
        let b = backend("http://localhost:3000");
        assert_eq!(b.url(&["todos"]).unwrap(), "http://localhost:3000/todos");
        assert_eq!(
            b.url(&["todos", "42", "toggle"]).unwrap(),
            "http://localhost:3000/todos/42/toggle"
        );

        let nested = backend("https://example.com/api/");
        assert_eq!(nested.url(&["todos", "a b/c"]).unwrap(), "https://example.com/api/todos/a%20b%2Fc");
    }

    #[test]
    fn invalid_base_url() {
        assert!(matches!(
            HttpBackend::new("not a url", "", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpBackend::new("mailto:me@example.com", "", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
