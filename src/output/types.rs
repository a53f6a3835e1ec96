use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "scout.v1";

#[derive(Debug, Clone, Serialize, Default)]
pub struct Meta {
    pub tool_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl Meta {
    pub fn timed(duration_ms: u128) -> Self {
        Meta { tool_version: env!("CARGO_PKG_VERSION"), duration_ms: Some(duration_ms) }
    }
}

/// What a command produced: a dry-run plan or the outcome of real work.
/// Serialized under its own key (`"plan"` or `"result"`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Plan(Value),
    Result(Value),
}

/// One document per command invocation on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    /// false for plans: nothing was fetched or written
    pub apply: bool,
    #[serde(flatten)]
    pub body: Body,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Envelope {
    fn wrap(op: &'static str, body: Body, meta: Option<Meta>) -> Self {
        let apply = matches!(body, Body::Result(_));
        Envelope { schema_version: SCHEMA_VERSION, time: Utc::now(), request_id: Uuid::new_v4(), op, apply, body, meta }
    }

    pub fn plan<T: Serialize>(op: &'static str, plan: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::wrap(op, Body::Plan(serde_json::to_value(plan)?), None))
    }

    pub fn result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        Ok(Self::wrap(op, Body::Result(serde_json::to_value(result)?), meta))
    }

    pub fn payload(&self) -> &Value {
        match &self.body { Body::Plan(v) | Body::Result(v) => v }
    }
}
