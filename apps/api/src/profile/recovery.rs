//! JSON Recovery — pulls one JSON object out of a model reply.
//!
//! Models are asked for bare JSON but still wrap it in prose or code fences now and
//! then, so a whole-text parse is followed by a greedy `{...}` span search.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

static OBJECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid object span regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("no JSON object found in model reply")]
    NoObject,
}

pub fn recover(text: &str) -> Result<Map<String, Value>, RecoveryError> {
    let text = text.trim();

    if let Some(object) = parse_object(text) {
        return Ok(object);
    }

    OBJECT_SPAN
        .find(text)
        .and_then(|span| parse_object(span.as_str()))
        .ok_or(RecoveryError::NoObject)
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
