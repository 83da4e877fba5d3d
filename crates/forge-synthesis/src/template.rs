//! Fallback configs per component type and placeholder substitution.

use serde_json::{json, Map, Value};

use forge_core::models::{ComponentType, IntegrationIntent};

use crate::extract;

/// Values substituted into `{{name}}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    pub schedule: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
    pub keywords: String,
    pub text: String,
}

impl Bindings {
    pub fn from_intent(intent: &IntegrationIntent) -> Self {
        Self {
            schedule: extract::schedule(&intent.raw_text),
            path: extract::path(&intent.raw_text),
            url: extract::url(&intent.raw_text),
            keywords: intent.keywords.join(" "),
            text: intent.raw_text.clone(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "schedule" => self.schedule.as_deref(),
            "path" => self.path.as_deref(),
            "url" => self.url.as_deref(),
            "keywords" => Some(self.keywords.as_str()),
            "text" => Some(self.text.as_str()),
            _ => None,
        }
    }
}

/// Replace every known placeholder in every string of `value`. Placeholders
/// with no binding are left in place so a reviewer can spot them.
pub fn substitute(value: &Value, bindings: &Bindings) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_str(s, bindings)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, bindings)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, bindings)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn substitute_str(s: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match bindings.lookup(name) {
                    Some(v) => out.push_str(v),
                    None => {
                        out.push_str("{{");
                        out.push_str(&after[..end]);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Config used when no candidate grounds a node.
pub fn default_config(component_type: ComponentType) -> Value {
    match component_type {
        ComponentType::Trigger => json!({ "kind": "scheduler", "schedule": "{{schedule}}" }),
        ComponentType::Transform => json!({ "kind": "script", "script": "{{text}}" }),
        ComponentType::Invocation => json!({ "kind": "request", "target": "{{url}}" }),
        ComponentType::Channel => json!({ "kind": "request-reply" }),
        ComponentType::Endpoint => json!({ "kind": "endpoint", "address": "{{url}}" }),
        ComponentType::Decision => json!({ "kind": "choice" }),
        ComponentType::Route => json!({ "kind": "route" }),
        ComponentType::ErrorHandler => json!({ "kind": "error-handler", "action": "log" }),
        ComponentType::Terminal => json!({ "kind": "end" }),
        ComponentType::Merge => json!({ "kind": "merge" }),
        ComponentType::Placeholder => json!({ "kind": "placeholder", "text": "{{text}}" }),
    }
}

/// Coerce candidate content to an object; non-objects are wrapped.
pub fn as_object(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other.clone());
            map
        }
    }
}
