//! Intent-specific values pulled from free text: schedule, path, URL,
//! branch conditions.

use std::sync::LazyLock;

use regex::Regex;

static SCHEDULE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\bevery\s+(\d+)?\s*(second|sec|minute|min|hour|hr|day)s?\b").ok()
});

static CADENCE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(hourly|daily|nightly)\b").ok());

static URL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(?:https?|s?ftp)://[^\s,;"']+"#).ok());

static PATH_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s(])((?:/[\w.\-]+)+/?)").ok());

static CONDITION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:if|when)\s+(.+?)(?:\s+then\b|\s+route\b|\s+send\b|\s+go\b|[,;]|$)").ok()
});

/// ISO-8601 duration for phrases like "every 5 minutes" or "hourly".
pub fn schedule(text: &str) -> Option<String> {
    if let Some(caps) = SCHEDULE_RE.as_ref().and_then(|re| re.captures(text)) {
        let count: u64 = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(1);
        let unit = caps.get(2)?.as_str().to_ascii_lowercase();
        return Some(match unit.as_str() {
            "second" | "sec" => format!("PT{count}S"),
            "minute" | "min" => format!("PT{count}M"),
            "hour" | "hr" => format!("PT{count}H"),
            _ => format!("P{count}D"),
        });
    }
    let caps = CADENCE_RE.as_ref()?.captures(text)?;
    match caps.get(1)?.as_str().to_ascii_lowercase().as_str() {
        "hourly" => Some("PT1H".to_string()),
        _ => Some("P1D".to_string()),
    }
}

pub fn url(text: &str) -> Option<String> {
    URL_RE
        .as_ref()?
        .find(text)
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// First absolute filesystem path that is not part of a URL.
pub fn path(text: &str) -> Option<String> {
    let re = PATH_RE.as_ref()?;
    let stripped = match URL_RE.as_ref() {
        Some(url_re) => url_re.replace_all(text, " ").into_owned(),
        None => text.to_string(),
    };
    re.captures(&stripped)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Conditions from `if ...` / `when ...` clauses, in order, without duplicates.
pub fn conditions(text: &str) -> Vec<String> {
    let Some(re) = CONDITION_RE.as_ref() else {
        return Vec::new();
    };
    let mut out: Vec<String> = Vec::new();
    for caps in re.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            let condition = m.as_str().trim().to_string();
            if !condition.is_empty() && !out.contains(&condition) {
                out.push(condition);
            }
        }
    }
    out
}
