//! Tracing setup and per-stage span definitions.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FORGE_LOG";

/// Install the global subscriber. Filter from `FORGE_LOG`, default `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    init_with_filter(filter, json);
}

/// Install the global subscriber with an explicit filter string.
pub fn init_tracing_with_filter(filter: &str, json: bool) {
    init_with_filter(EnvFilter::new(filter), json);
}

fn init_with_filter(filter: EnvFilter, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    // Err only means a subscriber is already installed.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Create an intent interpretation span keyed by requirement fingerprint.
#[macro_export]
macro_rules! interpret_span {
    ($fingerprint:expr) => {
        tracing::info_span!("forge.interpret", fingerprint = %$fingerprint)
    };
}

/// Create a retrieval span over a plan of `$intents` intents.
#[macro_export]
macro_rules! retrieve_span {
    ($intents:expr) => {
        tracing::info_span!("forge.retrieve", intents = $intents)
    };
}

/// Create a component synthesis span.
#[macro_export]
macro_rules! synthesize_span {
    ($intents:expr) => {
        tracing::info_span!("forge.synthesize", intents = $intents)
    };
}

/// Create a graph assembly span over `$groups` component groups.
#[macro_export]
macro_rules! assemble_span {
    ($groups:expr) => {
        tracing::info_span!("forge.assemble", groups = $groups)
    };
}

/// Create a consistency validation span.
#[macro_export]
macro_rules! validate_span {
    ($nodes:expr) => {
        tracing::info_span!("forge.validate", nodes = $nodes)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const REQUEST: &str = "forge.request";
    pub const INTERPRET: &str = "forge.interpret";
    pub const RETRIEVE: &str = "forge.retrieve";
    pub const SYNTHESIZE: &str = "forge.synthesize";
    pub const ASSEMBLE: &str = "forge.assemble";
    pub const VALIDATE: &str = "forge.validate";
    pub const FEEDBACK: &str = "forge.feedback";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing_with_filter("debug", false);
        init_tracing_with_filter("info", true);
        let span = interpret_span!("F-1");
        assert_eq!(span.metadata().map(|m| m.name()), Some(names::INTERPRET));
    }
}
