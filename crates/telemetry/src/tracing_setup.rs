//! Tracing setup for structured logging.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Crates whose logs are shown at the default level.
const WORKSPACE_TARGETS: &[&str] = &["engine_core", "api", "registry", "clickhouse_client"];

/// Tracing configuration.
pub struct TracingConfig {
    /// Filter directive (e.g., "info", "engine_core=debug,registry=trace")
    pub filter: String,
    /// Emit one JSON object per event
    pub json: bool,
    /// Log span open/close, useful for timing requests
    pub span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::new().with_level(Level::INFO)
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
            span_events: false,
        }
    }

    /// Sets the workspace crates to `level` and everything else to `warn`,
    /// which keeps hyper and reqwest quiet.
    pub fn with_level(mut self, level: Level) -> Self {
        let level = level.as_str().to_lowercase();
        let mut directives = vec!["warn".to_string(), format!("tower_http={}", level)];
        directives.extend(WORKSPACE_TARGETS.iter().map(|t| format!("{}={}", t, level)));
        directives.push(format!("enrolment_engine={}", level));
        self.filter = directives.join(",");
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_span_events(mut self, span_events: bool) -> Self {
        self.span_events = span_events;
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(config: TracingConfig) -> bool {
    let env_filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let installed = if config.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = fmt::layer()
            .with_span_events(span_events)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!("Tracing initialized with filter: {}", config.filter);
    }
    installed
}

/// Initialize tracing from environment variables.
///
/// `RUST_LOG` overrides the default filter, `LOG_JSON=1` switches to JSON
/// output and `LOG_SPANS=1` enables span events.
pub fn init_tracing_from_env() -> bool {
    let flag = |name: &str| {
        std::env::var(name)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };

    let mut config = TracingConfig::default()
        .with_json(flag("LOG_JSON"))
        .with_span_events(flag("LOG_SPANS"));

    if let Ok(filter) = std::env::var("RUST_LOG") {
        config = config.with_filter(filter);
    }

    init_tracing(config)
}
