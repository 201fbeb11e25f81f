use tracing::{Subscriber, metadata::LevelFilter};
use tracing_subscriber::{
    EnvFilter, Layer, prelude::__tracing_subscriber_SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

pub fn init(default_level: LevelFilter) {
    let subscriber = tracing_subscriber::registry();
    let stderr_log = stderr_layer(default_level);
    subscriber.with(stderr_log).init();
}

// stdout carries results and JSON, logs go to stderr
fn stderr_layer<S>(default_level: LevelFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true);

    stderr_layer.with_filter(env_filter)
}
