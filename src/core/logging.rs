use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::from_default_env().add_directive("wtsweep=info".parse().unwrap()))
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_logging() {
        // Test that init_logging doesn't panic
        // Note: Can only call once per test process
        // init_logging();
    }
}
