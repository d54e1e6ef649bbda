pub mod fixtures;
pub mod mock;

pub use mock::{MockBackend, Operation};

use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Install a stderr subscriber for tests. `RUST_LOG` overrides the
/// default `error` filter.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error"));
    let stderr = fmt::Layer::new().with_test_writer().pretty();
    let subscriber = Registry::default().with(env_filter).with(stderr);

    let _ = LogTracer::init();
    let _ = subscriber.try_init();
}
