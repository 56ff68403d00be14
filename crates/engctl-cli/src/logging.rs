//! Tracing setup
//!
//! Logs go to stderr at WARN unless `RUST_LOG` says otherwise. `-v` or the
//! `verbose` config property switches to DEBUG. The config is resolved
//! after the subscriber is installed, so the filter sits behind a reload
//! layer.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

pub struct Logging {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
    verbose: bool,
}

impl Logging {
    /// Install the global subscriber.
    pub fn init(verbose: bool) -> Self {
        let (filter, handle) = reload::Layer::new(filter(verbose));
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
            .try_init()
            .is_ok();

        if verbose {
            tracing::debug!("Verbose mode enabled");
        }
        Self {
            handle: installed.then_some(handle),
            verbose,
        }
    }

    /// Switch to DEBUG if it is not already on.
    pub fn enable_verbose(&mut self) {
        if self.verbose {
            return;
        }
        self.verbose = true;
        if let Some(handle) = &self.handle {
            if let Err(e) = handle.reload(filter(true)) {
                eprintln!("could not raise log level: {e}");
                return;
            }
            tracing::debug!("Verbose mode enabled by config");
        }
    }
}

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}
