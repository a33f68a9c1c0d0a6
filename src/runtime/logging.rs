use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::runtime::config;

pub fn init() {
    let format = fmt::layer()
        .with_level(true)
        .with_target(true)
        .compact();

    let filter = EnvFilter::builder()
        .with_env_var("IEEE80211B_LOG")
        .with_default_directive(config::config().log_level.into())
        .from_env_lossy();

    if tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init()
        .is_err()
    {
        debug!("logger already initialized");
    }
}
