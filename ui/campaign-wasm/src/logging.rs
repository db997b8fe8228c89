//! Browser console logging.
//!
//! `tracing` events are formatted by `tracing-subscriber` and written to the
//! console method matching their level.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_web::MakeWebConsoleWriter;

/// Install the global subscriber. A second call is ignored.
pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    let _ = tracing_subscriber::registry()
        .with(LevelFilter::DEBUG)
        .with(fmt_layer)
        .try_init();
}
