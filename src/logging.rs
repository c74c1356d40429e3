// File: src/logging.rs
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

const DEFAULT_FILTER: &str = "warn,script_core=info,script_report=info,script_explorer=info";

/// Installs the stderr logger used by the binaries. `RUST_LOG` overrides the default filter.
pub fn init_logger() {
    let env = Env::default().filter_or("RUST_LOG", DEFAULT_FILTER);
    let mut builder = Builder::from_env(env);

    builder
        .filter_module("regex", LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr);

    // A second call (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
}
