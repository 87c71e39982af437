use std::fs::{self, File};

use env_logger::{Builder, Env, Target};

use crate::config;

/// Routes `log` records to `coda.log` under the state directory. The
/// terminal runs in raw mode with the alternate screen active, so
/// records written to stderr would corrupt the interface.
///
/// Filtering honors `RUST_LOG` and defaults to `warn`.
pub fn init() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(file) = log_file() {
        builder.target(Target::Pipe(Box::new(file)));
    }
    let _ = builder.try_init();
}

fn log_file() -> Option<File> {
    let dir = config::default_state_dir()?;
    fs::create_dir_all(&dir).ok()?;
    File::create(dir.join("coda.log")).ok()
}
