//! ログ出力の初期化

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// `--verbose` ならdebug、それ以外は `RUST_LOG`、未設定・不正ならwarn
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new(LevelFilter::DEBUG.to_string());
    }

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(LevelFilter::WARN.to_string()))
}

pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, rust_log.as_deref());

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
