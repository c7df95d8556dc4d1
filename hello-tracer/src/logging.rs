use std::io::Write;

use env_logger::Env;

/// Logs to stderr as `[<level>] <message>`, filtered by `RUST_LOG`
/// (default `info`).
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}",
                record.level().as_str().to_ascii_lowercase(),
                record.args()
            )
        })
        .init();
}
