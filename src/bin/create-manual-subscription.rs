use std::io::Write;

use v2ray_subscription_tools::{cli::run_subscription, configuration::Settings, logging};

fn main() {
    logging::init();

    let arguments: Vec<String> = std::env::args().skip(1).collect();
    let settings = Settings::load();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let code = run_subscription(&arguments, &settings.subscriptions_directory, &mut out);
    if let Err(error) = out.flush() {
        log::warn!("[startup] failed to flush stdout: {error}");
    }
    drop(out);

    if code != 0 {
        std::process::exit(code);
    }
}
