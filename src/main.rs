use std::io::Write;

use clap::Parser;

use v2ray_subscription_tools::{
    cli::{Cli, run_control_panel},
    configuration::Settings,
    control_panel::ControlPanelFile,
    logging,
};

fn main() {
    logging::init();
    let cli = Cli::parse();
    let settings = Settings::load();

    if !settings.execution_allowed(|key| std::env::var(key).ok()) {
        log::warn!("[startup] execution guard rejected this environment");
        eprintln!(
            "control-panel only runs inside CI ({}=true); set {}=1 to run it locally.",
            settings.ci_variable, settings.local_debug_variable,
        );
        std::process::exit(1);
    }

    let panel = ControlPanelFile::new(&settings.control_panel_file);
    log::info!("[startup] using control panel {}", panel.path().display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let code = run_control_panel(cli, &panel, &mut out);
    if let Err(error) = out.flush() {
        log::warn!("[startup] failed to flush stdout: {error}");
    }
    drop(out);

    if code != 0 {
        std::process::exit(code);
    }
}
