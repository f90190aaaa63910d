use std::{io::Write, path::Path};

use clap::{CommandFactory, Parser, Subcommand};

use crate::{
    control_panel::ControlPanelFile,
    error::ControlPanelError,
    subscription::{create_manual_subscription, print_report},
};

pub const SUBSCRIPTION_PROGRAM: &str = "create-manual-subscription";

#[derive(Parser, Debug)]
#[command(
    name = "control-panel",
    version,
    about = "Control panel manager for v2ray subscription",
    after_help = "Runs only inside CI, or locally with CONTROL_PANEL_LOCAL_DEBUG=1."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show control panel entries and active server
    Show,
    /// Activate a server file listed in control_panel.txt (adds if missing)
    Activate {
        /// Server filename to activate (e.g. servers.txt or servers1.txt)
        filename: String,
        /// Also move the on-flag to this file
        #[arg(long)]
        on: bool,
    },
    /// Activate a server file and move the on-flag to it
    Switch {
        /// Server filename to switch to
        filename: String,
    },
}

/// Runs one control panel command and returns the exit status.
pub fn run_control_panel(cli: Cli, panel: &ControlPanelFile, out: &mut impl Write) -> i32 {
    let Some(command) = cli.command else {
        if let Err(error) = Cli::command().write_help(out).and_then(|_| writeln!(out)) {
            log::warn!("[control_panel] failed to print help: {error}");
        }
        return 0;
    };

    let result = match command {
        Command::Show => panel.show(out),
        Command::Activate { filename, on } => panel.activate(&filename, on, out).map(|_| ()),
        Command::Switch { filename } => panel.switch(&filename, out).map(|_| ()),
    };

    match result {
        Ok(()) => 0,
        Err(error @ (ControlPanelError::EmptyFilename | ControlPanelError::InvalidFilename(_))) => {
            if let Err(write_error) = writeln!(out, "{error}") {
                log::warn!("[control_panel] failed to print message: {write_error}");
            }
            1
        }
        Err(error) => {
            log::error!("[control_panel] {error}");
            eprintln!("control-panel: {error}");
            1
        }
    }
}

/// Username and URLs, or `None` when either is missing.
pub fn split_subscription_arguments(arguments: &[String]) -> Option<(&str, &[String])> {
    match arguments.split_first() {
        Some((username, server_urls)) if !server_urls.is_empty() => {
            Some((username.as_str(), server_urls))
        }
        _ => None,
    }
}

pub fn write_subscription_usage(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Usage: {SUBSCRIPTION_PROGRAM} <username> <server_url1> [server_url2] ...")?;
    writeln!(out, "\nExample:")?;
    writeln!(
        out,
        "  {SUBSCRIPTION_PROGRAM} manual_user \"vless://...\" \"vless://...\""
    )
}

/// Builds one subscription from positional arguments and returns the exit
/// status.
pub fn run_subscription(arguments: &[String], directory: &Path, out: &mut impl Write) -> i32 {
    let Some((username, server_urls)) = split_subscription_arguments(arguments) else {
        if let Err(error) = write_subscription_usage(out) {
            log::warn!("[subscription] failed to print usage: {error}");
        }
        return 1;
    };

    log::info!(
        "[startup] building subscription for {username} into {}",
        directory.display()
    );

    let report = match create_manual_subscription(directory, username, server_urls) {
        Ok(report) => report,
        Err(error) => {
            log::error!("[subscription] {error}");
            eprintln!("{SUBSCRIPTION_PROGRAM}: {error}");
            return 1;
        }
    };

    if let Err(error) = print_report(&report, out) {
        log::warn!("[subscription] failed to print report: {error}");
    }
    0
}
