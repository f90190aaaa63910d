use std::{
    io::Write,
    path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::SubscriptionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionReport {
    pub path: PathBuf,
    pub server_count: usize,
}

pub fn subscription_path(directory: &Path, username: &str) -> PathBuf {
    directory.join(format!("{username}.txt"))
}

pub fn encode_subscription<S: AsRef<str>>(server_urls: &[S]) -> String {
    let joined = server_urls
        .iter()
        .map(|url| url.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    STANDARD.encode(joined.as_bytes())
}

pub fn decode_subscription(content: &str) -> Result<Vec<String>, SubscriptionError> {
    let bytes = STANDARD.decode(content.trim())?;
    let text = String::from_utf8(bytes)?;
    Ok(text.split('\n').map(str::to_string).collect())
}

pub fn read_subscription(path: &Path) -> Result<Vec<String>, SubscriptionError> {
    let content = std::fs::read_to_string(path)?;
    decode_subscription(&content)
}

/// Writes `<directory>/<username>.txt`, replacing whatever was there. URLs are
/// taken verbatim.
pub fn create_manual_subscription<S: AsRef<str>>(
    directory: &Path,
    username: &str,
    server_urls: &[S],
) -> Result<SubscriptionReport, SubscriptionError> {
    if server_urls.is_empty() {
        return Err(SubscriptionError::NoServers);
    }

    if !directory.exists() {
        log::info!("[subscription] creating {}", directory.display());
        std::fs::create_dir_all(directory)?;
    }

    let encoded = encode_subscription(server_urls);
    let path = subscription_path(directory, username);
    std::fs::write(&path, encoded)?;

    log::info!(
        "[subscription] wrote {} server(s) for {username} to {}",
        server_urls.len(),
        path.display()
    );

    Ok(SubscriptionReport {
        path,
        server_count: server_urls.len(),
    })
}

/// Prints the status lines, falling back to plain ASCII when the console
/// rejects the check mark.
pub fn print_report(report: &SubscriptionReport, out: &mut impl Write) -> std::io::Result<()> {
    let path = report.path.display();
    if let Err(error) = writeln!(out, "✓ Created manual subscription: {path}") {
        log::debug!("[subscription] console rejected status line: {error}");
        writeln!(out, "[OK] Created manual subscription: {path}")?;
    }
    writeln!(out, "  Contains {} server(s)", report.server_count)
}
