/// Logs go to stderr so stdout carries only the panel and status output.
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("v2ray_subscription_tools=info"),
    )
    .init();

    log::debug!(
        "v2ray-subscription-tools v{} (RUST_LOG={})",
        env!("CARGO_PKG_VERSION"),
        std::env::var("RUST_LOG").unwrap_or_else(|_| "<default: info>".into()),
    );
}
