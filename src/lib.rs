pub mod cli;
pub mod configuration;
pub mod control_panel;
pub mod error;
pub mod logging;
pub mod subscription;
