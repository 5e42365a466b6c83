//! ---
//! sl_section: "01-core-functionality"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Shared primitives and utilities for the timelapse runtime."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Shared primitives for the skylapse workspace.
//! This crate exposes configuration loading and logging setup consumed by
//! every other crate and the daemon binary.

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, CameraConfig, CameraSetting, LocationConfig, LoggingConfig, NetworkConfig,
    ScheduleConfig, StagingConfig, TimingConfig, UploadConfig,
};
pub use logging::{init_tracing, LogFormat};
