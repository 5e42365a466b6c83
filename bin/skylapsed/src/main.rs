//! ---
//! sl_section: "07-binary"
//! sl_subsection: "binary"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Binary entrypoint for the skylapse daemon."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Offset};
use clap::{ArgAction, Parser, Subcommand};
use skylapse_camera::GoProCamera;
use skylapse_common::config::AppConfig;
use skylapse_common::logging::init_tracing;
use skylapse_core::{
    resolve_switcher, upload_staging, CameraProfile, Orchestrator, RunContext, SessionTiming,
    WindowOutcome,
};
use skylapse_net::{SettleDelays, WpaCliWifi};
use skylapse_rt::{Clock, SystemClock};
use skylapse_schedule::{ScheduleCalculator, ScheduleMode, ScheduleSettings, SolarModel};
use skylapse_upload::{DropboxClient, RemoteDestination, UploadScheduler};
use tracing::{error, info, warn};

const SERVICE_NAME: &str = "skylapsed";

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    version = env!("CARGO_PKG_VERSION"),
    about = "Unattended sunrise/sunset timelapse daemon",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(
        short = 't',
        long = "test",
        conflicts_with = "custom",
        help = "Capture one short test window a few seconds from now"
    )]
    test: bool,

    #[arg(
        short = 'c',
        long = "custom",
        requires = "length",
        help = "Capture one window starting immediately"
    )]
    custom: bool,

    #[arg(
        long,
        value_name = "MINUTES",
        requires = "custom",
        help = "Length of the custom window in minutes"
    )]
    length: Option<u64>,

    #[arg(
        long,
        value_name = "NAME",
        requires = "custom",
        help = "Folder label for the custom window"
    )]
    label: Option<String>,

    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print extended version information and exit"
    )]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Capture and upload today's windows")]
    Run,
    #[command(about = "Print the windows a run would capture and exit")]
    Windows {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
    #[command(about = "Upload the staging area to the folder for a date and label")]
    Upload {
        #[arg(long, value_name = "NAME")]
        label: String,
        #[arg(long, value_name = "YYYY-MM-DD", help = "Capture date (defaults to today)")]
        date: Option<NaiveDate>,
    },
}

impl Cli {
    fn schedule_mode(&self) -> ScheduleMode {
        if self.test {
            ScheduleMode::SingleTestWindow
        } else if self.custom {
            ScheduleMode::CustomWindow {
                length: Duration::from_secs(self.length.unwrap_or(60).saturating_mul(60)),
                label: self.label.clone().unwrap_or_else(|| "Custom".to_owned()),
            }
        } else {
            ScheduleMode::Solar
        }
    }
}

fn extended_version() -> String {
    format!(
        "skylapsed {} (target {}, profile {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_CARGO_TARGET_TRIPLE"),
        if env!("VERGEN_CARGO_DEBUG") == "true" {
            "debug"
        } else {
            "release"
        },
        env!("VERGEN_BUILD_TIMESTAMP"),
    )
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", extended_version());
        return Ok(ExitCode::SUCCESS);
    }

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/skylapse.toml"));
    candidates.push(PathBuf::from("/etc/skylapse/skylapse.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let config = loaded.config;
    init_tracing(SERVICE_NAME, &config.logging)?;
    info!(config = %loaded.source.display(), version = %extended_version(), "configuration loaded");

    let mode = cli.schedule_mode();
    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config, &mode).await,
        Commands::Windows { json } => print_windows(&config, &mode, json),
        Commands::Upload { label, date } => upload(&config, &label, date).await,
    };
    match result {
        Ok(code) => Ok(code),
        Err(err) => {
            error!(error = %format!("{:#}", err), "run aborted");
            Err(err)
        }
    }
}

fn calculator(config: &AppConfig) -> ScheduleCalculator {
    ScheduleCalculator::new(
        ScheduleSettings::from_config(&config.schedule, &config.location),
        Arc::new(SolarModel),
    )
}

fn uploader(config: &AppConfig) -> Result<UploadScheduler> {
    let token = config.upload.token()?;
    let client = DropboxClient::new(config.upload.endpoint.clone(), token)
        .context("failed to build cloud storage client")?;
    Ok(UploadScheduler::new(Arc::new(client)).with_concurrency(config.upload.concurrency_limit()))
}

async fn run(config: &AppConfig, mode: &ScheduleMode) -> Result<ExitCode> {
    let wifi = Arc::new(WpaCliWifi::new(
        config.network.interface.clone(),
        config.timing.scan_wait,
    ));
    let switcher = resolve_switcher(wifi, &config.network, SettleDelays::from_config(&config.timing))
        .await?;
    let camera = GoProCamera::from_config(&config.camera).context("invalid camera configuration")?;

    let ctx = RunContext {
        switcher,
        camera: Arc::new(camera),
        clock: Arc::new(SystemClock),
        timing: SessionTiming::from_config(&config.timing),
        profile: CameraProfile::from_config(&config.camera),
        staging: config.staging.directory.clone(),
        uploader: uploader(config)?,
        upload_root: config.upload.root.clone(),
    };
    let orchestrator = Orchestrator::new(ctx, calculator(config))
        .verify_on_startup(config.network.verify_on_startup)
        .with_utc_offset(Local::now().offset().fix());

    let summary = orchestrator.run(mode).await?;
    for window in &summary.windows {
        match &window.outcome {
            WindowOutcome::Captured { session, upload } => info!(
                label = %window.window.label(),
                retrieved = session.retrieved.len(),
                uploaded = upload.uploaded(),
                destination = %window.destination,
                "window captured"
            ),
            WindowOutcome::Failed { phase, error } => warn!(
                label = %window.window.label(),
                %phase,
                %error,
                "window failed"
            ),
            WindowOutcome::Skipped { reason } => {
                info!(label = %window.window.label(), %reason, "window skipped")
            }
        }
    }
    if summary.files_left_in_staging() > 0 {
        warn!(
            files = summary.files_left_in_staging(),
            staging = %config.staging.directory.display(),
            "some files were not uploaded; rerun with `upload` to retry"
        );
    }
    info!("job complete");
    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_windows(config: &AppConfig, mode: &ScheduleMode, json: bool) -> Result<ExitCode> {
    let now = SystemClock.now();
    let today = Local::now().date_naive();
    let windows = calculator(config).windows(today, now, mode)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&windows)?);
    } else if windows.is_empty() {
        println!("no capture window is still ahead today");
    } else {
        for window in &windows {
            println!(
                "{:<10} {} -> {}",
                window.label(),
                window.start().with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z"),
                window.end().with_timezone(&Local).format("%H:%M:%S %Z"),
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn upload(config: &AppConfig, label: &str, date: Option<NaiveDate>) -> Result<ExitCode> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let destination = RemoteDestination::new(&config.upload.root, date, label);
    let report = upload_staging(&uploader(config)?, &config.staging.directory, &destination).await?;
    info!(
        uploaded = report.uploaded(),
        failed = report.failed().count(),
        %destination,
        "upload pass complete"
    );
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_select_schedule_mode() {
        let cli = Cli::parse_from(["skylapsed"]);
        assert_eq!(cli.schedule_mode(), ScheduleMode::Solar);

        let cli = Cli::parse_from(["skylapsed", "-t"]);
        assert_eq!(cli.schedule_mode(), ScheduleMode::SingleTestWindow);

        let cli = Cli::parse_from(["skylapsed", "-c", "--length", "90", "--label", "Storm", "run"]);
        assert_eq!(
            cli.schedule_mode(),
            ScheduleMode::CustomWindow {
                length: Duration::from_secs(90 * 60),
                label: "Storm".into(),
            }
        );
    }

    #[test]
    fn custom_mode_needs_a_length() {
        assert!(Cli::try_parse_from(["skylapsed", "--custom"]).is_err());
        assert!(Cli::try_parse_from(["skylapsed", "-t", "-c", "--length", "5"]).is_err());
    }

    #[test]
    fn upload_subcommand_parses_date() {
        let cli = Cli::parse_from(["skylapsed", "upload", "--label", "Sunset", "--date", "2024-03-05"]);
        match cli.command {
            Some(Commands::Upload { label, date }) => {
                assert_eq!(label, "Sunset");
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
