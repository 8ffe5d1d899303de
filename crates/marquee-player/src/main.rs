use std::path::PathBuf;

use anyhow::{Context, Result};

use marquee_player::overlay::raster::{find_system_font, load_font};
use marquee_player::settings::SettingsConfig;
use marquee_player::sim::session::{self, RunOptions, SessionScript};

const USAGE: &str = "usage: marquee-player <session.json> [--snapshots DIR] [--font PATH] [--settings PATH | --no-settings]";

struct Args {
    session: PathBuf,
    snapshots: Option<PathBuf>,
    font: Option<PathBuf>,
    settings: Option<PathBuf>,
    no_settings: bool,
}

fn parse_args() -> Result<Args> {
    let mut session: Option<PathBuf> = None;
    let mut snapshots: Option<PathBuf> = None;
    let mut font: Option<PathBuf> = None;
    let mut settings: Option<PathBuf> = None;
    let mut no_settings = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--snapshots" => snapshots = Some(args.next().context(USAGE)?.into()),
            "--font" => font = Some(args.next().context(USAGE)?.into()),
            "--settings" => settings = Some(args.next().context(USAGE)?.into()),
            "--no-settings" => no_settings = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if other.starts_with("--") => anyhow::bail!("unknown option {other}\n{USAGE}"),
            other => session = Some(PathBuf::from(other)),
        }
    }

    Ok(Args {
        session: session.context(USAGE)?,
        snapshots,
        font,
        settings,
        no_settings,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = parse_args()?;
    let script = SessionScript::load(&args.session)?;

    let font_path = args
        .font
        .or_else(|| find_system_font(script.overlay.font.bold));
    let font = match font_path {
        Some(path) => match load_font(&path) {
            Ok(font) => {
                log::info!("Overlay font: {}", path.display());
                Some(font)
            }
            Err(e) => {
                log::warn!("Failed to load font: {e:#}");
                None
            }
        },
        None => {
            log::warn!("No overlay font found; snapshots will be blank");
            None
        }
    };

    let settings_path = if args.no_settings {
        None
    } else {
        args.settings.or_else(SettingsConfig::default_path)
    };

    let report = session::run(
        &script,
        RunOptions {
            snapshot_dir: args.snapshots,
            font,
            settings_path,
        },
    )?;
    log::info!(
        "Session finished: {} frames, {} events, {} alert(s)",
        report.frames_drawn,
        report.events_handled,
        report.alerts.len()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
