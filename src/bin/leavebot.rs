use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use leavebot::client::{
    ForecastClient, HttpCalendarSource, S3BlobStore, SlackWebhook, SmtpMailer,
};
use leavebot::compose::MessageKind;
use leavebot::config::Config;
use leavebot::context::{AppContext, SharedContext, StandardContext};
use leavebot::job::{Collaborators, Job};
use leavebot::model::LeaveTypeCatalog;
use leavebot::model::classifier::classify_all;
use leavebot::model::parser::parse_calendar;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;

#[derive(Debug, Default)]
struct Args {
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
    preview: Option<PathBuf>,
    date: Option<NaiveDate>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--root" | "-r" => {
                let value = args.get(i + 1).ok_or_else(|| anyhow!("--root needs a path"))?;
                parsed.root = Some(value.into());
                i += 1;
            }
            "--config" | "-c" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--config needs a file"))?;
                parsed.config = Some(value.into());
                i += 1;
            }
            "--date" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--date needs YYYY-MM-DD"))?;
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date '{}'", value))?;
                parsed.date = Some(date);
                i += 1;
            }
            "--verbose" | "-v" => parsed.verbose = true,
            "preview" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("preview needs an .ics file"))?;
                parsed.preview = Some(value.into());
                i += 1;
            }
            other => return Err(anyhow!("Unknown argument '{}'", other)),
        }
        i += 1;
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h" || arg == "help") {
        leavebot::cli::print_help("leavebot");
        return Ok(());
    }

    let args = parse_args(&args)?;
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .map_err(|e| anyhow!("Logger setup failed: {}", e))?;

    let ctx: SharedContext = Arc::new(StandardContext::new(args.root.clone()));

    if let Some(file) = &args.preview {
        let today = args.date.unwrap_or_else(|| Utc::now().date_naive());
        let catalog =
            Config::catalog_or_default(load_config(ctx.as_ref(), args.config.as_ref()))?;
        return preview(file, today, &catalog);
    }

    let config = match load_config(ctx.as_ref(), args.config.as_ref()) {
        Ok(config) => config,
        Err(e) if Config::is_missing_config_error(&e) => {
            let path = ctx.get_config_file_path()?;
            eprintln!("No configuration found. Create {} first.", path.display());
            return Err(e);
        }
        Err(e) => return Err(e),
    };
    let config = config.with_env_overrides(|key| env::var(key).ok());
    config.validate()?;

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let forecast = ForecastClient::new(&config.forecast, timeout)?;
    let parts = Collaborators {
        calendar: Box::new(HttpCalendarSource::new(&config.calendar_url, timeout)?),
        weekly_chat: Box::new(SlackWebhook::new(&config.slack.weekly_webhook_url, timeout)?),
        team_chat: Box::new(SlackWebhook::new(
            &config.slack.product_accounts_webhook_url,
            timeout,
        )?),
        people: Box::new(forecast.clone()),
        assignments: Box::new(forecast),
        blobs: Box::new(S3BlobStore::new(&config.storage).await?),
        mailer: Box::new(SmtpMailer::new(&config.mail)?),
    };

    let report = Job::new(config, ctx, parts).run(Utc::now()).await?;
    println!("{}", report.outcome);
    Ok(())
}

fn load_config(ctx: &dyn AppContext, explicit: Option<&PathBuf>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from(path),
        None => Config::load(ctx),
    }
}

fn preview(file: &Path, today: NaiveDate, catalog: &LeaveTypeCatalog) -> Result<()> {
    let raw = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let entries = classify_all(parse_calendar(&raw)?);
    for kind in MessageKind::iter() {
        let selected = kind.select(&entries, today, catalog);
        println!("===== {} =====", kind);
        println!("{}", kind.render(&selected, catalog));
        println!();
    }
    Ok(())
}
