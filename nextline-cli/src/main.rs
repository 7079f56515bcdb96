use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use nextline_core::config::AppConfig;
use nextline_core::form::{FormError, ReplyForm};
use nextline_core::mood::Mood;
use nextline_core::screenshot::Screenshot;
use nextline_core::text::{
    GENERATING_PLACEHOLDER, HEADING, MOOD_LABEL, NOTES_LABEL, NOTES_PLACEHOLDER,
    SUBMIT_LABEL_BUSY, UPLOAD_PROMPT,
};
use nextline_engine::engine::{EngineError, ReplyEvent};
use nextline_runtime::backend::build_engine_from_config;
use nextline_runtime::config_store::ConfigStore;
use nextline_runtime::files::load_screenshot;
use nextline_runtime::settings::{API_HOSTNAME_ENV, resolve_config};

/// Know what to say next: send a chat screenshot, get a suggested reply.
#[derive(Parser, Debug)]
#[command(name = "nextline", version, about)]
struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the API host.
    #[arg(long, global = true, env = API_HOSTNAME_ENV)]
    api_host: Option<String>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a screenshot and stream the suggested reply.
    Ask {
        /// Screenshot image to upload.
        #[arg(short, long)]
        screenshot: Option<PathBuf>,

        /// casual, friendly, flirty or random.
        #[arg(short, long, value_parser = parse_mood)]
        mood: Option<Mood>,

        /// Anything the reply should take into account.
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List the available moods.
    Moods,

    /// Write a config file with default settings.
    InitConfig {
        #[arg(long)]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn parse_mood(s: &str) -> Result<Mood, FormError> {
    s.trim().to_ascii_lowercase().parse()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // Logs go to stderr; stdout carries the reply.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Moods => {
            for mood in Mood::ALL {
                println!("{:<10}{:<10}{}", mood.as_str(), mood.label(), mood.icon());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::InitConfig { path, force } => init_config(&path, force),
        Command::Ask {
            screenshot,
            mood,
            notes,
        } => {
            let cfg = resolve_config(cli.config.as_deref(), cli.api_host.as_deref())?;
            ask(&cfg, screenshot.as_deref(), mood, notes).await
        }
    }
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<ExitCode> {
    let store = ConfigStore::at_path(path);
    if store.exists() && !force {
        eprintln!(
            "{} already exists; pass --force to overwrite",
            store.path().display()
        );
        return Ok(ExitCode::FAILURE);
    }
    store.save(&AppConfig::default())?;
    println!("wrote {}", store.path().display());
    Ok(ExitCode::SUCCESS)
}

async fn ask(
    cfg: &AppConfig,
    screenshot: Option<&Path>,
    mood: Option<Mood>,
    notes: String,
) -> anyhow::Result<ExitCode> {
    let mut form = ReplyForm::new().with_mood(mood.unwrap_or(cfg.default_mood));
    form.set_notes(notes);

    if let Some(path) = screenshot {
        let shot = load_screenshot(path)?;
        if let Some(old) = form.select_file(shot) {
            log::debug!("released preview {}", old.url);
        }
        if let Some(preview) = form.preview() {
            log::debug!("selected {} as {}", preview.filename, preview.url);
        }
    }

    render_form(&form);

    let engine = build_engine_from_config(cfg);
    let mut stdout = std::io::stdout();
    let mut printed_any = false;

    let res = engine
        .submit_with_hook(&mut form, |event| match event {
            ReplyEvent::Started => {
                eprintln!("[{SUBMIT_LABEL_BUSY}] {GENERATING_PLACEHOLDER}");
            }
            ReplyEvent::Fragment(text) => {
                printed_any = true;
                let _ = write!(stdout, "{text}");
                let _ = stdout.flush();
            }
            ReplyEvent::Completed => {
                let _ = writeln!(stdout);
            }
            ReplyEvent::Failed(text) => {
                // Partial output is superseded by the fallback.
                if printed_any {
                    let _ = writeln!(stdout);
                }
                let _ = writeln!(stdout, "{text}");
            }
        })
        .await;
    log::debug!("final view: {:?}", form.response_view());

    match res {
        Ok(outcome) => {
            log::info!(
                "submission {}: fragments={} first_fragment_ms={:?}",
                outcome.stage.label(),
                outcome.fragments,
                outcome.timings.first_fragment_ms
            );
            if outcome.is_done() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Err(EngineError::Form(e)) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn render_form(form: &ReplyForm) {
    eprintln!("{HEADING}");
    match form.screenshot() {
        Some(shot) => eprintln!("  {}", describe_screenshot(shot)),
        None => eprintln!("  [{UPLOAD_PROMPT}]"),
    }
    eprintln!("  {MOOD_LABEL}: {}", form.mood().label());
    if form.notes().is_empty() {
        eprintln!("  {NOTES_LABEL}: ({NOTES_PLACEHOLDER})");
    } else {
        eprintln!("  {NOTES_LABEL}: {}", form.notes());
    }
}

fn describe_screenshot(shot: &Screenshot) -> String {
    format!(
        "{} ({:.1} KB, {})",
        shot.filename,
        shot.len() as f64 / 1024.0,
        shot.mime_type
    )
}
