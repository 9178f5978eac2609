use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use vibecheck_core::{
    ChatCompletionsModel, DEFAULT_COMMENT_LIMIT, FetchConfig, LlmProvider, Progress, Stage,
    TargetLanguage, VibeCheck, format_report_readable,
};

fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for LlmProvider (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

impl From<CliProvider> for LlmProvider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => LlmProvider::Gemini,
            CliProvider::Openai => LlmProvider::Openai,
            CliProvider::Grok => LlmProvider::Grok,
        }
    }
}

#[derive(Clone, Default, ValueEnum)]
enum CliLanguage {
    #[default]
    Auto,
    English,
    French,
    Spanish,
    German,
    Japanese,
    Portuguese,
    Hindi,
    Arabic,
}

impl From<CliLanguage> for TargetLanguage {
    fn from(cli: CliLanguage) -> Self {
        match cli {
            CliLanguage::Auto => TargetLanguage::Auto,
            CliLanguage::English => TargetLanguage::English,
            CliLanguage::French => TargetLanguage::French,
            CliLanguage::Spanish => TargetLanguage::Spanish,
            CliLanguage::German => TargetLanguage::German,
            CliLanguage::Japanese => TargetLanguage::Japanese,
            CliLanguage::Portuguese => TargetLanguage::Portuguese,
            CliLanguage::Hindi => TargetLanguage::Hindi,
            CliLanguage::Arabic => TargetLanguage::Arabic,
        }
    }
}

#[derive(Parser)]
#[command(name = "vibecheck")]
#[command(about = "Check the audience vibe of a YouTube video from its transcript and top comments")]
#[command(version)]
struct Cli {
    /// Video URL
    url: String,

    /// Report language. "auto" follows the language of the video and its comments
    #[arg(short, long, default_value = "auto")]
    lang: CliLanguage,

    /// AI provider for the analysis
    #[arg(short, long, env = "VIBECHECK_PROVIDER", default_value = "gemini")]
    provider: CliProvider,

    /// Override the provider's default model
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum number of ranked comments sent to the model
    #[arg(long, default_value_t = DEFAULT_COMMENT_LIMIT)]
    comments_limit: usize,

    /// Invidious mirror base URL, tried in the order given (replaces the built-in list)
    #[arg(long = "mirror", env = "VIBECHECK_MIRRORS", value_delimiter = ',')]
    mirrors: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Netscape cookies file for the native extractor
    #[arg(long, env = "VIBECHECK_COOKIES")]
    cookies: Option<PathBuf>,

    /// yt-dlp executable
    #[arg(long, env = "VIBECHECK_YTDLP", default_value = "yt-dlp")]
    ytdlp: PathBuf,

    /// Print the full report as JSON instead of Markdown
    #[arg(long)]
    json: bool,

    /// Also print the top N ranked comments below the report
    #[arg(long, value_name = "N")]
    show_comments: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default()
            .with_timeout(Duration::from_secs(self.timeout.max(1)))
            .with_ytdlp_program(&self.ytdlp);
        if !self.mirrors.is_empty() {
            config = config.with_mirrors(&self.mirrors);
        }
        if let Some(cookies) = &self.cookies {
            config = config.with_credentials(cookies);
        }
        config
    }
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "warn,vibecheck=info,vibecheck_core=info",
        _ => "warn,vibecheck=debug,vibecheck_core=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn stage_message(stage: Stage, provider: LlmProvider) -> String {
    match stage {
        Stage::Metadata => "Fetching video metadata...".to_string(),
        Stage::Transcript => "Fetching transcript...".to_string(),
        Stage::Comments => "Fetching comments...".to_string(),
        Stage::Analysis => format!("Checking the vibe with {}...", provider.name()),
    }
}

fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::Metadata => "Metadata",
        Stage::Transcript => "Transcript",
        Stage::Comments => "Comments",
        Stage::Analysis => "Analysis",
    }
}

/// Spinner of the stage currently running.
struct ActiveStep {
    stage: Stage,
    spinner: ProgressBar,
    started: Instant,
}

impl ActiveStep {
    /// A stage that never reported success gave up.
    fn abandon(self) {
        self.spinner.finish_with_message(format!(
            "{} {} unavailable {}",
            style("✗").red().bold(),
            stage_title(self.stage),
            style(format!("[{}]", format_elapsed(self.started.elapsed()))).dim()
        ));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let provider: LlmProvider = cli.provider.clone().into();
    let language: TargetLanguage = cli.lang.clone().into();

    // Validate API key early
    let model = match ChatCompletionsModel::from_provider(provider) {
        Ok(model) => match &cli.model {
            Some(name) => model.with_model(name),
            None => model,
        },
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let config = cli.fetch_config();
    let vibe = VibeCheck::from_config(&config, cli.comments_limit, Box::new(model));
    tracing::debug!(
        provider = provider.name(),
        model = vibe.model(),
        mirrors = ?config.mirrors,
        timeout_secs = config.timeout.as_secs(),
        credentials = ?config.credentials,
        comments_limit = cli.comments_limit,
        "Resolved configuration"
    );

    if !cli.json {
        println!(
            "\n{}  {}\n",
            style("vibecheck").cyan().bold(),
            style("YouTube Audience Analyzer").dim()
        );
        println!(
            "{} Model: {} {}",
            style("✓").green().bold(),
            style(vibe.model()).yellow(),
            style(format!("({})", provider.name())).dim()
        );
        println!("{}", style("─".repeat(60)).dim());
    }

    let total_start = Instant::now();
    let mut active: Option<ActiveStep> = None;

    let result = vibe
        .run_with_progress(&cli.url, language, |event| match event {
            Progress::Started(stage) => {
                if let Some(previous) = active.take() {
                    previous.abandon();
                }
                active = Some(ActiveStep {
                    stage,
                    spinner: create_spinner(&stage_message(stage, provider)),
                    started: Instant::now(),
                });
            }
            Progress::Finished { stage, summary } => {
                if let Some(step) = active.take() {
                    step.spinner.finish_with_message(format!(
                        "{} {}: {} {}",
                        style("✓").green().bold(),
                        stage_title(stage),
                        summary,
                        style(format!("[{}]", format_elapsed(step.started.elapsed()))).dim()
                    ));
                }
            }
            Progress::Degraded(notice) => {
                if let Some(previous) = active.take() {
                    previous.abandon();
                }
                eprintln!("{} {}", style("!").yellow().bold(), style(notice).yellow());
            }
        })
        .await;

    if let Some(step) = active.take() {
        step.abandon();
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\n{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "\n{} {}",
        style("Total time:").dim(),
        style(format_elapsed(total_start.elapsed())).cyan().bold()
    );
    println!(
        "{} metadata: {}, transcript: {}, comments: {}",
        style("Sources:").dim(),
        style(&report.metadata_source).cyan(),
        style(report.transcript_source.as_deref().unwrap_or("none")).cyan(),
        style(report.comments_source.as_deref().unwrap_or("none")).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    // Human-readable output
    println!("{}", format_report_readable(&report));

    if let Some(n) = cli.show_comments {
        println!("{}", style("─".repeat(60)).dim());
        println!("{}\n", style(format!("Top {} comments", n.min(report.comments.len()))).bold());
        for comment in report.comments.iter().take(n) {
            println!("- {}", comment);
        }
        println!();
    }

    Ok(())
}
