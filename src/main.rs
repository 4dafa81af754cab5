use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use subalign::config::Config;
use subalign::pipeline::{print_summary, run_pipeline};
use subalign::translate::{GeminiTranslator, Translator};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subalign")]
#[command(version, about = "Bilingual subtitle generation from Whisper transcripts")]
#[command(
    long_about = "Translate a Whisper transcript JSON and align the translated sentences back onto the original timed segments, producing bilingual SRT subtitles."
)]
struct Cli {
    /// Input Whisper transcript JSON file
    input: PathBuf,

    /// Source language code (e.g., en)
    #[arg(short, long)]
    source_lang: Option<String>,

    /// Target language code (e.g., zh)
    #[arg(short, long)]
    target_lang: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Character budget per translation batch
    #[arg(long)]
    batch_chars: Option<usize>,

    /// Character budget per subtitle display line
    #[arg(long)]
    line_chars: Option<usize>,

    /// Also translate each segment separately (per-segment subtitles)
    #[arg(long)]
    list_mode: bool,

    /// Skip translation and rebuild subtitles from persisted artifacts
    #[arg(long)]
    from_artifacts: bool,

    /// Output directory for subtitles and intermediate artifacts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(lang) = cli.source_lang {
        config.source_lang = lang;
    }
    if let Some(lang) = cli.target_lang {
        config.target_lang = lang;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(chars) = cli.batch_chars {
        config.batch_char_limit = chars;
    }
    if let Some(chars) = cli.line_chars {
        config.line_char_limit = chars;
    }
    if cli.list_mode {
        config.list_mode = true;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    config
        .validate(!cli.from_artifacts)
        .context("Configuration validation failed")?;

    info!("Input:     {}", cli.input.display());
    info!("Languages: {} -> {}", config.source_lang, config.target_lang);
    info!("Output:    {}", config.output_dir.display());
    if cli.from_artifacts {
        info!("Mode:      rebuild from artifacts");
    }

    let translator = if cli.from_artifacts {
        None
    } else {
        let api_key = config
            .gemini_api_key
            .clone()
            .context("GEMINI_API_KEY not set")?;
        Some(
            GeminiTranslator::new(
                api_key,
                config.source_lang.clone(),
                config.target_lang.clone(),
            )
            .with_model(config.model.clone()),
        )
    };

    let result = run_pipeline(
        &cli.input,
        translator.as_ref().map(|t| t as &dyn Translator),
        &config,
        true,
    )
    .await
    .context("Pipeline failed")?;

    print_summary(&result);

    Ok(())
}
