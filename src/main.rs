//! Command-line entry point.
//!
//! ```bash
//! # Analyze test_image_2.png in the working directory
//! screen-intent
//!
//! # Analyze another screenshot with verbose logs on stderr
//! screen-intent shot.png --log-level debug
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};

use screen_intent::observability::{redact, LogFormat, LogLevel, LoggingConfig};
use screen_intent::{AnalysisResult, AnalyzerConfig, ImageIntentAnalyzer, IntentResult};

/// Infer what the user is doing from a screenshot.
#[derive(Parser, Debug)]
#[command(name = "screen-intent")]
#[command(version)]
#[command(about = "Infers a user's current on-screen activity from a screenshot", long_about = None)]
struct Cli {
    /// Screenshot to analyze
    #[arg(default_value = "test_image_2.png")]
    image: PathBuf,

    /// Model identifier (overrides SCREEN_INTENT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Completion token cap (overrides SCREEN_INTENT_MAX_TOKENS)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// API base URL (overrides OPENAI_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides OPENAI_TIMEOUT)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Minimum level for logs written to stderr
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

impl Cli {
    fn config(&self) -> IntentResult<AnalyzerConfig> {
        let mut builder = AnalyzerConfig::builder_from_env();

        if let Some(model) = &self.model {
            builder = builder.model(model.clone());
        }
        if let Some(max_tokens) = self.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout_secs(secs);
        }

        builder.build()
    }
}

async fn run(cli: &Cli) -> AnalysisResult {
    match cli
        .config()
        .and_then(|config| ImageIntentAnalyzer::from_config(&config))
    {
        Ok(analyzer) => analyzer.analyze_path(&cli.image).await,
        Err(err) => {
            tracing::error!(error = %redact(&err.to_string()), "Failed to set up analyzer");
            AnalysisResult::from_error(&err)
        }
    }
}

/// Line printed before the analysis starts.
fn banner(image: &Path) -> String {
    format!("'{}' 이미지 분석을 시작합니다...", image.display())
}

/// Result section: a blank line, the header, then the pretty JSON.
fn render_result(result: &AnalysisResult) -> serde_json::Result<String> {
    Ok(format!("\n--- 분석 결과 ---\n{}", result.to_pretty_json()?))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(err) = LoggingConfig::new()
        .with_level(cli.log_level)
        .with_format(cli.log_format)
        .init()
    {
        eprintln!("failed to initialize logging: {}", err);
    }

    println!("{}", banner(&cli.image));
    let result = run(&cli).await;
    match render_result(&result) {
        Ok(text) => println!("{}", text),
        Err(err) => tracing::error!(error = %err, "Failed to serialize result"),
    }
}
