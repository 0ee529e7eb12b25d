use clap::Parser;
use zodiac_etl::core::pipeline::build_classifier;
use zodiac_etl::core::ConfigProvider;
use zodiac_etl::domain::model::OutputFormat;
use zodiac_etl::utils::error::ErrorSeverity;
use zodiac_etl::utils::{logger, validation::Validate};
use zodiac_etl::{EtlEngine, LocalStorage, TomlConfig, WikipediaSource, ZodiacPipeline};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Zodiac report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "zodiac-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the report format from config
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Load and check the range table without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = args.verbose || config.verbose();
    if config.json_logging() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based zodiac report: {}", config.pipeline_name());

    // 應用命令列覆蓋設定
    if let Some(format) = args.format {
        config.report.format = Some(format);
        tracing::info!("🔧 Output format overridden to: {:?}", format);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual fetching will occur");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let storage = LocalStorage::current_dir();
    let result = async {
        let source = WikipediaSource::from_config(&config)?;
        let pipeline = ZodiacPipeline::initialize(&storage, config, source).await?;
        EtlEngine::new(pipeline).run().await
    }
    .await;

    match result {
        Ok(report) => {
            print!("{}", report);
            tracing::info!("✅ Report complete");
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    eprintln!("📋 Configuration Summary:");
    eprintln!("  Pipeline: {}", config.pipeline_name());
    eprintln!("  Listing: {}", config.listing_url());
    eprintln!("  Range table: {}", config.range_table_path());
    eprintln!("  Row policy: {:?}", config.row_policy());
    eprintln!("  Fallback: {}", config.fallback_row().unwrap_or("disabled"));
    eprintln!("  Format: {:?}", config.output_format());

    let retry = config.retry_policy();
    eprintln!("  Retries: {} x {:?}", retry.attempts, retry.delay);

    if args.dry_run {
        eprintln!("  🔍 DRY RUN MODE ENABLED");
    }

    eprintln!();
}

fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(config.range_table_path())?;
    let classifier = build_classifier(&text, config.row_policy(), config.fallback_row())?;

    eprintln!("🔍 Range table:");
    for interval in classifier.table().intervals() {
        let marker = if interval.is_wraparound() { " (wraps year end)" } else { "" };
        eprintln!("  {}{}", interval, marker);
    }
    if let Some(fallback) = classifier.fallback() {
        eprintln!("  fallback: {}", fallback);
    }

    eprintln!();
    eprintln!("✅ Dry run complete. {} intervals loaded.", classifier.table().len());

    Ok(())
}
