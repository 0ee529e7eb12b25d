use clap::Parser;
use zodiac_etl::utils::error::{EtlError, ErrorSeverity};
use zodiac_etl::utils::{logger, validation::Validate};
use zodiac_etl::{CliConfig, EtlEngine, LocalStorage, WikipediaSource, ZodiacPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting zodiac-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(config).await {
        Ok(report) => {
            print!("{}", report);
            tracing::info!("✅ Report complete");
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

async fn run(config: CliConfig) -> zodiac_etl::Result<String> {
    let storage = LocalStorage::current_dir();
    let source = WikipediaSource::from_config(&config)?;

    // 範圍表載入失敗時不會開始抓取
    let pipeline = ZodiacPipeline::initialize(&storage, config, source).await?;
    EtlEngine::new(pipeline).run().await
}

fn exit_with(e: EtlError) -> ! {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
