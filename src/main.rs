use clap::Parser;
use course_explorer::utils::error::ErrorSeverity;
use course_explorer::utils::logger;
use course_explorer::{
    render, CliConfig, CourseExplorer, ExplorerError, HttpCourseStore, LoadOutcome,
};

fn exit_code(e: &ExplorerError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: ExplorerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting course-explorer");

    let settings = cli.resolve().unwrap_or_else(|e| fail(e));
    if cli.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    let store = HttpCourseStore::from_config(&settings).unwrap_or_else(|e| fail(e));
    let mut explorer = CourseExplorer::new(store, settings.explorer_options())
        .with_criteria(settings.criteria.clone());

    // Ctrl-C 時中止尚未完成的請求
    let liveness = explorer.liveness_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, tearing down");
            liveness.cancel();
        }
    });

    let (outcome, report) = explorer.mount().await;
    if outcome == LoadOutcome::Discarded || !explorer.is_active() {
        eprintln!("Interrupted before the course list was shown");
        std::process::exit(130);
    }
    tracing::debug!("Load outcome: {:?}, ratings: {:?}", outcome, report);

    match render(&explorer.view(), cli.format) {
        Ok(output) => print!("{}", output),
        Err(e) => fail(e),
    }
}
