use anyhow::Context;
use clap::Parser;
use repo_migrate::utils::error::ErrorSeverity;
use repo_migrate::utils::{logger, validation::Validate};
use repo_migrate::{
    CliConfig, CommandCollaborators, LocalStorage, MigrationConfig, MigrationEngine,
    TerminalOperator,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting repo-migrate CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let config = match &cli.config {
        Some(path) => MigrationConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?,
        None => MigrationConfig::default(),
    };
    config.validate().context("invalid migration config")?;

    // CLI 參數優先於設定檔
    let package_name = cli.package_name.clone().or(config.package_name.clone());

    let storage = LocalStorage::new(&cli.project_dir);
    let collaborators = CommandCollaborators::new(&cli.project_dir, config.commands);
    let operator = TerminalOperator::stdio();

    let mut engine =
        MigrationEngine::new(storage, collaborators, operator).with_package_name(package_name);

    match engine.run() {
        Ok(report) => {
            println!("{}", report);
            for (step, message) in report.warnings() {
                eprintln!("⚠️ {}: {}", step, message);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Migration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
