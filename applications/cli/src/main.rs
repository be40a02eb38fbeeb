/// Modsmith - import mods and cosmetic assets into a patched app
use clap::{Parser, Subcommand};
use modsmith_cli::{AppConfig, Application, CliError, TerminalUi};
use modsmith_core::AssetRegistry;
use modsmith_importer::ImportOutcome;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "modsmith")]
#[command(about = "Import mods and cosmetic assets into a patched app", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "MODSMITH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import mod packages and asset files
    Import {
        /// Files to import, processed in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Import every file as this asset type (e.g. "hat")
        #[arg(long = "as", value_name = "ASSET_TYPE")]
        as_type: Option<String>,
    },
    /// List asset types and the file extensions they accept
    Types,
    /// List installed mods
    Mods,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modsmith_cli=info,modsmith_importer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let app = Application::new(&config, Arc::new(TerminalUi::stdio()))?;

    match cli.command {
        Commands::Import { paths, as_type } => {
            match app.import(paths, as_type.as_deref()).await? {
                ImportOutcome::Completed { summary } => {
                    println!("{}", summary.summary_text());
                    if summary.failed > 0 {
                        anyhow::bail!("{} of {} files failed to import", summary.failed, summary.processed);
                    }
                }
                ImportOutcome::Merged { queued } => {
                    println!("Queued {} files behind the running import", queued);
                }
                ImportOutcome::Rejected { error } => {
                    return Err(CliError::Rejected(error.to_string()).into());
                }
            }
        }
        Commands::Types => {
            for asset_type in app.registry.asset_types() {
                let extensions: Vec<String> = asset_type
                    .supported_extensions()
                    .iter()
                    .map(|ext| format!(".{}", ext))
                    .collect();
                println!(
                    "{:<12} {:<12} {}",
                    asset_type.id(),
                    asset_type.display_name_plural(),
                    extensions.join(" ")
                );
            }
            let all: Vec<String> = app.controller.supported_extensions().into_iter().collect();
            println!("\nAccepted: .{}", all.join(" ."));
        }
        Commands::Mods => {
            let mods = app.store.installed_mods();
            if mods.is_empty() {
                println!("No mods installed");
            }
            for installed in mods {
                println!(
                    "{} {} ({}) [{}]",
                    installed.id, installed.version, installed.name, installed.loader
                );
            }
        }
    }

    Ok(())
}
