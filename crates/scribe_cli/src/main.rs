use std::fmt;
use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use scribe_core::Result;
use scribe_inference::ContentRewriter;
use scribe_scrapers::{handle_command, init_logging, Pipeline, PipelineArgs, ScraperCommands};
use scribe_web::AppState;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Scrapes blog articles and rewrites them with reference research",
    long_about = None
)]
struct Cli {
    /// Article store: sqlite or memory
    #[arg(long, default_value = "sqlite")]
    storage: String,
    /// Store location, e.g. a SQLite file path (defaults to scribe.db)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// Completion model: gemini, deepseek or dummy
    #[arg(long, default_value = "gemini")]
    model: String,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Provider model name, e.g. gemini-2.0-flash
    #[arg(long)]
    model_name: Option<String>,
    #[arg(long)]
    model_url: Option<String>,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(flatten)]
    pipeline: PipelineArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Run(ScraperCommands),
    /// Serve the HTTP trigger endpoints
    Serve {
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("storage", &self.storage)
            .field("database_url", &self.database_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("model_url", &self.model_url)
            .field("log_level", &self.log_level)
            .field("pipeline", &self.pipeline)
            .field("command", &self.command)
            .finish()
    }
}

impl Cli {
    fn rewriter(&self) -> Result<ContentRewriter> {
        let config = scribe_inference::Config {
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            model_name: self.model_name.clone(),
            base_url: self.model_url.clone(),
        };
        let rewriter = ContentRewriter::new(scribe_inference::create_model(&config)?);
        info!("Completion model ready (using {})", rewriter.model_name());
        Ok(rewriter)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = scribe_storage::create_storage(&cli.storage, cli.database_url.as_deref()).await?;
    info!("Article store ready (using {})", cli.storage);
    let browser = cli.pipeline.browser()?;
    let pipeline = Pipeline::new(browser, store, cli.pipeline.config());

    match &cli.command {
        Commands::Run(command) => {
            let pipeline = if command.needs_model() {
                pipeline.with_rewriter(cli.rewriter()?)
            } else {
                pipeline
            };
            handle_command(command.clone(), &pipeline).await
        }
        Commands::Serve { addr } => {
            // Scraping stays available without a model; enhancement then reports the missing model.
            let pipeline = match cli.rewriter() {
                Ok(rewriter) => pipeline.with_rewriter(rewriter),
                Err(e) => {
                    warn!("Enhancement disabled: {}", e);
                    pipeline
                }
            };
            scribe_web::serve(*addr, AppState::new(pipeline)).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::ArticleStore;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["scribe", "--model", "dummy", "enhance"]).unwrap();
        assert!(matches!(cli.command, Commands::Run(ScraperCommands::Enhance)));
        assert_eq!(cli.rewriter().unwrap().model_name(), "Dummy");

        let cli = Cli::try_parse_from(["scribe", "serve", "--addr", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve { addr } => assert_eq!(addr.port(), 9000),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cli = Cli::try_parse_from([
            "scribe",
            "--api-key",
            "gemini-secret",
            "--browserless-token",
            "browserless-secret",
            "scrape",
        ])
        .unwrap();
        let debug = format!("{:?}", cli);
        assert!(!debug.contains("gemini-secret"));
        assert!(!debug.contains("browserless-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_default_store_persists_between_runs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("scribe.db");
        let db = db_path.to_str().unwrap();

        let cli = Cli::try_parse_from(["scribe", "--database-url", db, "articles"]).unwrap();
        assert_eq!(cli.storage, "sqlite");
        run(cli).await.unwrap();
        assert!(db_path.exists());

        let store = scribe_storage::create_storage("sqlite", Some(db)).await.unwrap();
        store
            .find_or_create("https://blog.test/a/", Default::default())
            .await
            .unwrap();
        let reopened = scribe_storage::create_storage("sqlite", Some(db)).await.unwrap();
        assert_eq!(reopened.list(10).await.unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let cli = Cli::try_parse_from(["scribe", "--model", "gpt", "enhance"]).unwrap();
        assert!(cli.rewriter().is_err());
    }
}
