use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deep_research::{agents::DeepResearchSystem, config::Config, routes::create_router, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Research a question and print the report
    Research {
        /// The research question
        query: String,

        /// Print progress messages to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the research plan for a question as JSON
    Plan {
        /// The research question
        query: String,
    },
    /// Start the HTTP server
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deep_research=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Research { query, verbose } => {
            let system = DeepResearchSystem::from_config(&config);
            let report = system
                .research_with_progress(&query, |step| {
                    if verbose {
                        eprintln!("{}", step);
                    }
                })
                .await;
            println!("{}", report);
        }
        Command::Plan { query } => {
            let system = DeepResearchSystem::from_config(&config);
            println!("{}", system.planner().create_plan(&query));
        }
        Command::Serve => serve(config).await?,
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Configuration loaded: {:?}", config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("HOST and PORT must form a valid socket address")?;
    let state = AppState::from_config(config)?;
    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
