use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklist::client::TaskClient;
use tasklist::config::ServerConfig;
use tasklist::controller::{RowEvent, TaskList};
use tasklist::{api, db, view};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "A single-list task tracker")]
struct Cli {
    /// Base URL of the server for client commands (default: $TASKLIST_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Show all tasks
    List,
    /// Add a task
    Add { name: String },
    /// Rename a task
    Rename { id: i64, name: String },
    /// Flip a task between done and not done
    Toggle { id: i64 },
    /// Delete a task
    Delete { id: i64 },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tasklist=debug,tower_http=debug".into()),
    );

    // Client commands print the list on stdout; keep logs off it.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(mut config: ServerConfig) -> anyhow::Result<()> {
    let db = match &config.db_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    let app = api::create_router_with_config(db, &config);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    config.port = listener.local_addr()?.port();
    tracing::info!("Task list server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_client(client: TaskClient, command: Commands) -> anyhow::Result<()> {
    let list = TaskList::new(client);
    list.refresh().await?;

    match command {
        Commands::List | Commands::Serve { .. } => {}
        Commands::Add { name } => list.add(name).await?,
        Commands::Rename { id, name } => {
            list.act(id, RowEvent::ClickName).await?;
            list.act(id, RowEvent::SubmitUpdate { name }).await?;
        }
        Commands::Toggle { id } => list.act(id, RowEvent::ToggleDone).await?,
        Commands::Delete { id } => list.act(id, RowEvent::Delete).await?,
    }

    print!("{}", view::render_list(&list.view()));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { host, port, db }) => {
            let mut config = ServerConfig::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if db.is_some() {
                config.db_path = db;
            }
            serve(config).await
        }
        Some(command) => {
            let client = match cli.url {
                Some(url) => TaskClient::new(url),
                None => TaskClient::from_env(),
            };
            run_client(client, command).await
        }
        None => serve(ServerConfig::from_env()).await,
    }
}
