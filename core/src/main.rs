use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use post_client::{Api, ClientConfig};
use tokio_tungstenite::tungstenite::Message;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "post-client", about = "Submit posts and follow the live post feed")]
struct Cli {
    /// Overrides the base URL resolved from APP_ENV / APP_ORIGIN / API_PATH.
    #[arg(long, env = "POST_API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a post and print the invoice that pays for it.
    Submit {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        content: String,
    },
    /// Print every message from the live post feed.
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match cli.base_url {
        Some(base_url) => ClientConfig::new(base_url),
        None => ClientConfig::from_env()?,
    };
    info!(base_url = %config.base_url, "using post api");
    let api = Api::from_config(&config);

    match cli.command {
        Command::Submit { name, content } => run_submit(&api, &name, &content).await,
        Command::Watch => run_watch(&api).await,
    }
}

async fn run_submit(api: &Api, name: &str, content: &str) -> anyhow::Result<()> {
    let response = api.submit_post(name, content).await?;
    println!("{}", serde_json::to_string_pretty(&response.post)?);
    println!("payment request: {}", response.payment_request);
    Ok(())
}

async fn run_watch(api: &Api) -> anyhow::Result<()> {
    let mut socket = api.post_websocket().await?;
    info!("watching post feed");
    while let Some(message) = socket.next().await {
        match message? {
            Message::Text(text) => println!("{}", text.as_str()),
            Message::Close(_) => break,
            _ => {}
        }
    }
    info!("post feed closed");
    Ok(())
}
