use clap::{Args, Parser, Subcommand};
use history::{HistoryStore, JsonFileStore};
use instruct::EnhancementRequest;
use reforge::{App, EnhanceClient};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Turn rough ideas into focused prompts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the enhancement relay server
    Serve {
        /// Address to bind the HTTP server
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
        /// Chat model requested from the provider
        #[arg(long, env = "OPENAI_MODEL", default_value = provider::DEFAULT_MODEL)]
        model: String,
    },
    /// Rewrite a prompt, streaming the result to stdout
    Enhance {
        /// The rough prompt to rewrite
        prompt: String,
        /// Style label biasing the rewrite; repeatable
        #[arg(long = "tone", value_parser = parse_tone)]
        tones: Vec<String>,
        /// Output budget in tokens
        #[arg(long, default_value_t = instruct::DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Omit non-essential adjectives
        #[arg(long)]
        no_fluff: bool,
        /// Enhancement endpoint to call
        #[arg(
            long,
            env = "REFORGE_ENDPOINT",
            default_value = "http://127.0.0.1:3000/api/enhance"
        )]
        endpoint: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List recorded rewrites, most recent first
    History {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Delete all recorded rewrites
    Clear {
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args)]
struct StoreArgs {
    /// File holding the local history collection
    #[arg(long, env = "REFORGE_HISTORY", default_value = "reforge_history.json")]
    history_file: PathBuf,
}

fn parse_tone(value: &str) -> Result<String, String> {
    if instruct::TONE_CHOICES.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "unknown tone (expected one of: {})",
            instruct::TONE_CHOICES.join(", ")
        ))
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    reforge::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { addr, model } => serve(addr, model).await,
        Command::Enhance {
            prompt,
            tones,
            max_tokens,
            no_fluff,
            endpoint,
            store,
        } => enhance(prompt, tones, max_tokens, no_fluff, endpoint, store).await,
        Command::History { store } => show_history(store),
        Command::Clear { store } => clear(store),
    }
}

async fn serve(addr: String, model: String) -> anyhow::Result<()> {
    let client = provider::client_from_env()?;
    let state = relay::AppState {
        client: Arc::new(client),
        model,
    };
    let addr: SocketAddr = addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, relay::router(state)).await?;
    Ok(())
}

async fn enhance(
    prompt: String,
    tones: Vec<String>,
    max_tokens: u32,
    no_fluff: bool,
    endpoint: String,
    store: StoreArgs,
) -> anyhow::Result<()> {
    let tones = if tones.is_empty() {
        vec!["cinematic".to_string()]
    } else {
        tones
    };
    let request = EnhancementRequest {
        raw_prompt: prompt,
        tones,
        max_output_tokens: max_tokens,
        suppress_filler: no_fluff,
    };
    let mut app = App::new(
        EnhanceClient::new(endpoint),
        Box::new(JsonFileStore::new(store.history_file)),
    );
    let entry = app
        .enhance_with(&request, |fragment| {
            print!("{fragment}");
            let _ = std::io::stdout().flush();
        })
        .await?;
    println!();
    info!(
        "recorded rewrite of {} characters",
        entry.enhanced_text.len()
    );
    Ok(())
}

fn show_history(store: StoreArgs) -> anyhow::Result<()> {
    let store = JsonFileStore::new(store.history_file);
    let entries = store.load()?;
    if entries.is_empty() {
        println!("No history yet.");
        return Ok(());
    }
    for entry in &entries {
        let when = entry.created_at.with_timezone(&chrono::Local);
        println!("[{}]", when.format("%Y-%m-%d %H:%M:%S"));
        println!("  input:    {}", entry.raw_prompt);
        println!("  enhanced: {}", entry.enhanced_text);
    }
    Ok(())
}

fn clear(store: StoreArgs) -> anyhow::Result<()> {
    JsonFileStore::new(store.history_file).save(&[])?;
    println!("History cleared.");
    Ok(())
}
