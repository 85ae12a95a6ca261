use clap::{Parser, Subcommand};
use reqwest::{Client, Response};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "wishes-cli")]
#[command(about = "Command line client for the wedding wishes API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up
    Health,
    /// List every wish
    Wishes,
    /// Send a wish
    Send {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        message: String,
    },
    /// Create a guest invite link
    Invite {
        /// Guest display name
        name: String,
    },
    /// Look up a guest by slug
    Guest {
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/", base)).send().await?,
        Commands::Wishes => client.get(format!("{}/wish", base)).send().await?,
        Commands::Send { name, message } => {
            client
                .post(format!("{}/wish", base))
                .json(&json!({ "name": name, "message": message }))
                .send()
                .await?
        }
        Commands::Invite { name } => {
            client
                .post(format!("{}/admin/guest", base))
                .json(&json!({ "name": name }))
                .send()
                .await?
        }
        Commands::Guest { slug } => client.get(format!("{}/guest/{}", base, slug)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let body = serde_json::from_str::<Value>(&text)
        .map(|json| serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.clone()))
        .unwrap_or_else(|_| text.clone());

    if status.is_success() {
        println!("{}", body);
    } else {
        eprintln!("Error: API returned status {}", status);
        eprintln!("{}", body);
    }
    Ok(())
}
