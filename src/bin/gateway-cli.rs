use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the wallet gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "GATEWAY_URL")]
    url: String,

    /// Admin bearer key
    #[arg(short, long, env = "GATEWAY_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gateway version, uptime and store sizes
    Status,
    /// Endpoint lists, rotation pointers and active cooldowns
    Upstreams,
    /// Send a JSON-RPC call through the gateway
    Rpc {
        method: String,
        /// JSON params, e.g. '["<address>"]'
        params: Option<String>,
    },
    /// SOL balance of an address
    Balance { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if !cli.key.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
        );
    }

    let res = match cli.command {
        Commands::Status => {
            client.get(format!("{}/admin/status", base))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Upstreams => {
            client.get(format!("{}/admin/upstreams", base))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Rpc { method, params } => {
            let mut body = json!({ "jsonrpc": "2.0", "id": 1, "method": method });
            if let Some(raw) = params {
                body["params"] = serde_json::from_str::<Value>(&raw)?;
            }
            client.post(format!("{}/api/rpc", base))
                .json(&body)
                .send()
                .await?
        }
        Commands::Balance { address } => {
            client.get(format!("{}/api/balance/{}", base, address))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
    Ok(())
}
