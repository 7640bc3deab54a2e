use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "tier-cli")]
#[command(about = "Probe running API and web services", long_about = None)]
struct Cli {
    /// Base URL of the service to probe
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Request ID to send, for finding the request in service logs
    #[arg(short, long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the API service's status endpoint
    Status,
    /// Fetch the web service's index page
    Page,
    /// Request an arbitrary path and show the status code
    Get { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(id) = &cli.request_id {
        headers.insert("x-request-id", HeaderValue::from_str(id)?);
    }

    match cli.command {
        Commands::Status => {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
            let res = client
                .get(format!("{}/api/status", base))
                .headers(headers)
                .send()
                .await?;
            print_json(res).await?;
        }
        Commands::Page => {
            let res = client.get(format!("{}/", base)).headers(headers).send().await?;
            print_text(res).await?;
        }
        Commands::Get { path } => {
            let path = path.trim_start_matches('/');
            let res = client
                .get(format!("{}/{}", base, path))
                .headers(headers)
                .send()
                .await?;
            print_text(res).await?;
        }
    }

    Ok(())
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    if status.is_success() {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        eprintln!("Error: service returned status {}", status);
        eprintln!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}

async fn print_text(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let body = res.text().await?;

    println!("status: {}  request-id: {}", status, request_id);
    println!("{}", body);
    Ok(())
}
