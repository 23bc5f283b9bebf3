use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "configctl")]
#[command(about = "Management CLI for proxy-configd", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5555")]
    url: String,

    #[arg(short, long, default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check daemon status
    Status,
    /// Show the current configuration version
    Version,
    /// List all frontends
    Frontends,
    /// Show one frontend
    Frontend { name: String },
    /// Create a frontend from a JSON file (stdin when omitted)
    CreateFrontend {
        #[arg(short, long)]
        version: u64,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Replace a frontend from a JSON file (stdin when omitted)
    EditFrontend {
        name: String,
        #[arg(short, long)]
        version: u64,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Delete a frontend
    DeleteFrontend {
        name: String,
        #[arg(short, long)]
        version: u64,
    },
    /// List all farms
    Farms,
    /// Show one farm
    Farm { name: String },
    /// Create a farm from a JSON file (stdin when omitted)
    CreateFarm {
        #[arg(short, long)]
        version: u64,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Replace a farm from a JSON file (stdin when omitted)
    EditFarm {
        name: String,
        #[arg(short, long)]
        version: u64,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Delete a farm
    DeleteFarm {
        name: String,
        #[arg(short, long)]
        version: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let base = cli.url.trim_end_matches('/');
    let res = match cli.command {
        Commands::Status => {
            client
                .get(format!("{base}/v1/status"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Version => {
            client
                .get(format!("{base}/v1/version"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Frontends => {
            client
                .get(format!("{base}/v1/config/frontends"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Frontend { name } => {
            client
                .get(format!("{base}/v1/config/frontends/{name}"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::CreateFrontend { version, file } => {
            let payload = read_payload(file.as_deref())?;
            client
                .post(format!("{base}/v1/config/frontends?version={version}"))
                .headers(headers)
                .json(&payload)
                .send()
                .await?
        }
        Commands::EditFrontend {
            name,
            version,
            file,
        } => {
            let payload = read_payload(file.as_deref())?;
            client
                .put(format!("{base}/v1/config/frontends/{name}?version={version}"))
                .headers(headers)
                .json(&payload)
                .send()
                .await?
        }
        Commands::DeleteFrontend { name, version } => {
            client
                .delete(format!("{base}/v1/config/frontends/{name}?version={version}"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Farms => {
            client
                .get(format!("{base}/v1/config/farms"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Farm { name } => {
            client
                .get(format!("{base}/v1/config/farms/{name}"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::CreateFarm { version, file } => {
            let payload = read_payload(file.as_deref())?;
            client
                .post(format!("{base}/v1/config/farms?version={version}"))
                .headers(headers)
                .json(&payload)
                .send()
                .await?
        }
        Commands::EditFarm {
            name,
            version,
            file,
        } => {
            let payload = read_payload(file.as_deref())?;
            client
                .put(format!("{base}/v1/config/farms/{name}?version={version}"))
                .headers(headers)
                .json(&payload)
                .send()
                .await?
        }
        Commands::DeleteFarm { name, version } => {
            client
                .delete(format!("{base}/v1/config/farms/{name}?version={version}"))
                .headers(headers)
                .send()
                .await?
        }
    };

    print_response(res).await
}

fn read_payload(file: Option<&std::path::Path>) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
