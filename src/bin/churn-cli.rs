use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use churn_serve::features::{FEATURE_NAMES, ONE_HOT_GROUPS};

#[derive(Parser)]
#[command(name = "churn-cli")]
#[command(about = "Command-line client for the churn prediction service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    url: String,

    /// Request timeout in seconds.
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a customer payload read from a JSON file ("-" for stdin)
    Predict {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print a valid payload with the first option of every group selected
    Template,
    /// Check service health and loaded model version
    Health,
    /// Show the feature contract the service expects
    Contract,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;

    match cli.command {
        Commands::Predict { file } => {
            let payload: Value = if file.as_os_str() == "-" {
                serde_json::from_reader(std::io::stdin())?
            } else {
                serde_json::from_str(&std::fs::read_to_string(&file)?)?
            };
            let res = client
                .post(format!("{}/predict", cli.url))
                .json(&payload)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Template => {
            println!("{}", serde_json::to_string_pretty(&template())?);
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Contract => {
            let res = client.get(format!("{}/contract", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn template() -> Value {
    let mut payload = Map::new();
    for name in FEATURE_NAMES {
        payload.insert(name.to_string(), Value::from(0));
    }
    for group in ONE_HOT_GROUPS.iter() {
        if let Some(first) = group.fields.first() {
            payload.insert(first.to_string(), Value::from(1));
        }
    }
    payload.insert("tenure".into(), Value::from(12));
    payload.insert("monthly_charges".into(), Value::from(70.0));
    payload.insert("total_charges".into(), Value::from(1000.0));
    Value::Object(payload)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
