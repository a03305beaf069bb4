use std::path::PathBuf;

use clap::{Parser, Subcommand};
use radix_router::config::load_config;
use radix_router::http::RouteTable;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Inspect radix-router configurations and running instances", long_about = None)]
struct Cli {
    /// Base URL of a running instance.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key.
    #[arg(short, long, default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and list its routes
    Check {
        config: PathBuf,
        /// Also print the radix tree
        #[arg(long)]
        tree: bool,
    },
    /// Resolve a request against a configuration file, offline
    Resolve {
        config: PathBuf,
        method: String,
        path: String,
    },
    /// Build the path of a named route
    Uri {
        config: PathBuf,
        name: String,
        params: Vec<String>,
    },
    /// Check a running instance
    Status,
    /// List the routes of a running instance
    Routes,
    /// Resolve a request against a running instance
    Match { method: String, path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config, tree } => {
            let table = RouteTable::from_config(&load_config(&config)?)?;
            let router = table.router();
            for route in router.routes() {
                println!("{:<8}{:<40}{}", route.method, route.path, route.name);
            }
            println!(
                "{}: {} routes, at most {} parameters",
                config.display(),
                router.routes().len(),
                router.max_params()
            );
            if tree {
                print!("{router}");
            }
        }
        Commands::Resolve {
            config,
            method,
            path,
        } => {
            let table = RouteTable::from_config(&load_config(&config)?)?;
            let report = table.report(&method, &path);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Uri {
            config,
            name,
            params,
        } => {
            let table = RouteTable::from_config(&load_config(&config)?)?;
            match table.router().uri(&name, &params) {
                Some(uri) => println!("{uri}"),
                None => return Err(format!("no route named {name:?}").into()),
            }
        }
        Commands::Status => {
            let res = admin_get(&cli.url, &cli.key, "/_admin/status", &[]).await?;
            print_response(res).await?;
        }
        Commands::Routes => {
            let res = admin_get(&cli.url, &cli.key, "/_admin/routes", &[]).await?;
            print_response(res).await?;
        }
        Commands::Match { method, path } => {
            let query = [("method", method.as_str()), ("path", path.as_str())];
            let res = admin_get(&cli.url, &cli.key, "/_admin/match", &query).await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn admin_get(
    url: &str,
    key: &str,
    endpoint: &str,
    query: &[(&str, &str)],
) -> Result<reqwest::Response, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {key}"))?,
    );

    let res = reqwest::Client::new()
        .get(format!("{}{endpoint}", url.trim_end_matches('/')))
        .headers(headers)
        .query(query)
        .send()
        .await?;
    Ok(res)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(format!("admin API returned status {status}").into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
