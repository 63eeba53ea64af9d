//! Management CLI for the edge proxy.

use clap::{Parser, Subcommand};
use serde_json::Value;

use clashops_edge::resilience::{RetryClient, RetryPolicy};
use clashops_edge::upstream::UpstreamResolver;

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Management CLI for the ClashOps edge proxy", long_about = None)]
struct Cli {
    /// Base URL of a running proxy.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List functions with a {NAME}_URL variable in this environment
    Upstreams,
    /// Call a function through the proxy and print the response
    Call {
        /// Function name (e.g. get_cards)
        function: String,

        /// HTTP method to use
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request body (sent as-is)
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Upstreams => {
            let resolver = UpstreamResolver::from_env();
            let functions = resolver.configured_functions();
            if functions.is_empty() {
                println!("No {{NAME}}_URL environment variables set");
            }
            for function in functions {
                let env_var = UpstreamResolver::env_var_name(&function);
                println!("{function}  ({env_var})");
            }
        }
        Commands::Call {
            function,
            method,
            data,
        } => {
            let client = RetryClient::new(RetryPolicy::default());
            let method: reqwest::Method = method.to_uppercase().parse()?;

            let mut builder = client
                .http_client()
                .request(method, format!("{}/api/{}", cli.url, function));
            if let Some(body) = data {
                builder = builder.body(body);
            }

            let response = client.execute(builder.build()?).await?;
            let status = response.status();
            let text = response.text().await?;

            eprintln!("HTTP {status}");
            match serde_json::from_str::<Value>(&text) {
                Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
                Err(_) => println!("{text}"),
            }
        }
    }

    Ok(())
}
