//! PatentFetch MCP Server — entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

use patent_fetch::PatentClient;
use patent_fetch_mcp::config::ServerConfig;
use patent_fetch_mcp::protocol::ProtocolHandler;
use patent_fetch_mcp::tools::{ToolContext, ToolRegistry};
use patent_fetch_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "patent-fetch-mcp",
    about = "Download patent PDFs and metadata from Google Patents",
    version
)]
struct Cli {
    /// Output directory for downloaded PDFs.
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve {
        /// Output directory for downloaded PDFs.
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Download one or more patent PDFs.
    Download {
        /// Patent number(s) to download.
        #[arg(required = true)]
        patent_numbers: Vec<String>,

        /// Output directory for downloaded files (default: current directory).
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Look up patent metadata without downloading.
    Info {
        /// Patent number to look up.
        patent_number: String,

        /// Print the raw metadata record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print server capabilities as JSON.
    ServerInfo,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   patent-fetch-mcp completions bash > ~/.local/share/bash-completion/completions/patent-fetch-mcp
    ///   patent-fetch-mcp completions zsh > ~/.zfunc/_patent-fetch-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve { output_dir: None }) {
        Commands::Serve { output_dir } => {
            let config = ServerConfig::from_env();
            let effective_dir = output_dir
                .or(cli.output_dir)
                .map(PathBuf::from)
                .unwrap_or(config.output_dir);
            let client = PatentClient::new(config.fetch);
            let context = Arc::new(ToolContext::new(client, effective_dir));
            let handler = ProtocolHandler::new(context);
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        Commands::Download {
            patent_numbers,
            output_dir,
        } => {
            let config = ServerConfig::from_env();
            let dir = output_dir
                .or(cli.output_dir)
                .map(PathBuf::from)
                .unwrap_or(config.output_dir);
            let client = PatentClient::new(config.fetch);

            if patent_numbers.len() == 1 {
                let number = &patent_numbers[0];
                if client.download_patent(number, &dir).await {
                    println!("Successfully downloaded patent {number}");
                } else {
                    println!("Failed to download patent {number}");
                    std::process::exit(1);
                }
            } else {
                let bar = ProgressBar::new(patent_numbers.len() as u64);
                bar.set_style(
                    ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len}  {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );

                // Report each distinct number once, in request order.
                let mut successful: Vec<&str> = Vec::new();
                let mut failed: Vec<&str> = Vec::new();
                for number in &patent_numbers {
                    bar.set_message(number.clone());
                    let ok = client.download_patent(number, &dir).await;
                    let bucket = if ok { &mut successful } else { &mut failed };
                    if !bucket.contains(&number.as_str()) {
                        bucket.push(number.as_str());
                    }
                    bar.inc(1);
                }
                bar.finish_and_clear();

                println!("Download completed:");
                println!("  Successful: {} patents", successful.len());
                println!("  Failed: {} patents", failed.len());
                if !successful.is_empty() {
                    println!("  Successfully downloaded: {}", successful.join(", "));
                }
                if !failed.is_empty() {
                    println!("  Failed to download: {}", failed.join(", "));
                    std::process::exit(1);
                }
            }
        }

        Commands::Info {
            patent_number,
            json,
        } => {
            let config = ServerConfig::from_env();
            let client = PatentClient::new(config.fetch);
            match client.get_patent_info(&patent_number).await {
                Ok(info) if json => {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                }
                Ok(info) => {
                    println!("Patent Information for {patent_number}:");
                    println!("  Title: {}", info.title);
                    println!("  Inventors: {}", info.inventors.join(", "));
                    println!("  Assignee: {}", info.assignee);
                    println!("  Publication Date: {}", info.publication_date);
                    println!("  URL: {}", info.url);
                    println!("  Abstract: {}...", abstract_preview(&info.abstract_text));
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::ServerInfo => {
            let capabilities = patent_fetch_mcp::types::InitializeResult::for_this_server();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "patent-fetch-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Abstract preview for terminal output, capped at 200 characters.
fn abstract_preview(text: &str) -> String {
    text.chars().take(200).collect()
}
