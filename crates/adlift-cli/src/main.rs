//! Adlift CLI — upload campaign data files to the ingestion API.
//!
//! Set ADLIFT_API_URL (or API_URL) and, when required, ADLIFT_API_TOKEN.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use adlift_cli::{format_progress, init_tracing};
use adlift_client::{
    check_duplicate, upload_with_progress, PollPolicy, UploadClient, UploadOptions,
};

#[derive(Parser)]
#[command(name = "adlift", about = "Adlift ingestion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a campaign data file and track it to completion
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Sheet to import when the file is a spreadsheet
        #[arg(long)]
        sheet: Option<String>,
        /// Double the poll budget (page-level variant)
        #[arg(long)]
        extended_poll: bool,
    },
    /// Print the content fingerprint of a file
    Hash {
        /// Path to the file to fingerprint
        file: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            sheet,
            extended_poll,
        } => {
            let client = UploadClient::from_env().context("Failed to configure client")?;

            let options = UploadOptions {
                sheet_name: sheet,
                poll: if extended_poll {
                    PollPolicy::extended()
                } else {
                    PollPolicy::default()
                },
                ..Default::default()
            };

            let result = upload_with_progress(&client, &file, &options, |progress| {
                println!("{}", format_progress(&progress));
            })
            .await;

            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.is_error() {
                std::process::exit(1);
            }
        }
        Commands::Hash { file } => {
            let check = check_duplicate(&file)
                .await
                .with_context(|| format!("Failed to hash {}", file.display()))?;
            println!("{}", check.hash);
        }
    }

    Ok(())
}
