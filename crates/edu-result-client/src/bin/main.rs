//! Result lookup CLI

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use edu_result_core::{Cipher, LookupRequest};
use tracing_subscriber::EnvFilter;

use edu_result_client::{render_record, ClientBuilder};

#[derive(Parser, Debug)]
#[command(name = "edu-result")]
#[command(about = "Look up an exam result through the encrypted proxy")]
struct Args {
    /// Proxy base URL
    #[arg(long, env = "RESULT_SERVER_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Exam name (e.g. ssc, hsc)
    #[arg(long)]
    exam: String,

    /// Exam year
    #[arg(long)]
    year: String,

    /// Education board
    #[arg(long)]
    board: String,

    /// Roll number
    #[arg(long)]
    roll: String,

    /// Registration number
    #[arg(long)]
    reg: String,

    /// Contact number forwarded with mirrored results
    #[arg(long)]
    mobile: Option<String>,

    /// Pre-shared passphrase for envelope encryption
    #[arg(long, env = "RESULT_ENCRYPTION_KEY", hide_env_values = true)]
    key: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Print the decrypted response instead of the formatted view
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let cipher = Cipher::from_passphrase(&args.key).context("invalid encryption key")?;
    let client = ClientBuilder::new(&args.server)
        .timeout(Duration::from_secs(args.timeout_secs))
        .build(cipher)?;

    let mut request = LookupRequest::new(args.exam, args.year, args.board, args.roll, args.reg);
    request.mobile_number = args.mobile;

    if args.json {
        let result = client.lookup(&request).await?;
        println!("{}", serde_json::to_string_pretty(&result.into_value())?);
        return Ok(());
    }

    let record = client.lookup_record(&request).await?;
    if !record.success {
        anyhow::bail!("no result found for roll {}", request.roll);
    }

    print!("{}", render_record(&record));
    Ok(())
}
