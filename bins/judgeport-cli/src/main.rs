mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "judgeport-cli")]
#[command(about = "Judgeport CLI - Submit solutions to a remote judge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a solution file for evaluation
    Submit {
        /// Path to the solution source file
        #[arg(short, long)]
        file: PathBuf,

        /// Problem id to look up in the problem bank
        #[arg(short, long, conflicts_with = "config")]
        problem: Option<u32>,

        /// Path to a pre-built config JSON, sent verbatim
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Problem bank file
        #[arg(long, default_value = "problems.json")]
        bank: PathBuf,

        /// Judge server host
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Judge server port
        #[arg(long, default_value = "12345")]
        port: u16,

        /// Config schema: legacy or structured
        #[arg(long, default_value = "structured")]
        schema: String,

        /// Enable the server-side security check
        #[arg(long, default_value = "false")]
        security_check: bool,

        /// Compile with O2
        #[arg(long, default_value = "false")]
        o2: bool,

        /// Output comparison: strict, ignore-spaces, case-insensitive, float-tolerant
        #[arg(long, default_value = "strict")]
        compare_mode: String,

        /// Fault-injection variant (1-6) to corrupt the config on purpose
        #[arg(long)]
        inject: Option<u8>,

        /// Per-read timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Build and print the config JSON without submitting
    BuildConfig {
        /// Problem id to look up in the problem bank
        #[arg(short, long)]
        problem: u32,

        /// Problem bank file
        #[arg(long, default_value = "problems.json")]
        bank: PathBuf,

        /// Config schema: legacy or structured
        #[arg(long, default_value = "structured")]
        schema: String,

        /// Enable the server-side security check
        #[arg(long, default_value = "false")]
        security_check: bool,

        /// Compile with O2
        #[arg(long, default_value = "false")]
        o2: bool,

        /// Output comparison: strict, ignore-spaces, case-insensitive, float-tolerant
        #[arg(long, default_value = "strict")]
        compare_mode: String,

        /// Fault-injection variant (1-6) to corrupt the config on purpose
        #[arg(long)]
        inject: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            file,
            problem,
            config,
            bank,
            host,
            port,
            schema,
            security_check,
            o2,
            compare_mode,
            inject,
            timeout,
        } => {
            commands::submit(
                file,
                problem,
                config,
                &bank,
                host,
                port,
                &schema,
                security_check,
                o2,
                &compare_mode,
                inject,
                timeout,
            )
            .await?;
        }
        Commands::BuildConfig {
            problem,
            bank,
            schema,
            security_check,
            o2,
            compare_mode,
            inject,
        } => {
            commands::build_config(
                problem,
                &bank,
                &schema,
                security_check,
                o2,
                &compare_mode,
                inject,
            )?;
        }
    }

    Ok(())
}
