use clap::Parser;
use tracing_subscriber::prelude::*;
use vigil_cli::{
    cli::{Cli, Commands},
    operations,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so command output stays scriptable.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        );
    tracing_subscriber::registry().with(stderr_layer).init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Init { home, chain_id } => operations::init(&home, &chain_id)?,
        Commands::ShowValidator { config } => operations::show_validator(&config)?,
        Commands::ResetPrivValidator { config } => operations::reset_priv_validator(&config)?,
        Commands::VerifyEvidence {
            config,
            evidence,
            pub_key,
        } => operations::verify_evidence(&config, &evidence, &pub_key)?,
        Commands::HashEvidence { evidence } => operations::hash_evidence(&evidence)?,
        Commands::Budget { block_max_bytes } => operations::budget(block_max_bytes)?,
    };

    println!("{}", output);
    Ok(())
}
