//! # Command Line Interface
//!
//! `certchain resolve` prints the chain a declaration resolves to,
//! `certchain generate-ca` writes a self-signed authority, and
//! `certchain inspect` summarizes a certificate.

pub mod output;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::ca::{self, CaRequest, CaSubject, SignatureDigest, Validity, DEFAULT_VALIDITY_DAYS};
use crate::chain::ChainConfig;
use crate::config::Settings;
use crate::observability::{init_logging, log_config_info};
use crate::secrets::SecretString;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "certchain")]
#[command(about = "SSL certificate-chain resolution and CA tooling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "CERTCHAIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve chain content from its configured source
    Resolve(ResolveArgs),

    /// Generate a self-signed CA key and certificate
    GenerateCa(GenerateCaArgs),

    /// Summarize a PEM certificate
    Inspect {
        /// Certificate file
        cert: PathBuf,

        /// Output format: text, json or yaml
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Flags override `ssl_chain.*` attributes from the settings file.
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Source tag: attribute, data_bag, chef_vault or file
    #[arg(long)]
    pub source: Option<String>,

    /// Chain file name inside the platform certificate directory
    #[arg(long)]
    pub name: Option<String>,

    /// Chain file directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Full chain file path
    #[arg(long)]
    pub path: Option<PathBuf>,

    #[arg(long)]
    pub bag: Option<String>,

    #[arg(long)]
    pub item: Option<String>,

    #[arg(long)]
    pub item_key: Option<String>,

    /// Data bag item is encrypted
    #[arg(long)]
    pub encrypted: bool,

    /// Secret for encrypted data bag items
    #[arg(long)]
    pub secret_file: Option<PathBuf>,

    /// Write the chain here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GenerateCaArgs {
    /// Subject in one-line form, e.g. "/C=US/O=Example/CN=Example Root"
    #[arg(long)]
    pub subject: String,

    #[arg(long, default_value = "ca.key")]
    pub key_out: PathBuf,

    #[arg(long, default_value = "ca.pem")]
    pub cert_out: PathBuf,

    /// Validity in days
    #[arg(long, default_value_t = DEFAULT_VALIDITY_DAYS)]
    pub days: u32,

    /// Environment variable holding the key passphrase; unset means a plain key
    #[arg(long)]
    pub passphrase_env: Option<String>,

    /// Signature digest: sha1 or sha256
    #[arg(long, default_value = "sha1")]
    pub digest: SignatureDigest,
}

/// Run CLI commands
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_logging(&settings.logging, cli.verbose);
    log_config_info(&settings);

    match cli.command {
        Commands::Resolve(args) => handle_resolve(args, &settings),
        Commands::GenerateCa(args) => handle_generate_ca(args),
        Commands::Inspect { cert, format } => {
            let summary = ca::inspect_certificate(&cert)?;
            output::print_summary(&summary, format)
        }
    }
}

/// Build the chain declaration: attributes first, then flags.
pub fn chain_config(args: &ResolveArgs, settings: &Settings) -> ChainConfig {
    let mut config = ChainConfig::from_attributes(&settings.platform, &settings.node_attributes());

    if let Some(source) = &args.source {
        config = config.with_source(source);
    }
    if let Some(name) = &args.name {
        config = config.with_name(name);
    }
    if let Some(dir) = &args.dir {
        config = config.with_directory(dir);
    }
    if let Some(path) = &args.path {
        config = config.with_path(path);
    }
    if let Some(bag) = &args.bag {
        config = config.with_bag(bag);
    }
    if let Some(item) = &args.item {
        config = config.with_item(item);
    }
    if let Some(item_key) = &args.item_key {
        config = config.with_item_key(item_key);
    }
    if args.encrypted {
        config = config.with_encrypted(true);
    }
    if let Some(secret_file) = &args.secret_file {
        config = config.with_secret_file(secret_file);
    }
    config
}

fn handle_resolve(args: ResolveArgs, settings: &Settings) -> Result<()> {
    let config = chain_config(&args, settings);
    let resolver = settings.resolver()?;

    let Some(content) = resolver.resolve(&config)? else {
        eprintln!("No SSL intermediary chain provided.");
        return Ok(());
    };

    match &args.output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write chain to {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = content.len(), "Wrote SSL intermediary chain");
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn handle_generate_ca(args: GenerateCaArgs) -> Result<()> {
    let subject = CaSubject::parse(&args.subject)?;
    let validity = Validity::days_from_now(args.days)?;

    let mut request = CaRequest::new(subject, &args.key_out, &args.cert_out, validity)
        .with_digest(args.digest);

    if let Some(var) = &args.passphrase_env {
        let passphrase = std::env::var(var)
            .with_context(|| format!("Passphrase variable {} is not set", var))?;
        if passphrase.is_empty() {
            anyhow::bail!("Passphrase variable {} is empty", var);
        }
        request = request.with_passphrase(SecretString::new(passphrase));
    }

    if request.digest == SignatureDigest::Sha1 {
        tracing::warn!("Signing CA with SHA-1; pass --digest sha256 for new deployments");
    }

    let artifacts = ca::generate(&request)?;
    println!("Private key: {}", artifacts.key_file_path().display());
    println!("Certificate: {}", artifacts.cert_file_path().display());
    Ok(())
}
