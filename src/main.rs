use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod auth;

#[derive(Debug, clap::Args)]
struct FileArgs {
    /// Password used to derive the encryption key
    #[arg(long, env = "FILECRYPT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Write the result here instead of the default path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// File to process
    file: PathBuf,
}

#[derive(Debug, Parser)]
#[command(name = "filecrypt")]
#[command(version, about = "Encrypt and decrypt files with a password.")]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts FILE into FILE.enc
    #[command(arg_required_else_help = true)]
    Encrypt(FileArgs),

    /// Decrypts FILE.enc back into FILE
    #[command(arg_required_else_help = true)]
    Decrypt(FileArgs),
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Encrypt(file_args) => {
            let password = auth::read_password(file_args.password, true)?;
            let output =
                filecrypt::encrypt_file(&password, &file_args.file, file_args.output.as_deref())
                    .context("Encryption failed")?;
            println!("File encrypted successfully: {}", output.display());
        }
        Commands::Decrypt(file_args) => {
            let password = auth::read_password(file_args.password, false)?;
            let output =
                filecrypt::decrypt_file(&password, &file_args.file, file_args.output.as_deref())
                    .context("Decryption failed")?;
            println!("File decrypted successfully: {}", output.display());
        }
    }

    Ok(())
}
