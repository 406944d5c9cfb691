use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hfs-cli")]
#[command(about = "Fetch, upload and delete files on an hfs server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a file and write it to stdout or --output
    Get {
        /// hfs://host:port/path, hfss://host:port/path or host:port/path
        address: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload a local file, or stdin when no file is given
    Put {
        address: String,
        file: Option<PathBuf>,
    },
    /// Delete a remote file
    Rm { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get { address, output } => {
            let mut remote = hfs_client::open(&address)?;
            let body = remote.read_to_end().await?;
            remote.close()?;
            match output {
                Some(path) => std::fs::write(path, &body)?,
                None => std::io::stdout().write_all(&body)?,
            }
        }
        Commands::Put { address, file } => {
            let data = match file {
                Some(path) => std::fs::read(path)?,
                None => {
                    let mut data = Vec::new();
                    std::io::stdin().read_to_end(&mut data)?;
                    data
                }
            };
            let mut remote = hfs_client::create(&address)?;
            let written = remote.write(&data).await?;
            remote.close()?;
            eprintln!("Uploaded {} bytes to {}", written, remote.address().url());
        }
        Commands::Rm { address } => {
            hfs_client::remove(&address).await?;
            eprintln!("Removed {}", address);
        }
    }

    Ok(())
}
