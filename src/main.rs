use clap::{Parser, Subcommand};
use code_navigator::{api, logging, Config, NavigatorService, RepoId};
use colored::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve,
    /// Print the path-keyed structure of a repository
    Files {
        /// Repository as owner/name
        repo: String,
    },
    /// Print the name-keyed structure of a repository
    Tree {
        /// Repository as owner/name
        repo: String,
    },
    /// Print a file
    Cat {
        /// Repository as owner/name
        repo: String,
        /// File path inside the repository
        path: String,
    },
    /// List function and class definitions of a Python file
    Defs {
        /// Repository as owner/name
        repo: String,
        /// Python file path inside the repository
        path: String,
    },
    /// List lines of a Python file containing a symbol
    Refs {
        /// Repository as owner/name
        repo: String,
        /// Python file path inside the repository
        path: String,
        /// Text to search for
        symbol: String,
    },
    /// Print the YAML context document
    Context {
        /// Repository as owner/name
        repo: String,
    },
    /// Summarize a prompt, or a file when --path is given
    Summarize {
        /// Free-form prompt, or owner/name together with --path
        input: String,
        /// File path inside the repository
        #[arg(short, long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init(config.log_level())?;

    if let Command::Serve = cli.command {
        println!("{}", "Starting Code Navigator".bright_green().bold());
        println!("  {} http://{}", "Listening:".bright_white().bold(), config.server.bind_addr);
        println!("  {} {}", "Allowed origin:".bright_white().bold(), config.server.allowed_origin);
        api::serve(&config).await?;
        return Ok(());
    }

    let service = NavigatorService::from_config(&config)?;
    match cli.command {
        Command::Serve => {}
        Command::Files { repo } => {
            print_json(&service.file_structure(&RepoId::parse(&repo)?).await?)?
        }
        Command::Tree { repo } => {
            print_json(&service.structure_visualization(&RepoId::parse(&repo)?).await?)?
        }
        Command::Cat { repo, path } => {
            let content = service.file_content(&RepoId::parse(&repo)?, &path).await?;
            io::stdout().lock().write_all(&content)?
        }
        Command::Defs { repo, path } => {
            print_json(&service.definitions(&RepoId::parse(&repo)?, &path).await?)?
        }
        Command::Refs { repo, path, symbol } => {
            print_json(&service.references(&RepoId::parse(&repo)?, &path, &symbol).await?)?
        }
        Command::Context { repo } => {
            print!("{}", service.context_yaml(&RepoId::parse(&repo)?).await?)
        }
        Command::Summarize { input, path: None } => {
            println!("{}", service.summarize(&input).await?)
        }
        Command::Summarize { input, path: Some(path) } => {
            println!("{}", service.summarize_file(&RepoId::parse(&input)?, &path).await?)
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
