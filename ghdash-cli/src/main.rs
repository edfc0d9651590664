//! ghdash CLI - GitHub dashboard in the terminal
//!
//! Lists projects, renders project views, and summarizes repositories, pull
//! requests and Actions workflows for one organization.

mod commands;

use clap::{Parser, Subcommand};
use ghdash_core::{Config, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{FieldsArgs, PrsArgs, ReposArgs, ViewArgs, WorkflowsArgs};

/// ghdash: GitHub projects, pull requests and workflows at a glance
#[derive(Parser, Debug)]
#[command(name = "ghdash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Organization or user to read from (overrides config and env)
    #[arg(long, global = true, env = "GHDASH_OWNER")]
    owner: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// List open projects
    #[command(visible_alias = "p")]
    Projects,

    /// Render a project view
    #[command(visible_alias = "v")]
    View(ViewArgs),

    /// Show fields and values available for grouping and filtering
    Fields(FieldsArgs),

    /// List pull requests across repositories
    Prs(PrsArgs),

    /// List repositories
    Repos(ReposArgs),

    /// Show the latest workflow run per branch
    #[command(visible_alias = "wf")]
    Workflows(WorkflowsArgs),

    /// Show current configuration
    Config {
        /// Create a secrets template at the default location
        #[arg(long)]
        init_secrets: bool,

        /// Verify the token by calling the GitHub API
        #[arg(long)]
        check: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays machine readable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.owner.clone())?;

    if cli.verbose {
        tracing::info!(
            owner = %config.github.owner,
            batch_size = config.fetch.batch_size,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("ghdash {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Projects) => {
            commands::projects::list_projects(&config, cli.json).await?;
        }
        Some(Commands::View(args)) => {
            args.execute(&config, cli.json).await?;
        }
        Some(Commands::Fields(args)) => {
            args.execute(&config, cli.json).await?;
        }
        Some(Commands::Prs(args)) => {
            args.execute(&config, cli.json).await?;
        }
        Some(Commands::Repos(args)) => {
            args.execute(&config, cli.json).await?;
        }
        Some(Commands::Workflows(args)) => {
            args.execute(&config, cli.json).await?;
        }
        Some(Commands::Config {
            init_secrets,
            check,
        }) => {
            if init_secrets {
                let path = Secrets::create_template()?;
                println!("Created secrets template at {}", path.display());
                return Ok(());
            }

            if check {
                let client = commands::connect(&config)?;
                let login = client
                    .test_connection()
                    .await
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                println!("Authenticated as {}", login);
                return Ok(());
            }

            if cli.json {
                return commands::print_json(&config);
            }

            println!("ghdash Configuration");
            println!("====================");
            println!();
            println!("GitHub:");
            println!("  owner: {}", config.github.owner);
            println!();
            println!("Fetch:");
            println!("  batch_size: {}", config.fetch.batch_size);
            println!("  batch_delay: {}", humanize_delay(config.fetch.batch_delay));
            println!("  page_size: {}", config.fetch.page_size);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
            if let Some(path) = Secrets::default_secrets_path() {
                println!("Secrets file: {}", path.display());
            }
            match Secrets::load() {
                Ok(secrets) => match secrets.resolve_token() {
                    Some(token) => {
                        println!("GitHub token: {} (from {})", token.kind(), token.source);
                    }
                    None => println!("GitHub token: missing"),
                },
                Err(e) => println!("GitHub token: unreadable ({})", e),
            }
        }
        None => {
            println!("ghdash - GitHub projects, pull requests and workflows at a glance");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn humanize_delay(delay: std::time::Duration) -> String {
    format!("{}ms", delay.as_millis())
}
