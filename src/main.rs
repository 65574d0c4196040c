//! CLI entry point for livepost

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "livepost")]
#[command(version)]
#[command(about = "A personal blog server whose posts can run their own code snippets", long_about = None)]
struct Cli {
    /// Set the blog directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the blog
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5001")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Disable live reload
        #[arg(long)]
        no_reload: bool,
    },

    /// Render a post body to HTML
    Render {
        /// Post slug (file name without .md)
        slug: String,

        /// Write the fragment to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List posts and tags
    List {
        /// Only list posts with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Tags for the new post
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "livepost=debug,info"
    } else {
        "livepost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve {
            port,
            ip,
            no_reload,
        } => {
            let blog = livepost::Blog::new(&base_dir)?;
            tracing::info!(
                "Serving {:?} at http://{}:{} ({} snippets)",
                blog.posts_dir,
                ip,
                port,
                blog.config.exec.language
            );
            livepost::server::start(blog, &ip, port, !no_reload).await?;
        }

        Commands::Render { slug, output } => {
            let blog = livepost::Blog::new(&base_dir)?;
            livepost::commands::render::run(&blog, &slug, output.as_deref())?;
        }

        Commands::List { tag } => {
            let blog = livepost::Blog::new(&base_dir)?;
            livepost::commands::list::run(&blog, tag.as_deref())?;
        }

        Commands::New { title, tags } => {
            let blog = livepost::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = livepost::commands::new::create_post(&blog, &title, &tags)?;
            println!("Created: {:?}", path);
        }

        Commands::Version => {
            println!("livepost version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
