use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crowd_image_updater::build::artifacts::{ArtifactWriter, DockerArtifacts, DryRunArtifacts};
use crowd_image_updater::config::UpdaterConfig;
use crowd_image_updater::feed::selector::select_latest;
use crowd_image_updater::feed::source::HttpFeedSource;
use crowd_image_updater::updater::{load_template, update_all};

#[derive(Parser)]
#[command(name = "crowd-image-updater")]
#[command(version, about = "Regenerate Crowd build directories from the Atlassian release feeds")]
struct Cli {
    /// Directory holding the template, the entrypoint and one directory per release line
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// JSON config file overriding feed URLs and file names
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dockerfile template, relative to the root unless absolute
    #[arg(long)]
    template: Option<PathBuf>,

    /// Entrypoint script, relative to the root unless absolute
    #[arg(long)]
    entrypoint: Option<PathBuf>,

    /// Resolve and report without writing any file
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the latest package of every release line and exit
    Resolve,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => UpdaterConfig::load(path)?,
        None => UpdaterConfig::default(),
    };
    if let Some(template) = cli.template {
        config.files.template = template;
    }
    if let Some(entrypoint) = cli.entrypoint {
        config.files.entrypoint = entrypoint;
    }

    let feeds = config.feeds.feed_set();
    let source = HttpFeedSource::new().context("failed to create HTTP client")?;

    match cli.command {
        Some(Command::Resolve) => {
            let versions = select_latest(&source, &feeds).context("error reading release feeds")?;
            for (key, package) in &versions {
                let marker = if package.is_primary { " (latest)" } else { "" };
                println!(
                    "{key}\t{}\t{}\t{}{marker}",
                    package.version, package.released, package.archive_url
                );
            }
            Ok(())
        }
        None => {
            let writer: Box<dyn ArtifactWriter> = if cli.dry_run {
                Box::new(DryRunArtifacts)
            } else {
                let template = load_template(&cli.root.join(&config.files.template))?;
                Box::new(DockerArtifacts::new(
                    template,
                    &cli.root.join(&config.files.entrypoint),
                    &config.files.dockerfile,
                ))
            };

            let updated = update_all(&cli.root, &feeds, &source, writer.as_ref())?;
            info!("updated {} build directories", updated.len());
            Ok(())
        }
    }
}
