//! Photoscope CLI: search photos by label and upload photos from the terminal.
//!
//! A thin adapter over `photoscope-core`: it builds the `ApiConfig`, runs one
//! request, and prints the render instructions or the notification.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use photoscope_core::config::CONFIG_FILE_NAME;
use photoscope_core::render::RenderInstruction;
use photoscope_core::types::UploadForm;
use photoscope_core::view::{Notification, SearchView};
use photoscope_core::{
    config_dir, load_photoscope_config, ApiConfig, LabelsPlacement, SearchRequester, UploadRequester,
    UploadTransport,
};

/// Photoscope CLI: photo search and upload.
#[derive(Parser)]
#[command(name = "pscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./photoscope.toml, then ~/.photoscope/photoscope.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API gateway base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<Url>,

    /// API key sent as x-api-key
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Storage bucket URL for --direct uploads
    #[arg(long, global = true)]
    storage_root: Option<Url>,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LabelsAs {
    Header,
    Field,
}

#[derive(Subcommand)]
enum Commands {
    /// Search photos by label
    Search {
        /// Search query, e.g. "dogs on the beach"
        query: String,
    },
    /// Upload a photo with optional custom labels
    Upload {
        /// Photo to upload
        path: Option<PathBuf>,

        /// Comma-separated custom labels
        #[arg(long, default_value = "")]
        labels: String,

        /// PUT straight to the storage bucket instead of the gateway
        #[arg(long)]
        direct: bool,

        /// Where multipart uploads carry the labels
        #[arg(long, value_enum)]
        labels_as: Option<LabelsAs>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config file, then command-line overrides.
fn resolve_config(cli: &Cli) -> ApiConfig {
    let path = cli.config.clone().unwrap_or_else(|| {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        config_dir().map(|d| d.join(CONFIG_FILE_NAME)).unwrap_or(local)
    });
    debug!(path = %path.display(), "Resolved config path");

    let mut config = load_photoscope_config(&path);
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(key) = &cli.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(root) = &cli.storage_root {
        config.storage_root = Some(root.clone());
    }
    config
}

fn print_notification(note: &Notification, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(note).unwrap_or_default());
        return;
    }
    match note {
        Notification::Success { message } => eprintln!("{message}"),
        Notification::Failure { message, detail } => {
            eprintln!("{message}");
            debug!(detail = detail.as_str(), "Failure detail");
        }
    }
}

fn print_results(view: &SearchView, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(view.instructions()).unwrap_or_default());
        return;
    }
    let mut photos = 0;
    for instruction in view.instructions() {
        match instruction {
            RenderInstruction::Photo { url, caption, .. } => {
                photos += 1;
                println!("{url}");
                if let Some(caption) = caption {
                    println!("  {caption}");
                }
            }
            RenderInstruction::NoResults { message } => eprintln!("{message}"),
        }
    }
    if photos > 0 {
        eprintln!("\n{photos} photo(s)");
    }
}

/// Only a failed request is a failure; "no photos found" exits 0.
fn search_exit_code(note: Option<&Notification>) -> ExitCode {
    match note {
        Some(note) if note.is_failure() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_directive = if cli.verbose { "photoscope=debug" } else { "photoscope=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Search { query } => {
            let config = Arc::new(resolve_config(&cli));
            let requester = SearchRequester::new(config);
            let mut view = SearchView::new();

            let note = view.apply(requester.search(query).await);
            match &note {
                Some(note) => print_notification(note, cli.json),
                None => print_results(&view, cli.json),
            }
            search_exit_code(note.as_ref())
        }
        Commands::Upload { path, labels, direct, labels_as } => {
            let mut config = resolve_config(&cli);
            match labels_as {
                Some(LabelsAs::Header) => config.labels_placement = LabelsPlacement::Header,
                Some(LabelsAs::Field) => config.labels_placement = LabelsPlacement::Field,
                None => {}
            }
            let transport = if *direct { UploadTransport::DirectStorage } else { UploadTransport::Multipart };
            let requester = UploadRequester::new(Arc::new(config));

            let mut form = UploadForm::new(path.clone(), labels.clone());
            let outcome = requester.upload_selected(&form, transport).await;
            let note = form.apply_outcome(&outcome);
            print_notification(&note, cli.json);

            if note.is_failure() {
                ExitCode::FAILURE
            } else {
                if let Ok(receipt) = &outcome {
                    if !cli.json {
                        println!("{}", receipt.location);
                    }
                }
                ExitCode::SUCCESS
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "pscope", &mut std::io::stdout());
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photoscope_core::error::PhotoError;

    #[test]
    fn empty_search_exits_successfully() {
        let mut view = SearchView::new();
        let note = view.apply(Ok(Vec::new()));
        assert!(matches!(view.instructions(), [RenderInstruction::NoResults { .. }]));
        assert_eq!(search_exit_code(note.as_ref()), ExitCode::SUCCESS);
    }

    #[test]
    fn failed_search_exits_with_failure() {
        let mut view = SearchView::new();
        let note = view.apply(Err(PhotoError::request(500, None)));
        assert_eq!(search_exit_code(note.as_ref()), ExitCode::FAILURE);
    }
}
