//! image-tooltip - hover previews for wiki image attachments.
//!
//! This binary runs the preview pipeline over rendered pages and builds
//! thumbnail URLs from the command line.

use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_tooltip::{
    config::{Cli, Command, ReportFormat, ScanConfig, UrlConfig, UrlOutputFormat},
    element::{Document, ElementId},
    error::ScanError,
    media::is_previewable,
    preview::{Activation, ImagePreview},
    scan::scan_page,
    thumbnail::UrlBuilder,
    tooltip::{HoverTooltips, ImageContent},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Scan(config) => run_scan(config),
        Command::Url(config) => run_url(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_tooltip=debug"
    } else {
        "image_tooltip=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Scan Command
// =============================================================================

/// One marker element in the scan report.
#[derive(Debug, Serialize)]
struct ScanRow {
    element: ElementId,
    tag: String,
    #[serde(flatten)]
    activation: Activation,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<ImageContent>,
}

fn run_scan(config: ScanConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let html = match read_page(&config) {
        Ok(html) => html,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let scan = match scan_page(&html, &config.site.marker_class) {
        Ok(scan) => scan,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!(
        elements = scan.elements.len(),
        preferences = scan.preferences.len(),
        "page scanned"
    );

    let prefs = config.site.preferences(&scan.preferences);
    let preview = match ImagePreview::install(&prefs, HoverTooltips::new(), config.site.settings())
    {
        Ok(preview) => preview,
        Err(e) => {
            error!("Cannot install image previews: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let document = Document::new();
    let mut subscription = document.subscribe();
    for element in scan.elements {
        document.insert(element);
    }

    let rows: Vec<ScanRow> = preview
        .drain(&mut subscription)
        .into_iter()
        .map(|(id, activation)| {
            let preview_content = if activation.is_armed() {
                preview.widget().show_now(id)
            } else {
                None
            };
            ScanRow {
                element: id,
                tag: document
                    .get(id)
                    .map(|e| e.tag().to_string())
                    .unwrap_or_default(),
                activation,
                preview: preview_content,
            }
        })
        .collect();

    let armed = rows.iter().filter(|r| r.activation.is_armed()).count();
    info!(
        elements = rows.len(),
        armed = armed,
        content_requests = preview.content_requests(),
        "scan complete"
    );

    match config.format {
        ReportFormat::Text => {
            for row in &rows {
                println!("{}", text_row(row));
            }
        }
        ReportFormat::Json => match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

fn read_page(config: &ScanConfig) -> Result<String, ScanError> {
    if config.reads_stdin() {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .map_err(|e| ScanError::Read(format!("stdin: {}", e)))?;
        return Ok(html);
    }
    std::fs::read_to_string(&config.input)
        .map_err(|e| ScanError::Read(format!("{}: {}", config.input.display(), e)))
}

fn text_row(row: &ScanRow) -> String {
    match (&row.activation, &row.preview) {
        (Activation::Armed { .. }, Some(content)) => {
            format!("{} <{}> {}", row.element, row.tag, content.src)
        }
        (Activation::Armed { .. }, None) => format!("{} <{}> armed", row.element, row.tag),
        (Activation::Skipped(reason), _) => {
            let reason = serde_json::to_value(reason)
                .ok()
                .and_then(|v| v.get("reason").and_then(|r| r.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("{:?}", reason));
            format!("{} <{}> skipped: {}", row.element, row.tag, reason)
        }
    }
}

// =============================================================================
// Url Command
// =============================================================================

fn run_url(config: UrlConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let site = match config.site.site() {
        Ok(site) => site,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let policy = config.site.revision.policy();
    if !is_previewable(&config.image, policy.allow) {
        eprintln!(
            "Warning: {} would not get a preview tooltip under this revision",
            config.image
        );
    }

    let builder = UrlBuilder::new(std::sync::Arc::new(site), policy);
    let resolved = config.resolved();
    let url = builder.build(&resolved);

    match config.format {
        UrlOutputFormat::Url => {
            println!("{}", url);
        }
        UrlOutputFormat::Json => {
            let json = serde_json::json!({
                "url": url,
                "thumbnail": builder.thumbnail(&resolved),
                "config": resolved,
            });
            match serde_json::to_string_pretty(&json) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
