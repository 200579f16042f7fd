//! Command-line configuration for the image-tooltip tools.
//!
//! Two subcommands are provided:
//! - `scan`: run the preview pipeline over a rendered page and report each
//!   marker element
//! - `url`: build the thumbnail URL for a single attachment
//!
//! # Environment Variables
//!
//! Site options can be set via environment variables with the `IMGTIP_` prefix:
//!
//! - `IMGTIP_SCRIPT_URL_PATH` - Script path (default: taken from the page, else /bin)
//! - `IMGTIP_SCRIPT_SUFFIX` - Script suffix such as `.pl` (default: none)
//! - `IMGTIP_PUB_URL_PATH` - Attachment path (default: taken from the page, else /pub)
//! - `IMGTIP_BASE_URL` - Absolute site origin for generated URLs
//! - `IMGTIP_MARKER_CLASS` - Marker class (default: jqImageTooltip)
//! - `IMGTIP_REVISION` - Service policy, `latest` or `legacy` (default: latest)

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::element::DEFAULT_MARKER_CLASS;
use crate::preview::{
    Crop, Param, PreviewSettings, ResolvedConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use crate::thumbnail::{
    Revision, SiteUrls, PREF_PUB_URL_PATH, PREF_SCRIPT_SUFFIX, PREF_SCRIPT_URL_PATH, PREF_URL_HOST,
};

// =============================================================================
// Default Values
// =============================================================================

/// Script path used when neither the page nor the command line provides one.
pub const DEFAULT_SCRIPT_URL_PATH: &str = "/bin";

/// Attachment path used when neither the page nor the command line provides one.
pub const DEFAULT_PUB_URL_PATH: &str = "/pub";

// =============================================================================
// CLI Arguments
// =============================================================================

/// image-tooltip - hover previews for wiki image attachments.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-tooltip")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan a rendered page and report the preview of every marker element
    Scan(ScanConfig),

    /// Build the thumbnail URL for one attachment
    Url(UrlConfig),
}

// =============================================================================
// Site Arguments
// =============================================================================

/// Options describing the wiki site, shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Script path, e.g. /bin. Overrides the page's SCRIPTURLPATH.
    #[arg(long, env = "IMGTIP_SCRIPT_URL_PATH")]
    pub script_url_path: Option<String>,

    /// Script suffix, e.g. .pl. Overrides the page's SCRIPTSUFFIX.
    #[arg(long, env = "IMGTIP_SCRIPT_SUFFIX")]
    pub script_suffix: Option<String>,

    /// Attachment path, e.g. /pub. Overrides the page's PUBURLPATH.
    #[arg(long, env = "IMGTIP_PUB_URL_PATH")]
    pub pub_url_path: Option<String>,

    /// Absolute site origin, e.g. https://wiki.example.org.
    #[arg(long, env = "IMGTIP_BASE_URL")]
    pub base_url: Option<String>,

    /// Class marking elements that want a preview.
    #[arg(long, default_value = DEFAULT_MARKER_CLASS, env = "IMGTIP_MARKER_CLASS")]
    pub marker_class: String,

    /// Service policy generation.
    #[arg(long, value_enum, default_value_t = Revision::Latest, env = "IMGTIP_REVISION")]
    pub revision: Revision,
}

impl SiteArgs {
    /// Validate the site options.
    pub fn validate(&self) -> Result<(), String> {
        if self.marker_class.is_empty() || self.marker_class.contains(char::is_whitespace) {
            return Err("marker_class must be a single non-empty class name".to_string());
        }
        if let Some(ref base) = self.base_url {
            Url::parse(base).map_err(|e| format!("base_url {:?} is not a valid URL: {}", base, e))?;
        }
        Ok(())
    }

    /// Merge page preferences with command-line overrides and fallbacks.
    pub fn preferences(&self, page: &HashMap<String, String>) -> HashMap<String, String> {
        let mut prefs = page.clone();
        let overrides = [
            (PREF_SCRIPT_URL_PATH, &self.script_url_path),
            (PREF_SCRIPT_SUFFIX, &self.script_suffix),
            (PREF_PUB_URL_PATH, &self.pub_url_path),
            (PREF_URL_HOST, &self.base_url),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                prefs.insert(key.to_string(), value.clone());
            }
        }
        prefs
            .entry(PREF_SCRIPT_URL_PATH.to_string())
            .or_insert_with(|| DEFAULT_SCRIPT_URL_PATH.to_string());
        prefs
            .entry(PREF_PUB_URL_PATH.to_string())
            .or_insert_with(|| DEFAULT_PUB_URL_PATH.to_string());
        prefs
    }

    /// Site paths without a page to read preferences from.
    pub fn site(&self) -> Result<SiteUrls, String> {
        SiteUrls::from_preferences(&self.preferences(&HashMap::new())).map_err(|e| e.to_string())
    }

    pub fn settings(&self) -> PreviewSettings {
        PreviewSettings {
            marker_class: self.marker_class.clone(),
            policy: self.revision.policy(),
            defaults: ResolvedConfig::default(),
        }
    }
}

// =============================================================================
// Scan Command
// =============================================================================

/// Output format of the scan report.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One line per marker element
    #[default]
    Text,

    /// JSON array
    Json,
}

/// Configuration for the `scan` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ScanConfig {
    /// Rendered HTML page to scan, or `-` for stdin.
    #[arg(value_name = "PAGE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub site: SiteArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.site.validate()
    }

    /// Whether the page is read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

// =============================================================================
// Url Command
// =============================================================================

/// Output format of the `url` subcommand.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlOutputFormat {
    /// Only the URL
    #[default]
    Url,

    /// JSON with the URL, request parameters and configuration
    Json,
}

/// Configuration for the `url` subcommand.
#[derive(Args, Debug, Clone)]
pub struct UrlConfig {
    /// Web containing the topic.
    #[arg(long)]
    pub web: String,

    /// Topic the image is attached to.
    #[arg(long)]
    pub topic: String,

    /// Attachment filename.
    #[arg(long)]
    pub image: String,

    /// Preview width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Preview height in pixels.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Crop mode (on/off).
    #[arg(long, default_value = "off")]
    pub crop: Crop,

    #[command(flatten)]
    pub site: SiteArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = UrlOutputFormat::Url)]
    pub format: UrlOutputFormat,
}

impl UrlConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.site.validate()?;
        if self.image.is_empty() {
            return Err("image must not be empty".to_string());
        }
        if self.width == 0 || self.height == 0 {
            return Err("width and height must be greater than 0".to_string());
        }
        Ok(())
    }

    /// The configuration the URL is built from.
    pub fn resolved(&self) -> ResolvedConfig {
        ResolvedConfig {
            image: Some(self.image.clone()),
            web: Some(self.web.clone()),
            topic: Some(self.topic.clone()),
            width: Param::Value(self.width),
            height: Param::Value(self.height),
            crop: Param::Value(self.crop),
            ..Default::default()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
