use std::borrow::Cow;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use thiserror::Error;

use crate::config::{parse_attribute_list, PluginOptions};
use crate::network::session::Session;
use crate::parsers::html::{
    html_to_dom, process_node, serialize_document, AssetRegistry, SelectorList,
};
use crate::utils::url::asset_directory;

/// Name the transform is registered under
pub const TRANSFORM_NAME: &str = "localimages";
/// Selector used when none is configured
pub const DEFAULT_SELECTOR: &str = "img";
/// Source attribute used when none is configured
pub const DEFAULT_SOURCE_ATTRIBUTE: &str = "src";
/// Per-resource download timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Errors that can occur while localizing images
///
/// Everything except [`LocalImagesError::Configuration`] is scoped to a
/// single remote resource and never aborts a document transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalImagesError {
    /// Network failure, timeout or non-2xx response
    #[error("Couldn't reach image {locator}: {cause}")]
    Fetch { locator: String, cause: String },

    /// Neither the file name nor the content identified the file type
    #[error("Couldn't determine a file extension for {file_name}")]
    UnknownExtension { file_name: String },

    /// Writing into the asset directory failed
    #[error("Couldn't write {}: {cause}", path.display())]
    Persistence { path: PathBuf, cause: String },

    /// Missing or invalid settings, raised at registration
    #[error("{0}")]
    Configuration(String),
}

impl LocalImagesError {
    pub fn fetch(locator: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Fetch {
            locator: locator.into(),
            cause: cause.into(),
        }
    }

    pub fn persistence(path: impl AsRef<Path>, cause: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.as_ref().to_path_buf(),
            cause: cause.into(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the error only affects one resource
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }
}

/// Validated transform configuration
///
/// Built once at registration and passed by reference into every stage of
/// the pipeline; nothing reads configuration from global state.
#[derive(Clone, Debug)]
pub struct LocalImagesOptions {
    /// Root output directory of the site build
    pub dist_path: PathBuf,
    /// Asset sub-path under `dist_path`, also the public URL prefix
    pub asset_path: String,
    /// Compiled node selector
    pub selector: SelectorList,
    /// Ordered candidate attributes; the first present, non-empty one is used
    pub source_attributes: Vec<String>,
    pub use_existing: bool,
    pub verbose: bool,
    /// Download timeout in seconds
    pub timeout: u64,
    pub user_agent: Option<String>,
}

impl LocalImagesOptions {
    /// Creates options with default selector, attributes and timeout
    pub fn new(dist_path: impl Into<PathBuf>, asset_path: impl Into<String>) -> Self {
        Self {
            dist_path: dist_path.into(),
            asset_path: asset_path.into(),
            selector: SelectorList::tag(DEFAULT_SELECTOR),
            source_attributes: vec![DEFAULT_SOURCE_ATTRIBUTE.to_string()],
            use_existing: false,
            verbose: false,
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }

    /// Validates raw plugin options
    ///
    /// Fails when `distPath` or `assetPath` is missing, when the selector
    /// cannot be parsed, when the attribute list is empty or when the timeout
    /// is zero.
    pub fn from_plugin_options(options: &PluginOptions) -> Result<Self, LocalImagesError> {
        let dist_path = non_blank(options.dist_path.as_deref());
        let asset_path = non_blank(options.asset_path.as_deref());

        let (Some(dist_path), Some(asset_path)) = (dist_path, asset_path) else {
            return Err(LocalImagesError::configuration(
                "local-images requires that assetPath and distPath are set",
            ));
        };

        let selector = match non_blank(options.selector.as_deref()) {
            Some(selector) => SelectorList::parse(selector).map_err(|e| {
                LocalImagesError::configuration(format!("Invalid selector '{selector}': {e}"))
            })?,
            None => SelectorList::tag(DEFAULT_SELECTOR),
        };

        let source_attributes = match options.attribute.as_deref() {
            Some(attribute) => parse_attribute_list(attribute),
            None => vec![DEFAULT_SOURCE_ATTRIBUTE.to_string()],
        };
        if source_attributes.is_empty() {
            return Err(LocalImagesError::configuration(
                "attribute must name at least one attribute",
            ));
        }

        let timeout = options.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout == 0 {
            return Err(LocalImagesError::configuration(
                "timeout must be at least one second",
            ));
        }

        Ok(Self {
            dist_path: PathBuf::from(dist_path),
            asset_path: asset_path.to_string(),
            selector,
            source_attributes,
            use_existing: options.use_existing,
            verbose: options.verbose,
            timeout,
            user_agent: non_blank(options.user_agent.as_deref()).map(str::to_string),
        })
    }

    /// Directory localized assets are written to
    pub fn asset_dir(&self) -> PathBuf {
        asset_directory(&self.dist_path, &self.asset_path)
    }

    pub fn with_selector(mut self, selector: SelectorList) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_source_attributes(mut self, source_attributes: Vec<String>) -> Self {
        self.source_attributes = source_attributes;
        self
    }

    pub fn with_use_existing(mut self, use_existing: bool) -> Self {
        self.use_existing = use_existing;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Whether an output path denotes an HTML document
pub fn is_html_output_path(output_path: &str) -> bool {
    const SUFFIX: &str = ".html";

    output_path
        .len()
        .checked_sub(SUFFIX.len())
        .and_then(|start| output_path.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(SUFFIX))
}

/// Localizes every external image referenced by `raw`
///
/// Non-HTML output paths and documents without matching nodes are returned
/// untouched (borrowed). Otherwise every matched node is processed
/// concurrently on the current task and the DOM is serialized once all of
/// them have settled.
pub async fn transform_document<'a>(
    raw: &'a str,
    output_path: &str,
    options: &LocalImagesOptions,
    session: &Session,
) -> Cow<'a, str> {
    if !is_html_output_path(output_path) {
        return Cow::Borrowed(raw);
    }

    let dom = html_to_dom(raw);
    let nodes = options.selector.select(raw, &dom);

    if nodes.is_empty() {
        tracing::debug!("No nodes match '{}' in {}", options.selector, output_path);
        return Cow::Borrowed(raw);
    }

    let registry = AssetRegistry::new();
    join_all(
        nodes
            .iter()
            .map(|node| process_node(node, options, session, &registry)),
    )
    .await;

    tracing::debug!(
        "Processed {} node(s) and {} remote resource(s) in {}",
        nodes.len(),
        registry.len(),
        output_path
    );

    match serialize_document(&dom) {
        Ok(content) => Cow::Owned(content),
        Err(e) => {
            tracing::warn!("Unable to serialize {}: {}", output_path, e);
            Cow::Borrowed(raw)
        }
    }
}

/// The registered content transform
pub struct LocalImages {
    options: LocalImagesOptions,
    session: Session,
}

impl LocalImages {
    /// Validates the plugin options and prepares the HTTP session
    pub fn register(plugin_options: &PluginOptions) -> Result<Self, LocalImagesError> {
        let options = LocalImagesOptions::from_plugin_options(plugin_options)?;
        Self::with_options(options)
    }

    pub fn with_options(options: LocalImagesOptions) -> Result<Self, LocalImagesError> {
        let session = Session::from_options(&options)?;
        Ok(Self { options, session })
    }

    pub fn name(&self) -> &'static str {
        TRANSFORM_NAME
    }

    pub fn options(&self) -> &LocalImagesOptions {
        &self.options
    }

    /// Transforms one rendered output artifact
    pub async fn transform<'a>(&self, raw: &'a str, output_path: &str) -> Cow<'a, str> {
        transform_document(raw, output_path, &self.options, &self.session).await
    }
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}
