//! Shared helpers for commands.

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use async_trait::async_trait;
use serde::Serialize;

use pictor_cli::{Config, Context, Output, OutputFormat, load_config};
use pictor_studio::{
    AppInfo, Client, ClientBuilder, DEFAULT_IMAGE_COUNT, DEFAULT_IMAGE_SIZE,
    Error as StudioError, GenerationRequest, ImageData, ImageGenerator, InputKind, Session,
};

use crate::Cli;

const MISSING_KEY_HINT: &str = "no API key configured: set PICTOR_API_KEY or OPENAI_API_KEY, \
     or add a context with `pictor config add-context <name> --api-key <key>`";

/// Everything a command needs to talk to the APIs, resolved once at startup.
pub(crate) struct Settings {
    pub context_name: Option<String>,
    pub builder: ClientBuilder,
    pub app: AppInfo,
    pub count: u32,
    pub size: String,
}

impl Settings {
    /// Applies command-line overrides for image count and size.
    pub fn with_overrides(mut self, count: Option<u32>, size: Option<&str>) -> Self {
        if let Some(count) = count {
            self.count = count;
        }
        if let Some(size) = size {
            self.size = size.to_string();
        }
        self
    }

    /// Builds the API client.
    pub fn client(&self) -> anyhow::Result<Client> {
        if !self.builder.has_api_key() {
            anyhow::bail!(MISSING_KEY_HINT);
        }
        self.builder
            .clone()
            .build()
            .context("failed to create client")
    }

    /// Creates a search session wired to the configured services.
    ///
    /// Without an API key the session still works for direct URLs and
    /// attribution; only prompt generation fails.
    pub fn session(&self) -> anyhow::Result<Session> {
        let attribution = Arc::new(
            self.builder
                .build_attribution()
                .context("failed to create attribution client")?,
        );
        let generator: Arc<dyn ImageGenerator> = if self.builder.has_api_key() {
            Arc::new(self.client()?.image())
        } else {
            Arc::new(MissingApiKey)
        };
        Ok(Session::new(generator, attribution)
            .with_count(self.count)
            .with_size(self.size.clone()))
    }
}

/// Generator used when no API key is configured.
struct MissingApiKey;

#[async_trait]
impl ImageGenerator for MissingApiKey {
    async fn generate(&self, _request: &GenerationRequest) -> pictor_studio::Result<Vec<ImageData>> {
        Err(StudioError::Config(MISSING_KEY_HINT.to_string()))
    }
}

/// Loads the CLI configuration file.
pub(crate) fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Resolves settings from the selected context and the process environment.
pub(crate) fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let cfg = get_config(cli)?;
    let ctx = cfg.resolve_context(cli.context.as_deref())?;
    let settings = resolve_settings(ctx, |key| std::env::var(key).ok());
    tracing::debug!(
        context = settings.context_name.as_deref().unwrap_or("(none)"),
        config = %cfg.path().display(),
        has_api_key = settings.builder.has_api_key(),
        "resolved settings"
    );
    Ok(settings)
}

/// Layers defaults, then the context, then environment variables.
pub(crate) fn resolve_settings(
    ctx: Option<&Context>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    let default_ctx = Context::default();
    let ctx = ctx.unwrap_or(&default_ctx);

    let mut builder = ClientBuilder::new(ctx.api_key.clone());
    if !ctx.base_url.is_empty() {
        builder = builder.base_url(ctx.base_url.clone());
    }
    if !ctx.attribution_url.is_empty() {
        builder = builder.attribution_url(ctx.attribution_url.clone());
    }
    if ctx.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(ctx.timeout));
    }
    if ctx.max_retries > 0 {
        builder = builder.max_retries(ctx.max_retries);
    }
    let builder = builder.env_overrides(&lookup);

    let app = AppInfo::from_lookup(&lookup)
        .or_else(|| (!ctx.app_name.is_empty()).then(|| AppInfo::new(ctx.app_name.clone())))
        .unwrap_or_default();

    Settings {
        context_name: (!ctx.name.is_empty()).then(|| ctx.name.clone()),
        builder,
        app,
        count: if ctx.image_count > 0 {
            ctx.image_count
        } else {
            DEFAULT_IMAGE_COUNT
        },
        size: if ctx.image_size.is_empty() {
            DEFAULT_IMAGE_SIZE.to_string()
        } else {
            ctx.image_size.clone()
        },
    }
}

/// Whether submitting `kind` starts a generation, so the loading line applies.
pub(crate) fn shows_loading(kind: &InputKind) -> bool {
    matches!(kind, InputKind::Prompt(text) if !text.trim().is_empty())
}

/// Writes a result in the format chosen on the command line.
pub(crate) fn output_result<T: Serialize>(cli: &Cli, value: &T) -> anyhow::Result<()> {
    Output::new(OutputFormat::from_flag(cli.json), cli.output.clone()).write(value)
}

/// Prints a message when `--verbose` is set.
pub(crate) fn print_verbose(cli: &Cli, message: &str) {
    pictor_cli::print_verbose(cli.verbose, message);
}

pub(crate) use pictor_cli::print_success;
