//! Configuration management commands.

use clap::{Args, Subcommand};

use pictor_cli::{Context as CliContext, mask_api_key};

use super::{get_config, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts allow you to manage multiple API configurations,
/// similar to kubectl's context management.
///
/// Configuration is stored in ~/.pictor/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// API key for the image generation API
        #[arg(long)]
        api_key: Option<String>,
        /// Image API base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Attribution endpoint
        #[arg(long)]
        attribution_url: Option<String>,
        /// Application display name
        #[arg(long)]
        app_name: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Maximum retries
        #[arg(long)]
        max_retries: Option<u32>,
        /// Images per prompt
        #[arg(long = "n")]
        image_count: Option<u32>,
        /// Image size, e.g. 512x512
        #[arg(long = "size")]
        image_size: Option<String>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                api_key,
                base_url,
                attribution_url,
                app_name,
                timeout,
                max_retries,
                image_count,
                image_size,
            } => {
                let mut cfg = get_config(cli)?;

                let ctx = CliContext {
                    api_key: api_key.clone().unwrap_or_default(),
                    base_url: base_url.clone().unwrap_or_default(),
                    attribution_url: attribution_url.clone().unwrap_or_default(),
                    app_name: app_name.clone().unwrap_or_default(),
                    timeout: timeout.unwrap_or(0),
                    max_retries: max_retries.unwrap_or(0),
                    image_count: image_count.unwrap_or(0),
                    image_size: image_size.clone().unwrap_or_default(),
                    ..Default::default()
                };

                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!("{:<8} {:<20} {:<30} {}", "CURRENT", "NAME", "BASE_URL", "API_KEY");

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.contexts.get(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_context { "*" } else { "" };
                    let base_url = if ctx.base_url.is_empty() {
                        "(default)"
                    } else {
                        &ctx.base_url
                    };
                    println!(
                        "{:<8} {:<20} {:<30} {}",
                        current,
                        name,
                        base_url,
                        mask_api_key(&ctx.api_key)
                    );
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.contexts.get(name) else {
                        continue;
                    };
                    println!("\n  {}:", name);
                    if !ctx.api_key.is_empty() {
                        println!("    API Key: {}", mask_api_key(&ctx.api_key));
                    }
                    if !ctx.base_url.is_empty() {
                        println!("    Base URL: {}", ctx.base_url);
                    }
                    if !ctx.attribution_url.is_empty() {
                        println!("    Attribution URL: {}", ctx.attribution_url);
                    }
                    if !ctx.app_name.is_empty() {
                        println!("    App Name: {}", ctx.app_name);
                    }
                    if ctx.timeout > 0 {
                        println!("    Timeout: {}s", ctx.timeout);
                    }
                    if ctx.max_retries > 0 {
                        println!("    Max Retries: {}", ctx.max_retries);
                    }
                    if ctx.image_count > 0 {
                        println!("    Images: {}", ctx.image_count);
                    }
                    if !ctx.image_size.is_empty() {
                        println!("    Size: {}", ctx.image_size);
                    }
                }

                Ok(())
            }
        }
    }
}
