//! About command.

use clap::Args;

use super::load_settings;
use crate::Cli;

/// Show information about the application.
#[derive(Args)]
pub struct AboutCommand {}

impl AboutCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let app = load_settings(cli)?.app;
        println!("{}\n", app.about_title());
        println!("{}\n", app.about_text());
        println!("{}", app.current_footer());
        Ok(())
    }
}
