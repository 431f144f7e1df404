//! Attribution lookup command.

use clap::Args;

use super::{load_settings, output_result, print_verbose};
use crate::Cli;

/// Look up likely artist matches for an image.
///
/// Attribution is best effort: when the service is unreachable or answers
/// with something unexpected, the result is an empty list.
#[derive(Args)]
pub struct AttributionCommand {
    /// Image URL
    url: String,
}

impl AttributionCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = load_settings(cli)?;
        let service = settings.builder.build_attribution()?;

        print_verbose(cli, &format!("Image: {}", self.url));

        let entries = service.lookup(&self.url).await;
        if entries.is_empty() {
            print_verbose(cli, "No attribution data available");
        }

        output_result(cli, &entries)
    }
}
