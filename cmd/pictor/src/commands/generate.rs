//! Image generation command.

use clap::Args;
use serde::{Deserialize, Serialize};

use pictor_cli::load_request;
use pictor_studio::{ImageData, InputKind, LOADING_MESSAGE, Submitted};

use super::{load_settings, output_result, print_success, print_verbose, shows_loading};
use crate::Cli;

/// Generate images from a prompt.
///
/// Input that looks like an ftp/http/https URL is passed through as the only
/// result instead of being sent to the generation API. With `-f`, the prompt
/// (and optionally `n` and `size`) is read from a YAML or JSON request file.
#[derive(Args)]
pub struct GenerateCommand {
    /// Prompt text or image URL (use `--` before words starting with `-`)
    words: Vec<String>,

    /// Number of images to generate
    #[arg(long = "n")]
    pub count: Option<u32>,

    /// Image size, e.g. 512x512
    #[arg(long)]
    pub size: Option<String>,
}

/// Request file accepted by `-f`.
#[derive(Deserialize)]
struct RequestFile {
    prompt: String,
    #[serde(default)]
    n: Option<u32>,
    #[serde(default)]
    size: Option<String>,
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    input: InputKind,
    images: &'a [ImageData],
}

impl GenerateCommand {
    /// Returns the positional words joined into one input string.
    pub fn input(&self) -> String {
        self.words.join(" ")
    }

    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut settings = load_settings(cli)?;

        let input = match &cli.input {
            Some(path) => {
                let req: RequestFile = load_request(path)?;
                settings = settings.with_overrides(req.n, req.size.as_deref());
                req.prompt
            }
            None => self.input(),
        };
        let settings = settings.with_overrides(self.count, self.size.as_deref());

        if let Some(name) = &settings.context_name {
            print_verbose(cli, &format!("Using context: {}", name));
        }
        print_verbose(cli, &format!("Images: {} x {}", settings.count, settings.size));

        let mut session = settings.session()?;
        let kind = session.input_changed(&input);
        if kind.is_url() {
            print_verbose(cli, "Input is a URL; skipping generation");
        } else if shows_loading(&kind) {
            print_verbose(cli, &format!("Prompt: {}", input));
            eprintln!("{}", LOADING_MESSAGE);
        }

        match session.submit().await? {
            Submitted::Ignored => anyhow::bail!("nothing to generate: input is empty"),
            Submitted::Generated(n) => print_success(&format!("Generated {} image(s)", n)),
            Submitted::Direct => print_success("Using the given image URL"),
        }

        output_result(
            cli,
            &GenerateOutput {
                input: kind,
                images: session.results(),
            },
        )
    }
}
