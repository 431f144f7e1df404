//! Interactive search session.

use std::io::Write;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use pictor_studio::{AppInfo, GenerationState, LOADING_MESSAGE, Overlay, Session, Submitted};

use super::{load_settings, print_verbose, shows_loading};
use crate::Cli;

const HELP: &str = "\
Type a prompt or paste an image URL and press enter.
Start a prompt with `::` to search text that begins with `:`.
  :open N   preview result N and show its attribution
  :close    close the preview
  :about    show information about the application
  :back     close the about page
  :help     show this help
  :quit     exit";

/// Interactive search session.
///
/// Reads one line at a time from stdin. Plain lines are searched; lines
/// starting with `:` are commands (see `:help`).
#[derive(Args)]
pub struct SessionCommand {
    /// Number of images to generate per prompt
    #[arg(long = "n")]
    pub count: Option<u32>,

    /// Image size, e.g. 512x512
    #[arg(long)]
    pub size: Option<String>,
}

impl SessionCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = load_settings(cli)?.with_overrides(self.count, self.size.as_deref());
        if let Some(name) = &settings.context_name {
            print_verbose(cli, &format!("Using context: {}", name));
        }

        let mut repl = Repl::new(settings.session()?, settings.app.clone());
        let mut out = std::io::stdout();
        repl.banner(&mut out)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if repl.handle(&line, &mut out).await? == Flow::Quit {
                break;
            }
        }

        writeln!(out, "{}", repl.app.current_footer())?;
        Ok(())
    }
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Line-driven front end over a [`Session`].
struct Repl {
    session: Session,
    app: AppInfo,
}

impl Repl {
    fn new(session: Session, app: AppInfo) -> Self {
        Self { session, app }
    }

    fn banner(&self, out: &mut impl Write) -> anyhow::Result<()> {
        writeln!(out, "{}", self.app.name)?;
        writeln!(out, "Enter a prompt, keywords, or an image URL. Type :help for commands.")?;
        Ok(())
    }

    async fn handle(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<Flow> {
        let trimmed = line.trim();
        if let Some(escaped) = trimmed.strip_prefix("::") {
            self.search(&format!(":{escaped}"), out).await?;
            return Ok(Flow::Continue);
        }
        let Some(command) = trimmed.strip_prefix(':') else {
            self.search(line, out).await?;
            return Ok(Flow::Continue);
        };

        let mut parts = command.split_whitespace();
        match (parts.next().unwrap_or(""), parts.next()) {
            ("quit" | "q" | "exit", _) => return Ok(Flow::Quit),
            ("help" | "h", _) => writeln!(out, "{}", HELP)?,
            ("open" | "o", Some(n)) => self.open(n, out).await?,
            ("open" | "o", None) => writeln!(out, "usage: :open N")?,
            ("close" | "c", _) => {
                self.session.close_preview();
                writeln!(out, "Preview closed.")?;
            }
            ("about", _) => {
                self.session.open_about();
                writeln!(out, "{}\n\n{}", self.app.about_title(), self.app.about_text())?;
            }
            ("back", _) => self.session.close_about(),
            (other, _) => writeln!(out, "unknown command :{} (try :help)", other)?,
        }
        Ok(Flow::Continue)
    }

    async fn search(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let kind = self.session.input_changed(line);
        if shows_loading(&kind) {
            writeln!(out, "{}", LOADING_MESSAGE)?;
            out.flush()?;
        }

        // Failures are shown inline from the session state.
        let submitted = self.session.submit().await;
        match (submitted, self.session.generation_state()) {
            (Ok(Submitted::Ignored), _) => {}
            (Ok(_), _) => {
                for (i, image) in self.session.results().iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, image.url)?;
                }
            }
            (Err(_), GenerationState::Failed(msg)) => writeln!(out, "error: {}", msg)?,
            (Err(e), _) => writeln!(out, "error: {}", e)?,
        }
        Ok(())
    }

    async fn open(&mut self, n: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let index = match n.parse::<usize>() {
            Ok(i) if i > 0 => i - 1,
            _ => {
                writeln!(out, "expected a result number, got {:?}", n)?;
                return Ok(());
            }
        };

        let entries = match self.session.open_result(index).await {
            Ok(entries) => entries.to_vec(),
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                return Ok(());
            }
        };

        writeln!(out, "Preview: {}", self.session.selected().unwrap_or_default())?;
        if entries.is_empty() {
            writeln!(out, "  (no attribution data)")?;
        }
        for entry in entries {
            writeln!(out, "  {}", entry)?;
        }
        Ok(())
    }
}
