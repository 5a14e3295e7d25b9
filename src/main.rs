//! FairGPT CLI
//!
//! Command-line interface for the FairGPT verification API:
//! - Verify a text claim
//! - Verify a screenshot or PDF
//! - Run the built-in example claims
//! - Interactive session
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use fairgpt::report::{render_json, render_text};
use fairgpt::session::example;
use fairgpt::{
    ClientConfig, ClipboardItem, Config, ControllerOptions, MediaUpload, PreviewCache,
    QueryController, SubmissionOutcome, VerifyClient, ViewMode, EXAMPLE_QUERIES,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "fairgpt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit news claims with the FairGPT verification API")]
#[command(long_about = "FairGPT checks a claim or screenshot against a golden list of sources.\nIt reports the verdict, source integrity, bias and coverage trend.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verification API base URL (overrides config and FAIRGPT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,

    /// Narrative to show (consensus, alternative)
    #[arg(short, long, default_value = "consensus", global = true)]
    pub mode: ViewMode,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a text claim
    Search {
        /// The claim (multiple words are joined)
        #[arg(required = true)]
        claim: Vec<String>,
    },

    /// Verify an image or PDF
    Verify {
        /// Path to a PNG, JPEG, GIF, WebP, BMP, HEIC or PDF file
        path: PathBuf,
    },

    /// List the built-in example claims
    Examples,

    /// Verify one of the built-in example claims
    Example {
        /// Example number (1-based)
        number: usize,
    },

    /// Interactive session
    Shell,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        command,
        api_url,
        config,
        format,
        mode,
    } = Cli::parse();

    let succeeded = match command {
        Commands::Config { output } => {
            write_config(output.as_deref())?;
            true
        }

        Commands::Examples => {
            print_examples();
            true
        }

        Commands::Search { claim } => {
            let controller = connect(api_url, config.as_deref())?;
            let outcome = controller.submit_with(&claim.join(" ")).await;
            controller.set_view_mode(mode).await;
            print_outcome(&controller, outcome, &format).await?
        }

        Commands::Verify { path } => {
            let controller = connect(api_url, config.as_deref())?;
            let upload = MediaUpload::from_path(&path).await?;
            controller.select_media(upload).await;
            let outcome = controller.submit_media().await;
            controller.set_view_mode(mode).await;
            print_outcome(&controller, outcome, &format).await?
        }

        Commands::Example { number } => {
            let chosen = example(number).with_context(|| {
                format!(
                    "No example {}. Choose 1-{}",
                    number,
                    EXAMPLE_QUERIES.len()
                )
            })?;
            let controller = connect(api_url, config.as_deref())?;
            eprintln!("{}: {}", chosen.title, chosen.query);
            let outcome = controller.submit_with(chosen.query).await;
            controller.set_view_mode(mode).await;
            print_outcome(&controller, outcome, &format).await?
        }

        Commands::Shell => {
            let controller = connect(api_url, config.as_deref())?;
            controller.set_view_mode(mode).await;
            shell(&controller, &format).await?;
            true
        }
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Load configuration, start logging and build a controller
fn connect(api_url: Option<String>, config_path: Option<&Path>) -> anyhow::Result<QueryController> {
    let mut config = match config_path {
        Some(path) => Config::load_with_env(path)?,
        // Runs before logging is up, so a bad file is returned, not logged.
        None => Config::try_load_default()?,
    };
    if let Some(url) = api_url {
        config.api.base_url = url;
    }

    fairgpt::logging::init(&config.logging)?;
    tracing::debug!(base_url = %config.api.base_url, "FairGPT CLI v{}", env!("CARGO_PKG_VERSION"));

    let client = VerifyClient::new(ClientConfig::from(&config.api))?;
    Ok(QueryController::new(
        Arc::new(client),
        PreviewCache::new(),
        ControllerOptions {
            surface_text_errors: config.api.surface_text_errors,
        },
    ))
}

/// Print the verdict for a finished submission. Returns false on failure.
async fn print_outcome(
    controller: &QueryController,
    outcome: SubmissionOutcome,
    format: &str,
) -> anyhow::Result<bool> {
    match outcome {
        SubmissionOutcome::Succeeded(_) => {}
        SubmissionOutcome::Failed {
            notice: Some(notice),
            ..
        } => {
            eprintln!("{}", notice);
            return Ok(false);
        }
        SubmissionOutcome::Failed { notice: None, .. } | SubmissionOutcome::Skipped(_) => {
            return Ok(false);
        }
    }

    if let Some(vm) = controller.view_model().await {
        match format {
            "json" => println!("{}", render_json(&vm)?),
            _ => print!("{}", render_text(&vm)),
        }
    }
    Ok(true)
}

fn print_examples() {
    for (i, example) in EXAMPLE_QUERIES.iter().enumerate() {
        println!("{}. {:<20} \"{}\"", i + 1, example.title, example.query);
    }
}

fn write_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = fairgpt::config::generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}

const SHELL_HELP: &str = "\
Type a claim and press Enter to verify it.
  (empty line)          submit the selected file, or the current query
  :file <path>          select an image or PDF
  :paste <text>         paste text into the query
  :paste-image <path>   paste an image
  :clear                drop the selected file
  :toggle               switch consensus / alternative narrative
  :show                 show the last verdict again
  :examples             list example claims
  :example <n>          verify example n
  :quit                 exit";

/// One line of shell input
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    Help,
    File(&'a str),
    PasteImage(&'a str),
    Paste(&'a str),
    Clear,
    Toggle,
    Show,
    Examples,
    Example(&'a str),
    /// Empty line
    Submit,
    /// A claim to verify
    Claim(&'a str),
    Unknown(&'a str),
}

impl<'a> ShellCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if !line.starts_with(':') {
            return if line.is_empty() {
                ShellCommand::Submit
            } else {
                ShellCommand::Claim(line)
            };
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        match command {
            ":quit" | ":q" => ShellCommand::Quit,
            ":help" => ShellCommand::Help,
            ":file" => ShellCommand::File(arg),
            ":paste-image" => ShellCommand::PasteImage(arg),
            ":paste" => ShellCommand::Paste(arg),
            ":clear" => ShellCommand::Clear,
            ":toggle" => ShellCommand::Toggle,
            ":show" => ShellCommand::Show,
            ":examples" => ShellCommand::Examples,
            ":example" => ShellCommand::Example(arg),
            unknown => ShellCommand::Unknown(unknown),
        }
    }
}

async fn shell(controller: &QueryController, format: &str) -> anyhow::Result<()> {
    println!("FairGPT v{} - :help for commands", env!("CARGO_PKG_VERSION"));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let snapshot = controller.snapshot().await;
        match &snapshot.pending_file {
            Some(file) => print!("[{}] > ", file),
            None => print!("> "),
        }
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ShellCommand::parse(&line) {
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{}", SHELL_HELP),
            ShellCommand::Unknown(command) => {
                eprintln!("Unknown command {}", command);
                println!("{}", SHELL_HELP);
            }
            ShellCommand::File(path) => pick_file(controller, path, false).await,
            ShellCommand::PasteImage(path) => pick_file(controller, path, true).await,
            ShellCommand::Paste(text) => {
                controller
                    .paste(vec![ClipboardItem::Text(text.to_string())])
                    .await;
            }
            ShellCommand::Clear => controller.clear_media().await,
            ShellCommand::Toggle => {
                let mode = controller.toggle_view_mode().await;
                println!("Showing {} narrative", mode);
                show(controller, format).await?;
            }
            ShellCommand::Show => show(controller, format).await?,
            ShellCommand::Examples => print_examples(),
            ShellCommand::Example(number) => match number.parse().ok().and_then(example) {
                Some(chosen) => {
                    let outcome = controller.submit_with(chosen.query).await;
                    print_outcome(controller, outcome, format).await?;
                }
                None => eprintln!("Choose an example 1-{}", EXAMPLE_QUERIES.len()),
            },
            ShellCommand::Submit => {
                let outcome = controller.submit().await;
                print_outcome(controller, outcome, format).await?;
            }
            ShellCommand::Claim(claim) => {
                controller.set_query(claim).await;
                let outcome = controller.submit().await;
                print_outcome(controller, outcome, format).await?;
            }
        }
    }

    Ok(())
}

async fn pick_file(controller: &QueryController, path: &str, pasted: bool) {
    let upload = match MediaUpload::from_path(Path::new(path)).await {
        Ok(upload) => upload,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    if pasted {
        controller.paste(vec![ClipboardItem::Image(upload)]).await;
    } else {
        controller.select_media(upload).await;
    }
    if let Some(url) = controller.snapshot().await.preview_url {
        println!("Preview: {}", url);
    }
}

async fn show(controller: &QueryController, format: &str) -> anyhow::Result<()> {
    match controller.view_model().await {
        Some(vm) if format == "json" => println!("{}", render_json(&vm)?),
        Some(vm) => print!("{}", render_text(&vm)),
        None => println!("No verdict yet"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_commands() {
        assert_eq!(ShellCommand::parse(":q"), ShellCommand::Quit);
        assert_eq!(
            ShellCommand::parse(" :file  shot.png "),
            ShellCommand::File("shot.png")
        );
        assert_eq!(
            ShellCommand::parse(":paste-image a.png"),
            ShellCommand::PasteImage("a.png")
        );
        assert_eq!(ShellCommand::parse(":example 2"), ShellCommand::Example("2"));
        assert_eq!(ShellCommand::parse("   "), ShellCommand::Submit);
    }

    #[test]
    fn test_unknown_colon_command_is_not_a_claim() {
        assert_eq!(ShellCommand::parse(":hlep"), ShellCommand::Unknown(":hlep"));
        assert_eq!(
            ShellCommand::parse(":toggel now"),
            ShellCommand::Unknown(":toggel")
        );
        assert_eq!(
            ShellCommand::parse("Is the star note fake?"),
            ShellCommand::Claim("Is the star note fake?")
        );
    }
}
