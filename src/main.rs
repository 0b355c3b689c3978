use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use styled_text::Config;
use styled_text::config::CONFIG_FILE_NAME;
use styled_text::logging::{LoggingConfig, init_logging};

#[derive(Parser)]
#[command(name = "styled-text")]
#[command(about = "Render wiki-style plain text as safe HTML")]
struct Cli {
    /// Input text file (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Config file (defaults to styled-text.toml in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// HTML fragment
    Html,
    /// Document tree as JSON
    Json,
    /// Document tree in Rust debug form
    Debug,
}

fn main() {
    let cli = Cli::parse();
    init_logging(LoggingConfig::with_verbosity(cli.verbose));

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let text = read_input(cli.input.as_deref())?;
    let config = load_config(cli.config.as_deref())?;

    let document = styled_text::parse(&text);
    log::info!("parsed {} top-level nodes", document.children.len());

    let mut rendered = match cli.format {
        Format::Html => styled_text::document_to_html(&document, &config),
        Format::Json => {
            serde_json::to_string_pretty(&document).context("serializing document")?
        }
        Format::Debug => format!("{:#?}", document),
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("writing to stdout")?,
    }
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

/// An explicitly named config must parse; the implicit one falls back to defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Config::from_toml_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(Config::load(Path::new(CONFIG_FILE_NAME))),
    }
}
