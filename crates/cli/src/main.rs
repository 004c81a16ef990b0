//! `lectern` — assemble course lecture pages from the command line.

mod page;

use clap::{Parser, Subcommand};
use lectern_assemble::{Loader, PageQuery, RedactionStore};
use lectern_colorize::{SourceKind, extract_region, redact};
use lectern_config::SiteConfig;
use lectern_fetch::HttpSource;
use lectern_markup::{ObfuscatedEmail, rot13};
use miette::{Result, miette};
use std::fmt::Display;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Lectern - course lecture notes assembler", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a config file (defaults to the per-user location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Site base URL, overriding the configured one
    #[arg(long, global = true)]
    base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a lecture fragment and write the assembled page
    Render {
        /// Lecture name, e.g. `intro`
        #[arg(long, conflicts_with = "query")]
        id: Option<String>,

        /// Raw shell-page query string, e.g. `?id=intro&redactions=a`
        #[arg(long)]
        query: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Colorize a source file (`-` reads stdin)
    Colorize {
        file: PathBuf,

        /// Treat the input as already-escaped markup
        #[arg(long)]
        markup: bool,

        /// Apply the notes redaction markers first
        #[arg(long, conflicts_with = "region")]
        redact: bool,

        /// Keep only the named `(* Begin TAG *)` region
        #[arg(long)]
        region: Option<String>,
    },
    /// Show, set or clear the persisted redaction list
    Redactions {
        /// Store file (defaults to the per-user location)
        #[arg(long)]
        store: Option<PathBuf>,

        #[command(subcommand)]
        action: RedactionAction,
    },
    /// Emit obfuscated-email markup for an address
    Email {
        /// Plain username; it is stored rotated
        #[arg(long)]
        user: String,

        #[arg(long)]
        domain: String,

        /// Recipient's full name
        #[arg(long)]
        name: String,

        #[arg(long)]
        subject: Option<String>,
    },
}

#[derive(Subcommand)]
enum RedactionAction {
    /// Print the stored identifiers
    Show,
    /// Replace the stored list with the given identifiers
    Set { ids: Vec<String> },
    /// Drop the stored list
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SiteConfig::load_from(cli.config.as_deref()).map_err(report)?;

    match cli.command {
        Commands::Render { id, query, out } => render(&config, cli.base, id, query, out).await,
        Commands::Colorize { file, markup, redact, region } => {
            colorize(&config, &file, markup, redact, region)
        },
        Commands::Redactions { store, action } => redactions(store, action),
        Commands::Email { user, domain, name, subject } => {
            email(&user, &domain, &name, subject);
            Ok(())
        },
    }
}

fn report(error: lectern_config::error::Error) -> miette::Report {
    miette!("{}", &*error)
}

async fn render(
    config: &SiteConfig,
    base: Option<String>,
    id: Option<String>,
    query: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    let base = base
        .or_else(|| (!config.base_url.is_empty()).then(|| config.base_url.clone()))
        .ok_or_else(|| miette!("site base URL required; pass --base or set it in the config"))?;
    let base = base.trim_end_matches('/').to_string();

    let query = match (id, query) {
        (Some(id), _) => PageQuery::parse(&format!("?id={id}")),
        (None, Some(raw)) => PageQuery::parse(&raw),
        (None, None) => return Err(miette!("nothing to render; pass --id or --query")),
    };

    let store = RedactionStore::open_default().map_err(|error| miette!("{}", &*error))?;
    if let Some(list) = &query.redactions {
        store.save(list).map_err(|error| miette!("{}", &*error))?;
        tracing::info!(entries = list.lines().count(), "redaction list persisted");
    }
    let redactions = store.load().map_err(|error| miette!("{}", &*error))?;

    let source = HttpSource::new()
        .with_location(format!("{base}/index.html"))
        .with_mime_override("text/html");
    let loader = Loader::new(source, base)
        .with_colorizer(config.colorizer())
        .with_redactions(redactions);

    let Some(body) = loader.load(&query).await else {
        tracing::info!("no lecture selected; nothing to do");
        return Ok(());
    };
    let title = query.lecture.as_deref().unwrap_or("lecture");
    let rendered = page::render(title, &body)?;
    write_output(out, &rendered)
}

fn colorize(
    config: &SiteConfig,
    file: &PathBuf,
    markup: bool,
    apply_redact: bool,
    region: Option<String>,
) -> Result<()> {
    let text = read_input(file)?;
    let text = match region {
        Some(tag) => extract_region(&text, &tag).map_err(|error| miette!("{}", &*error))?,
        None if apply_redact => redact(&text),
        None => text,
    };
    let kind = if markup { SourceKind::Markup } else { SourceKind::Raw };
    println!("{}", config.colorizer().colorize(&text, kind));
    Ok(())
}

fn redactions(store: Option<PathBuf>, action: RedactionAction) -> Result<()> {
    let store = match store {
        Some(path) => RedactionStore::at(path),
        None => RedactionStore::open_default().map_err(|error| miette!("{}", &*error))?,
    };
    match action {
        RedactionAction::Show => {
            let mut ids: Vec<_> =
                store.load().map_err(|error| miette!("{}", &*error))?.into_iter().collect();
            ids.sort();
            for id in ids {
                println!("{id}");
            }
        },
        RedactionAction::Set { ids } => {
            store.save(&ids.join("\n")).map_err(|error| miette!("{}", &*error))?;
        },
        RedactionAction::Clear => store.clear().map_err(|error| miette!("{}", &*error))?,
    }
    Ok(())
}

fn email(user: &str, domain: &str, name: &str, subject: Option<String>) {
    let mut address = ObfuscatedEmail::new(rot13(user), domain, name);
    if let Some(subject) = subject {
        address = address.with_subject(subject);
    }
    println!("rotated username: {}", rot13(user));
    println!("placeholder: {}", address.placeholder("mailto", "cutme").render());
    println!("revealed: {}", address.revealed_link().render());
}

fn read_input(file: &PathBuf) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map_err(io_error)?;
        return Ok(text);
    }
    std::fs::read_to_string(file).map_err(io_error)
}

fn write_output(out: Option<PathBuf>, rendered: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(&path, rendered).map_err(io_error),
        None => {
            println!("{rendered}");
            Ok(())
        },
    }
}

fn io_error(error: impl Display) -> miette::Report {
    miette!("{error}")
}
