use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use idmask::core::{decode_compact, encode_compact};
use idmask::{
    decode_token, encode_token, inspect_token, share_url, source_link, token_from_url, Catalog,
    Mask, Preferences, SelectionState, SetId, MASK_BITS,
};

#[derive(Parser)]
#[command(name = "idmask")]
#[command(about = "Encode and decode shareable component-ownership tokens")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode ID=MASK pairs into a token
    Encode {
        /// Catalog JSON file
        #[arg(short, long)]
        catalog: PathBuf,
        /// Keep hidden (vaulted) sets in the token
        #[arg(long)]
        include_hidden: bool,
        /// Print a share URL rooted at this base instead of the bare token
        #[arg(long)]
        base: Option<String>,
        /// Entries such as 12=0b1011, 7=0xff or 3=5
        #[arg(required = true)]
        entries: Vec<String>,
    },
    /// Decode a token, page path or page URL
    Decode {
        /// Catalog JSON file, used to clip masks and name components
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        token: String,
    },
    /// Show the raw payload and where parsing stopped
    Inspect { token: String },
    /// Render the checklist for a token
    Show {
        /// Catalog JSON file
        #[arg(short, long)]
        catalog: PathBuf,
        /// Include hidden (vaulted) sets; defaults to the saved preference
        #[arg(long)]
        include_hidden: bool,
        /// Base URL for source links
        #[arg(long)]
        base: Option<String>,
        token: Option<String>,
    },
    /// Show or change saved preferences
    Prefs {
        /// Preferences file (defaults to $IDMASK_CONFIG or the platform config dir)
        #[arg(long)]
        config: Option<PathBuf>,
        /// New value for the hidden-set preference
        #[arg(long)]
        include_hidden: Option<bool>,
    },
    /// Encode a list of ids in the compact B/L form
    Compact {
        #[arg(required = true)]
        ids: Vec<u32>,
    },
    /// Decode a compact B/L id list
    Expand { text: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode { catalog, include_hidden, base, entries } => {
            let catalog = load_catalog(&catalog)?;
            let mut selection = SelectionState::new();
            for entry in &entries {
                let (id, mask) = parse_entry(entry)?;
                selection.insert(id, mask);
            }
            let token = encode_token(&selection, &catalog, include_hidden);
            match base {
                Some(base) => println!("{}", share_url(&base, &token)?),
                None => println!("{}", token),
            }
        }
        Commands::Decode { catalog, token } => {
            let token = resolve_token(&token)?;
            let selection = decode_token(&token);
            let catalog = catalog.map(|path| load_catalog(&path)).transpose()?;

            for (id, mask) in selection.iter() {
                match catalog.as_ref().and_then(|c| c.get(id).map(|set| (c, set))) {
                    Some((catalog, set)) => println!(
                        "{}\t{:#010b}\t{}\t{}",
                        id,
                        set.clip(mask),
                        set.display_name(),
                        selection.selected_components(id, catalog).join(", ")
                    ),
                    None => println!("{}\t{:#010b}", id, mask),
                }
            }
        }
        Commands::Inspect { token } => {
            let token = resolve_token(&token)?;
            let report = inspect_token(&token)?;
            println!("payload: {}", report.payload_hex());
            for (id, mask) in &report.entries {
                println!("{}\t{:#010b}", id, mask);
            }
            if let Some(fault) = report.fault {
                println!("stopped: {}", fault);
            }
        }
        Commands::Show { catalog, include_hidden, base, token } => {
            let catalog = load_catalog(&catalog)?;
            let include_hidden = include_hidden || saved_preferences()?.include_hidden;
            let selection = match token {
                Some(token) => decode_token(&resolve_token(&token)?),
                None => SelectionState::new(),
            };
            render(&catalog, &selection, include_hidden, base.as_deref())?;
        }
        Commands::Prefs { config, include_hidden } => {
            let path = match config {
                Some(path) => path,
                None => Preferences::default_path()
                    .ok_or_else(|| anyhow!("no config directory available"))?,
            };
            let mut prefs = Preferences::load(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            if let Some(include_hidden) = include_hidden {
                prefs.include_hidden = include_hidden;
                prefs.save(&path)?;
            }
            println!("include_hidden = {}", prefs.include_hidden);
        }
        Commands::Compact { ids } => println!("{}", encode_compact(&ids)),
        Commands::Expand { text } => {
            let ids = decode_compact(&text)?;
            println!(
                "{}",
                ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(" ")
            );
        }
    }

    Ok(())
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog = Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))?;
    debug!(sets = catalog.len(), "catalog ready");
    Ok(catalog)
}

fn saved_preferences() -> Result<Preferences> {
    match Preferences::default_path() {
        Some(path) => Ok(Preferences::load(path)?),
        None => Ok(Preferences::default()),
    }
}

/// Accept a bare token, a page path or a full page URL.
fn resolve_token(input: &str) -> Result<String> {
    Ok(token_from_url(input)?.unwrap_or_default())
}

fn parse_entry(entry: &str) -> Result<(SetId, Mask)> {
    let (id, mask) = entry
        .split_once('=')
        .ok_or_else(|| anyhow!("expected ID=MASK, got '{}'", entry))?;
    let id: SetId = id.trim().parse().with_context(|| format!("bad set id in '{}'", entry))?;
    Ok((id, parse_mask(mask.trim())?))
}

fn parse_mask(text: &str) -> Result<Mask> {
    let parsed = if let Some(hex) = text.strip_prefix("0x") {
        Mask::from_str_radix(hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b") {
        Mask::from_str_radix(&bin.replace('_', ""), 2)
    } else {
        text.parse()
    };
    parsed.with_context(|| format!("bad mask '{}'", text))
}

fn render(catalog: &Catalog, selection: &SelectionState, include_hidden: bool, base: Option<&str>) -> Result<()> {
    for set in catalog.visible_sets(include_hidden) {
        let mark = |on: bool| if on { "[x]" } else { "[ ]" };
        let mask = selection.clipped_mask(set.id, catalog);

        println!("{}", set.display_name());
        println!("  {} All", mark(selection.is_all_selected(set.id, catalog)));
        for (index, component) in set.components.iter().enumerate() {
            let owned = index < MASK_BITS && mask & (1u8 << index) != 0;
            match base {
                Some(base) => println!(
                    "  {} {}  {}",
                    mark(owned),
                    component,
                    source_link(base, &set.name, component)?
                ),
                None => println!("  {} {}", mark(owned), component),
            }
        }
    }

    println!();
    println!("{}", encode_token(selection, catalog, include_hidden));
    Ok(())
}
