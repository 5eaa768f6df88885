mod app;

use anyhow::{Context, Result, bail};
use chino_gloss_config::Config;
use chino_gloss_engine::{
    AnnotationSession, AnnotationStore, KnownSenses, ParticleQuery, SentenceAnalysis, Selection,
    SharedOutline, parse_outline,
};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::stdout,
    path::{Path, PathBuf},
};

use crate::app::{PickerApp, run_app};

#[derive(Parser, Debug)]
#[command(name = "chino-gloss")]
#[command(about = "Particle taxonomy and sentence annotation tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the particle taxonomy and list every entry
    Outline {
        /// Taxonomy document (defaults to `outline_path` from the config file)
        #[arg(long)]
        outline: Option<PathBuf>,
    },

    /// Pick a particle classification interactively and print its section
    Pick {
        #[arg(long)]
        outline: Option<PathBuf>,

        /// Particle text to search for when no groups are proposed
        #[arg(long, default_value = "")]
        candidate: String,

        /// Proposed top-level group; repeat for several
        #[arg(long = "group", value_name = "N")]
        groups: Vec<u32>,

        /// Section currently selected, kept visible in the list
        #[arg(long, default_value = "")]
        current: String,
    },

    /// Carry annotations from a stored sentence over to its edited version
    CarryOver {
        /// Sentence the annotations were made on
        #[arg(long)]
        old: String,

        /// Edited sentence
        #[arg(long)]
        new: String,

        /// NLP analysis of the edited sentence, as JSON
        #[arg(long)]
        analysis: PathBuf,

        /// Record directory (defaults to `store_path` from the config file)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Also save senses already picked for the same words in other sentences
        #[arg(long)]
        autopick: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load()?.unwrap_or_default();

    match cli.command {
        Command::Outline { outline } => {
            let path = resolve_path(outline, &config.outline_path, "outline")?;
            print_outline(&path)
        }
        Command::Pick {
            outline,
            candidate,
            groups,
            current,
        } => {
            let path = resolve_path(outline, &config.outline_path, "outline")?;
            let current = Selection::from_value(&current)
                .with_context(|| format!("--current {current:?}"))?;
            let query = ParticleQuery {
                groups,
                candidate,
                current,
            };
            pick(path, config, query)
        }
        Command::CarryOver {
            old,
            new,
            analysis,
            store,
            autopick,
        } => {
            let store = resolve_path(store, &config.store_path, "store")?;
            carry_over(&store, &old, &new, &analysis, autopick)
        }
    }
}

/// A command-line path wins over the configured one. Having neither is an error.
fn resolve_path(flag: Option<PathBuf>, configured: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    match flag.or_else(|| configured.clone()) {
        Some(path) => Ok(path),
        None => bail!(
            "No {what} path given with --{what} and none in config file at {}",
            Config::config_path().display()
        ),
    }
}

fn read_outline(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read outline {}", path.display()))
}

fn print_outline(path: &Path) -> Result<()> {
    let outline = parse_outline(&read_outline(path)?)
        .with_context(|| format!("Malformed outline {}", path.display()))?;
    for entry in outline.entries() {
        let leaf = if entry.leaf { " ✅" } else { "" };
        println!("{}{leaf}", entry.full_line());
    }
    Ok(())
}

fn pick(path: PathBuf, config: Config, query: ParticleQuery) -> Result<()> {
    let outline = SharedOutline::parse(&read_outline(&path)?)
        .with_context(|| format!("Malformed outline {}", path.display()))?;
    let mut app = PickerApp::new(outline, path, config.alternate_forms, query);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(selection) = res? {
        println!("{}", selection.value());
    }
    Ok(())
}

fn carry_over(store: &Path, old: &str, new: &str, analysis: &Path, autopick: bool) -> Result<()> {
    let store = AnnotationStore::open(store)?;
    let raw = std::fs::read_to_string(analysis)
        .with_context(|| format!("Failed to read analysis {}", analysis.display()))?;
    let analysis: SentenceAnalysis = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid analysis {}", analysis.display()))?;

    let previous = store.load(old)?;
    if previous.is_none() {
        log::warn!("no record for {old:?}, nothing to carry over");
    }

    let mut session = AnnotationSession::from_record(new, store.load(new)?);
    let report = session.begin_editing(previous.as_ref(), &analysis).unwrap_or_default();

    let known = KnownSenses::from_db(&store.load_all()?);
    let proposals = session.propose_dict_hits(&analysis, &known);

    println!(
        "dictionary hits: {}\nparticles: {}\nconjugations: {}",
        report.dict_hits, report.particles, report.conj_hits
    );
    for hit in &proposals {
        let verb = if autopick { "picked" } else { "suggested" };
        println!(
            "{verb}: word {} sense {} at {}..{}",
            hit.word.id, hit.sense, hit.span.start_idx, hit.span.end_idx
        );
    }
    if autopick {
        for hit in proposals {
            session.upsert_dict_hit(hit);
        }
    }

    let written = store.persist(&session.to_record())?;
    if !written {
        println!("nothing to save for {new:?}");
    }
    Ok(())
}
