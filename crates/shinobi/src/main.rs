use anyhow::Context;
use clap::{Parser, Subcommand};
use shinobi::roster::{Rank, SearchResult};
use shinobi::store::Store;
use shinobi::wheel::{SPIN_DURATION, Wheel};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "shinobi", version, about, long_about = None)]
struct Cli {
    /// Directory holding ninjas.json, scrolls.json and rules.txt
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// List banned ninjas, optionally for one rank.
    List {
        #[arg(short, long)]
        rank: Option<Rank>,
    },
    /// Ban one or more ninjas at a rank.
    Add { rank: Rank, names: Vec<String> },
    /// Remove ninjas by exact name.
    Remove { names: Vec<String> },
    /// Check whether a ninja is banned.
    Search { name: String },
    /// Manage the scrolls on the wheel.
    Scroll {
        #[command(subcommand)]
        action: ScrollAction,
    },
    /// Print the rules, or replace them.
    Rules {
        #[arg(long)]
        set: Option<String>,
    },
    /// Spin the wheel over the scroll list and print where it lands.
    Spin {
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum ScrollAction {
    List,
    Add { name: String },
    Remove { name: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = match cli.data_dir {
        Some(dir) => Store::open(dir),
        None => Store::open_default(),
    }
    .context("Failed to open data directory")?;

    match cli.command {
        Commands::List { rank } => list(&store, rank),
        Commands::Add { rank, names } => add(&store, rank, &names),
        Commands::Remove { names } => {
            let (_, removed) = store.update_roster(|r| {
                names.iter().map(|n| r.remove(n)).sum::<usize>()
            })?;
            println!("Removed {} ninja(s)", removed);
            Ok(())
        }
        Commands::Search { name } => match store.load_roster().search(&name) {
            SearchResult::Empty => anyhow::bail!("Please enter a ninja name"),
            result => {
                println!("{}", result);
                Ok(())
            }
        },
        Commands::Scroll { action } => scroll(&store, action),
        Commands::Rules { set: Some(text) } => Ok(store.save_rules(&text)?),
        Commands::Rules { set: None } => {
            println!("{}", store.load_rules());
            Ok(())
        }
        Commands::Spin { seed } => spin(&store, seed),
    }
}

fn list(store: &Store, rank: Option<Rank>) -> anyhow::Result<()> {
    let roster = store.load_roster();
    let groups = roster.grouped();
    for r in Rank::all().filter(|r| rank.is_none_or(|want| want == *r)) {
        let names: Vec<_> = groups
            .get(&r)
            .into_iter()
            .flatten()
            .map(|n| n.name.as_str())
            .collect();
        println!("{}: {}", r, names.join(" "));
    }
    Ok(())
}

fn add(store: &Store, rank: Rank, names: &[String]) -> anyhow::Result<()> {
    let (_, report) = store.update_roster(|r| r.add_batch(&names.join(" "), rank))?;
    println!("{}", report?);
    Ok(())
}

fn scroll(store: &Store, action: ScrollAction) -> anyhow::Result<()> {
    let scrolls = match action {
        ScrollAction::List => store.load_scrolls(),
        ScrollAction::Add { name } => store.update_scrolls(|s| s.add(&name))?,
        ScrollAction::Remove { name } => store.update_scrolls(|s| s.remove(&name))?,
    };
    for label in scrolls.labels() {
        println!("{}", label);
    }
    Ok(())
}

fn spin(store: &Store, seed: Option<u64>) -> anyhow::Result<()> {
    let scrolls = store.load_scrolls();
    if scrolls.is_empty() {
        anyhow::bail!("No scrolls on the wheel. Add one with `shinobi scroll add <name>`.");
    }

    let mut wheel = match seed {
        Some(seed) => Wheel::seeded(seed),
        None => Wheel::new(),
    };
    wheel.set_segments(scrolls.labels());

    let started = Instant::now();
    wheel.spin(started);
    let outcome = wheel
        .tick(started + SPIN_DURATION)
        .context("Wheel did not settle")?;

    println!("{} ({:.1}°)", outcome.label, outcome.settled);
    Ok(())
}
