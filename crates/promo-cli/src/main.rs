//! `promo` — command-line surface for the ClutchTrades promo engine.
//!
//! Two jobs: checking what a countdown will show for a given date text
//! (one-shot or live), and previewing the blog feed the way the listing
//! page will render it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};

use promo_engine::{
    display_state, featured, filter, format_date, load_posts, parse_event_date, Scheduler,
    INVALID_DATE_MESSAGE,
};

#[derive(Parser)]
#[command(name = "promo", version, about = "ClutchTrades promo site tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the countdown display for a human-authored date text
    Countdown {
        /// The date text as it appears in page content, e.g. "2nd March"
        text: String,
        /// Evaluate at this instant instead of the wall clock
        /// (YYYY-MM-DDTHH:MM:SS, local)
        #[arg(long, value_name = "INSTANT")]
        now: Option<String>,
        /// Keep printing ticks every second until interrupted
        #[arg(long, conflicts_with = "now")]
        watch: bool,
    },
    /// List posts from a blog feed JSON file, newest first
    Posts {
        /// Path to the feed (a JSON array of posts)
        file: PathBuf,
        /// Only posts in this category ("all" disables the filter)
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive search over title, excerpt, category, tags
        #[arg(long)]
        search: Option<String>,
        /// Emit the filtered posts as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Countdown { text, now, watch } => run_countdown(&text, now.as_deref(), watch),
        Command::Posts {
            file,
            category,
            search,
            json,
        } => run_posts(&file, category.as_deref(), search.as_deref(), json),
    }
}

fn run_countdown(text: &str, now: Option<&str>, watch: bool) -> Result<()> {
    if watch {
        return run_watch(text);
    }

    let now = match now {
        Some(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .with_context(|| format!("--now must be YYYY-MM-DDTHH:MM:SS, got '{s}'"))?,
        None => Local::now().naive_local(),
    };

    match parse_event_date(text, now) {
        Ok(target) => {
            let state = display_state(now, target, text);
            println!("{}", state.remaining);
            println!("{}", state.label);
            Ok(())
        }
        Err(_) => bail!("{INVALID_DATE_MESSAGE}"),
    }
}

fn run_watch(text: &str) -> Result<()> {
    let handle = Scheduler::new().start(
        text,
        |state| println!("{}   {}", state.remaining, state.label),
        |msg| eprintln!("{msg}"),
    );

    match handle {
        Some(_handle) => {
            // Ticks come from the scheduler thread; nothing to do here
            // until the process is interrupted.
            loop {
                std::thread::park();
            }
        }
        None => bail!("{INVALID_DATE_MESSAGE}"),
    }
}

fn run_posts(
    file: &Path,
    category: Option<&str>,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read feed file '{}'", file.display()))?;
    let posts = load_posts(&text)?;
    let selected = filter(&posts, category, search);

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("No posts matched.");
        return Ok(());
    }

    let featured_slug = featured(&posts).map(|p| p.slug.clone());
    for post in selected {
        let marker = if featured_slug.as_deref() == Some(post.slug.as_str()) {
            "*"
        } else {
            " "
        };
        let minutes = post
            .minutes
            .map(|m| format!(" • {m} min"))
            .unwrap_or_default();
        println!(
            "{marker} {:<28} {} • {}{}",
            post.slug,
            post.category,
            format_date(&post.date),
            minutes
        );
        if !post.excerpt.is_empty() {
            println!("      {}", post.excerpt);
        }
    }
    Ok(())
}
