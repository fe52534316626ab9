use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};

use crate::calendar::{build_month_layout, MonthKey, MonthLayout, Slot, MAX_VISIBLE_LIMIT};
use crate::logging::{default_log_dir, init_logging};
use crate::services::{Agenda, AgendaPage, Config, EventLoaderService, LoadedEvents, PAGE_SIZE};
use crate::tui::{self, widgets::time_label, RunOptions};
use crate::types::LoadWarning;

/// Continuously scrollable month-grid calendar
#[derive(Parser)]
#[command(name = "gridcal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory of *.json event files (default: ~/.gridcal/events)
    #[arg(long, global = true)]
    events_dir: Option<PathBuf>,

    /// Config file (default: ~/.gridcal/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Visible events per cell before "+N more"
    #[arg(
        long,
        global = true,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(0..=MAX_VISIBLE_LIMIT as u64)
    )]
    budget: Option<usize>,

    /// Force the compact dot layout
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Print one month's layout
    Month {
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,

        /// Month, 1-12 (default: current)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print events in chronological order, one page at a time
    Agenda {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match default_log_dir().and_then(|dir| init_logging(&config.log_level, &dir)) {
            Ok(()) => {}
            Err(e) => eprintln!("[gridcal] Warning: file logging disabled: {}", e),
        }

        let events_dir = match &self.events_dir {
            Some(dir) => dir.clone(),
            None => config.events_dir()?,
        };

        match self.command {
            None | Some(Commands::Tui) => tui::run(
                config,
                RunOptions {
                    events_dir,
                    compact: self.compact.then_some(true),
                },
            ),
            Some(Commands::Month { year, month, json }) => {
                let today = Local::now().date_naive();
                let key = MonthKey::new(
                    year.unwrap_or(today.year()),
                    month.map_or(today.month0(), |m| m - 1) as i32,
                );
                let loaded = load_events(&config, events_dir)?;
                let layout = build_month_layout(&loaded.events, key, config.max_visible_events);
                if json {
                    println!("{}", serde_json::to_string_pretty(&layout)?);
                } else {
                    print!("{}", render_month_text(&layout, self.compact));
                }
                Ok(())
            }
            Some(Commands::Agenda { page, json }) => {
                let loaded = load_events(&config, events_dir)?;
                let agenda = Agenda::new(&loaded.events);
                let index = page as usize - 1;
                let page = agenda.page(index);
                if json {
                    println!("{}", serde_json::to_string_pretty(&page)?);
                } else {
                    print!("{}", render_agenda_text(&page, index));
                }
                Ok(())
            }
        }
    }

    /// Config file plus command-line overrides
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(budget) = self.budget {
            config.max_visible_events = budget;
        }
        Ok(config)
    }
}

fn load_events(config: &Config, events_dir: PathBuf) -> anyhow::Result<LoadedEvents> {
    let loaded = EventLoaderService::new(events_dir, config.color_overrides.clone()).load()?;
    for warning in &loaded.warnings {
        match warning {
            LoadWarning::LoadFailed(msg) | LoadWarning::Corrupted(msg) => {
                eprintln!("[gridcal] Warning: {}", msg)
            }
            LoadWarning::SkippedEvents(n) => {
                eprintln!("[gridcal] Warning: skipped {} event(s) with unreadable dates", n)
            }
        }
    }
    Ok(loaded)
}

/// Plain-text month: a day-number grid, then the visible slots of every
/// cell that has events
pub fn render_month_text(layout: &MonthLayout<'_>, compact: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", layout.key.label());
    let _ = writeln!(out, " Sun Mon Tue Wed Thu Fri Sat");
    for week in &layout.weeks {
        for cell in &week.cells {
            match cell {
                Some(cell) => {
                    let mark = if cell.has_events() { '*' } else { ' ' };
                    let _ = write!(out, " {:>2}{}", cell.date.day(), mark);
                }
                None => out.push_str("    "),
            }
        }
        out.push('\n');
    }

    for cell in layout.cells().filter(|cell| cell.has_events()) {
        let _ = write!(out, "\n{}", cell.date.format("%a %d"));
        if compact {
            let summary = cell.compact_summary();
            let _ = write!(out, "  {}", "●".repeat(summary.dots.len()));
            if summary.overflow > 0 {
                let _ = write!(out, " +{}", summary.overflow);
            }
            continue;
        }
        for slot in cell.slots() {
            let text = match slot {
                Slot::Gap => "-".to_string(),
                Slot::Bar(segment) if segment.labeled => format!("[{}]", segment.event.title),
                Slot::Bar(_) => "[...]".to_string(),
                Slot::AllDay(event) => format!("({})", event.title),
                Slot::Timed(event) => format!("{} {}", event.start.format("%H:%M"), event.title),
            };
            let _ = write!(out, "  {}", text);
        }
        if cell.budget.hidden > 0 {
            let _ = write!(out, "  +{} more", cell.budget.hidden);
        }
    }
    if layout.cells().any(|cell| cell.has_events()) {
        out.push('\n');
    }
    out
}

/// Plain-text agenda page
pub fn render_agenda_text(page: &AgendaPage<'_>, index: usize) -> String {
    let mut out = String::new();
    for day in &page.days {
        let _ = writeln!(out, "{}", day.date.format("%a %b %-d %Y"));
        for event in &day.events {
            let _ = writeln!(out, "  {:<26} {}", time_label(event), event.title);
        }
    }
    let pages = page.total.div_ceil(PAGE_SIZE).max(1);
    let _ = writeln!(out, "Page {} of {} ({} events)", index + 1, pages, page.total);
    out
}
