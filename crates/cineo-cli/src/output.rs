use clap::ValueEnum;
use cineo_core::{Committed, ProfileStats};
use cineo_models::{genre_name, ContentId, ContentSummary, KindEvidence, WatchHistoryItem, WatchStatus};
use comfy_table::{presets, modifiers, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "success", "message": msg.as_ref() })),
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "error", "message": msg.as_ref() })),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.print_json(&json!({ "type": "info", "message": msg.as_ref() })),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "warning", "message": msg.as_ref() })),
        }
    }

    /// Structured data; in human mode callers print a table instead
    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && !self.is_human() {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
            _ => println!("{}", serde_json::to_string(data).unwrap_or_default()),
        }
    }

    pub fn table(&self, table: &Table) {
        if !self.quiet {
            println!("{}", table);
        }
    }

    pub fn listing(&self, summaries: &[ContentSummary]) {
        if !self.is_human() {
            self.json(&json!(summaries));
            return;
        }
        if summaries.is_empty() {
            self.info("Nothing found");
            return;
        }
        let mut table = new_table(&["ID", "Title", "Kind", "Date", "Rating", "Genres"]);
        for s in summaries {
            let kind = match s.kind {
                Some(KindEvidence::Tagged(kind)) => kind.to_string(),
                Some(KindEvidence::Shape(kind)) => format!("{}?", kind),
                None => "-".to_string(),
            };
            table.add_row(vec![
                Cell::new(s.id),
                Cell::new(&s.title).add_attribute(Attribute::Bold),
                Cell::new(kind),
                Cell::new(s.date.as_deref().unwrap_or("-")),
                Cell::new(format!("{:.1}", s.vote_average)),
                Cell::new(genre_list(&s.genre_ids)),
            ]);
        }
        self.table(&table);
    }

    pub fn history(&self, entries: &[(ContentId, &WatchHistoryItem)]) {
        if !self.is_human() {
            let items: Vec<_> = entries
                .iter()
                .map(|(id, item)| json!({ "id": id, "item": item }))
                .collect();
            self.json(&json!(items));
            return;
        }
        if entries.is_empty() {
            self.info("No titles here yet");
            return;
        }
        let mut table = new_table(&["ID", "Title", "Kind", "Status", "Position", "Episodes", "Added"]);
        for (id, item) in entries {
            table.add_row(vec![
                Cell::new(id),
                Cell::new(&item.title).add_attribute(Attribute::Bold),
                Cell::new(item.media_kind),
                status_cell(item.status),
                Cell::new(item.position_label().unwrap_or_else(|| "-".to_string())),
                Cell::new(item.watched_episodes.total()),
                Cell::new(item.added_at.format("%Y-%m-%d")),
            ]);
        }
        self.table(&table);
    }

    pub fn stats(&self, username: &str, stats: &ProfileStats) {
        if !self.is_human() {
            self.json(&json!({ "username": username, "stats": stats }));
            return;
        }
        let mut table = new_table(&[username, ""]);
        table.add_row(vec![Cell::new("Watched"), Cell::new(stats.watched).fg(Color::Green)]);
        table.add_row(vec![Cell::new("Watching"), Cell::new(stats.watching).fg(Color::Cyan)]);
        table.add_row(vec![Cell::new("Planned"), Cell::new(stats.planned).fg(Color::Yellow)]);
        table.add_row(vec![Cell::new("Episodes watched"), Cell::new(stats.episodes_watched)]);
        table.add_row(vec![Cell::new("Film hours"), Cell::new(format!("{:.1}", stats.film_minutes as f64 / 60.0))]);
        self.table(&table);

        if !stats.genres.is_empty() {
            let mut genres = new_table(&["Genre", "Watched"]);
            for genre in &stats.genres {
                genres.add_row(vec![Cell::new(&genre.name), Cell::new(genre.count)]);
            }
            self.table(&genres);
        }
    }

    pub fn committed(&self, committed: &Committed) {
        let item = &committed.item;
        if !self.is_human() {
            self.json(&json!({ "type": "committed", "id": committed.content_id, "item": item }));
            return;
        }
        let position = item
            .position_label()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        self.success(format!("{}: {}{}", item.title, item.status, position));
    }
}

pub fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn status_cell(status: WatchStatus) -> Cell {
    let cell = Cell::new(status);
    match status {
        WatchStatus::Watched => cell.fg(Color::Green),
        WatchStatus::Watching => cell.fg(Color::Cyan),
        WatchStatus::Planned => cell.fg(Color::Yellow),
        WatchStatus::None => cell,
    }
}

pub fn genre_list(ids: &[u32]) -> String {
    ids.iter().map(|id| genre_name(*id)).collect::<Vec<_>>().join(", ")
}
