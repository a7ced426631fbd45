use super::track::unconfirmed_kind_warning;
use crate::app::{track_error, App};
use crate::output::{genre_list, new_table, status_cell, Output};
use cineo_core::{DebouncedSearch, SearchUpdate};
use cineo_models::{ContentDetails, ContentId, MediaKind, PersonId, WatchHistoryItem};
use cineo_sources::ImageSize;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub async fn run_trending(app: &App, output: &Output) -> Result<()> {
    app.provider()?;
    let mut session = app.session()?;
    let listing = session.trending().await.map_err(track_error)?;
    output.listing(&listing);
    Ok(())
}

pub async fn run_search(app: &App, query: &str, output: &Output) -> Result<()> {
    app.provider()?;
    if query.trim().chars().count() < app.config.search.min_query_len {
        output.warn(format!(
            "Type at least {} characters to search",
            app.config.search.min_query_len
        ));
        return Ok(());
    }
    let mut session = app.session()?;
    let results = session.search(query.trim()).await.map_err(track_error)?;
    output.listing(&results);
    Ok(())
}

/// Rows of cast and recommendations printed by `show`
const SHOW_CAST: usize = 15;
const SHOW_RECOMMENDATIONS: usize = 15;

/// Search-as-you-type over stdin: every line is the current contents of the
/// search box. Results of queries overtaken by a newer line are dropped.
pub async fn run_interactive_search(app: &App, output: &Output) -> Result<()> {
    let search = DebouncedSearch::new(app.provider()?, &app.config.search);
    let lang = app.lang;
    output.info("Type a query per line, Ctrl-D to finish");

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    tokio::task::spawn_blocking(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut pending = FuturesUnordered::new();
    let query = |text: String| {
        let search = search.clone();
        async move {
            let update = search.query(&text, lang).await;
            (text, update)
        }
    };

    loop {
        tokio::select! {
            line = rx.recv() => match line {
                Some(text) => pending.push(query(text)),
                None => break,
            },
            Some((text, update)) = pending.next(), if !pending.is_empty() => {
                render_update(&text, update, output);
            }
        }
    }
    while let Some((text, update)) = pending.next().await {
        render_update(&text, update, output);
    }
    Ok(())
}

fn render_update(text: &str, update: Result<SearchUpdate, cineo_sources::SourceError>, output: &Output) {
    match update {
        Ok(SearchUpdate::Results(results)) => {
            output.info(format!("Results for {:?}", text));
            output.listing(&results);
        }
        Ok(SearchUpdate::Cleared) => output.info("(cleared)"),
        Ok(SearchUpdate::Superseded) => debug!("Dropped results for {:?}", text),
        Err(e) => output.error(format!("Search for {:?} failed: {}", text, e)),
    }
}

pub async fn run_show(app: &App, id: ContentId, kind: Option<MediaKind>, episodes: bool, output: &Output) -> Result<()> {
    app.provider()?;
    let mut session = app.restored_session().await?;
    let details = session.details(id, kind).await.map_err(track_error)?;
    let record = session.history().and_then(|h| h.get(id)).cloned();
    let unconfirmed = session.resolver().is_unconfirmed(id);

    if !output.is_human() {
        output.json(&json!({ "details": details, "record": record, "kind_unconfirmed": unconfirmed }));
        return Ok(());
    }

    if unconfirmed {
        output.warn(unconfirmed_kind_warning(id));
    }
    print_header(app, &details, record.as_ref());
    print_cast(&details, output);
    if !details.recommendations().is_empty() {
        output.info(format!("{}", "Recommended".bold()));
        let shown = details.recommendations().len().min(SHOW_RECOMMENDATIONS);
        output.listing(&details.recommendations()[..shown]);
    }

    let Some(series) = details.as_series() else {
        return Ok(());
    };

    let mut seasons = new_table(&["Season", "Episodes", "Watched", "Aired"]);
    for season in series.regular_seasons() {
        let watched = record
            .as_ref()
            .map_or(0, |r| r.watched_episodes.season_len(season.season_number));
        let complete = record
            .as_ref()
            .is_some_and(|r| r.watched_episodes.is_season_complete(season.season_number, season.episode_count));
        let cell = Cell::new(format!("{}/{}", watched, season.episode_count));
        seasons.add_row(vec![
            Cell::new(&season.name),
            Cell::new(season.episode_count),
            if complete { cell.fg(Color::Green) } else { cell },
            Cell::new(season.air_date.as_deref().unwrap_or("-")),
        ]);
    }
    output.table(&seasons);

    if episodes {
        let provider = session.resolver().provider().clone();
        let lang = app.lang;
        let numbers: Vec<u32> = series.regular_seasons().map(|s| s.season_number).collect();
        let loaded = join_all(numbers.iter().map(|n| provider.season_details(id, *n, lang))).await;

        for (number, season) in numbers.iter().zip(loaded) {
            let season = match season {
                Ok(season) => season,
                Err(e) => {
                    warn!("Could not load season {} of {}: {}", number, id, e);
                    output.warn(format!("Season {} unavailable", number));
                    continue;
                }
            };
            let mut table = new_table(&["", "Episode", "Title", "Aired"]);
            for episode in &season.episodes {
                let seen = record
                    .as_ref()
                    .is_some_and(|r| r.watched_episodes.contains(*number, episode.episode_number));
                table.add_row(vec![
                    if seen { Cell::new("✓").fg(Color::Green) } else { Cell::new("") },
                    Cell::new(format!("S{} E{}", number, episode.episode_number)),
                    Cell::new(&episode.name),
                    Cell::new(episode.air_date.as_deref().unwrap_or("-")),
                ]);
            }
            output.info(format!("\n{}", season.name.bold()));
            output.table(&table);
        }
    }
    Ok(())
}

pub async fn run_credits(app: &App, person_id: PersonId, output: &Output) -> Result<()> {
    app.provider()?;
    let mut session = app.session()?;
    let credits = session.person_credits(person_id).await.map_err(track_error)?;
    output.listing(&credits);
    Ok(())
}

fn print_cast(details: &ContentDetails, output: &Output) {
    let cast = details.cast();
    if cast.is_empty() {
        return;
    }
    let mut table = new_table(&["Person", "Name", "Character"]);
    for member in cast.iter().take(SHOW_CAST) {
        table.add_row(vec![
            Cell::new(member.id),
            Cell::new(&member.name).add_attribute(Attribute::Bold),
            Cell::new(&member.character),
        ]);
    }
    output.info(format!("{}", "Cast".bold()));
    output.table(&table);
}

fn print_header(app: &App, details: &ContentDetails, record: Option<&WatchHistoryItem>) {
    let (date, runtime, genres) = match details {
        ContentDetails::Film(film) => (
            film.release_date.clone(),
            film.runtime.map(|m| format!("{} min", m)),
            film.genres.iter().map(|g| g.id).collect::<Vec<_>>(),
        ),
        ContentDetails::Series(series) => (
            series.first_air_date.clone(),
            series.number_of_seasons.map(|n| format!("{} seasons", n)),
            series.genres.iter().map(|g| g.id).collect::<Vec<_>>(),
        ),
    };
    let poster = match details {
        ContentDetails::Film(film) => film.poster_path.as_deref(),
        ContentDetails::Series(series) => series.poster_path.as_deref(),
    };

    println!("\n{} ({})", details.title().bright_cyan().bold(), details.kind());
    let mut table = new_table(&["", ""]);
    table.add_row(vec![Cell::new("ID"), Cell::new(details.id())]);
    table.add_row(vec![Cell::new("Date"), Cell::new(date.as_deref().unwrap_or("-"))]);
    if let Some(runtime) = runtime {
        table.add_row(vec![Cell::new("Length"), Cell::new(runtime)]);
    }
    table.add_row(vec![Cell::new("Genres"), Cell::new(genre_list(&genres))]);
    table.add_row(vec![
        Cell::new("Poster"),
        Cell::new(app.image_client().image_url(poster, ImageSize::W500)),
    ]);
    if let Some(trailer) = details.trailer() {
        table.add_row(vec![Cell::new("Trailer"), Cell::new(trailer.url())]);
    }
    match record {
        Some(item) => {
            table.add_row(vec![Cell::new("Status").add_attribute(Attribute::Bold), status_cell(item.status)]);
            if let Some(position) = item.position_label() {
                table.add_row(vec![Cell::new("Last touched"), Cell::new(position)]);
            }
        }
        None => {
            table.add_row(vec![Cell::new("Status"), Cell::new("not tracked")]);
        }
    }
    println!("{}", table);
    if !details.overview().is_empty() {
        println!("{}\n", details.overview());
    }
}
