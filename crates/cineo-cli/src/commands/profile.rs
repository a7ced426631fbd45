use crate::app::{track_error, App};
use crate::output::Output;
use cineo_core::{profile_stats, WatchHistoryStore};
use cineo_models::{ContentId, WatchHistoryItem, WatchStatus};
use color_eyre::Result;

pub async fn run_profile(app: &App, output: &Output) -> Result<()> {
    let history = WatchHistoryStore::new(app.require_user().await?);
    let stats = profile_stats(&history);
    output.stats(&history.user().username, &stats);
    Ok(())
}

pub async fn run_history(app: &App, status: Option<WatchStatus>, output: &Output) -> Result<()> {
    let history = WatchHistoryStore::new(app.require_user().await?);
    let entries: Vec<(ContentId, &WatchHistoryItem)> = match status {
        Some(status) => history.with_status(status),
        None => {
            let mut all: Vec<_> = history
                .iter()
                .filter(|(_, item)| item.status != WatchStatus::None)
                .collect();
            all.sort_by(|a, b| b.1.added_at.cmp(&a.1.added_at));
            all
        }
    };
    output.history(&entries);
    Ok(())
}

pub async fn run_avatar(app: &App, url: Option<String>, output: &Output) -> Result<()> {
    let mut session = app.restored_session().await?;
    let cleared = url.is_none();
    let ticket = session.update_avatar(url).map_err(track_error)?;
    if ticket.wait().await {
        output.success(if cleared { "Avatar reset" } else { "Avatar updated" });
    } else {
        output.warn("Avatar changed for this session only");
    }
    Ok(())
}
