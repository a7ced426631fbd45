use crate::app::{track_error, App};
use crate::output::Output;
use cineo_core::{Committed, Session};
use cineo_models::{ContentId, MediaKind, WatchStatus};
use color_eyre::Result;

/// Wait for the durable write before the process exits. Failures were
/// already logged by the gateway and the local change stands.
async fn finish(session: &Session, committed: &Committed, output: &Output) {
    output.committed(committed);
    session.flush().await;
}

/// TMDB numbers films and series separately, so a bare id may name either
pub fn unconfirmed_kind_warning(id: ContentId) -> String {
    format!(
        "{} was taken as a film; a series may share this id. Pass `--kind series` if that is the one you meant",
        id
    )
}

pub async fn run_status(
    app: &App,
    id: ContentId,
    status: WatchStatus,
    kind: Option<MediaKind>,
    output: &Output,
) -> Result<()> {
    let mut session = app.restored_session().await?;
    let committed = session.set_status_by_id(id, kind, status).await.map_err(track_error)?;
    if session.resolver().is_unconfirmed(id) {
        output.warn(unconfirmed_kind_warning(id));
    }
    finish(&session, &committed, output).await;
    Ok(())
}

pub async fn run_episode(app: &App, id: ContentId, season: u32, episode: u32, output: &Output) -> Result<()> {
    let mut session = app.restored_session().await?;
    let committed = session
        .toggle_episode_by_id(id, season, episode)
        .await
        .map_err(track_error)?;
    if committed.item.watched_episodes.contains(season, episode) {
        output.info(format!("S{} E{} marked as watched", season, episode));
    } else {
        output.info(format!("S{} E{} unmarked", season, episode));
    }
    finish(&session, &committed, output).await;
    Ok(())
}

pub async fn run_season(app: &App, id: ContentId, season: u32, output: &Output) -> Result<()> {
    let mut session = app.restored_session().await?;
    let committed = session
        .toggle_full_season_by_id(id, season)
        .await
        .map_err(track_error)?;
    let count = committed.item.watched_episodes.season_len(season);
    if count == 0 {
        output.info(format!("Season {} cleared", season));
    } else {
        output.info(format!("Season {}: all {} episodes marked as watched", season, count));
    }
    finish(&session, &committed, output).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfirmed_kind_warning_names_the_flag() {
        let warning = unconfirmed_kind_warning(1399);
        assert!(warning.starts_with("1399 "));
        assert!(warning.contains("--kind series"));
    }
}
