//! Per-profile orchestration of the grid stages.
//!
//! Runs load → acquire → overlay → publish for every game of a profile,
//! then swaps the staging directory in. Progress is reported through
//! [`PipelineEvent`]s; nothing here prints.

use std::path::PathBuf;

use futures_util::StreamExt;
use futures_util::stream;
use steamgrid_artwork::ImageProvider;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::acquire::download_image;
use crate::compositor::{DEFAULT_JPEG_QUALITY, apply_overlay};
use crate::error::GridError;
use crate::existing::load_existing;
use crate::game::{Game, GameRecord, ImageSource, StageOutcome, UserProfile};
use crate::overlays::OverlayCatalog;
use crate::publisher::{
    backup_game, prepare_staging, publish_game, recover_interrupted_swap, replace_grid,
};
use crate::source::GameSource;

/// Pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// User-pinned images, `<id>.<ext>`.
    pub overrides_dir: PathBuf,
    pub jpeg_quality: u8,
    /// Maximum number of provider lookups in flight.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            overrides_dir: PathBuf::from("games"),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            concurrency: 1,
        }
    }
}

/// Identity of a game in events and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRef {
    pub id: String,
    /// Display name, falling back to the ID.
    pub name: String,
}

impl From<&Game> for GameRef {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.clone(),
            name: game.display_name(),
        }
    }
}

/// A game that hit a recoverable error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedGame {
    pub game: GameRef,
    pub error: String,
}

/// Progress events emitted while a profile is processed.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    ProfileStarted { profile: String, games: usize },
    /// Existing images were recovered for `found` games.
    ExistingLoaded { found: usize },
    StagingCreated { path: PathBuf },
    /// A game was resolved; `source` is `None` when no image was found.
    GameResolved {
        game: GameRef,
        index: usize,
        total: usize,
        source: Option<ImageSource>,
    },
    OverlayFailed { game: GameRef, error: String },
    WriteFailed { game: GameRef, error: String },
    GridReplaced { path: PathBuf },
}

/// Totals across all processed profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub overlays_applied: usize,
    /// Found through a name search; may not be accurate.
    pub searched: Vec<GameRef>,
    pub not_found: Vec<GameRef>,
    pub overlay_failed: Vec<FailedGame>,
    pub write_failed: Vec<FailedGame>,
}

/// Republishes grid directories.
pub struct Pipeline<'a> {
    config: PipelineConfig,
    provider: &'a dyn ImageProvider,
    overlays: &'a OverlayCatalog,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: PipelineConfig,
        provider: &'a dyn ImageProvider,
        overlays: &'a OverlayCatalog,
    ) -> Self {
        Self {
            config,
            provider,
            overlays,
        }
    }

    /// Processes every profile of `source`, one after another.
    pub async fn run(
        &self,
        source: &dyn GameSource,
        events: &mpsc::Sender<PipelineEvent>,
    ) -> Result<RunSummary, GridError> {
        let profiles = source.profiles()?;
        if profiles.is_empty() {
            return Err(GridError::NoProfiles);
        }

        let mut summary = RunSummary::default();
        for profile in &profiles {
            let games = source.games(profile)?;
            self.run_profile(profile, games, events, &mut summary).await?;
        }
        Ok(summary)
    }

    /// Rebuilds and swaps the grid of one profile.
    ///
    /// Returns on the first fatal error; the live grid is then untouched.
    pub async fn run_profile(
        &self,
        profile: &UserProfile,
        records: Vec<GameRecord>,
        events: &mpsc::Sender<PipelineEvent>,
        summary: &mut RunSummary,
    ) -> Result<(), GridError> {
        let grid_dir = &profile.grid_dir;
        let total = records.len();
        let _ = events
            .send(PipelineEvent::ProfileStarted {
                profile: profile.name.clone(),
                games: total,
            })
            .await;

        recover_interrupted_swap(grid_dir)?;

        let mut found = 0;
        let games: Vec<Game> = records
            .into_iter()
            .map(Game::from)
            .map(
                |game| match load_existing(&self.config.overrides_dir, grid_dir, &game) {
                    StageOutcome::Updated(loaded) => {
                        found += 1;
                        loaded
                    }
                    _ => game,
                },
            )
            .collect();
        let _ = events.send(PipelineEvent::ExistingLoaded { found }).await;

        let staging = prepare_staging(grid_dir)?;
        let _ = events
            .send(PipelineEvent::StagingCreated {
                path: staging.clone(),
            })
            .await;

        let provider = self.provider;
        let mut acquired = stream::iter(games.into_iter().map(|game| async move {
            let outcome = download_image(provider, &game).await;
            (game, outcome)
        }))
        .buffered(self.config.concurrency.max(1));

        let mut index = 0;
        while let Some((game, outcome)) = acquired.next().await {
            index += 1;
            let game = match outcome {
                StageOutcome::Updated(game) => game,
                StageOutcome::Unchanged => game,
                // Acquisition only fails on transport or format errors.
                StageOutcome::Failed(e) => return Err(e),
            };

            let source = game.image.as_ref().map(|image| image.source.clone());
            let _ = events
                .send(PipelineEvent::GameResolved {
                    game: GameRef::from(&game),
                    index,
                    total,
                    source: source.clone(),
                })
                .await;

            match source {
                None => {
                    debug!(game = %game.id, "no image found");
                    summary.not_found.push(GameRef::from(&game));
                    continue;
                }
                Some(ImageSource::Official) => summary.downloaded += 1,
                Some(ImageSource::Search) => {
                    summary.downloaded += 1;
                    summary.searched.push(GameRef::from(&game));
                }
                Some(ImageSource::Local(_)) => {}
            }

            let game = match apply_overlay(&game, self.overlays, self.config.jpeg_quality) {
                StageOutcome::Updated(overlaid) => {
                    summary.overlays_applied += 1;
                    overlaid
                }
                StageOutcome::Unchanged => game,
                StageOutcome::Failed(e) => {
                    let failed = record_failure(&game, e)?;
                    let _ = events
                        .send(PipelineEvent::OverlayFailed {
                            game: failed.game.clone(),
                            error: failed.error.clone(),
                        })
                        .await;
                    summary.overlay_failed.push(failed);
                    game
                }
            };

            // A game without a clean backup must not be published, or the
            // next run would take the overlaid image for a clean one.
            let written = backup_game(&staging, &game).and_then(|()| publish_game(&staging, &game));
            if let Err(e) = written {
                let failed = record_failure(&game, e)?;
                let _ = events
                    .send(PipelineEvent::WriteFailed {
                        game: failed.game.clone(),
                        error: failed.error.clone(),
                    })
                    .await;
                summary.write_failed.push(failed);
            }
        }
        drop(acquired);

        replace_grid(&staging, grid_dir)?;
        let _ = events
            .send(PipelineEvent::GridReplaced {
                path: grid_dir.clone(),
            })
            .await;
        Ok(())
    }
}

/// Turns a recoverable error into a summary entry; fatal errors pass through.
fn record_failure(game: &Game, error: GridError) -> Result<FailedGame, GridError> {
    if error.is_fatal() {
        return Err(error);
    }
    warn!(game = %game.id, error = %error, "game failed");
    Ok(FailedGame {
        game: GameRef::from(game),
        error: error.to_string(),
    })
}
