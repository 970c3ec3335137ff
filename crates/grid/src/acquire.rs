//! Image acquisition for games without a local image.

use steamgrid_artwork::{FetchedImage, ImageKind, ImageProvider};

use crate::error::GridError;
use crate::game::{Game, GameImage, ImageSource, StageOutcome};

/// Asks `provider` for an image: exact ID lookup first, then a name search.
///
/// Returns `Unchanged` when the game already has an image or neither
/// lookup finds one.
pub async fn download_image(provider: &dyn ImageProvider, game: &Game) -> StageOutcome {
    if game.image.is_some() {
        return StageOutcome::Unchanged;
    }

    let official = match provider.official(&game.id).await {
        Ok(found) => found,
        Err(source) => return transport(game, source),
    };
    if let Some(fetched) = official {
        return resolved(game, fetched, ImageSource::Official);
    }

    let Some(name) = game.name.as_deref() else {
        tracing::debug!(game = %game.id, "no official image and no name to search");
        return StageOutcome::Unchanged;
    };
    match provider.search(name).await {
        Ok(Some(fetched)) => resolved(game, fetched, ImageSource::Search),
        Ok(None) => StageOutcome::Unchanged,
        Err(source) => transport(game, source),
    }
}

fn resolved(game: &Game, fetched: FetchedImage, source: ImageSource) -> StageOutcome {
    let Some(kind) = ImageKind::detect(&fetched.bytes, fetched.content_type.as_deref()) else {
        return StageOutcome::Failed(GridError::UnknownImageFormat {
            game_id: game.id.clone(),
        });
    };
    tracing::debug!(game = %game.id, %source, %kind, url = %fetched.url, "downloaded image");
    StageOutcome::Updated(game.with_image(GameImage {
        bytes: fetched.bytes,
        kind,
        source,
    }))
}

fn transport(game: &Game, source: steamgrid_artwork::Error) -> StageOutcome {
    StageOutcome::Failed(GridError::Transport {
        game_id: game.id.clone(),
        source,
    })
}
