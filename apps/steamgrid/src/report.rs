//! Console transcript and end-of-run summary.

use std::fmt::Write;

use steamgrid_grid::{FailedGame, GameRef, ImageSource, PipelineEvent, RunSummary};

/// Transcript line for a pipeline event.
pub fn describe(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::ProfileStarted { profile, games } => {
            format!("Loading games for {profile} ({games} games)")
        }
        PipelineEvent::ExistingLoaded { found } => {
            format!("Loading existing images and backups... {found} found")
        }
        PipelineEvent::StagingCreated { path } => {
            format!("Creating new grid in {}...", path.display())
        }
        PipelineEvent::GameResolved {
            game,
            index,
            total,
            source,
        } => {
            let found = match source {
                None => "not found".to_string(),
                Some(ImageSource::Local(path)) => format!("found in {}", path.display()),
                Some(source) => format!("found from {source}"),
            };
            format!("Processing {} ({index}/{total}) {found}", game.name)
        }
        PipelineEvent::OverlayFailed { game, error } => {
            format!("Failed to apply overlay to {} because: {error}", game.name)
        }
        PipelineEvent::WriteFailed { game, error } => {
            format!("Failed to write image for {} because: {error}", game.name)
        }
        PipelineEvent::GridReplaced { path } => {
            format!("Moved new grid to {}", path.display())
        }
    }
}

/// Renders the summary printed after all profiles are done.
pub fn render(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "\n\n{} images downloaded and {} overlays applied.\n\n",
        summary.downloaded, summary.overlays_applied
    );

    games_section(
        &mut out,
        &summary.searched,
        "images were found with a search and may not be accurate",
        '*',
    );
    games_section(
        &mut out,
        &summary.not_found,
        "images could not be found anywhere",
        '-',
    );
    failures_section(
        &mut out,
        &summary.overlay_failed,
        "images were found but had errors and could not be overlaid",
    );
    failures_section(
        &mut out,
        &summary.write_failed,
        "images could not be written",
    );
    out.push_str("Open Steam in grid view to see the results!\n\n");
    out
}

fn games_section(out: &mut String, games: &[GameRef], title: &str, bullet: char) {
    if games.is_empty() {
        return;
    }
    let _ = writeln!(out, "{} {title}:", games.len());
    for game in games {
        let _ = writeln!(out, "{bullet} {} (steam id {})", game.name, game.id);
    }
    out.push_str("\n\n");
}

fn failures_section(out: &mut String, failed: &[FailedGame], title: &str) {
    if failed.is_empty() {
        return;
    }
    let _ = writeln!(out, "{} {title}:", failed.len());
    for entry in failed {
        let _ = writeln!(
            out,
            "- {} (steam id {}) ({})",
            entry.game.name, entry.game.id, entry.error
        );
    }
    out.push_str("\n\n");
}
