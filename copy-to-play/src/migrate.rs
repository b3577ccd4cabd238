//! The build -> play copy pass.

use puzzle::{PlayPuzzle, PuzzleId};
use tracing::{debug, info, warn};

use crate::persistence::{PersistenceError, PlayRepository, SourceEntry, SourceRepository};

/// Outcome of one copy pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Build puzzles read from the source collection.
    pub scanned: u64,
    pub copied: u64,
    /// Rejected by review or too short to play.
    pub ineligible: u64,
    /// Stored documents that do not decode as a build puzzle.
    pub malformed: u64,
    /// Already present in the play collection.
    pub duplicates: u64,
    /// Any other insert failure.
    pub failed: u64,
}

/// Copy every eligible build puzzle into the play collection.
///
/// Each insert is its own failure boundary: a rejected insert (duplicate id
/// or otherwise) is counted and skipped, never retried. A build document that
/// does not decode is skipped the same way. Only failing to query the source
/// collection aborts the pass.
pub async fn copy_to_play<S, P>(
    source: &S,
    play: &P,
    page_size: u32,
) -> Result<CopyReport, PersistenceError>
where
    S: SourceRepository,
    P: PlayRepository,
{
    info!(page_size, "Starting copy to play collection");

    let mut report = CopyReport::default();
    let mut cursor: Option<PuzzleId> = None;

    loop {
        let page = source.eligible_page(cursor.as_ref(), page_size).await?;
        let Some(last) = page.last() else {
            break;
        };
        cursor = Some(last.id().clone());

        for entry in &page {
            report.scanned += 1;
            let puzzle = match entry {
                SourceEntry::Puzzle(puzzle) => puzzle,
                SourceEntry::Malformed { id, reason } => {
                    warn!(%id, %reason, "Skipping malformed build puzzle");
                    report.malformed += 1;
                    continue;
                }
            };
            if !puzzle.is_eligible() {
                report.ineligible += 1;
                continue;
            }

            match play.insert_puzzle(&PlayPuzzle::from_source(puzzle)).await {
                Ok(()) => report.copied += 1,
                Err(PersistenceError::Duplicate(id)) => {
                    debug!(%id, "Puzzle already in play collection");
                    report.duplicates += 1;
                }
                Err(e) => {
                    debug!(id = %puzzle.id, error = %e, "Skipping puzzle after failed insert");
                    report.failed += 1;
                }
            }
        }
    }

    info!(
        scanned = report.scanned,
        copied = report.copied,
        ineligible = report.ineligible,
        malformed = report.malformed,
        duplicates = report.duplicates,
        failed = report.failed,
        "Copy to play collection completed"
    );

    Ok(report)
}
