//! Puzzle post formatting.

use chrono::{TimeZone, Utc};
use puzzle_core::Puzzle;

/// Renders the fixed puzzle post: date line, title, solve link, board image.
/// The date comes from the puzzle's own publish time (UTC), M/D/YYYY.
pub fn format_puzzle_post(puzzle: &Puzzle) -> String {
    let date = match Utc.timestamp_opt(puzzle.publish_time, 0).single() {
        Some(ts) => ts.format("%-m/%-d/%Y").to_string(),
        None => "unknown date".to_string(),
    };

    format!(
        "### Daily Puzzle - {}\n\
         ##### {}\n\
         ##### [Solve On Chess.com :arrow_heading_up: ]({})\n\
         ![]({})",
        date, puzzle.title, puzzle.url, puzzle.image
    )
}
