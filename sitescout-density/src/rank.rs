//! Top-N ranking of non-empty cells.

use crate::score::ScoredCell;

/// Number of cells returned by [`top_tiles`] by default.
pub const TOP_TILE_LIMIT: usize = 5;

/// A ranked cell; `rank` starts at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct TopTile {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// The ranked cell.
    pub cell: ScoredCell,
}

/// Rank non-empty cells by count, busiest first, keeping at most `limit`.
///
/// Equal counts keep generation order.
#[must_use]
pub fn top_tiles(cells: &[ScoredCell], limit: usize) -> Vec<TopTile> {
    let mut ranked: Vec<&ScoredCell> = cells.iter().filter(|cell| cell.count > 0).collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.ordinal.cmp(&b.ordinal)));
    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, cell)| TopTile {
            rank: index + 1,
            cell: cell.clone(),
        })
        .collect()
}
