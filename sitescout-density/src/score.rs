//! Normalise cell counts onto a 0–100 scale.

use geo::MultiPolygon;

use crate::aggregate::Aggregation;
use crate::hexgrid::cell_label;

/// Highest score a cell can receive.
pub const MAX_SCORE: u8 = 100;

/// Score for `count` relative to `max_count`.
///
/// Returns 0 whenever `max_count` is 0, and [`MAX_SCORE`] for the busiest
/// cells.
///
/// # Examples
///
/// ```
/// use sitescout_density::normalise_score;
///
/// assert_eq!(normalise_score(3, 4), 75);
/// assert_eq!(normalise_score(1, 3), 33);
/// assert_eq!(normalise_score(0, 0), 0);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "counts stay far below 2^52 and the rounded ratio fits in u8"
)]
pub fn normalise_score(count: usize, max_count: usize) -> u8 {
    if max_count == 0 {
        return 0;
    }
    let ratio = count.min(max_count) as f64 / max_count as f64;
    (ratio * f64::from(MAX_SCORE)).round() as u8
}

/// A counted cell with its normalised score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCell {
    /// Zero-based position in generation order.
    pub ordinal: usize,
    /// Public `H<n>` label.
    pub label: String,
    /// Places assigned to the cell.
    pub count: usize,
    /// Normalised score, `0..=MAX_SCORE`.
    pub score: u8,
    /// Cell geometry.
    pub geometry: MultiPolygon,
}

/// Second pass over an [`Aggregation`], attaching scores.
#[must_use]
pub fn score_cells(aggregation: Aggregation) -> Vec<ScoredCell> {
    let max_count = aggregation.max_count;
    aggregation
        .cells
        .into_iter()
        .map(|counted| ScoredCell {
            ordinal: counted.cell.ordinal,
            label: cell_label(counted.cell.ordinal),
            count: counted.count,
            score: normalise_score(counted.count, max_count),
            geometry: counted.cell.geometry,
        })
        .collect()
}
