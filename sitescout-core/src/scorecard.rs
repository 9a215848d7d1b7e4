//! Nearest-target versus nearest-competitor location scoring.
//!
//! A candidate starts from [`BASE_SCORE`]. Exactly one rule fires, replacing
//! the base with a fixed score and recording the difference as an
//! [`Adjustment`].

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::place::{Origin, Place};

/// Score before any rule applies.
pub const BASE_SCORE: i32 = 50;
/// Upper bound of the score scale.
pub const SCORE_MAX: u8 = 100;
/// Distance gap, in metres, under which both sides count as equally close.
pub const EQUAL_DISTANCE_M: f64 = 100.0;

/// A place annotated with its distance from the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDistance {
    /// The place itself.
    #[serde(flatten)]
    pub place: Place,
    /// Haversine distance in metres.
    pub distance: f64,
}

/// Closest place on one side of the comparison.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NearestPlace {
    /// Distance in metres, `None` when nothing was found.
    pub distance: Option<f64>,
    /// The closest place, `None` when nothing was found.
    pub place: Option<PlaceDistance>,
}

/// One scoring rule that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Human-readable reason.
    pub label: String,
    /// Change relative to [`BASE_SCORE`].
    pub delta: i32,
}

/// Scorecard for a candidate location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationScore {
    /// Final score, clamped to `0..=SCORE_MAX`.
    pub score: u8,
    /// Always [`SCORE_MAX`].
    pub score_max: u8,
    /// Closest target.
    pub target_nearest: NearestPlace,
    /// Closest competitor.
    pub competitor_nearest: NearestPlace,
    /// Number of targets found.
    pub target_count: usize,
    /// Number of competitors found.
    pub competitor_count: usize,
    /// Rules that fired, in order.
    pub adjustments: Vec<Adjustment>,
}

/// Find the place closest to `origin`. Ties keep the earlier place.
#[must_use]
pub fn nearest_place(origin: Point, places: &[Place]) -> NearestPlace {
    let closest = places
        .iter()
        .map(|place| (place, Haversine.distance(origin, place.point())))
        .filter(|(_, distance)| distance.is_finite())
        .fold(None::<(&Place, f64)>, |best, candidate| match best {
            Some((_, best_distance)) if best_distance <= candidate.1 => best,
            _ => Some(candidate),
        });

    closest.map_or_else(NearestPlace::default, |(place, distance)| NearestPlace {
        distance: Some(distance),
        place: Some(PlaceDistance {
            place: place.clone(),
            distance,
        }),
    })
}

/// Score a candidate location from the places found around it.
///
/// # Examples
///
/// ```
/// use sitescout_core::{Origin, score_location};
///
/// let origin = Origin { latitude: 0.0, longitude: 0.0 };
/// let card = score_location(&origin, &[], &[]);
/// assert_eq!(card.score, 20);
/// assert_eq!(card.adjustments[0].delta, -30);
/// ```
#[must_use]
pub fn score_location(origin: &Origin, targets: &[Place], competitors: &[Place]) -> LocationScore {
    let centre = origin.point();
    let target_nearest = nearest_place(centre, targets);
    let competitor_nearest = nearest_place(centre, competitors);

    let (score, label) = match (target_nearest.distance, competitor_nearest.distance) {
        (None, _) => (20, "No target locations within search radius"),
        (Some(_), None) => (70, "Targets nearby with no competitors detected"),
        (Some(target), Some(competitor)) if (target - competitor).abs() <= EQUAL_DISTANCE_M => {
            (60, "Targets and competitors are equally close")
        }
        (Some(target), Some(competitor)) if competitor < target => {
            (40, "Competitors are closer than targets")
        }
        (Some(_), Some(_)) => (65, "Targets closer than competitors"),
    };

    let clamped = score.clamp(0, i32::from(SCORE_MAX));
    LocationScore {
        score: u8::try_from(clamped).unwrap_or(SCORE_MAX),
        score_max: SCORE_MAX,
        target_nearest,
        competitor_nearest,
        target_count: targets.len(),
        competitor_count: competitors.len(),
        adjustments: vec![Adjustment {
            label: label.to_owned(),
            delta: score - BASE_SCORE,
        }],
    }
}
