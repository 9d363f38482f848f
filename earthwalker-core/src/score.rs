//! Distance-decay scoring of guesses.
//!
//! A guess earns [`MAX_SCORE`] inside the grace distance and decays
//! exponentially beyond it. The half-life of the decay is [`HALF_DISTANCE`]
//! scaled by the square root of the play area relative to the whole Earth,
//! so small maps punish distance harder than world maps.
//!
//! Scoring is pure and synchronous; every function here may be called from
//! any number of threads.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::GeoPoint;

/// Highest score a single guess can earn.
pub const MAX_SCORE: u32 = 5000;

/// Surface area of the Earth in square metres.
pub const EARTH_AREA: f64 = 510_066_000_000_000.0;

/// Precomputed square root of [`EARTH_AREA`].
pub const EARTH_AREA_SQRT: f64 = 22_584_640.0;

/// Factor the score is divided by every half-distance.
pub const DECAY_BASE: f64 = 2.0;

/// Distance in metres over which the score halves on a whole-Earth map.
pub const HALF_DISTANCE: f64 = 1_000_000.0;

/// Which side of a guess/actual pair a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRole {
    /// The player's guess.
    Guess,
    /// The true location of the round.
    Actual,
}

impl fmt::Display for PointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guess => f.write_str("guess"),
            Self::Actual => f.write_str("actual"),
        }
    }
}

/// Contract violations detected while scoring.
///
/// An out-of-range guess latitude is not an error; it scores zero.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScoreError {
    /// A coordinate was NaN or infinite.
    #[error("{role} coordinate {point} is not finite")]
    NonFiniteCoordinate {
        /// Side of the pair carrying the bad coordinate.
        role: PointRole,
        /// The offending point.
        point: GeoPoint,
    },
    /// The grace distance was negative, NaN or infinite.
    #[error("grace distance {value} must be a finite, non-negative number of metres")]
    InvalidGraceDistance {
        /// Rejected grace distance.
        value: f64,
    },
    /// The play area was negative, NaN or infinite.
    #[error("play area {value} must be a finite, non-negative number of square metres")]
    InvalidArea {
        /// Rejected area.
        value: f64,
    },
    /// Fewer actual locations than guesses were supplied.
    #[error("{guesses} guesses were supplied but only {actuals} actual locations")]
    MissingActual {
        /// Number of guesses.
        guesses: usize,
        /// Number of actual locations.
        actuals: usize,
    },
}

/// Area used to normalise the decay rate.
///
/// An area of zero means the map has no constraint region and is treated as
/// the whole Earth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea(f64);

impl PlayArea {
    /// The whole surface of the Earth.
    pub const EARTH: Self = Self(EARTH_AREA);

    /// Validate an area in square metres.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidArea`] for negative or non-finite input.
    ///
    /// # Examples
    ///
    /// ```
    /// use earthwalker_core::{EARTH_AREA, PlayArea};
    ///
    /// let unconstrained = PlayArea::new(0.0)?;
    /// assert_eq!(unconstrained.square_metres(), EARTH_AREA);
    /// # Ok::<(), earthwalker_core::ScoreError>(())
    /// ```
    pub fn new(square_metres: f64) -> Result<Self, ScoreError> {
        if !square_metres.is_finite() || square_metres < 0.0 {
            return Err(ScoreError::InvalidArea {
                value: square_metres,
            });
        }
        if square_metres > 0.0 {
            Ok(Self(square_metres))
        } else {
            Ok(Self::EARTH)
        }
    }

    /// Area in square metres.
    #[must_use]
    pub const fn square_metres(self) -> f64 {
        self.0
    }

    /// Square root of the area relative to the Earth's.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "relative scale divides square roots of areas"
    )]
    pub fn relative_scale(self) -> f64 {
        self.0.sqrt() / EARTH_AREA_SQRT
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::EARTH
    }
}

/// Outcome of scoring one guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Points awarded, within `0..=MAX_SCORE`.
    pub score: u32,
    /// Great-circle distance between guess and actual in metres.
    ///
    /// `None` when the guess was invalid and no distance was computed.
    pub distance_metres: Option<f64>,
}

impl ScoreResult {
    /// Result for a guess whose latitude lies outside `[-90, 90]`.
    pub const INVALID_GUESS: Self = Self {
        score: 0,
        distance_metres: None,
    };
}

/// Parameters shared by every round of a map.
///
/// # Examples
///
/// ```
/// use earthwalker_core::{GeoPoint, MAX_SCORE, ScoringParams};
///
/// let params = ScoringParams::new(500_000.0, 0.0)?;
/// let guess = GeoPoint::new(48.85, 2.35);
/// let actual = GeoPoint::new(50.85, 4.35);
/// let result = params.score(&guess, &actual)?;
/// assert_eq!(result.score, MAX_SCORE);
/// # Ok::<(), earthwalker_core::ScoreError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringParams {
    grace_distance: f64,
    area: PlayArea,
}

impl ScoringParams {
    /// Validate a grace distance (metres) and a play area (square metres).
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidGraceDistance`] or
    /// [`ScoreError::InvalidArea`] for negative or non-finite input.
    pub fn new(grace_distance: f64, area: f64) -> Result<Self, ScoreError> {
        let play_area = PlayArea::new(area)?;
        Self::with_area(grace_distance, play_area)
    }

    /// Validate a grace distance against an already validated area.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidGraceDistance`] for negative or
    /// non-finite input.
    pub fn with_area(grace_distance: f64, area: PlayArea) -> Result<Self, ScoreError> {
        if !grace_distance.is_finite() || grace_distance < 0.0 {
            return Err(ScoreError::InvalidGraceDistance {
                value: grace_distance,
            });
        }
        Ok(Self {
            grace_distance,
            area,
        })
    }

    /// Radius in metres inside which any guess scores the maximum.
    #[must_use]
    pub const fn grace_distance(&self) -> f64 {
        self.grace_distance
    }

    /// Area normalising the decay rate.
    #[must_use]
    pub const fn area(&self) -> PlayArea {
        self.area
    }

    /// Score a single guess against the true location.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::NonFiniteCoordinate`] when either point carries
    /// a NaN or infinite ordinate.
    pub fn score(&self, guess: &GeoPoint, actual: &GeoPoint) -> Result<ScoreResult, ScoreError> {
        ensure_finite(guess, PointRole::Guess)?;
        ensure_finite(actual, PointRole::Actual)?;
        if !guess.has_valid_latitude() {
            return Ok(ScoreResult::INVALID_GUESS);
        }

        let distance = guess.distance_to(actual);
        let score = if distance < self.grace_distance {
            MAX_SCORE
        } else {
            decayed_score(distance, self.grace_distance, self.area)
        };
        Ok(ScoreResult {
            score,
            distance_metres: Some(distance),
        })
    }

    /// Sum the scores of guesses paired with actual locations by index.
    ///
    /// Both slices must already be in round order.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::MissingActual`] when `actuals` is shorter than
    /// `guesses`, before any pair is scored, and propagates errors from
    /// [`ScoringParams::score`].
    pub fn total(&self, guesses: &[GeoPoint], actuals: &[GeoPoint]) -> Result<u64, ScoreError> {
        if actuals.len() < guesses.len() {
            return Err(ScoreError::MissingActual {
                guesses: guesses.len(),
                actuals: actuals.len(),
            });
        }
        guesses
            .iter()
            .zip(actuals)
            .try_fold(0_u64, |total, (guess, actual)| {
                let result = self.score(guess, actual)?;
                Ok(total + u64::from(result.score))
            })
    }
}

/// Score a guess against the true location.
///
/// `area` is in square metres; zero selects the whole Earth.
///
/// # Errors
///
/// See [`ScoringParams::new`] and [`ScoringParams::score`].
///
/// # Examples
///
/// ```
/// use earthwalker_core::{GeoPoint, score_distance};
///
/// let spot = GeoPoint::new(-33.86, 151.21);
/// let result = score_distance(&spot, &spot, 0.0, 0.0)?;
/// assert_eq!(result.score, 5000);
/// assert_eq!(result.distance_metres, Some(0.0));
/// # Ok::<(), earthwalker_core::ScoreError>(())
/// ```
pub fn score_distance(
    guess: &GeoPoint,
    actual: &GeoPoint,
    grace_distance: f64,
    area: f64,
) -> Result<ScoreResult, ScoreError> {
    ScoringParams::new(grace_distance, area)?.score(guess, actual)
}

/// Sum per-round scores; `actuals` must be at least as long as `guesses`.
///
/// # Errors
///
/// See [`ScoringParams::new`] and [`ScoringParams::total`].
pub fn total_score(
    guesses: &[GeoPoint],
    actuals: &[GeoPoint],
    grace_distance: f64,
    area: f64,
) -> Result<u64, ScoreError> {
    ScoringParams::new(grace_distance, area)?.total(guesses, actuals)
}

fn ensure_finite(point: &GeoPoint, role: PointRole) -> Result<(), ScoreError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(ScoreError::NonFiniteCoordinate {
            role,
            point: *point,
        })
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "decay is computed in floating point and clamped to the score range before the cast"
)]
fn decayed_score(distance: f64, grace_distance: f64, area: PlayArea) -> u32 {
    let half_life = HALF_DISTANCE * area.relative_scale();
    let factor = DECAY_BASE.powf(-(distance - grace_distance) / half_life);
    let max = f64::from(MAX_SCORE);
    (factor * max).round().clamp(0.0, max) as u32
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::float_arithmetic,
        reason = "fixtures derive coordinates from distances"
    )]

    use super::*;
    use rstest::{fixture, rstest};

    /// Metres per degree of latitude on the haversine sphere.
    const METRES_PER_DEGREE: f64 = 6_371_008.8 * std::f64::consts::PI / 180.0;

    fn north_of(origin: GeoPoint, metres: f64) -> GeoPoint {
        GeoPoint::new(origin.lat + metres / METRES_PER_DEGREE, origin.lng)
    }

    #[fixture]
    fn origin() -> GeoPoint {
        GeoPoint::new(0.0, 0.0)
    }

    #[rstest]
    fn identical_points_score_maximum(origin: GeoPoint) {
        let result = score_distance(&origin, &origin, 0.0, EARTH_AREA).expect("score");
        assert_eq!(result.score, MAX_SCORE);
        assert_eq!(result.distance_metres, Some(0.0));
    }

    #[rstest]
    fn one_half_distance_halves_the_score(origin: GeoPoint) {
        let guess = north_of(origin, HALF_DISTANCE);
        let result = score_distance(&guess, &origin, 0.0, EARTH_AREA).expect("score");
        assert_eq!(result.score, 2500);
    }

    #[rstest]
    fn two_half_distances_quarter_the_score(origin: GeoPoint) {
        let guess = north_of(origin, 2.0 * HALF_DISTANCE);
        let result = score_distance(&guess, &origin, 0.0, EARTH_AREA).expect("score");
        assert_eq!(result.score, 1250);
    }

    #[rstest]
    fn grace_distance_awards_full_credit(origin: GeoPoint) {
        let guess = north_of(origin, 300_000.0);
        let result = score_distance(&guess, &origin, 500_000.0, EARTH_AREA).expect("score");
        assert_eq!(result.score, MAX_SCORE);
        let distance = result.distance_metres.expect("distance");
        assert!((distance - 300_000.0).abs() < 1e-3, "distance was {distance}");
    }

    #[rstest]
    fn decay_starts_at_the_grace_boundary(origin: GeoPoint) {
        let guess = north_of(origin, 1_500_000.0);
        let result = score_distance(&guess, &origin, 500_000.0, EARTH_AREA).expect("score");
        assert_eq!(result.score, 2500);
    }

    #[rstest]
    fn zero_area_matches_earth_area(origin: GeoPoint) {
        let guess = north_of(origin, 1_234_567.0);
        let unconstrained = score_distance(&guess, &origin, 0.0, 0.0).expect("score");
        let earth = score_distance(&guess, &origin, 0.0, EARTH_AREA).expect("score");
        assert_eq!(unconstrained, earth);
    }

    #[rstest]
    fn smaller_areas_decay_faster(origin: GeoPoint) {
        let guess = north_of(origin, 100_000.0);
        let quarter_earth = EARTH_AREA / 4.0;
        let world = score_distance(&guess, &origin, 0.0, EARTH_AREA).expect("score");
        let smaller = score_distance(&guess, &origin, 0.0, quarter_earth).expect("score");
        assert!(smaller.score < world.score);
    }

    #[rstest]
    fn very_distant_guesses_round_to_zero() {
        let guess = GeoPoint::new(0.0, 0.0);
        let actual = GeoPoint::new(0.0, 180.0);
        let result = score_distance(&guess, &actual, 0.0, 1.0).expect("score");
        assert_eq!(result.score, 0);
        assert!(result.distance_metres.is_some());
    }

    #[rstest]
    #[case(91.0)]
    #[case(-91.0)]
    fn out_of_range_guess_scores_zero(#[case] lat: f64, origin: GeoPoint) {
        let guess = GeoPoint::new(lat, 0.0);
        let result = score_distance(&guess, &origin, 10_000_000.0, 0.0).expect("score");
        assert_eq!(result, ScoreResult::INVALID_GUESS);
    }

    #[rstest]
    #[case(GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(0.0, 0.0), PointRole::Guess)]
    #[case(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, f64::NEG_INFINITY), PointRole::Actual)]
    fn non_finite_coordinates_fail_fast(
        #[case] guess: GeoPoint,
        #[case] actual: GeoPoint,
        #[case] expected: PointRole,
    ) {
        let err = score_distance(&guess, &actual, 0.0, 0.0).expect_err("non-finite input");
        assert!(
            matches!(err, ScoreError::NonFiniteCoordinate { role, .. } if role == expected),
            "unexpected error {err:?}"
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_grace_distance_is_rejected(#[case] grace: f64) {
        let err = ScoringParams::new(grace, 0.0).expect_err("invalid grace");
        assert!(matches!(err, ScoreError::InvalidGraceDistance { .. }));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn invalid_area_is_rejected(#[case] area: f64) {
        let err = PlayArea::new(area).expect_err("invalid area");
        assert!(matches!(err, ScoreError::InvalidArea { .. }));
    }

    #[rstest]
    fn total_sums_pairwise_scores(origin: GeoPoint) {
        let guesses = [origin, north_of(origin, HALF_DISTANCE)];
        let actuals = [origin, origin, north_of(origin, 42.0)];
        let total = total_score(&guesses, &actuals, 0.0, 0.0).expect("total");
        assert_eq!(total, 7500);
    }

    #[rstest]
    fn total_of_no_guesses_is_zero() {
        assert_eq!(total_score(&[], &[], 0.0, 0.0).expect("total"), 0);
    }

    #[rstest]
    fn total_rejects_short_actuals(origin: GeoPoint) {
        let err = total_score(&[origin, origin], &[origin], 0.0, 0.0).expect_err("short actuals");
        assert_eq!(
            err,
            ScoreError::MissingActual {
                guesses: 2,
                actuals: 1
            }
        );
    }

    #[rstest]
    fn total_counts_invalid_guesses_as_zero(origin: GeoPoint) {
        let guesses = [GeoPoint::new(95.0, 0.0), origin];
        let total = total_score(&guesses, &[origin, origin], 0.0, 0.0).expect("total");
        assert_eq!(total, u64::from(MAX_SCORE));
    }
}
