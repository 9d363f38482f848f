//! Rounds of a challenge and the guesses made in them.
//!
//! The backend does not guarantee storage order, so every sequence of rounds
//! must be put in ascending round order before it is displayed or scored.

use serde::{Deserialize, Serialize};

use crate::{GeoPoint, ScoreError, ScoringParams};

/// Items that belong to a numbered round.
pub trait RoundNumbered {
    /// Zero-based round number.
    fn round_num(&self) -> u32;
}

/// The true location of one round of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Place {
    /// Zero-based round number.
    pub round_num: u32,
    /// Location the panorama was taken at.
    pub location: GeoPoint,
}

/// A player's guess for one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Guess {
    /// Zero-based round number.
    pub round_num: u32,
    /// Location the player picked.
    pub location: GeoPoint,
}

impl RoundNumbered for Place {
    fn round_num(&self) -> u32 {
        self.round_num
    }
}

impl RoundNumbered for Guess {
    fn round_num(&self) -> u32 {
        self.round_num
    }
}

/// Sort `items` ascending by round number.
///
/// The sort is stable, so items sharing a round keep their relative order.
///
/// # Examples
///
/// ```
/// use earthwalker_core::{GeoPoint, Guess, order_rounds};
///
/// let at = GeoPoint::new(0.0, 0.0);
/// let mut guesses = vec![
///     Guess { round_num: 2, location: at },
///     Guess { round_num: 0, location: at },
///     Guess { round_num: 1, location: at },
/// ];
/// order_rounds(&mut guesses);
/// let rounds: Vec<u32> = guesses.iter().map(|g| g.round_num).collect();
/// assert_eq!(rounds, [0, 1, 2]);
/// ```
pub fn order_rounds<T: RoundNumbered>(items: &mut [T]) {
    items.sort_by_key(RoundNumbered::round_num);
}

/// Order guesses and places by round, then total the guesses' scores.
///
/// # Errors
///
/// Propagates [`ScoreError`] from [`ScoringParams::total`], including
/// [`ScoreError::MissingActual`] when there are fewer places than guesses.
pub fn score_rounds(
    params: &ScoringParams,
    guesses: &mut [Guess],
    places: &mut [Place],
) -> Result<u64, ScoreError> {
    order_rounds(guesses);
    order_rounds(places);
    let guessed: Vec<GeoPoint> = guesses.iter().map(|guess| guess.location).collect();
    let actual: Vec<GeoPoint> = places.iter().map(|place| place.location).collect();
    params.total(&guessed, &actual)
}
