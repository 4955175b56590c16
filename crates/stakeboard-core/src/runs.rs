//! # naneinf Run Log
//!
//! A short log of high-score attempts, most recent first. Each run has a
//! date, a score and free-form notes. The log keeps `RUN_LOG_CAP` runs; a new
//! run pushes the oldest one out.
//!
//! Scores routinely exceed anything a fixed-width integer holds (the target
//! is the point where the game's score overflows to "naneinf", about
//! 1.8e308), so `RunScore` stores a decimal significand and a base-10
//! exponent and compares them with integer arithmetic.

use crate::primitives::{MAX_RUN_NOTES_LENGTH, RUN_LOG_CAP};
use crate::StakeError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Significant digits kept by a `RunScore`. Extra digits are dropped.
const MAX_SIGNIFICANT_DIGITS: u32 = 19;

// =============================================================================
// SCORE
// =============================================================================

/// A non-negative score written in scientific notation, e.g. `3.984e115`.
///
/// The value is `significand * 10^exponent`. The significand carries no
/// trailing zeros, so equal values have equal representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RunScore {
    significand: u64,
    exponent: i32,
}

impl RunScore {
    pub const ZERO: RunScore = RunScore {
        significand: 0,
        exponent: 0,
    };

    /// The score at which the game overflows to naneinf (1.8e308).
    pub const NANEINF: RunScore = RunScore {
        significand: 18,
        exponent: 307,
    };

    /// Build a score from a significand and exponent, normalizing trailing
    /// zeros away. Digits past `MAX_SIGNIFICANT_DIGITS` are dropped.
    #[must_use]
    pub fn new(mut significand: u64, mut exponent: i32) -> Self {
        if significand == 0 {
            return Self::ZERO;
        }
        while significand >= 10u64.pow(MAX_SIGNIFICANT_DIGITS) || significand % 10 == 0 {
            significand /= 10;
            exponent = exponent.saturating_add(1);
        }
        Self {
            significand,
            exponent,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.significand == 0
    }

    fn digit_count(&self) -> u32 {
        self.significand.checked_ilog10().map_or(1, |log| log + 1)
    }

    /// Power of ten of the leading digit: 115 for `3.984e115`.
    #[must_use]
    pub fn magnitude(&self) -> i64 {
        i64::from(self.exponent) + i64::from(self.digit_count()) - 1
    }

    /// Left-aligned significand, so two scores of equal magnitude compare by
    /// plain integer comparison.
    fn aligned(&self) -> u64 {
        self.significand * 10u64.pow(MAX_SIGNIFICANT_DIGITS - self.digit_count())
    }

    /// True once the score reaches the naneinf threshold.
    #[must_use]
    pub fn is_naneinf(&self) -> bool {
        *self >= Self::NANEINF
    }

    /// Orders of magnitude between this score and naneinf, 0 once reached.
    #[must_use]
    pub fn magnitudes_to_naneinf(&self) -> u32 {
        if self.is_naneinf() {
            return 0;
        }
        let remaining = Self::NANEINF.magnitude() - self.magnitude().max(0);
        u32::try_from(remaining).unwrap_or(0)
    }
}

impl Ord for RunScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .magnitude()
                .cmp(&other.magnitude())
                .then_with(|| self.aligned().cmp(&other.aligned())),
        }
    }
}

impl PartialOrd for RunScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RunScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.significand.to_string();
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            write!(f, "{}e{}", lead, self.magnitude())
        } else {
            write!(f, "{}.{}e{}", lead, rest, self.magnitude())
        }
    }
}

impl FromStr for RunScore {
    type Err = StakeError;

    /// Accepts plain integers, decimals and scientific notation
    /// (`4500`, `12.5`, `3.984e115`, `1.8E+308`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StakeError::InvalidInput(format!("invalid score '{}'", s.trim()));

        let text = s.trim();
        let text = text.strip_prefix('+').unwrap_or(text);
        let (mantissa, exponent) = match text.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                let exponent = exponent.strip_prefix('+').unwrap_or(exponent);
                (mantissa, exponent.parse::<i32>().map_err(|_| invalid())?)
            }
            None => (text, 0),
        };

        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", whole, fraction);
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Self::ZERO);
        }

        let kept = digits.len().min(MAX_SIGNIFICANT_DIGITS as usize);
        let dropped = digits.len() - kept;
        let significand = digits[..kept].parse::<u64>().map_err(|_| invalid())?;

        let shift = i32::try_from(dropped)
            .ok()
            .zip(i32::try_from(fraction.len()).ok())
            .and_then(|(dropped, fraction)| dropped.checked_sub(fraction))
            .ok_or_else(invalid)?;
        let exponent = exponent.checked_add(shift).ok_or_else(invalid)?;

        Ok(Self::new(significand, exponent))
    }
}

impl Serialize for RunScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RunScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// RUNS
// =============================================================================

/// One logged naneinf attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEntry {
    pub id: u64,
    pub date: NaiveDate,
    pub score: RunScore,
    #[serde(default)]
    pub notes: String,
}

fn check_notes(notes: &str) -> Result<String, StakeError> {
    let notes = notes.trim();
    if notes.len() > MAX_RUN_NOTES_LENGTH {
        return Err(StakeError::InvalidInput(format!(
            "notes length {} exceeds maximum {} bytes",
            notes.len(),
            MAX_RUN_NOTES_LENGTH
        )));
    }
    Ok(notes.to_string())
}

/// Most-recent-first run log holding at most `RUN_LOG_CAP` runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunLog {
    runs: VecDeque<RunEntry>,
}

impl RunLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log seeded from stored runs (most recent first), truncated to the cap.
    pub fn with_runs(runs: impl IntoIterator<Item = RunEntry>) -> Self {
        Self {
            runs: runs.into_iter().take(RUN_LOG_CAP).collect(),
        }
    }

    /// Add a run at the head of the log and return its id.
    ///
    /// Ids are one past the highest id in the log, so ids stay unique among
    /// the runs kept.
    pub fn record(
        &mut self,
        date: NaiveDate,
        score: RunScore,
        notes: &str,
    ) -> Result<u64, StakeError> {
        let notes = check_notes(notes)?;
        let id = self.runs.iter().map(|run| run.id).max().map_or(1, |max| max + 1);

        self.runs.push_front(RunEntry {
            id,
            date,
            score,
            notes,
        });
        self.runs.truncate(RUN_LOG_CAP);
        Ok(id)
    }

    /// Replace the score and notes of run `id`. Its date and position stay.
    pub fn edit(&mut self, id: u64, score: RunScore, notes: &str) -> Result<(), StakeError> {
        let notes = check_notes(notes)?;
        let run = self
            .runs
            .iter_mut()
            .find(|run| run.id == id)
            .ok_or_else(|| StakeError::NotFound(format!("run {}", id)))?;
        run.score = score;
        run.notes = notes;
        Ok(())
    }

    /// Remove run `id`.
    pub fn delete(&mut self, id: u64) -> Result<RunEntry, StakeError> {
        let index = self
            .runs
            .iter()
            .position(|run| run.id == id)
            .ok_or_else(|| StakeError::NotFound(format!("run {}", id)))?;
        self.runs
            .remove(index)
            .ok_or_else(|| StakeError::NotFound(format!("run {}", id)))
    }

    /// Highest-scoring run; the most recent one wins a tie.
    #[must_use]
    pub fn best(&self) -> Option<&RunEntry> {
        self.runs
            .iter()
            .rev()
            .max_by(|a, b| a.score.cmp(&b.score))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunEntry> {
        self.runs.iter()
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&RunEntry> {
        self.runs.iter().find(|run| run.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<RunEntry> {
        self.runs.iter().cloned().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
