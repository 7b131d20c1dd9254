//! Semester tokens
//!
//! A token is `<grade>?<season>`, e.g. `"2秋"` (grade 2, fall) or `"春"`
//! (spring of any grade). Catalog entries use [`SemesterToken`], where the
//! grade is optional. Selections use [`ActualSemester`], where it is not.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest grade a token may carry
pub const MAX_GRADE: u8 = 4;

/// Errors produced while parsing a semester token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemesterError {
    /// The token does not follow the `<grade>?<season>` grammar
    #[error("malformed semester token '{0}' (expected e.g. 1秋, 2春, 3夏 or 秋)")]
    Malformed(String),
    /// The grade is outside `1..=MAX_GRADE`
    #[error("grade {grade} in '{token}' is out of range (1-{MAX_GRADE})")]
    GradeOutOfRange {
        /// The offending token
        token: String,
        /// The parsed grade
        grade: u32,
    },
    /// A grade is mandatory for actual semesters
    #[error("actual semester '{0}' must carry a grade (e.g. 1{0})")]
    MissingGrade(String),
}

/// Academic season, ranked `Fall < Spring < Summer` within a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    /// 秋
    #[serde(rename = "秋")]
    Fall,
    /// 春
    #[serde(rename = "春")]
    Spring,
    /// 夏
    #[serde(rename = "夏")]
    Summer,
}

impl Season {
    /// All seasons in academic order
    pub const ALL: [Self; 3] = [Self::Fall, Self::Spring, Self::Summer];

    /// Canonical single-character symbol used in tokens
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Fall => '秋',
            Self::Spring => '春',
            Self::Summer => '夏',
        }
    }

    /// Parse a season symbol. Accepts the canonical characters and the ASCII
    /// shorthands `F`, `S`, `U` (case-insensitive).
    #[must_use]
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "秋" | "F" | "f" => Some(Self::Fall),
            "春" | "S" | "s" => Some(Self::Spring),
            "夏" | "U" | "u" => Some(Self::Summer),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Season {
    type Err = SemesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s.trim()).ok_or_else(|| SemesterError::Malformed(s.to_string()))
    }
}

/// Split a token into its optional grade and its season
fn split_token(raw: &str) -> Result<(Option<u8>, Season), SemesterError> {
    let token = raw.trim();
    let malformed = || SemesterError::Malformed(raw.to_string());

    let season_start = token
        .char_indices()
        .last()
        .map(|(idx, _)| idx)
        .ok_or_else(malformed)?;
    let (digits, season) = token.split_at(season_start);
    let season = Season::from_symbol(season).ok_or_else(malformed)?;

    if digits.is_empty() {
        return Ok((None, season));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
        return Err(malformed());
    }
    let grade: u32 = digits.parse().map_err(|_| malformed())?;
    if grade == 0 || grade > u32::from(MAX_GRADE) {
        return Err(SemesterError::GradeOutOfRange {
            token: raw.to_string(),
            grade,
        });
    }
    let grade = u8::try_from(grade).map_err(|_| malformed())?;
    Ok((Some(grade), season))
}

/// A catalog semester token; the grade may be absent ("any grade")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemesterToken {
    /// Grade (1-based year of study), `None` for a bare season token
    pub grade: Option<u8>,
    /// Season component
    pub season: Season,
}

impl SemesterToken {
    /// A bare token matching the season in any grade
    #[must_use]
    pub const fn bare(season: Season) -> Self {
        Self {
            grade: None,
            season,
        }
    }

    /// Whether the token carries no grade
    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.grade.is_none()
    }

    /// The exact slot this token names, if it carries a grade
    #[must_use]
    pub fn as_actual(&self) -> Option<ActualSemester> {
        self.grade.map(|grade| ActualSemester {
            grade,
            season: self.season,
        })
    }
}

impl Ord for SemesterToken {
    /// Chronological order; bare tokens sort after every graded token
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |t: &Self| (t.grade.unwrap_or(u8::MAX), t.season);
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for SemesterToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for SemesterToken {
    type Err = SemesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (grade, season) = split_token(s)?;
        Ok(Self { grade, season })
    }
}

impl TryFrom<String> for SemesterToken {
    type Error = SemesterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SemesterToken> for String {
    fn from(token: SemesterToken) -> Self {
        token.to_string()
    }
}

impl fmt::Display for SemesterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.grade {
            Some(grade) => write!(f, "{grade}{}", self.season),
            None => write!(f, "{}", self.season),
        }
    }
}

/// The slot a course was actually taken in; always carries a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActualSemester {
    /// Grade (1-based year of study); compared first
    pub grade: u8,
    /// Season within the grade
    pub season: Season,
}

impl ActualSemester {
    /// Build a slot, checking the grade range
    ///
    /// # Errors
    /// Returns [`SemesterError::GradeOutOfRange`] when `grade` is not in `1..=MAX_GRADE`.
    pub fn new(grade: u8, season: Season) -> Result<Self, SemesterError> {
        if grade == 0 || grade > MAX_GRADE {
            return Err(SemesterError::GradeOutOfRange {
                token: format!("{grade}{season}"),
                grade: u32::from(grade),
            });
        }
        Ok(Self { grade, season })
    }

    /// Every slot of a standard plan, in chronological order
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=MAX_GRADE).flat_map(|grade| {
            Season::ALL
                .into_iter()
                .map(move |season| Self { grade, season })
        })
    }
}

impl FromStr for ActualSemester {
    type Err = SemesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_token(s)? {
            (Some(grade), season) => Ok(Self { grade, season }),
            (None, _) => Err(SemesterError::MissingGrade(s.trim().to_string())),
        }
    }
}

impl TryFrom<String> for ActualSemester {
    type Error = SemesterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActualSemester> for String {
    fn from(slot: ActualSemester) -> Self {
        slot.to_string()
    }
}

impl From<ActualSemester> for SemesterToken {
    fn from(slot: ActualSemester) -> Self {
        Self {
            grade: Some(slot.grade),
            season: slot.season,
        }
    }
}

impl fmt::Display for ActualSemester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.grade, self.season)
    }
}
