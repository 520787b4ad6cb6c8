//! Fuzzy historical dates: values that may be known to the year, the
//! year-and-month, the exact day, or not at all, optionally marked as
//! approximate ("ca."), plus intervals built from two such dates.

mod consts;
mod interval;
mod locale;
mod prelude;
mod types;

pub use consts::*;
pub use interval::{FuzzyDateInterval, IntervalColumns};
pub use locale::Locale;
pub use types::{Precision, days_in_month, is_leap_year, is_valid_calendar_date};

use chrono::Datelike;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    /// Anchored grammar for a single date: optional circa marker, optionally
    /// signed 3-4 digit year, optional two-digit month and day groups.
    static ref DATE_RE: Regex = Regex::new(r"^(?:ca\. )?(-?\d{3,4})(?:-(\d{2}))?(?:-(\d{2}))?$")
        .expect("date pattern compiles");
    static ref NUMERIC_DAY_FIRST_RE: Regex =
        Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").expect("numeric day-first pattern compiles");
    static ref NAMED_MONTH_RE: Regex =
        Regex::new(r"(\d{1,2})\.\s?(\p{L}+)\.?\s+(\d{4})").expect("named month pattern compiles");
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text does not match the date grammar.
    #[error("could not parse date: {0}")]
    UnrecognizedDate(String),
    /// The text does not match the interval grammar.
    #[error("could not parse date interval: {0}")]
    UnrecognizedInterval(String),
    /// A free-text month name could not be resolved.
    #[error("could not determine month from: {0}")]
    UnknownMonthName(String),
}

/// Component values that fail the calendar and range rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("date is not valid: ({year}, {month}, {day}, {circa})")]
pub struct ValidationError {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub circa: bool,
}

/// A date with varying levels of precision and an approximation marker.
///
/// Unknown components are zero: a value with `year == 0` means no date is
/// known at all, `month == 0` means the month (and day) are unknown, and
/// `day == 0` means only year and month are known. The display form truncates
/// unknown segments (`"1973"`, `"ca. 1973-01"`), while the storage form is
/// always the fixed-width `"YYYY-MM-DD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FuzzyDate {
    year: i32,
    month: u8,
    day: u8,
    circa: bool,
}

/// Input representations accepted by [`FuzzyDate::coerce`].
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    /// Free text in the date grammar
    Text(String),
    /// A bare number, stringified before parsing; 0 means "no date"
    Number(i64),
    /// An already-constructed value, passed through unchanged
    Date(FuzzyDate),
    /// Nothing provided
    Empty,
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for DateInput {
    fn from(number: i64) -> Self {
        Self::Number(number)
    }
}

impl From<FuzzyDate> for DateInput {
    fn from(date: FuzzyDate) -> Self {
        Self::Date(date)
    }
}

impl<T: Into<DateInput>> From<Option<T>> for DateInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(Self::Empty, Into::into)
    }
}

impl FuzzyDate {
    /// The null date: nothing known, not approximate.
    pub const fn unknown() -> Self {
        Self {
            year: 0,
            month: 0,
            day: 0,
            circa: false,
        }
    }

    /// Parses text in the date grammar: `"1973"`, `"1973-01"`,
    /// `"1973-01-05"`, `"0000"` for the null date, each optionally prefixed
    /// with the circa marker. Empty or whitespace-only text yields the null
    /// date. A circa marker in the text overrides the `circa` argument.
    ///
    /// # Errors
    /// Returns `ParseError::UnrecognizedDate` if the text fails [`Self::is_valid`].
    pub fn from_text(text: &str, circa: bool) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self {
                year: 0,
                month: 0,
                day: 0,
                circa,
            });
        }
        if !Self::is_valid(trimmed) {
            return Err(ParseError::UnrecognizedDate(trimmed.to_owned()));
        }

        let (marked, rest) = split_circa(trimmed);
        let cleaned = strip_zero_suffixes(rest);
        let caps = DATE_RE
            .captures(cleaned)
            .ok_or_else(|| ParseError::UnrecognizedDate(trimmed.to_owned()))?;

        Ok(Self {
            year: capture_i32(&caps, 1),
            month: capture_u8(&caps, 2),
            day: capture_u8(&caps, 3),
            circa: circa || marked,
        })
    }

    /// Builds a date from typed components, running full validation by
    /// round-tripping through the canonical display form.
    ///
    /// # Errors
    /// Returns `ValidationError` carrying the offending components.
    pub fn from_components(
        year: i32,
        month: u8,
        day: u8,
        circa: bool,
    ) -> Result<Self, ValidationError> {
        let candidate = Self {
            year,
            month,
            day,
            circa,
        };
        if !Self::is_valid(&candidate.to_string()) {
            return Err(ValidationError {
                year,
                month,
                day,
                circa,
            });
        }
        Ok(candidate)
    }

    /// Best-effort recognition of freely formatted dates. Two extra shapes
    /// are tried before the regular grammar: a numeric day-first date
    /// (`"2.4.2014"`) and a day with a written month name
    /// (`"2. April 2014"`, `"2. Apr. 2014"`). Month names come from the
    /// locale and are matched by case-sensitive prefix; when several match,
    /// the last one wins.
    ///
    /// # Errors
    /// Returns `ParseError::UnknownMonthName` if a month name cannot be
    /// resolved, or `ParseError::UnrecognizedDate` if the remaining text
    /// fails the grammar.
    pub fn guess_from_text(text: &str, locale: Locale) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        let (circa, rest) = split_circa(trimmed);

        let normalized = if let Some(caps) = NUMERIC_DAY_FIRST_RE.captures(rest) {
            let day = capture_u8(&caps, 1);
            let month = capture_u8(&caps, 2);
            let year = capture_i32(&caps, 3);
            Some(format!("{year:04}-{month:02}-{day:02}"))
        } else if let Some(caps) = NAMED_MONTH_RE.captures(rest) {
            let day = capture_u8(&caps, 1);
            let name = caps.get(2).map_or("", |m| m.as_str());
            let year = capture_i32(&caps, 3);
            let month = locale
                .month_names()
                .iter()
                .rposition(|full| full.starts_with(name))
                .map(|index| index + 1)
                .ok_or_else(|| ParseError::UnknownMonthName(trimmed.to_owned()))?;
            Some(format!("{year:04}-{month:02}-{day:02}"))
        } else {
            None
        };

        match normalized {
            Some(value) => Self::from_text(&value, circa),
            None => Self::from_text(rest, circa),
        }
    }

    /// Normalizes a loosely typed input and parses it. Integers are
    /// stringified first (0 becomes the null date), absent input becomes the
    /// null date, and an existing `FuzzyDate` is returned unchanged.
    ///
    /// # Errors
    /// Returns `ParseError::UnrecognizedDate` for text or numbers that fail
    /// the grammar.
    pub fn coerce(input: impl Into<DateInput>) -> Result<Self, ParseError> {
        match input.into() {
            DateInput::Date(date) => Ok(date),
            DateInput::Empty | DateInput::Number(0) => Ok(Self::unknown()),
            DateInput::Number(number) => Self::from_text(&number.to_string(), false),
            DateInput::Text(text) => Self::from_text(&text, false),
        }
    }

    /// The current local calendar date at full precision.
    pub fn today() -> Self {
        let now = chrono::Local::now().date_naive();
        Self {
            year: now.year(),
            month: now.month() as u8,
            day: now.day() as u8,
            circa: false,
        }
    }

    /// Checks text against the date grammar.
    ///
    /// The rules, in order:
    /// 1. `"0000"` and `"0000-00-00"` are the null date and always valid.
    /// 2. A leading circa marker is stripped.
    /// 3. Up to two trailing `"-00"` groups are stripped.
    /// 4. The rest must match: optional sign, 3-4 digit year, optional
    ///    two-digit month and day.
    /// 5. With day and year both set, the triple must be a real calendar
    ///    date; with a month group and a year, the month must be below 13;
    ///    otherwise the year alone must lie in `-4714..=9998`.
    ///
    /// The branch order makes `"0000-00-03"` valid (the day is carried but
    /// never rendered) while `"1977-00-01"` is not, and a bare `"9999"`
    /// invalid while `"9999-01-01"` passes the calendar branch. Callers rely
    /// on these outcomes; keep the order as is.
    pub fn is_valid(text: &str) -> bool {
        let date = text.trim();

        if date == DISPLAY_SENTINEL || date == STORAGE_SENTINEL {
            return true;
        }

        let (_, date) = split_circa(date);
        let date = strip_zero_suffixes(date);

        let Some(caps) = DATE_RE.captures(date) else {
            return false;
        };
        let year = capture_i32(&caps, 1);
        let month_present = caps.get(2).is_some();
        let month = capture_u8(&caps, 2);
        let day = capture_u8(&caps, 3);

        if day > 0 && year > 0 {
            return is_valid_calendar_date(year, month, day);
        }
        if month_present && year > 0 {
            return month <= MAX_MONTH;
        }
        (MIN_YEAR..=MAX_YEAR).contains(&year)
    }

    /// Returns the year component, 0 when unknown.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month component, 0 when unknown.
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the day component, 0 when unknown.
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Whether the date carries the circa marker.
    pub const fn is_circa(&self) -> bool {
        self.circa
    }

    /// Whether no date is known (`year == 0`).
    pub const fn is_unknown(&self) -> bool {
        self.year == 0
    }

    /// How much of the date is known; `None` for the null date and for
    /// degenerate states that name no renderable precision.
    pub const fn precision(&self) -> Option<Precision> {
        match (self.year > 0, self.month > 0, self.day > 0) {
            (true, false, false) => Some(Precision::Year),
            (true, true, false) => Some(Precision::Month),
            (true, true, true) => Some(Precision::Day),
            _ => None,
        }
    }

    /// The component triple `(year, month, day)`.
    pub const fn to_components(&self) -> (i32, u8, u8) {
        (self.year, self.month, self.day)
    }

    /// The fixed-width storage form, always `YYYY-MM-DD` with zero fill;
    /// `"0000-00-00"` for the null date.
    pub fn to_storage_string(&self) -> String {
        self.padded()
    }

    /// The two persistence columns: storage string and circa flag.
    pub fn to_column(&self) -> (String, u8) {
        (self.to_storage_string(), u8::from(self.circa))
    }

    /// Rebuilds a date from its persistence columns.
    ///
    /// # Errors
    /// Returns `ParseError::UnrecognizedDate` if the stored text fails the grammar.
    pub fn from_column(date: &str, ca: bool) -> Result<Self, ParseError> {
        Self::from_text(date, ca)
    }

    /// The earliest concrete calendar date this value can denote; unknown
    /// components resolve to 1 (including the year of the null date). Only
    /// meant for calculations, never for storage.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let year = if self.year == 0 { 1 } else { self.year };
        let month = u32::from(self.month.max(1));
        let day = u32::from(self.day.max(1));
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Component-wise equality on year, month, and day; with `strict` the
    /// circa markers must match as well.
    pub fn is_equal_to(&self, other: &Self, strict: bool) -> bool {
        let components_match = self.to_components() == other.to_components();
        if strict {
            components_match && self.circa == other.circa
        } else {
            components_match
        }
    }

    /// Whether this date sorts after `other`.
    ///
    /// If either side is the null date, the result is `true`, and so is
    /// [`Self::is_less_than`]. An unknown date compares as a wildcard on both
    /// sides, which callers depend on when filtering open-ended material.
    /// This rules out a lawful `Ord`; the comparison surface is these two
    /// methods plus [`Self::is_equal_to`].
    pub fn is_greater_than(&self, other: &Self) -> bool {
        if self.has_sentinel_storage() || other.has_sentinel_storage() {
            return true;
        }
        self.ordinal_value() > other.ordinal_value()
    }

    /// Whether this date sorts before `other`. See [`Self::is_greater_than`]
    /// for the null-date wildcard rule.
    pub fn is_less_than(&self, other: &Self) -> bool {
        if self.has_sentinel_storage() || other.has_sentinel_storage() {
            return true;
        }
        self.ordinal_value() < other.ordinal_value()
    }

    /// Localized rendering with the default patterns: `"YYYY"` for
    /// year-precision, `"MMM YYYY"` for month-precision, `"Do MMM YYYY"` for
    /// full dates. The null date renders as the locale's "no date" string.
    pub fn formatted(&self, locale: Locale) -> String {
        self.formatted_with(
            locale,
            DEFAULT_YEAR_PATTERN,
            DEFAULT_MONTH_PATTERN,
            DEFAULT_DAY_PATTERN,
        )
    }

    /// Localized rendering with caller-supplied patterns, selected by
    /// precision. See [`Locale::format_date`] for the token set.
    pub fn formatted_with(
        &self,
        locale: Locale,
        year_pattern: &str,
        month_pattern: &str,
        day_pattern: &str,
    ) -> String {
        match self.precision() {
            Some(Precision::Year) => locale.format_date(self.year, 1, 1, year_pattern),
            Some(Precision::Month) => locale.format_date(self.year, self.month, 1, month_pattern),
            Some(Precision::Day) => {
                locale.format_date(self.year, self.month, self.day, day_pattern)
            }
            None => locale.no_date().to_owned(),
        }
    }

    /// Like [`Self::formatted`], but when the display form is exactly the
    /// null-date sentinel and `nullable` is set, yields an empty string
    /// instead of "no date". A circa-marked null date does not hit the
    /// nullable branch (its display form is `"ca. 0000"`).
    pub fn format_or_empty(&self, locale: Locale, nullable: bool) -> String {
        if self.to_string() != DISPLAY_SENTINEL {
            self.formatted(locale)
        } else if nullable {
            String::new()
        } else {
            locale.no_date().to_owned()
        }
    }

    pub(crate) const fn has_sentinel_storage(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }

    /// Digit collapse of the storage string (`1973-03-01` -> `19730301`).
    /// Removing the separators also removes a negative year's sign, so
    /// magnitudes are what get compared.
    fn ordinal_value(&self) -> i64 {
        i64::from(self.year.unsigned_abs()) * 10_000
            + i64::from(self.month) * 100
            + i64::from(self.day)
    }

    fn padded(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for FuzzyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.circa {
            write!(f, "{CIRCA_MARKER} ")?;
        }
        f.write_str(strip_zero_suffixes(&self.padded()))
    }
}

impl FromStr for FuzzyDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s, false)
    }
}

impl serde::Serialize for FuzzyDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for FuzzyDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Strips a leading circa marker (marker plus space) and reports whether it
/// was present.
fn split_circa(text: &str) -> (bool, &str) {
    match text
        .strip_prefix(CIRCA_MARKER)
        .and_then(|rest| rest.strip_prefix(' '))
    {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    }
}

/// Strips up to two trailing `"-00"` groups: the storage form collapses to
/// the display form (`1973-00-00` -> `1973`).
fn strip_zero_suffixes(text: &str) -> &str {
    let once = text.strip_suffix("-00").unwrap_or(text);
    once.strip_suffix("-00").unwrap_or(once)
}

fn capture_i32(caps: &Captures<'_>, index: usize) -> i32 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn capture_u8(caps: &Captures<'_>, index: usize) -> u8 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
