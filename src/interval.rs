use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::consts::{DATE_SEPARATOR, INTERVAL_SEPARATOR, STORAGE_SENTINEL};
use crate::locale::Locale;
use crate::{FuzzyDate, ParseError};

/// Unanchored pattern for one side of an interval, circa marker included.
const DATE_PATTERN: &str = r"(?:ca\. )?-?\d{3,4}(?:-\d{2})?(?:-\d{2})?";

lazy_static! {
    static ref INTERVAL_RE: Regex = Regex::new(&format!("{DATE_PATTERN}[/-]{DATE_PATTERN}"))
        .expect("interval pattern compiles");
    /// Two bare years joined by a dash: the only case where the dash is an
    /// interval separator rather than a date-internal one.
    static ref BARE_YEAR_PAIR_RE: Regex =
        Regex::new(r"\d{3,4}-\d{3,4}").expect("bare year pair pattern compiles");
}

/// A pair of fuzzy dates. An unknown end date makes the interval open-ended.
///
/// Construction never checks that `start` precedes `end`: composing from
/// already-persisted data trusts the caller. Only [`FuzzyDateInterval::is_valid`],
/// the free-text validation path, enforces the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuzzyDateInterval {
    start: FuzzyDate,
    end: FuzzyDate,
}

/// The four scalar columns an interval occupies in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalColumns {
    pub date_start: String,
    pub date_start_ca: u8,
    pub date_end: Option<String>,
    pub date_end_ca: u8,
}

impl FuzzyDateInterval {
    /// Builds an interval from two dates, without an ordering check.
    pub const fn new(start: FuzzyDate, end: FuzzyDate) -> Self {
        Self { start, end }
    }

    /// Builds an interval from two date texts with their circa flags. An
    /// empty end text becomes the unknown date (open-ended interval). Start
    /// and end are validated individually; their ordering is not.
    ///
    /// # Errors
    /// Returns `ParseError::UnrecognizedDate` if either side fails the date
    /// grammar.
    pub fn compose(
        start_text: &str,
        start_circa: bool,
        end_text: &str,
        end_circa: bool,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            start: FuzzyDate::from_text(start_text, start_circa)?,
            end: FuzzyDate::from_text(end_text, end_circa)?,
        })
    }

    /// Parses a combined interval string with an explicit default separator.
    /// When both sides are bare years joined by a dash (`"973-1044"`), the
    /// separator is inferred to be the dash; otherwise the given separator
    /// splits the string and only the first two segments are kept. An empty
    /// end half becomes the unknown date. Ordering is not checked.
    ///
    /// # Errors
    /// Returns `ParseError::UnrecognizedInterval` if the combined pattern
    /// does not match, or `ParseError::UnrecognizedDate` if either half
    /// fails the date grammar.
    pub fn from_text_with_separator(text: &str, separator: char) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        if !INTERVAL_RE.is_match(trimmed) {
            return Err(ParseError::UnrecognizedInterval(trimmed.to_owned()));
        }

        let separator = if BARE_YEAR_PAIR_RE.is_match(trimmed) {
            DATE_SEPARATOR
        } else {
            separator
        };
        let (start_text, end_text) = split_halves(trimmed, separator);

        if start_text.trim().is_empty() {
            return Err(ParseError::UnrecognizedInterval(trimmed.to_owned()));
        }
        let start = FuzzyDate::from_text(start_text, false)?;
        let end = if end_text.trim().is_empty() {
            FuzzyDate::unknown()
        } else {
            FuzzyDate::from_text(end_text, false)?
        };

        Ok(Self { start, end })
    }

    /// Checks a combined interval string. Beyond the grammar of
    /// [`Self::from_text_with_separator`], the start must not sort after the
    /// end, unless the end half is the null-date sentinel. An empty end half
    /// is invalid here, unlike in parsing.
    pub fn is_valid(text: &str) -> bool {
        if !INTERVAL_RE.is_match(text) {
            return false;
        }

        let separator = if BARE_YEAR_PAIR_RE.is_match(text) {
            DATE_SEPARATOR
        } else {
            INTERVAL_SEPARATOR
        };
        let (start_text, end_text) = split_halves(text, separator);

        if start_text.trim().is_empty() || end_text.trim().is_empty() {
            return false;
        }
        let Ok(start) = FuzzyDate::from_text(start_text, false) else {
            return false;
        };
        let Ok(end) = FuzzyDate::from_text(end_text, false) else {
            return false;
        };

        start.is_less_than(&end)
            || start.is_equal_to(&end, false)
            || end_text.trim() == STORAGE_SENTINEL
    }

    /// Returns the start date of the interval
    pub const fn start(&self) -> FuzzyDate {
        self.start
    }

    /// Returns the end date of the interval
    pub const fn end(&self) -> FuzzyDate {
        self.end
    }

    /// Returns both start and end dates as a tuple
    pub const fn dates(&self) -> (FuzzyDate, FuzzyDate) {
        (self.start, self.end)
    }

    /// Decomposes into the four storage columns. With `nullable`, an unknown
    /// end date yields `None` instead of the sentinel string.
    pub fn to_columns(&self, nullable: bool) -> IntervalColumns {
        let date_end = if nullable && self.end.has_sentinel_storage() {
            None
        } else {
            Some(self.end.to_storage_string())
        };
        IntervalColumns {
            date_start: self.start.to_storage_string(),
            date_start_ca: u8::from(self.start.is_circa()),
            date_end,
            date_end_ca: u8::from(self.end.is_circa()),
        }
    }

    /// Rebuilds an interval from its storage columns. A missing end column
    /// becomes the unknown date.
    ///
    /// # Errors
    /// Returns `ParseError::UnrecognizedDate` if a stored text fails the
    /// date grammar.
    pub fn from_columns(columns: &IntervalColumns) -> Result<Self, ParseError> {
        let start = FuzzyDate::from_text(&columns.date_start, columns.date_start_ca != 0)?;
        let end = match &columns.date_end {
            Some(text) => FuzzyDate::from_text(text, columns.date_end_ca != 0)?,
            None => FuzzyDate::from_text("", columns.date_end_ca != 0)?,
        };
        Ok(Self { start, end })
    }

    /// Renders the interval for display: each side gets its circa prefix and
    /// either its bare year (`only_year`) or its full localized form. The
    /// end side is appended after an en-dash only when the two sides differ
    /// in value or prefix, so a single-point interval reads as one date.
    /// With `nullable`, unknown sides render empty instead of "no date".
    ///
    /// French output gets two cosmetic fixes: `1er` becomes a superscripted
    /// ordinal and the abbreviation `juil.` is normalized to `juill.`.
    pub fn render(&self, locale: Locale, only_year: bool, nullable: bool) -> String {
        let start_prefix = circa_prefix(&self.start, locale);
        let end_prefix = circa_prefix(&self.end, locale);

        let (start_text, end_text) = if only_year {
            (
                year_text(&self.start, locale, nullable),
                year_text(&self.end, locale, nullable),
            )
        } else {
            (
                self.start.format_or_empty(locale, nullable),
                self.end.format_or_empty(locale, nullable),
            )
        };

        let mut rendered = format!("{start_prefix}{start_text}");
        if self.start.to_storage_string() != self.end.to_storage_string()
            || start_prefix != end_prefix
        {
            rendered.push_str(&format!(" – {end_prefix}{end_text}"));
        }

        let rendered = rendered
            .replace("1er", "1<sup>er</sup>")
            .replace("juil.", "juill.");
        rendered.trim().to_owned()
    }
}

impl fmt::Display for FuzzyDateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if !self.end.has_sentinel_storage() {
            write!(f, "{INTERVAL_SEPARATOR}{}", self.end)?;
        }
        Ok(())
    }
}

impl FromStr for FuzzyDateInterval {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text_with_separator(s, INTERVAL_SEPARATOR)
    }
}

/// First two separator-delimited segments; extra segments are ignored.
fn split_halves(text: &str, separator: char) -> (&str, &str) {
    let mut parts = text.splitn(3, separator);
    let start = parts.next().unwrap_or("");
    let end = parts.next().unwrap_or("");
    (start, end)
}

fn circa_prefix(date: &FuzzyDate, locale: Locale) -> String {
    if date.is_circa() {
        format!("{} ", locale.circa())
    } else {
        String::new()
    }
}

fn year_text(date: &FuzzyDate, locale: Locale, nullable: bool) -> String {
    if date.year() > 0 {
        date.year().to_string()
    } else if nullable {
        String::new()
    } else {
        locale.no_date().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(text: &str) -> FuzzyDateInterval {
        text.parse().unwrap()
    }

    #[test]
    fn test_valid_interval_strings() {
        let valid = [
            "973/1002-03",
            "0000/1972",
            "1971/ca. 1973",
            "973-1044",
            "1972/0000",
        ];
        for text in valid {
            assert!(FuzzyDateInterval::is_valid(text), "{text} should be valid");
        }
    }

    #[test]
    fn test_invalid_interval_strings() {
        let invalid = ["1973-13/88", "hallo", "1973/ca. 1971", "1973"];
        for text in invalid {
            assert!(
                !FuzzyDateInterval::is_valid(text),
                "{text} should be invalid"
            );
        }
    }

    #[test]
    fn test_parse_valid_intervals() {
        for text in [
            "973/1002-03",
            "0000/1972",
            "1971/ca. 1973",
            "973-1044",
            "1972/0000",
        ] {
            assert!(text.parse::<FuzzyDateInterval>().is_ok(), "{text} should parse");
        }
    }

    #[test]
    fn test_parse_rejects_unmatched_text() {
        let result = "hallo".parse::<FuzzyDateInterval>();
        assert!(matches!(result, Err(ParseError::UnrecognizedInterval(_))));

        let result = "1973".parse::<FuzzyDateInterval>();
        assert!(matches!(result, Err(ParseError::UnrecognizedInterval(_))));

        let result = "1973-13/88".parse::<FuzzyDateInterval>();
        assert!(matches!(result, Err(ParseError::UnrecognizedInterval(_))));
    }

    #[test]
    fn test_parse_does_not_check_ordering() {
        // free-text parsing builds the pair; only is_valid rejects reversed
        let parsed = interval("1973/ca. 1971");
        assert_eq!(parsed.start().year(), 1973);
        assert_eq!(parsed.end().year(), 1971);
        assert!(parsed.end().is_circa());
        assert!(!FuzzyDateInterval::is_valid("1973/ca. 1971"));
    }

    #[test]
    fn test_parse_to_columns() {
        let parsed = interval("ca. 1947/1999-01-03");
        assert_eq!(parsed.to_string(), "ca. 1947/1999-01-03");
        assert_eq!(
            parsed.to_columns(false),
            IntervalColumns {
                date_start: "1947-00-00".to_owned(),
                date_start_ca: 1,
                date_end: Some("1999-01-03".to_owned()),
                date_end_ca: 0,
            }
        );
    }

    #[test]
    fn test_columns_nullable_end() {
        let open = FuzzyDateInterval::compose("1947", false, "", false).unwrap();
        let columns = open.to_columns(true);
        assert_eq!(columns.date_start, "1947-00-00");
        assert_eq!(columns.date_end, None);

        let columns = open.to_columns(false);
        assert_eq!(columns.date_end, Some("0000-00-00".to_owned()));
    }

    #[test]
    fn test_columns_round_trip() {
        let parsed = interval("ca. 1947/1999-01-03");
        let restored = FuzzyDateInterval::from_columns(&parsed.to_columns(false)).unwrap();
        assert_eq!(parsed, restored);

        let open = FuzzyDateInterval::compose("1947", false, "", true).unwrap();
        let restored = FuzzyDateInterval::from_columns(&open.to_columns(true)).unwrap();
        assert_eq!(open, restored);
    }

    #[test]
    fn test_separator_inference() {
        let parsed = interval("973-1044");
        assert_eq!(parsed.start().year(), 973);
        assert_eq!(parsed.end().year(), 1044);

        // a month group disambiguates the dash back to a date separator
        let parsed = interval("1990-01/2000-12");
        assert_eq!(parsed.start().to_components(), (1990, 1, 0));
        assert_eq!(parsed.end().to_components(), (2000, 12, 0));
    }

    #[test]
    fn test_extra_segments_are_ignored() {
        let parsed = interval("2000/2001/2002");
        assert_eq!(parsed.start().year(), 2000);
        assert_eq!(parsed.end().year(), 2001);
    }

    #[test]
    fn test_compose_skips_ordering_check() {
        // reversed pairs compose fine; the caller is trusted
        let reversed = FuzzyDateInterval::compose("1999", false, "1973", false).unwrap();
        assert_eq!(reversed.start().year(), 1999);
        assert_eq!(reversed.end().year(), 1973);
    }

    #[test]
    fn test_compose_empty_end_is_open() {
        let open = FuzzyDateInterval::compose("1972", false, "", false).unwrap();
        assert!(open.end().is_unknown());
        assert_eq!(open.to_string(), "1972");
    }

    #[test]
    fn test_new_and_accessors() {
        let start = "1990".parse::<FuzzyDate>().unwrap();
        let end = "2000".parse::<FuzzyDate>().unwrap();
        let built = FuzzyDateInterval::new(start, end);

        assert_eq!(built.start(), start);
        assert_eq!(built.end(), end);
        assert_eq!(built.dates(), (start, end));
    }

    #[test]
    fn test_display_omits_unknown_end() {
        assert_eq!(interval("1972/0000").to_string(), "1972");
        assert_eq!(interval("ca. 1947/1999-01-03").to_string(), "ca. 1947/1999-01-03");
    }

    #[test]
    fn test_render_localized() {
        let open_start = FuzzyDateInterval::compose("0000-00-00", false, "2002-03-31", true)
            .unwrap();
        assert_eq!(
            open_start.render(Locale::De, false, false),
            "ohne Datum – ca. 31. Mär 2002"
        );
        assert_eq!(
            open_start.render(Locale::En, false, false),
            "no date – ca. 31st Mar 2002"
        );

        let june = FuzzyDateInterval::compose("0000-00-00", false, "2002-06-02", true).unwrap();
        assert_eq!(
            june.render(Locale::Fr, false, false),
            "pas date – ca. 2 juin 2002"
        );
    }

    #[test]
    fn test_render_french_ordinal_and_july() {
        let july = FuzzyDateInterval::compose("0000-00-00", false, "2002-07-01", true).unwrap();
        assert_eq!(
            july.render(Locale::Fr, false, false),
            "pas date – ca. 1<sup>er</sup> juill. 2002"
        );
    }

    #[test]
    fn test_render_single_point() {
        let point = FuzzyDateInterval::compose("1973", false, "1973", false).unwrap();
        assert_eq!(point.render(Locale::En, false, false), "1973");

        // differing circa prefixes force the two-sided form
        let marked = FuzzyDateInterval::compose("1973", false, "1973", true).unwrap();
        assert_eq!(marked.render(Locale::En, false, false), "1973 – ca. 1973");
    }

    #[test]
    fn test_render_only_year() {
        let parsed = interval("ca. 1947/1999-01-03");
        assert_eq!(parsed.render(Locale::En, true, false), "ca. 1947 – 1999");
    }

    #[test]
    fn test_render_only_year_nullable() {
        let open = FuzzyDateInterval::compose("1947-03-02", false, "", false).unwrap();
        assert_eq!(open.render(Locale::En, true, true), "1947 –");
        assert_eq!(open.render(Locale::En, true, false), "1947 – no date");
    }

    #[test]
    fn test_serde_round_trip() {
        let parsed = interval("ca. 1947/1999-01-03");
        let json = serde_json::to_string(&parsed).unwrap();
        let restored: FuzzyDateInterval = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, restored);

        // open-ended intervals survive, which the display form could not
        let open = FuzzyDateInterval::compose("1972", false, "", false).unwrap();
        let json = serde_json::to_string(&open).unwrap();
        let restored: FuzzyDateInterval = serde_json::from_str(&json).unwrap();
        assert_eq!(open, restored);
    }
}
