//! Locale-aware message lookup and calendar formatting.
//!
//! Rendering never reads an ambient process-wide locale; every formatting
//! call takes the [`Locale`] explicitly, with [`Locale::default`] as the
//! caller-supplied fallback at the composition root.

use crate::consts::CIRCA_MARKER;
use crate::prelude::*;

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_SHORT_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_DE: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

const MONTHS_SHORT_DE: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const MONTHS_SHORT_FR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// The message catalog and calendar conventions used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Locale {
    #[default]
    #[display(fmt = "en")]
    En,
    #[display(fmt = "de")]
    De,
    #[display(fmt = "fr")]
    Fr,
}

impl Locale {
    /// Looks up a message by key. Unknown keys resolve to the key itself so
    /// callers can treat a missing translation as a literal fallback.
    pub fn lookup<'a>(self, key: &'a str) -> &'a str {
        match key {
            "ca" => CIRCA_MARKER,
            "no_date" => match self {
                Self::En => "no date",
                Self::De => "ohne Datum",
                Self::Fr => "pas date",
            },
            _ => key,
        }
    }

    /// The marker prefixed to approximate dates.
    pub fn circa(self) -> &'static str {
        self.lookup("ca")
    }

    /// The string rendered for the null date.
    pub fn no_date(self) -> &'static str {
        self.lookup("no_date")
    }

    /// The twelve full month names, January first.
    pub const fn month_names(self) -> [&'static str; 12] {
        match self {
            Self::En => MONTHS_EN,
            Self::De => MONTHS_DE,
            Self::Fr => MONTHS_FR,
        }
    }

    /// The twelve abbreviated month names, January first.
    pub const fn short_month_names(self) -> [&'static str; 12] {
        match self {
            Self::En => MONTHS_SHORT_EN,
            Self::De => MONTHS_SHORT_DE,
            Self::Fr => MONTHS_SHORT_FR,
        }
    }

    /// Full name for a 1-based month number, `None` when out of range.
    pub fn month_name(self, month: u8) -> Option<&'static str> {
        self.month_names()
            .get(usize::from(month).checked_sub(1)?)
            .copied()
    }

    /// Abbreviated name for a 1-based month number, `None` when out of range.
    pub fn short_month_name(self, month: u8) -> Option<&'static str> {
        self.short_month_names()
            .get(usize::from(month).checked_sub(1)?)
            .copied()
    }

    /// Day of month with the locale's ordinal convention: `1st`/`22nd` in
    /// English, `1.` in German, `1er` and otherwise bare numbers in French.
    pub fn ordinal_day(self, day: u8) -> String {
        match self {
            Self::En => {
                let suffix = match (day % 100, day % 10) {
                    (11..=13, _) => "th",
                    (_, 1) => "st",
                    (_, 2) => "nd",
                    (_, 3) => "rd",
                    _ => "th",
                };
                format!("{day}{suffix}")
            }
            Self::De => format!("{day}."),
            Self::Fr => {
                if day == 1 {
                    "1er".to_owned()
                } else {
                    day.to_string()
                }
            }
        }
    }

    /// Renders a concrete date through a moment-style pattern.
    ///
    /// Supported tokens: `YYYY`, `YY`, `MMMM`, `MMM`, `MM`, `M`, `Do`, `DD`,
    /// `D`. Everything else is copied through verbatim.
    pub fn format_date(self, year: i32, month: u8, day: u8, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 8);
        let mut rest = pattern;
        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix("YYYY") {
                out.push_str(&format!("{year:04}"));
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("YY") {
                out.push_str(&format!("{:02}", year.rem_euclid(100)));
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("MMMM") {
                out.push_str(self.month_name(month).unwrap_or_default());
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("MMM") {
                out.push_str(self.short_month_name(month).unwrap_or_default());
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("MM") {
                out.push_str(&format!("{month:02}"));
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("M") {
                out.push_str(&month.to_string());
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("Do") {
                out.push_str(&self.ordinal_day(day));
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("DD") {
                out.push_str(&format!("{day:02}"));
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("D") {
                out.push_str(&day.to_string());
                rest = tail;
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
        out
    }
}
