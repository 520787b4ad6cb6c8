/// Smallest year accepted by the bare-year rule (start of the Julian day count)
pub const MIN_YEAR: i32 = -4714;

/// Largest year accepted by the bare-year rule (inclusive)
pub const MAX_YEAR: i32 = 9998;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Interval separator between start and end date
pub const INTERVAL_SEPARATOR: char = '/';

/// Marker prefixed to approximate dates ("ca. 1973")
pub const CIRCA_MARKER: &str = "ca.";

/// Display form of the null date ("no date known")
pub const DISPLAY_SENTINEL: &str = "0000";
/// Storage form of the null date, fixed-width
pub const STORAGE_SENTINEL: &str = "0000-00-00";

/// Default rendering pattern for year-precision dates
pub const DEFAULT_YEAR_PATTERN: &str = "YYYY";
/// Default rendering pattern for month-precision dates
pub const DEFAULT_MONTH_PATTERN: &str = "MMM YYYY";
/// Default rendering pattern for day-precision dates
pub const DEFAULT_DAY_PATTERN: &str = "Do MMM YYYY";
