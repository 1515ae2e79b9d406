use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d", "%Y.%m.%d", "%d/%m/%y", "%d.%m.%y",
];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const CURRENCY_SYMBOLS: [char; 3] = ['€', '$', '£'];

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Only four-digit years render as `YYYY-MM-DD`.
pub fn has_canonical_year(date: NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses the date shapes seen on stored invoices. Day-first numeric dates
/// (`01/03/2024`) are read the European way; two-digit years (`01/03/24`)
/// land in 1970-2069.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    let date = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .find(|date| has_canonical_year(*date));
    if date.is_some() {
        return date;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        let date = datetime.with_timezone(&Utc).date_naive();
        return Some(date).filter(|d| has_canonical_year(*d));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|datetime| datetime.date())
        .filter(|date| has_canonical_year(*date))
}

/// Accepts `150.5`, `150,50`, `1,234.56`, `1.234,56` and `€ 12` style amounts.
pub fn parse_decimal(value: &str) -> Option<f64> {
    let raw = value
        .trim()
        .trim_matches(|c: char| c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c));
    if raw.is_empty() {
        return None;
    }

    // With both separators present, the last one is the decimal mark.
    let cleaned = match (raw.rfind('.'), raw.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => raw.replace(',', ""),
        (Some(_), Some(_)) => raw.replace('.', "").replace(',', "."),
        _ => raw.replace(',', "."),
    };

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_date_shapes() {
        assert_eq!(parse_date("2024-03-01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date(" 01.03.2024 "), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("01/03/2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024/03/01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024.03.01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-03-01T10:30:00Z"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-03-01T23:30:00-05:00"), Some(ymd(2024, 3, 2)));
        assert_eq!(parse_date("2024-03-01T10:30:00"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-03-01 10:30:00.250"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("32/01/2024"), None);
    }

    #[test]
    fn two_digit_years_are_not_read_as_year_24() {
        assert_eq!(parse_date("01/03/24"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("1.3.24"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("15/04/99"), Some(ymd(1999, 4, 15)));
        assert_eq!(parse_date("24-3-1"), None);
        assert_eq!(parse_date("0024-03-01"), None);
        assert_eq!(parse_date("10000-01-01"), None);
        assert_eq!(parse_date("0999-12-31T10:00:00Z"), None);
    }

    #[test]
    fn canonical_year_bounds() {
        assert!(has_canonical_year(ymd(1000, 1, 1)));
        assert!(has_canonical_year(ymd(9999, 12, 31)));
        assert!(!has_canonical_year(ymd(999, 12, 31)));
        assert!(!has_canonical_year(ymd(10000, 1, 1)));
        assert!(!has_canonical_year(ymd(-249, 10, 15)));
    }

    #[test]
    fn parses_decimals() {
        assert_eq!(parse_decimal("150.5"), Some(150.5));
        assert_eq!(parse_decimal(" 150,50 "), Some(150.5));
        assert_eq!(parse_decimal("1,234.56"), Some(1234.56));
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("€ 12"), Some(12.0));
        assert_eq!(parse_decimal("99.90€"), Some(99.9));
        assert_eq!(parse_decimal("-21"), Some(-21.0));
    }

    #[test]
    fn rejects_non_numeric_decimals() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("1.2.3"), None);
    }

    #[test]
    fn formats_canonical_date() {
        assert_eq!(format_date(ymd(2024, 3, 1)), "2024-03-01");
    }
}
