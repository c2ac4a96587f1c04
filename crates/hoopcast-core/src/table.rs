// Generic delimited-text parsing: header-named records with per-source
// coercion policies.
//
// Fields are split on bare commas. Quoting is deliberately disabled, so a
// value containing a comma is not representable in any source.

use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

// ---------------------------------------------------------------------------
// Scalars and records
// ---------------------------------------------------------------------------

/// A coerced field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// The numeric value, if this field coerced to a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for a boolean `true` or the literal text `True`.
    ///
    /// Both spellings must mean the same thing regardless of whether the
    /// source's policy turned the literal into a boolean.
    pub fn is_truthy_flag(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Text(s) => s == "True",
            _ => false,
        }
    }
}

/// One data row: column name → coerced value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRecord {
    fields: HashMap<String, Scalar>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.fields.get(column)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Scalar::as_number)
    }

    /// A field rendered as text. Numbers and booleans are rendered back to
    /// their source spelling so identity columns survive coercion.
    pub fn text(&self, column: &str) -> Option<String> {
        match self.get(column)? {
            Scalar::Null => None,
            Scalar::Text(s) => Some(s.clone()),
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::Bool(true) => Some("True".to_string()),
            Scalar::Bool(false) => Some("False".to_string()),
        }
    }

    /// The field parsed as a game date.
    pub fn date(&self, column: &str) -> Option<NaiveDate> {
        self.get(column).and_then(Scalar::as_text).and_then(parse_date)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Scalar)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        RawRecord {
            fields: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Coercion policies
// ---------------------------------------------------------------------------

/// How a source turns raw field text into values.
///
/// The three sources disagree on what a missing or non-numeric value means;
/// each gets exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Prediction source. Non-numeric text, including `None`, stays text.
    PreserveLiterals,
    /// Averages and model-quality sources. `None` is normalised to null.
    NoneAsNull,
    /// Box-score source. Anything that is not a finite number reads as zero.
    ZeroDefault,
}

impl CoercionPolicy {
    /// Coerce one trimmed field.
    ///
    /// Precedence: `True`/`False` literal, empty, finite number, then the
    /// policy-specific fallback.
    pub fn coerce(self, raw: &str) -> Scalar {
        let value = raw.trim();
        match value {
            "True" => return Scalar::Bool(true),
            "False" => return Scalar::Bool(false),
            _ => {}
        }
        if let Some(n) = parse_finite(value) {
            return Scalar::Number(n);
        }
        match self {
            CoercionPolicy::ZeroDefault => Scalar::Number(0.0),
            _ if value.is_empty() => Scalar::Null,
            CoercionPolicy::NoneAsNull if value == "None" => Scalar::Null,
            _ => Scalar::Text(value.to_string()),
        }
    }

    /// Coerce a field expected to be numeric. Under [`ZeroDefault`] this is
    /// never `None`.
    ///
    /// [`ZeroDefault`]: CoercionPolicy::ZeroDefault
    pub fn number(self, raw: &str) -> Option<f64> {
        self.coerce(raw).as_number()
    }
}

/// Parse a value only if the whole trimmed string is a finite number.
pub fn parse_finite(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Parse an ISO `YYYY-MM-DD` game date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Line splitting
// ---------------------------------------------------------------------------

/// Split text into non-blank comma-separated lines.
///
/// Quoting is off and rows may have any width; a row shorter than the header
/// simply lacks the trailing fields.
pub(crate) fn split_lines(text: &str) -> Vec<StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut lines = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                if is_blank(&record) {
                    continue;
                }
                lines.push(record);
            }
            Err(e) => {
                warn!("skipping unreadable line: {}", e);
            }
        }
    }
    lines
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| f.trim().is_empty())
}

/// Parse delimited text into header-named records.
///
/// The first non-blank line is the header. Each later non-blank line yields
/// exactly one record; missing trailing fields coerce as empty and fields
/// past the header width are ignored. Empty input yields no records.
pub fn parse_table(text: &str, policy: CoercionPolicy) -> Vec<RawRecord> {
    let mut lines = split_lines(text).into_iter();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    lines
        .map(|line| {
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), policy.coerce(line.get(i).unwrap_or(""))))
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Coercion precedence --

    #[test]
    fn boolean_literals_win_over_everything() {
        for policy in [
            CoercionPolicy::PreserveLiterals,
            CoercionPolicy::NoneAsNull,
            CoercionPolicy::ZeroDefault,
        ] {
            assert_eq!(policy.coerce("True"), Scalar::Bool(true));
            assert_eq!(policy.coerce(" False "), Scalar::Bool(false));
        }
        // Only the exact capitalised spelling is a boolean.
        assert_eq!(
            CoercionPolicy::PreserveLiterals.coerce("true"),
            Scalar::Text("true".into())
        );
    }

    #[test]
    fn empty_is_null_except_zero_default() {
        assert_eq!(CoercionPolicy::PreserveLiterals.coerce(""), Scalar::Null);
        assert_eq!(CoercionPolicy::NoneAsNull.coerce("   "), Scalar::Null);
        assert_eq!(CoercionPolicy::ZeroDefault.coerce(""), Scalar::Number(0.0));
    }

    #[test]
    fn numbers_parse_only_when_whole_value_is_finite() {
        let p = CoercionPolicy::PreserveLiterals;
        assert_eq!(p.coerce("22.3"), Scalar::Number(22.3));
        assert_eq!(p.coerce(".456"), Scalar::Number(0.456));
        assert_eq!(p.coerce("-4"), Scalar::Number(-4.0));
        assert_eq!(p.coerce("12abc"), Scalar::Text("12abc".into()));
        assert_eq!(p.coerce("inf"), Scalar::Text("inf".into()));
        assert_eq!(p.coerce("NaN"), Scalar::Text("NaN".into()));
    }

    #[test]
    fn none_literal_depends_on_policy() {
        assert_eq!(
            CoercionPolicy::PreserveLiterals.coerce("None"),
            Scalar::Text("None".into())
        );
        assert_eq!(CoercionPolicy::NoneAsNull.coerce("None"), Scalar::Null);
        assert_eq!(CoercionPolicy::ZeroDefault.coerce("None"), Scalar::Number(0.0));
    }

    #[test]
    fn zero_default_number_never_absent() {
        assert_eq!(CoercionPolicy::ZeroDefault.number("garbage"), Some(0.0));
        assert_eq!(CoercionPolicy::NoneAsNull.number("garbage"), None);
    }

    #[test]
    fn truthy_flag_accepts_both_spellings() {
        assert!(Scalar::Bool(true).is_truthy_flag());
        assert!(Scalar::Text("True".into()).is_truthy_flag());
        assert!(!Scalar::Bool(false).is_truthy_flag());
        assert!(!Scalar::Text("False".into()).is_truthy_flag());
        assert!(!Scalar::Text("yes".into()).is_truthy_flag());
        assert!(!Scalar::Null.is_truthy_flag());
        assert!(!Scalar::Number(1.0).is_truthy_flag());
    }

    // -- Table parsing --

    #[test]
    fn one_record_per_non_blank_data_line() {
        let text = "a,b,c\n1,2,3\n\n   \n4,5,6\n7,8,9\n";
        let rows = parse_table(text, CoercionPolicy::NoneAsNull);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].number("b"), Some(5.0));
    }

    #[test]
    fn header_names_are_trimmed() {
        let text = " player_name , stat \nX,points";
        let rows = parse_table(text, CoercionPolicy::PreserveLiterals);
        assert_eq!(rows[0].text("player_name").as_deref(), Some("X"));
        assert_eq!(rows[0].text("stat").as_deref(), Some("points"));
    }

    #[test]
    fn short_rows_fill_with_null_and_extra_fields_are_dropped() {
        let text = "a,b,c\n1\n1,2,3,4";
        let rows = parse_table(text, CoercionPolicy::NoneAsNull);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("b"), Some(&Scalar::Null));
        assert_eq!(rows[0].get("c"), Some(&Scalar::Null));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn quotes_are_not_special() {
        let text = "name,team\n\"Smith, Jr.\",LAL";
        let rows = parse_table(text, CoercionPolicy::PreserveLiterals);
        assert_eq!(rows[0].text("name").as_deref(), Some("\"Smith"));
        assert_eq!(rows[0].text("team").as_deref(), Some("Jr.\""));
    }

    #[test]
    fn crlf_line_endings() {
        let text = "a,b\r\n1,2\r\n3,4\r\n";
        let rows = parse_table(text, CoercionPolicy::NoneAsNull);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].number("b"), Some(4.0));
    }

    #[test]
    fn empty_and_header_only_inputs() {
        assert!(parse_table("", CoercionPolicy::NoneAsNull).is_empty());
        assert!(parse_table("\n  \n", CoercionPolicy::NoneAsNull).is_empty());
        assert!(parse_table("a,b,c\n", CoercionPolicy::NoneAsNull).is_empty());
    }

    #[test]
    fn dates_parse_from_iso_text() {
        let rows = parse_table("date\n2025-03-15\n03/15/2025", CoercionPolicy::PreserveLiterals);
        assert_eq!(rows[0].date("date"), NaiveDate::from_ymd_opt(2025, 3, 15));
        assert_eq!(rows[1].date("date"), None);
    }
}
