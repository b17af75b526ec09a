//! Custom deserializers for forgiving catalog parsing.
//!
//! Catalog dumps are hand-maintained spreadsheets; a single bad cell should
//! degrade to a missing value rather than reject the whole table.

use serde::{Deserialize, Deserializer};

/// Deserializes a publication year that may be numeric, blank, or junk.
///
/// # Accepted Formats
///
/// * **Numeric**: `2002` → `Some(2002)`
/// * **String numeric**: `"2002"` or `" 2002 "` → `Some(2002)`
/// * **Float-ish export**: `"2002.0"` → `Some(2002)`
/// * **Blank, zero or unparseable**: `""`, `"0"`, `"DK Publishing Inc"` → `None`
pub fn de_optional_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(parse_year))
}

fn parse_year(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let year = match s.parse::<i32>() {
        Ok(y) => y,
        Err(_) => {
            let f = s.parse::<f64>().ok()?;
            if !f.is_finite() {
                return None;
            }
            f.round() as i32
        }
    };
    // Book-Crossing uses 0 for "unknown"
    (year > 0).then_some(year)
}
