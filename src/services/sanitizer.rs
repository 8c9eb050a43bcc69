//! Free-text normalization applied to every user-supplied string before it is stored
//! or compared: unsafe markup is removed by ammonia, then surrounding whitespace is trimmed.
//!
//! Pure function, no state.

pub fn clean(text: &str) -> String {
    ammonia::clean(text).trim().to_string()
}

/// `clean` an optional field, treating "empty after cleaning" the same as absent.
pub fn clean_opt(text: Option<&str>) -> Option<String> {
    text.map(clean).filter(|s| !s.is_empty())
}
