//! Text cleanup rules for schedule table cells.
//!
//! The site renders links, icons and captain markers inline with the values
//! we want, so each column has its own small rule for peeling them off.

/// Tokens that mark the end of a park name and the start of a field id.
pub const FIELD_SUFFIXES: [&str; 18] = [
    "A", "B", "C", "D", "E", "F", "North", "South", "East", "West", "1", "2", "3", "4", "5", "6",
    "7", "8",
];

/// Suffix the site appends to the names of teams without a self rating.
pub const UNRATED_SUFFIX: &str = " (-)";

/// Label in front of the rating inside the page heading.
pub const SELF_RATING_LABEL: &str = "Self Rating:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub raw: String,
    pub park: String,
    pub field: String,
}

pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Everything before the first space. Text without a space is kept whole.
pub fn date_part(s: &str) -> String {
    let s = s.trim();
    match s.find(' ') {
        Some(end) => s[..end].to_string(),
        None => s.to_string(),
    }
}

/// Text before `marker`, minus the one character that precedes it.
///
/// Without the marker the trimmed text is returned unchanged.
fn cut_before(s: &str, marker: char) -> String {
    let s = s.trim();
    match s.find(marker) {
        Some(pos) => {
            let head = &s[..pos];
            let mut chars = head.chars();
            chars.next_back();
            chars.as_str().to_string()
        }
        None => s.to_string(),
    }
}

/// "Thunder (3)" -> "Thunder"
pub fn opponent_name(s: &str) -> String {
    cut_before(s, '(')
}

/// "Wc captain" -> "W"
pub fn result_code(s: &str) -> String {
    cut_before(s, ' ')
}

pub fn strip_unrated_suffix(name: &str) -> String {
    name.replace(UNRATED_SUFFIX, "")
}

/// Drop the map/diagram link labels and the parens around them.
pub fn clean_location(s: &str) -> String {
    let cleaned = s
        .replace(" (", "")
        .replace(')', "")
        .replace("Map", "")
        .replace("Diagram", "");
    normalize_ws(&cleaned)
}

pub fn split_location(s: &str) -> Location {
    let raw = clean_location(s);
    let tokens: Vec<&str> = raw.split(' ').filter(|t| !t.is_empty()).collect();

    let Some((last, rest)) = tokens.split_last() else {
        return Location {
            raw: raw.clone(),
            park: raw.clone(),
            field: raw,
        };
    };

    if !FIELD_SUFFIXES.contains(last) {
        return Location {
            park: raw.clone(),
            field: raw.clone(),
            raw,
        };
    }

    // Times like "Field 6:30" end in a suffix-looking token; keep no field.
    let field = if raw.contains(':') {
        String::new()
    } else {
        last.to_string()
    };

    Location {
        park: rest.join(" "),
        field,
        raw,
    }
}

/// Pull the rating out of the heading text that follows the line break.
pub fn self_rating(s: &str) -> String {
    let s = s.trim();
    s.strip_prefix(SELF_RATING_LABEL).unwrap_or(s).trim().to_string()
}
