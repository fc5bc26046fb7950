//! Naming helpers shared by the preparation phases.

use convert_case::{Case, Casing};

/// Words that cannot be used as table or column names as-is.
const RESERVED_SQL_WORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "CROSS", "CURRENT", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP",
    "ELSE", "END", "EXISTS", "FALSE", "FETCH", "FOR", "FOREIGN", "FROM", "FULL", "GRANT",
    "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN",
    "KEY", "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER",
    "PRIMARY", "REFERENCES", "RIGHT", "ROW", "ROWS", "SELECT", "SESSION", "SET", "TABLE",
    "THEN", "TO", "TRUE", "UNION", "UNIQUE", "UPDATE", "USER", "USING", "VALUE", "VALUES",
    "WHEN", "WHERE", "WITH",
];

/// Whether a name collides with a reserved SQL word.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    RESERVED_SQL_WORDS.contains(&upper.as_str())
}

/// Uppercase the first character.
#[must_use]
pub fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Lowercase the first character.
#[must_use]
pub fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    chars
        .next()
        .map(|first| first.to_lowercase().chain(chars).collect())
        .unwrap_or_default()
}

/// English plural of an identifier. A trailing uppercase letter keeps the
/// suffix uppercase (`EntityA` → `EntityAS`).
#[must_use]
pub fn pluralize(word: &str) -> String {
    let shout = word
        .chars()
        .last()
        .is_some_and(|c| c.is_uppercase() && word.chars().count() > 1);
    let lower = word.to_lowercase();
    let plural = if lower.ends_with('s')
        || lower.ends_with("sh")
        || lower.ends_with("ch")
        || lower.ends_with('x')
    {
        format!("{word}es")
    } else if lower.ends_with('y')
        && !lower.ends_with("ay")
        && !lower.ends_with("ey")
        && !lower.ends_with("oy")
    {
        let stem = &word[..word.len() - 1];
        format!("{stem}ies")
    } else {
        format!("{word}s")
    };
    if shout {
        let (stem, suffix) = plural.split_at(word.len());
        format!("{stem}{}", suffix.to_uppercase())
    } else {
        plural
    }
}

/// Split an identifier into words: `firstName` → `First Name`,
/// `EntityAS` → `Entity AS`.
#[must_use]
pub fn humanize(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut previous: Option<char> = None;
    for c in value.chars() {
        if c == '_' || c == '-' {
            if !out.ends_with(' ') && !out.is_empty() {
                out.push(' ');
            }
            previous = None;
            continue;
        }
        if let Some(p) = previous {
            if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()) {
                out.push(' ');
            }
        }
        out.push(c);
        previous = Some(c);
    }
    upper_first(&out)
}

/// Hibernate's physical naming: an underscore is inserted only where a
/// lowercase letter is followed by an uppercase one followed by a lowercase
/// one, then everything is lowercased (`firstName` → `first_name`,
/// `EntityA` → `entitya`).
#[must_use]
pub fn hibernate_snake_case(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        let between_words = i > 0
            && c.is_uppercase()
            && chars[i - 1].is_lowercase()
            && chars.get(i + 1).is_some_and(|n| n.is_lowercase());
        if between_words {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// `entity-a` style.
#[must_use]
pub fn kebab(value: &str) -> String {
    value.to_case(Case::Kebab)
}

/// `entity_a` style.
#[must_use]
pub fn snake(value: &str) -> String {
    value.to_case(Case::Snake)
}

/// `entityA` style.
#[must_use]
pub fn camel(value: &str) -> String {
    value.to_case(Case::Camel)
}
