//! English pluralization for identifiers.

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("datum", "data"),
];

/// Pluralize the last word of an identifier, keeping the rest untouched.
///
/// ```
/// use kiln_core::pluralize;
///
/// assert_eq!(pluralize("OrderItem"), "OrderItems");
/// assert_eq!(pluralize("Child"), "Children");
/// assert_eq!(pluralize("category"), "categories");
/// ```
pub fn pluralize(identifier: &str) -> String {
    if identifier.is_empty() {
        return String::new();
    }

    let start = last_word_start(identifier);
    let (head, word) = identifier.split_at(start);
    format!("{}{}", head, pluralize_word(word))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        let uppercase_first = word.chars().next().is_some_and(|c| c.is_uppercase());
        return if uppercase_first {
            let mut chars = plural.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        } else {
            (*plural).to_string()
        };
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{}es", word);
    }

    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        return format!("{}ies", &word[..word.len() - 1]);
    }

    format!("{}s", word)
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut rev = lower.chars().rev();
    rev.next();
    matches!(rev.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

/// Byte index where the last word of an identifier begins.
fn last_word_start(identifier: &str) -> usize {
    let mut start = 0;
    let mut after_lower = false;
    for (i, c) in identifier.char_indices() {
        if matches!(c, '_' | '-' | ' ') {
            start = i + c.len_utf8();
            after_lower = false;
            continue;
        }
        if after_lower && c.is_ascii_uppercase() {
            start = i;
        }
        after_lower = c.is_ascii_lowercase() || (c.is_ascii_digit() && after_lower);
    }
    start
}
