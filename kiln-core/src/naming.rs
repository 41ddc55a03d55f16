//! Identifier conversion between naming conventions.
//!
//! Words are split on `_`, `-` and spaces, and on a lowercase letter (or a
//! digit trailing one) immediately followed by an uppercase letter. There is
//! no dictionary: `HTTPServer` is a single word.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A naming convention for generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingStyle {
    #[serde(rename = "camelCase")]
    Camel,
    #[serde(rename = "PascalCase")]
    Pascal,
    #[serde(rename = "snake_case")]
    Snake,
    #[serde(rename = "kebab-case")]
    Kebab,
}

impl NamingStyle {
    /// Get the manifest spelling of this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingStyle::Camel => "camelCase",
            NamingStyle::Pascal => "PascalCase",
            NamingStyle::Snake => "snake_case",
            NamingStyle::Kebab => "kebab-case",
        }
    }

    /// Apply this style to an identifier.
    pub fn apply(&self, identifier: &str) -> String {
        convert(identifier, *self)
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camelCase" | "camel" => Ok(NamingStyle::Camel),
            "PascalCase" | "pascal" => Ok(NamingStyle::Pascal),
            "snake_case" | "snake" => Ok(NamingStyle::Snake),
            "kebab-case" | "kebab" => Ok(NamingStyle::Kebab),
            other => Err(format!(
                "unknown naming style '{}', expected one of camelCase, PascalCase, snake_case, kebab-case",
                other
            )),
        }
    }
}

/// Split an identifier into its words.
pub fn split_words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut after_lower = false;

    for c in identifier.chars() {
        if matches!(c, '_' | '-' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            after_lower = false;
            continue;
        }

        if after_lower && c.is_ascii_uppercase() {
            words.push(std::mem::take(&mut current));
        }

        after_lower = c.is_ascii_lowercase() || (c.is_ascii_digit() && after_lower);
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert an identifier to the given naming style.
///
/// Converting an identifier that already follows `style` returns it unchanged.
pub fn convert(identifier: &str, style: NamingStyle) -> String {
    let words = split_words(identifier);
    match style {
        NamingStyle::Snake => join_lower(&words, "_"),
        NamingStyle::Kebab => join_lower(&words, "-"),
        NamingStyle::Pascal => words.iter().map(|w| capitalize(w)).collect(),
        NamingStyle::Camel => words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                if i == 0 {
                    w.to_lowercase()
                } else {
                    capitalize(w)
                }
            })
            .collect(),
    }
}

/// Convert a string to camelCase (e.g., "order_item" -> "orderItem")
pub fn to_camel_case(s: &str) -> String {
    convert(s, NamingStyle::Camel)
}

/// Convert a string to PascalCase (e.g., "order_item" -> "OrderItem")
pub fn to_pascal_case(s: &str) -> String {
    convert(s, NamingStyle::Pascal)
}

/// Convert a string to snake_case (e.g., "OrderItem" -> "order_item")
pub fn to_snake_case(s: &str) -> String {
    convert(s, NamingStyle::Snake)
}

/// Convert a string to kebab-case (e.g., "OrderItem" -> "order-item")
pub fn to_kebab_case(s: &str) -> String {
    convert(s, NamingStyle::Kebab)
}

/// Convert a string to SCREAMING_SNAKE_CASE (e.g., "pickedUp" -> "PICKED_UP")
pub fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

fn join_lower(words: &[String], sep: &str) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: [NamingStyle; 4] = [
        NamingStyle::Camel,
        NamingStyle::Pascal,
        NamingStyle::Snake,
        NamingStyle::Kebab,
    ];

    const SAMPLES: &[&str] = &[
        "Order",
        "OrderItem",
        "orderItem",
        "order_item",
        "order-item",
        "HTTPServer",
        "orderID",
        "a_b",
        "v2Item",
        "address2Line",
        "2fa_code",
        "ORDER_ITEM",
        "createdAt",
        "x",
        "",
    ];

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("OrderItem"), vec!["Order", "Item"]);
        assert_eq!(split_words("order_item"), vec!["order", "item"]);
        assert_eq!(split_words("order-item"), vec!["order", "item"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTPServer"]);
        assert_eq!(split_words("orderID"), vec!["order", "ID"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("Order"), "order");
        assert_eq!(to_snake_case("OrderItem"), "order_item");
        assert_eq!(to_snake_case("parentId"), "parent_id");
        assert_eq!(to_snake_case("order-item"), "order_item");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("OrderItem"), "order-item");
        assert_eq!(to_kebab_case("order_item"), "order-item");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("order_item"), "OrderItem");
        assert_eq!(to_pascal_case("orderItem"), "OrderItem");
        assert_eq!(to_pascal_case("hello"), "Hello");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("OrderItem"), "orderItem");
        assert_eq!(to_camel_case("order_item"), "orderItem");
        assert_eq!(to_camel_case("Child"), "child");
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("pickedUp"), "PICKED_UP");
    }

    #[test]
    fn test_conversion_is_idempotent() {
        for style in STYLES {
            for sample in SAMPLES {
                let once = convert(sample, style);
                let twice = convert(&once, style);
                assert_eq!(once, twice, "{} not idempotent for {:?}", style, sample);
            }
        }
    }

    #[test]
    fn test_style_round_trip_strings() {
        for style in STYLES {
            assert_eq!(style.as_str().parse::<NamingStyle>(), Ok(style));
        }
        assert!("screaming".parse::<NamingStyle>().is_err());
    }
}
