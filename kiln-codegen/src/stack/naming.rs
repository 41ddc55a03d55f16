//! Identifier conventions of a target language.

/// How a stack spells types, files and fields, and which identifiers it
/// must escape.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Class name to type name (e.g. "order_line" -> "OrderLine").
    pub class_to_type: fn(&str) -> String,
    /// Class name to file stem (e.g. "OrderLine" -> "order-line").
    pub class_to_file: fn(&str) -> String,
    /// Model field name to language identifier.
    pub field_to_name: fn(&str) -> String,
    pub reserved_words: &'static [&'static str],
    /// Escape a reserved word (e.g. "class" -> "class_").
    pub escape_reserved: fn(&str) -> String,
}

impl NamingConvention {
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// `name`, escaped when reserved.
    pub fn safe_name(&self, name: &str) -> String {
        if self.is_reserved(name) {
            (self.escape_reserved)(name)
        } else {
            name.to_string()
        }
    }

    pub fn type_name(&self, name: &str) -> String {
        self.safe_name(&(self.class_to_type)(name))
    }

    /// File names are never escaped.
    pub fn file_name(&self, name: &str) -> String {
        (self.class_to_file)(name)
    }

    pub fn field_name(&self, name: &str) -> String {
        self.safe_name(&(self.field_to_name)(name))
    }
}
