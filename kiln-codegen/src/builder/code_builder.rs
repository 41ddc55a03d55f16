//! Indentation-aware text buffer the stack renderers write into.

/// Line-oriented code buffer.
///
/// Brace languages close blocks with an explicit line; Python passes `None`
/// and relies on the dedent alone.
///
/// ```
/// use kiln_codegen::builder::CodeBuilder;
///
/// let mut java = CodeBuilder::java();
/// java.push_block("public class Order {", Some("}"), |b| {
///     b.push_line("private Long id;");
/// });
/// assert_eq!(java.build(), "public class Order {\n    private Long id;\n}\n");
///
/// let mut py = CodeBuilder::python();
/// py.push_block("class Meta:", None, |b| {
///     b.push_line("db_table = \"order\"");
/// });
/// assert_eq!(py.build(), "class Meta:\n    db_table = \"order\"\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    unit: &'static str,
    depth: usize,
    out: String,
}

impl CodeBuilder {
    fn with_unit(unit: &'static str) -> Self {
        Self {
            unit,
            depth: 0,
            out: String::new(),
        }
    }

    pub fn java() -> Self {
        Self::with_unit("    ")
    }

    /// PEP 8 indentation.
    pub fn python() -> Self {
        Self::with_unit("    ")
    }

    pub fn typescript() -> Self {
        Self::with_unit("  ")
    }

    pub fn push_line(&mut self, line: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.out.push_str(self.unit);
        }
        self.out.push_str(line);
        self.out.push('\n');
        self
    }

    /// An empty line, never indented.
    pub fn push_blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// `header`, then the body one level deeper, then `close` if any.
    pub fn push_block<F>(&mut self, header: &str, close: Option<&str>, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.push_line(header).push_indent();
        body(self);
        self.push_dedent();
        if let Some(close) = close {
            self.push_line(close);
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn build(self) -> String {
        self.out
    }
}
