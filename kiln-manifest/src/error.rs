use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Manifest result. The error is boxed since it carries the whole source.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Everything that stops a `kiln.toml` from reaching the pipeline.
///
/// Problems that only concern one class (a dangling relationship, colliding
/// field names) are not manifest errors. The pipeline reports those and
/// keeps generating the other classes.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("cannot read manifest '{path}'")]
    #[diagnostic(
        code(kiln::manifest::read),
        help("pass the manifest with --config, or run kiln next to a kiln.toml")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax, or a value outside the manifest vocabulary.
    #[error("invalid manifest: {}", .source.message())]
    #[diagnostic(code(kiln::manifest::syntax))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        #[help]
        hint: Option<String>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(kiln::manifest::invalid))]
    Invalid {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("class '{class}' declares attribute '{name}' twice")]
    #[diagnostic(
        code(kiln::manifest::duplicate_attribute),
        help("rename or remove one of the two declarations")
    )]
    DuplicateAttribute {
        #[source_code]
        src: NamedSource<String>,
        #[label("second declaration")]
        span: Option<SourceSpan>,
        class: String,
        name: String,
    },

    #[error("'{name}' is not a valid {context} name")]
    #[diagnostic(
        code(kiln::manifest::identifier),
        help("{reason}; names must be usable in Java, TypeScript and Python alike")
    )]
    InvalidIdentifier {
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: Option<SourceSpan>,
        name: String,
        context: String,
        reason: String,
    },
}

/// Help for the vocabulary mistakes serde reports as plain messages.
fn vocabulary_hint(message: &str) -> Option<String> {
    if message.contains("lookback") {
        Some("write the window as a count and a unit, like \"48h\", \"7d\" or \"2w\"".into())
    } else if message.contains("unknown variant") {
        Some("the accepted values are listed after 'expected'".into())
    } else if message.contains("missing field `name`") {
        Some("every [[attributes]] entry needs a name".into())
    } else {
        None
    }
}

/// The manifest text and its display name, shared by every error that
/// points into the file.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    fn named(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        Box::new(Error::Syntax {
            src: self.named(),
            span: source.span().map(SourceSpan::from),
            hint: vocabulary_hint(source.message()),
            source,
        })
    }

    pub fn validation_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Invalid {
            src: self.named(),
            span,
            message: message.into(),
        })
    }

    pub fn invalid_identifier_error(
        &self,
        name: impl Into<String>,
        context: impl Into<String>,
        reason: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidIdentifier {
            src: self.named(),
            span,
            name: name.into(),
            context: context.into(),
            reason: reason.into(),
        })
    }

    pub fn duplicate_attribute_error(
        &self,
        class: impl Into<String>,
        name: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicateAttribute {
            src: self.named(),
            span,
            class: class.into(),
            name: name.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_hints() {
        assert!(vocabulary_hint("invalid lookback window '7x'").is_some());
        assert!(
            vocabulary_hint("unknown variant `one-to-few`, expected one of `one-to-one`")
                .unwrap()
                .contains("expected")
        );
        assert_eq!(vocabulary_hint("expected `=`"), None);
    }

    #[test]
    fn test_syntax_error_points_into_source() {
        let src = "[project]\nname = \"shop\"\nstack =\n";
        let err = toml::from_str::<toml::Table>(src).unwrap_err();
        let boxed = SourceContext::new(src, "kiln.toml").parse_error(err);

        match *boxed {
            Error::Syntax { span, .. } => assert!(span.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
