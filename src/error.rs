use std::fmt::{self, Display};

/// Reason a normalized line was rejected by the classifier.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// The line does not match any recognized token-count shape.
    MalformedCommand,

    /// The first token is shaped like a mnemonic but names no command.
    UnknownOpcode {
        mnemonic: String,
        suggestion: Option<String>,
    },

    /// A segment position holds a name that is not a segment.
    UnknownSegment {
        segment: String,
        suggestion: Option<String>,
    },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::MalformedCommand => write!(f, "malformed command"),
            ErrorKind::UnknownOpcode {
                mnemonic,
                suggestion,
            } => {
                write!(f, "unknown command '{}'", mnemonic)?;

                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{}'?)", suggestion)?;
                }

                Ok(())
            }
            ErrorKind::UnknownSegment {
                segment,
                suggestion,
            } => {
                write!(f, "unknown segment '{}'", segment)?;

                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{}'?)", suggestion)?;
                }

                Ok(())
            }
        }
    }
}

/// Error type that contains the reason of the error and the location of the
/// offending line.
///
/// Any such error is fatal for the translation run: the translator performs
/// no recovery and produces no partial output.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// The 1-based line number in the original source unit.
    pub line: usize,

    /// The normalized text of the rejected line.
    pub text: String,

    pub kind: ErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, text: &str, kind: ErrorKind) -> ParseError {
        ParseError {
            line,
            text: text.to_string(),
            kind,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at line {}: {}, at '{}'", self.line, self.kind, self.text)
    }
}

impl std::error::Error for ParseError {}
