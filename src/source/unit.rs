use crate::command::Command;
use crate::error::ParseError;

use super::parser::{classify, normalize};

/// One independently-sourced batch of VM commands sharing a static-variable
/// namespace.
///
/// The unit name (conventionally the source file's base name) is threaded
/// into `static` segment addressing, so `static 3` in two different units
/// resolves to two different cells. A unit is immutable once parsed.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    name: String,
    commands: Vec<Command>,
}

impl SourceUnit {
    /// Normalizes and classifies one unit's raw source text.
    ///
    /// Fails on the first rejected line; a unit with any malformed command
    /// is not translatable at all.
    pub fn parse<N: Into<String>>(name: N, source: &str) -> Result<SourceUnit, ParseError> {
        let commands = normalize(source)
            .map(|(line, text)| classify(line, text))
            .collect::<Result<_, _>>()?;

        Ok(SourceUnit {
            name: name.into(),
            commands,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Operator, Segment};
    use crate::error::ErrorKind;

    #[test]
    fn parse_preserves_command_order() {
        let unit = SourceUnit::parse(
            "Simple",
            "// adds two constants\npush constant 7\npush constant 8\nadd\n",
        )
        .unwrap();

        assert_eq!(unit.name(), "Simple");
        assert_eq!(unit.commands(), &[
            Command::Push {
                segment: Segment::Constant,
                index: 7,
            },
            Command::Push {
                segment: Segment::Constant,
                index: 8,
            },
            Command::Arithmetic(Operator::Add),
        ]);
    }

    #[test]
    fn parse_fails_on_first_bad_line() {
        let error = SourceUnit::parse("Bad", "push constant 1\n\npop constant 1\nadd\n")
            .unwrap_err();

        assert_eq!(error.line, 3);
        assert_eq!(error.kind, ErrorKind::MalformedCommand);
    }
}
