//! Line normalization and command classification.
//!
//! Raw source text flows through two stages: [normalize] strips blank lines
//! and comments while preserving order and line numbers, and [classify] turns
//! one surviving line into a [Command] by dispatching on its token shape.
//! Classification is where all input validation happens; the normalizer
//! passes malformed text through untouched.

use edit_distance::edit_distance;
use logos::Logos;

use crate::command::{Command, Segment};
use crate::error::{ErrorKind, ParseError};

use super::token::Token;

const COMMENT_MARKER: &str = "//";

/// All command mnemonics, for "did you mean" suggestions.
const MNEMONICS: [&str; 17] = [
    "add", "sub", "neg", "eq", "gt", "lt", "and", "or", "not", "push", "pop", "label", "goto",
    "if-goto", "function", "call", "return",
];

/// Strips blank lines and comments from raw source text.
///
/// Yields `(line number, cleaned text)` pairs in source order, with line
/// numbers starting at 1. A line survives if anything remains after trimming
/// surrounding whitespace and removing a trailing `//` comment.
pub fn normalize(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = match line.find(COMMENT_MARKER) {
                Some(start) => &line[..start],
                None => line,
            };

            let line = line.trim();

            if line.is_empty() {
                None
            } else {
                Some((index + 1, line))
            }
        })
}

/// Classifies one normalized line into a [Command].
///
/// The dispatch rule is by token count: one token is an arithmetic operation
/// or `return`, two tokens are the flow-control commands, three tokens are
/// `push`/`pop`/`function`/`call`. Everything else is fatal.
pub fn classify(line: usize, text: &str) -> Result<Command, ParseError> {
    let tokens: Vec<Token> = Token::lexer(text).collect();

    let command = match tokens.as_slice() {
        [Token::Operator(op)] => Command::Arithmetic(*op),
        [Token::Return] => Command::Return,

        [Token::Label, name] if is_name(name) => Command::Label(name.to_string()),
        [Token::Goto, name] if is_name(name) => Command::Goto(name.to_string()),
        [Token::IfGoto, name] if is_name(name) => Command::IfGoto(name.to_string()),

        [Token::Push, Token::Segment(segment), Token::Number(index)] => {
            check_index(line, text, *segment, *index)?;

            Command::Push {
                segment: *segment,
                index: *index,
            }
        }
        [Token::Pop, Token::Segment(segment), Token::Number(index)] => {
            if *segment == Segment::Constant {
                // constants are immediate values, there is no cell to pop into
                return Err(ParseError::new(line, text, ErrorKind::MalformedCommand));
            }

            check_index(line, text, *segment, *index)?;

            Command::Pop {
                segment: *segment,
                index: *index,
            }
        }

        [Token::Function, name, Token::Number(locals)] if is_name(name) => Command::Function {
            name: name.to_string(),
            locals: *locals,
        },
        [Token::Call, name, Token::Number(args)] if is_name(name) => Command::Call {
            name: name.to_string(),
            args: *args,
        },

        [Token::Push, Token::Symbol(segment), Token::Number(_)]
        | [Token::Pop, Token::Symbol(segment), Token::Number(_)] => {
            let kind = ErrorKind::UnknownSegment {
                segment: segment.to_string(),
                suggestion: suggest(segment, &Segment::NAMES),
            };

            return Err(ParseError::new(line, text, kind));
        }

        [Token::Symbol(mnemonic), ..] => {
            let kind = ErrorKind::UnknownOpcode {
                mnemonic: mnemonic.to_string(),
                suggestion: suggest(mnemonic, &MNEMONICS),
            };

            return Err(ParseError::new(line, text, kind));
        }

        _ => return Err(ParseError::new(line, text, ErrorKind::MalformedCommand)),
    };

    Ok(command)
}

/// Anything that lexes as a word can serve as a label or function name,
/// including the command mnemonics themselves.
fn is_name(token: &Token) -> bool {
    match token {
        Token::Number(_) | Token::Error => false,
        _ => true,
    }
}

fn check_index(line: usize, text: &str, segment: Segment, index: u16) -> Result<(), ParseError> {
    // pointer only ever addresses the THIS and THAT cells
    if segment == Segment::Pointer && index > 1 {
        return Err(ParseError::new(line, text, ErrorKind::MalformedCommand));
    }

    Ok(())
}

/// Picks the closest known name, or nothing when even the closest one is far
/// off.
fn suggest(name: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .map(|candidate| (edit_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}
