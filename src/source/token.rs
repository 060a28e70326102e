//! Tokens and a tokenizer for normalized VM command lines.

use logos::{Lexer, Logos};

use std::fmt;

use crate::command::{Operator, Segment};

/// Enumeration of all tokens of a VM command line.
///
/// One normalized line lexes to at most three tokens; the classifier
/// dispatches on their shape.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token<'a> {
    /// Errorneous token that could not be interpreted as any of the other
    /// variants.
    #[error]
    #[regex(r"[ \t]+", logos::skip)]
    Error,

    /// An arithmetic or logical operation mnemonic.
    #[regex("add|sub|neg|eq|gt|lt|and|or|not", operator_callback)]
    Operator(Operator),

    /// A memory segment name.
    #[regex("constant|local|argument|this|that|temp|pointer|static", segment_callback)]
    Segment(Segment),

    #[token("push")]
    Push,

    #[token("pop")]
    Pop,

    #[token("label")]
    Label,

    #[token("goto")]
    Goto,

    #[token("if-goto")]
    IfGoto,

    #[token("function")]
    Function,

    #[token("call")]
    Call,

    #[token("return")]
    Return,

    /// An unsigned index or count.
    #[regex("[0-9]+", |lex| lex.slice().parse())]
    Number(u16),

    /// A label or function name. Begins with a letter and can contain the
    /// characters `A-Za-z0-9_.$:`.
    #[regex(r"[A-Za-z_.$:][A-Za-z0-9_.$:]*", Lexer::slice)]
    Symbol(&'a str),
}

fn operator_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> std::result::Result<Operator, ()> {
    match lex.slice() {
        "add" => Ok(Operator::Add),
        "sub" => Ok(Operator::Sub),
        "neg" => Ok(Operator::Neg),
        "eq" => Ok(Operator::Eq),
        "gt" => Ok(Operator::Gt),
        "lt" => Ok(Operator::Lt),
        "and" => Ok(Operator::And),
        "or" => Ok(Operator::Or),
        "not" => Ok(Operator::Not),
        _ => Err(()),
    }
}

fn segment_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> std::result::Result<Segment, ()> {
    match lex.slice() {
        "constant" => Ok(Segment::Constant),
        "local" => Ok(Segment::Local),
        "argument" => Ok(Segment::Argument),
        "this" => Ok(Segment::This),
        "that" => Ok(Segment::That),
        "temp" => Ok(Segment::Temp),
        "pointer" => Ok(Segment::Pointer),
        "static" => Ok(Segment::Static),
        _ => Err(()),
    }
}

impl<'t> fmt::Display for Token<'t> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Error => write!(f, "<error>"),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Segment(segment) => write!(f, "{}", segment),
            Token::Push => write!(f, "push"),
            Token::Pop => write!(f, "pop"),
            Token::Label => write!(f, "label"),
            Token::Goto => write!(f, "goto"),
            Token::IfGoto => write!(f, "if-goto"),
            Token::Function => write!(f, "function"),
            Token::Call => write!(f, "call"),
            Token::Return => write!(f, "return"),
            Token::Number(number) => write!(f, "{}", number),
            Token::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}
