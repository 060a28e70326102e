//! Reading VM source text into classified commands.

pub mod parser;
pub mod token;
mod unit;

pub use self::unit::SourceUnit;
