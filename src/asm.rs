//! Types for representing Hack assembly instructions and their parts.
//!
//! The emitted program is held as a sequence of [Instruction] values and only
//! rendered to text at the very end, so every line is well formed under the
//! grammar the downstream assembler parses: `@symbol` address instructions,
//! `dest=comp;jump` compute instructions and `(label)` anchors.

use std::fmt;

/// Destination part of a compute instruction.
///
/// Any combination of the `A`, `D` and `M` registers can receive the computed
/// value. `M` refers to the RAM word addressed by `A` at the start of the
/// instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dest {
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Dest::M => "M",
            Dest::D => "D",
            Dest::MD => "MD",
            Dest::A => "A",
            Dest::AM => "AM",
            Dest::AD => "AD",
            Dest::AMD => "AMD",
        };

        write!(f, "{}", text)
    }
}

/// Describes the predicate of a conditional jump, tested against the
/// computed value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Jump {
    /// Jump if the value is positive. (`JGT`)
    Greater,

    /// Jump if the value is zero. (`JEQ`)
    Equal,

    /// Jump if the value is non-negative. (`JGE`)
    GreaterEqual,

    /// Jump if the value is negative. (`JLT`)
    Less,

    /// Jump if the value is nonzero. (`JNE`)
    NotEqual,

    /// Jump if the value is non-positive. (`JLE`)
    LessEqual,

    /// Unconditional jump. (`JMP`)
    Unconditional,
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Jump::Greater => "JGT",
            Jump::Equal => "JEQ",
            Jump::GreaterEqual => "JGE",
            Jump::Less => "JLT",
            Jump::NotEqual => "JNE",
            Jump::LessEqual => "JLE",
            Jump::Unconditional => "JMP",
        };

        write!(f, "{}", text)
    }
}

/// The complete computation table of the Hack ALU.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Comp {
    Zero,
    One,
    MinusOne,
    D,
    A,
    M,
    NotD,
    NotA,
    NotM,
    MinusD,
    MinusA,
    MinusM,
    DPlusOne,
    APlusOne,
    MPlusOne,
    DMinusOne,
    AMinusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    DMinusM,
    AMinusD,
    MMinusD,
    DAndA,
    DAndM,
    DOrA,
    DOrM,
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Comp::Zero => "0",
            Comp::One => "1",
            Comp::MinusOne => "-1",
            Comp::D => "D",
            Comp::A => "A",
            Comp::M => "M",
            Comp::NotD => "!D",
            Comp::NotA => "!A",
            Comp::NotM => "!M",
            Comp::MinusD => "-D",
            Comp::MinusA => "-A",
            Comp::MinusM => "-M",
            Comp::DPlusOne => "D+1",
            Comp::APlusOne => "A+1",
            Comp::MPlusOne => "M+1",
            Comp::DMinusOne => "D-1",
            Comp::AMinusOne => "A-1",
            Comp::MMinusOne => "M-1",
            Comp::DPlusA => "D+A",
            Comp::DPlusM => "D+M",
            Comp::DMinusA => "D-A",
            Comp::DMinusM => "D-M",
            Comp::AMinusD => "A-D",
            Comp::MMinusD => "M-D",
            Comp::DAndA => "D&A",
            Comp::DAndM => "D&M",
            Comp::DOrA => "D|A",
            Comp::DOrM => "D|M",
        };

        write!(f, "{}", text)
    }
}

/// Operand of an address instruction: either a literal RAM/ROM address or a
/// symbol left for the assembler to resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    Constant(u16),
    Symbol(String),
}

impl From<u16> for Address {
    fn from(value: u16) -> Address {
        Address::Constant(value)
    }
}

impl From<&str> for Address {
    fn from(symbol: &str) -> Address {
        Address::Symbol(symbol.to_string())
    }
}

impl From<String> for Address {
    fn from(symbol: String) -> Address {
        Address::Symbol(symbol)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Address::Constant(value) => write!(f, "{}", value),
            Address::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// One line of the output program.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// `@address`: loads an address into the `A` register.
    At(Address),

    /// `dest=comp;jump`: computes a value, optionally stores it and
    /// optionally jumps to the address held in `A`.
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },

    /// `(label)`: binds a symbol to the address of the next instruction.
    Label(String),

    /// `// text`: ignored by the assembler.
    Comment(String),
}

impl Instruction {
    /// Anchors, like comments, occupy no instruction slot in the assembled
    /// program.
    pub fn is_executable(&self) -> bool {
        match self {
            Instruction::At(_) | Instruction::Compute { .. } => true,
            Instruction::Label(_) | Instruction::Comment(_) => false,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::At(address) => write!(f, "@{}", address),
            Instruction::Compute { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{}=", dest)?;
                }

                write!(f, "{}", comp)?;

                if let Some(jump) = jump {
                    write!(f, ";{}", jump)?;
                }

                Ok(())
            }
            Instruction::Label(label) => write!(f, "({})", label),
            Instruction::Comment(text) => write!(f, "// {}", text),
        }
    }
}

/// Shorthand for an address instruction.
pub fn at<A: Into<Address>>(address: A) -> Instruction {
    Instruction::At(address.into())
}

/// Shorthand for a `dest=comp` compute instruction.
pub fn compute(dest: Dest, comp: Comp) -> Instruction {
    Instruction::Compute {
        dest: Some(dest),
        comp,
        jump: None,
    }
}

/// Shorthand for a `comp;jump` compute instruction.
pub fn branch(comp: Comp, jump: Jump) -> Instruction {
    Instruction::Compute {
        dest: None,
        comp,
        jump: Some(jump),
    }
}
