//! Types for representing VM commands and their parts.

use std::fmt;

/// The eight memory segments of the VM's address space.
///
/// Each segment has its own addressing rule, which the code generator
/// dispatches on: `local`, `argument`, `this` and `that` are addressed
/// indirectly through a base cell, `temp` and `pointer` occupy fixed cells,
/// `static` resolves to a per-unit symbol and `constant` is not backed by
/// memory at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Immediate values. Can only be pushed.
    Constant,

    /// The current function's local variables. Based at `LCL`.
    Local,

    /// The current function's arguments. Based at `ARG`.
    Argument,

    /// The current object's fields. Based at `THIS`.
    This,

    /// Array cells addressed through `THAT`.
    That,

    /// Eight fixed scratch cells starting at RAM address 5.
    Temp,

    /// The `THIS` and `THAT` base cells themselves, at indexes 0 and 1.
    Pointer,

    /// Per-unit static variables, resolved to `<unit>.<index>` symbols.
    Static,
}

impl Segment {
    /// The first RAM address of the `temp` segment.
    pub const TEMP_BASE: u16 = 5;

    /// The predefined symbol of the cell holding this segment's base
    /// address, for the four indirectly addressed segments.
    pub fn base_symbol(&self) -> Option<&'static str> {
        match self {
            Segment::Local => Some("LCL"),
            Segment::Argument => Some("ARG"),
            Segment::This => Some("THIS"),
            Segment::That => Some("THAT"),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Temp => "temp",
            Segment::Pointer => "pointer",
            Segment::Static => "static",
        }
    }

    /// All segment names, for "did you mean" suggestions.
    pub(crate) const NAMES: [&'static str; 8] = [
        "constant", "local", "argument", "this", "that", "temp", "pointer", "static",
    ];
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The nine arithmetic and logical stack operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    /// Binary addition.
    Add,

    /// Binary subtraction. The top element is subtracted from the one below.
    Sub,

    /// Unary arithmetic negation.
    Neg,

    /// Comparison for equality. Pushes -1 (true) or 0 (false).
    Eq,

    /// `x > y` where `y` is the top element.
    Gt,

    /// `x < y` where `y` is the top element.
    Lt,

    /// Bitwise and.
    And,

    /// Bitwise or.
    Or,

    /// Unary bitwise complement.
    Not,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Neg => "neg",
            Operator::Eq => "eq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        };

        write!(f, "{}", name)
    }
}

/// One classified VM command.
///
/// Commands are immutable value objects, produced by the classifier in
/// source order and consumed exactly once by the code generator.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `push <segment> <index>`
    Push { segment: Segment, index: u16 },

    /// `pop <segment> <index>`
    Pop { segment: Segment, index: u16 },

    /// An arithmetic or logical operation on the stack.
    Arithmetic(Operator),

    /// `label <name>`: a jump target, scoped to the enclosing function.
    Label(String),

    /// `goto <name>`: an unconditional jump.
    Goto(String),

    /// `if-goto <name>`: pops the stack and jumps iff the value is nonzero.
    IfGoto(String),

    /// `function <name> <nLocals>`: a function entry point with `nLocals`
    /// zero-initialized local variables.
    Function { name: String, locals: u16 },

    /// `call <name> <nArgs>`: a call with `nArgs` arguments already pushed.
    Call { name: String, args: u16 },

    /// `return`: tears down the current frame and resumes the caller.
    Return,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Push { segment, index } => write!(f, "push {} {}", segment, index),
            Command::Pop { segment, index } => write!(f, "pop {} {}", segment, index),
            Command::Arithmetic(op) => write!(f, "{}", op),
            Command::Label(name) => write!(f, "label {}", name),
            Command::Goto(name) => write!(f, "goto {}", name),
            Command::IfGoto(name) => write!(f, "if-goto {}", name),
            Command::Function { name, locals } => write!(f, "function {} {}", name, locals),
            Command::Call { name, args } => write!(f, "call {} {}", name, args),
            Command::Return => write!(f, "return"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_canonical_text() {
        let cases: Vec<(Command, &str)> = vec![
            (
                Command::Push {
                    segment: Segment::Constant,
                    index: 7,
                },
                "push constant 7",
            ),
            (
                Command::Pop {
                    segment: Segment::That,
                    index: 2,
                },
                "pop that 2",
            ),
            (Command::Arithmetic(Operator::Add), "add"),
            (Command::IfGoto("LOOP".into()), "if-goto LOOP"),
            (
                Command::Function {
                    name: "Main.fib".into(),
                    locals: 2,
                },
                "function Main.fib 2",
            ),
            (
                Command::Call {
                    name: "Main.fib".into(),
                    args: 1,
                },
                "call Main.fib 1",
            ),
            (Command::Return, "return"),
        ];

        for (command, text) in cases {
            assert_eq!(command.to_string(), text);
        }
    }

    #[test]
    fn base_symbols() {
        assert_eq!(Segment::Local.base_symbol(), Some("LCL"));
        assert_eq!(Segment::Argument.base_symbol(), Some("ARG"));
        assert_eq!(Segment::This.base_symbol(), Some("THIS"));
        assert_eq!(Segment::That.base_symbol(), Some("THAT"));
        assert_eq!(Segment::Temp.base_symbol(), None);
        assert_eq!(Segment::Constant.base_symbol(), None);
    }
}
