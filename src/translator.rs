//! Translation from classified VM commands to Hack assembly.

use itertools::Itertools;
use slog::{o, trace, Discard, Logger};

use std::fmt;

use crate::asm::{at, branch, compute, Comp, Dest, Instruction, Jump};
use crate::command::{Command, Operator, Segment};
use crate::source::SourceUnit;

/// The first RAM address of the general-purpose stack.
const STACK_BASE: u16 = 256;

/// The function the bootstrap code transfers control to.
const ENTRY_POINT: &str = "Sys.init";

/// Words a call pushes before the callee's frame begins: the return address
/// plus the four saved base cells.
const FRAME_SIZE: u16 = 5;

/// Scratch cell holding a computed address while popping, and the end-frame
/// pointer while returning.
const SCRATCH_POINTER: &str = "R13";

/// Scratch cell holding the return address while the frame below it is torn
/// down.
const SCRATCH_RETURN: &str = "R14";

/// The append-only output stream of a translation run.
///
/// Once appended, an instruction is never edited or reordered; the final
/// content of the stream is the complete translation. `Display` renders one
/// instruction per line, in the grammar the downstream assembler parses.
#[derive(Clone, Debug, Default)]
pub struct Translation {
    instructions: Vec<Instruction>,
}

impl Translation {
    fn new() -> Translation {
        Translation::default()
    }

    fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.instructions.iter().join("\n"))
    }
}

/// Translates source units into one output program.
///
/// The translator owns the label counter shared by every unit of a run: a
/// monotonically increasing integer minting globally unique comparison and
/// return-address labels. The counter is never reset, so a single translator
/// can safely translate any number of units, or the same unit repeatedly,
/// without ever reusing a label.
pub struct Translator {
    counter: usize,
    unit: String,
    function: Option<String>,
    logger: Logger,
}

impl Translator {
    pub fn new() -> Translator {
        Translator::with_logger(None)
    }

    pub fn with_logger<L>(logger: L) -> Translator
    where
        L: Into<Option<Logger>>,
    {
        let logger = logger
            .into()
            .unwrap_or(Logger::root(Discard, o!()))
            .new(o!("stage" => "translation"));

        Translator {
            counter: 0,
            unit: String::new(),
            function: None,
            logger,
        }
    }

    /// Translates a whole program: bootstrap code first, then each unit's
    /// code in the order given.
    ///
    /// The caller decides the unit order; for directory input it should be
    /// deterministic so that repeated runs produce identical output.
    pub fn translate(&mut self, units: &[SourceUnit]) -> Translation {
        let mut out = Translation::new();

        self.emit_bootstrap(&mut out);

        for unit in units {
            self.emit_unit(unit, &mut out);
        }

        out
    }

    /// Translates a single unit without bootstrap code.
    ///
    /// The produced fragment assumes the stack pointer is already
    /// initialized. Useful for inspecting the code of one unit in isolation.
    pub fn translate_unit(&mut self, unit: &SourceUnit) -> Translation {
        let mut out = Translation::new();
        self.emit_unit(unit, &mut out);
        out
    }

    fn fresh_label(&mut self) -> String {
        self.counter += 1;
        format!("LABEL_{}", self.counter)
    }

    fn return_label(&mut self, callee: &str) -> String {
        self.counter += 1;
        format!("{}$ret.{}", callee, self.counter)
    }

    /// VM labels are scoped to the enclosing function, so identical raw
    /// label text in two functions anchors two different addresses.
    fn scoped_label(&self, name: &str) -> String {
        match &self.function {
            Some(function) => format!("{}${}", function, name),
            None => name.to_string(),
        }
    }

    fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.unit, index)
    }

    /// SP = 256, then a perfectly ordinary `call Sys.init 0`.
    fn emit_bootstrap(&mut self, out: &mut Translation) {
        out.push(Instruction::Comment("bootstrap".to_string()));
        out.push(at(STACK_BASE));
        out.push(compute(Dest::D, Comp::A));
        out.push(at("SP"));
        out.push(compute(Dest::M, Comp::D));

        self.emit_command(
            &Command::Call {
                name: ENTRY_POINT.to_string(),
                args: 0,
            },
            out,
        );
    }

    fn emit_unit(&mut self, unit: &SourceUnit, out: &mut Translation) {
        self.unit = unit.name().to_string();
        self.function = None;

        let logger = self.logger.new(o!("unit" => unit.name().to_string()));

        for command in unit.commands() {
            trace!(logger, "translate command";
                "command" => %command,
                "offset" => out.instructions().len());

            self.emit_command(command, out);
        }
    }

    fn emit_command(&mut self, command: &Command, out: &mut Translation) {
        out.push(Instruction::Comment(command.to_string()));

        match command {
            Command::Push { segment, index } => self.emit_push(*segment, *index, out),
            Command::Pop { segment, index } => self.emit_pop(*segment, *index, out),
            Command::Arithmetic(op) => self.emit_arithmetic(*op, out),

            Command::Label(name) => {
                out.push(Instruction::Label(self.scoped_label(name)));
            }
            Command::Goto(name) => {
                out.push(at(self.scoped_label(name)));
                out.push(branch(Comp::Zero, Jump::Unconditional));
            }
            Command::IfGoto(name) => {
                // branches iff the popped value is nonzero
                self.emit_pop_d(out);
                out.push(at(self.scoped_label(name)));
                out.push(branch(Comp::D, Jump::NotEqual));
            }

            Command::Function { name, locals } => self.emit_function(name, *locals, out),
            Command::Call { name, args } => self.emit_call(name, *args, out),
            Command::Return => self.emit_return(out),
        }
    }

    /// Pushes the value in `D` and increments `SP`.
    fn emit_push_d(&self, out: &mut Translation) {
        out.push(at("SP"));
        out.push(compute(Dest::A, Comp::M));
        out.push(compute(Dest::M, Comp::D));
        out.push(at("SP"));
        out.push(compute(Dest::M, Comp::MPlusOne));
    }

    /// Decrements `SP` and reads the popped value into `D`, leaving `A` at
    /// the popped cell.
    fn emit_pop_d(&self, out: &mut Translation) {
        out.push(at("SP"));
        out.push(compute(Dest::AM, Comp::MMinusOne));
        out.push(compute(Dest::D, Comp::M));
    }

    fn emit_push(&mut self, segment: Segment, index: u16, out: &mut Translation) {
        match segment {
            Segment::Constant => {
                out.push(at(index));
                out.push(compute(Dest::D, Comp::A));
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = segment.base_symbol().unwrap();

                out.push(at(base));
                out.push(compute(Dest::D, Comp::M));
                out.push(at(index));
                out.push(compute(Dest::A, Comp::DPlusA));
                out.push(compute(Dest::D, Comp::M));
            }
            Segment::Temp => {
                out.push(at(Segment::TEMP_BASE + index));
                out.push(compute(Dest::D, Comp::M));
            }
            Segment::Pointer => {
                out.push(at(pointer_symbol(index)));
                out.push(compute(Dest::D, Comp::M));
            }
            Segment::Static => {
                out.push(at(self.static_symbol(index)));
                out.push(compute(Dest::D, Comp::M));
            }
        }

        self.emit_push_d(out);
    }

    fn emit_pop(&mut self, segment: Segment, index: u16, out: &mut Translation) {
        match segment {
            // the classifier rejects `pop constant`
            Segment::Constant => unreachable!(),

            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = segment.base_symbol().unwrap();

                out.push(at(base));
                out.push(compute(Dest::D, Comp::M));
                out.push(at(index));
                out.push(compute(Dest::D, Comp::DPlusA));
                out.push(at(SCRATCH_POINTER));
                out.push(compute(Dest::M, Comp::D));

                self.emit_pop_d(out);

                out.push(at(SCRATCH_POINTER));
                out.push(compute(Dest::A, Comp::M));
                out.push(compute(Dest::M, Comp::D));
            }

            Segment::Temp => {
                self.emit_pop_d(out);
                out.push(at(Segment::TEMP_BASE + index));
                out.push(compute(Dest::M, Comp::D));
            }
            Segment::Pointer => {
                self.emit_pop_d(out);
                out.push(at(pointer_symbol(index)));
                out.push(compute(Dest::M, Comp::D));
            }
            Segment::Static => {
                self.emit_pop_d(out);
                out.push(at(self.static_symbol(index)));
                out.push(compute(Dest::M, Comp::D));
            }
        }
    }

    fn emit_arithmetic(&mut self, op: Operator, out: &mut Translation) {
        match op {
            // addition, and and or are commutative, so the D+M comps the
            // target machine actually has preserve the operand order
            Operator::Add => self.emit_binary(Comp::DPlusM, out),
            Operator::And => self.emit_binary(Comp::DAndM, out),
            Operator::Or => self.emit_binary(Comp::DOrM, out),

            // second-from-top minus top
            Operator::Sub => self.emit_binary(Comp::MMinusD, out),

            Operator::Neg => self.emit_unary(Comp::MinusM, out),
            Operator::Not => self.emit_unary(Comp::NotM, out),

            Operator::Eq => self.emit_compare(Jump::Equal, out),
            Operator::Gt => self.emit_compare(Jump::Greater, out),
            Operator::Lt => self.emit_compare(Jump::Less, out),
        }
    }

    /// Pops the top element into `D` and combines it into the new top in
    /// place.
    fn emit_binary(&self, comp: Comp, out: &mut Translation) {
        self.emit_pop_d(out);
        out.push(compute(Dest::A, Comp::AMinusOne));
        out.push(compute(Dest::M, comp));
    }

    /// Overwrites the top element in place, without moving `SP`.
    fn emit_unary(&self, comp: Comp, out: &mut Translation) {
        out.push(at("SP"));
        out.push(compute(Dest::A, Comp::MMinusOne));
        out.push(compute(Dest::M, comp));
    }

    /// Computes (second-from-top − top) and replaces both with the all-ones
    /// true pattern or the all-zeros false pattern, depending on `jump`.
    ///
    /// Every comparison mints two labels from the shared counter; no label
    /// is ever reused across comparisons or across units.
    fn emit_compare(&mut self, jump: Jump, out: &mut Translation) {
        let true_label = self.fresh_label();
        let end_label = self.fresh_label();

        self.emit_pop_d(out);
        out.push(compute(Dest::A, Comp::AMinusOne));
        out.push(compute(Dest::D, Comp::MMinusD));
        out.push(at(true_label.clone()));
        out.push(branch(Comp::D, jump));

        out.push(at("SP"));
        out.push(compute(Dest::A, Comp::MMinusOne));
        out.push(compute(Dest::M, Comp::Zero));
        out.push(at(end_label.clone()));
        out.push(branch(Comp::Zero, Jump::Unconditional));

        out.push(Instruction::Label(true_label));
        out.push(at("SP"));
        out.push(compute(Dest::A, Comp::MMinusOne));
        out.push(compute(Dest::M, Comp::MinusOne));

        out.push(Instruction::Label(end_label));
    }

    /// Anchors the function's entry point and allocates `locals`
    /// zero-initialized local slots on top of the stack.
    fn emit_function(&mut self, name: &str, locals: u16, out: &mut Translation) {
        out.push(Instruction::Label(name.to_string()));
        self.function = Some(name.to_string());

        let zero = Command::Push {
            segment: Segment::Constant,
            index: 0,
        };

        for _ in 0..locals {
            self.emit_command(&zero, out);
        }
    }

    /// Saves the caller's frame, repoints `ARG` and `LCL` for the callee and
    /// jumps, leaving a freshly minted return anchor behind.
    fn emit_call(&mut self, name: &str, args: u16, out: &mut Translation) {
        let return_label = self.return_label(name);

        // push the return address
        out.push(at(return_label.clone()));
        out.push(compute(Dest::D, Comp::A));
        self.emit_push_d(out);

        // push the caller's base cells, in frame order
        for base in &["LCL", "ARG", "THIS", "THAT"] {
            out.push(at(*base));
            out.push(compute(Dest::D, Comp::M));
            self.emit_push_d(out);
        }

        // ARG = SP - 5 - args
        out.push(at(args));
        out.push(compute(Dest::D, Comp::A));
        out.push(at(FRAME_SIZE));
        out.push(compute(Dest::D, Comp::DPlusA));
        out.push(at("SP"));
        out.push(compute(Dest::D, Comp::MMinusD));
        out.push(at("ARG"));
        out.push(compute(Dest::M, Comp::D));

        // LCL = SP
        out.push(at("SP"));
        out.push(compute(Dest::D, Comp::M));
        out.push(at("LCL"));
        out.push(compute(Dest::M, Comp::D));

        out.push(at(name));
        out.push(branch(Comp::Zero, Jump::Unconditional));

        out.push(Instruction::Label(return_label));
    }

    /// Tears down the current frame: stores the return value at the caller's
    /// top of stack, restores the caller's base cells by walking backward
    /// from the end frame, and jumps to the saved return address.
    ///
    /// The restore order is load-bearing: `ARG` is consumed before it is
    /// restored, and `LCL` goes last because the end-frame pointer is
    /// derived from it.
    fn emit_return(&mut self, out: &mut Translation) {
        // R13 = LCL, the address one past the end of the saved frame
        out.push(at("LCL"));
        out.push(compute(Dest::D, Comp::M));
        out.push(at(SCRATCH_POINTER));
        out.push(compute(Dest::M, Comp::D));

        // R14 = *(frame - 5), the return address
        out.push(at(FRAME_SIZE));
        out.push(compute(Dest::A, Comp::DMinusA));
        out.push(compute(Dest::D, Comp::M));
        out.push(at(SCRATCH_RETURN));
        out.push(compute(Dest::M, Comp::D));

        // *ARG = pop(), the return value lands where the caller expects
        // its new top of stack
        self.emit_pop_d(out);
        out.push(at("ARG"));
        out.push(compute(Dest::A, Comp::M));
        out.push(compute(Dest::M, Comp::D));

        // SP = ARG + 1
        out.push(at("ARG"));
        out.push(compute(Dest::D, Comp::MPlusOne));
        out.push(at("SP"));
        out.push(compute(Dest::M, Comp::D));

        // restore the caller's base cells, newest save first
        for base in &["THAT", "THIS", "ARG", "LCL"] {
            out.push(at(SCRATCH_POINTER));
            out.push(compute(Dest::AM, Comp::MMinusOne));
            out.push(compute(Dest::D, Comp::M));
            out.push(at(*base));
            out.push(compute(Dest::M, Comp::D));
        }

        out.push(at(SCRATCH_RETURN));
        out.push(compute(Dest::A, Comp::M));
        out.push(branch(Comp::Zero, Jump::Unconditional));
    }
}

impl Default for Translator {
    fn default() -> Translator {
        Translator::new()
    }
}

fn pointer_symbol(index: u16) -> &'static str {
    match index {
        0 => "THIS",
        // the classifier rejects indexes above 1
        _ => "THAT",
    }
}
