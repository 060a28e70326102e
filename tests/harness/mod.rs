//! A minimal Hack machine for executing translated programs in tests.
//!
//! Resolves the symbols of a [Translation] the way the downstream assembler
//! does (predefined cells, label anchors, then variables from address 16 up)
//! and executes the instructions directly, without assembling to binary.

use std::collections::HashMap;

use hackvm::asm::{Address, Comp, Dest, Instruction, Jump};
use hackvm::translator::Translation;

const RAM_SIZE: usize = 32_768;
const VARIABLE_BASE: u16 = 16;

/// One executable instruction with its addresses resolved.
#[derive(Clone, Copy, Debug)]
enum Resolved {
    At(u16),
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
}

pub struct Machine {
    rom: Vec<Resolved>,
    symbols: HashMap<String, u16>,
    pub ram: Vec<i16>,
    pub a: u16,
    pub d: i16,
    pub pc: usize,
}

impl Machine {
    /// Loads a translation, resolving every symbolic address.
    pub fn load(translation: &Translation) -> Machine {
        let mut symbols: HashMap<String, u16> = predefined_symbols();

        // first pass: bind each anchor to the next instruction slot
        let mut slot = 0u16;
        for instruction in translation.instructions() {
            match instruction {
                Instruction::Label(name) => {
                    symbols.insert(name.clone(), slot);
                }
                ins if ins.is_executable() => slot += 1,
                _ => (),
            }
        }

        // second pass: resolve addresses, allocating variables from 16 up
        let mut next_variable = VARIABLE_BASE;
        let mut rom = Vec::new();

        for instruction in translation.instructions() {
            match instruction {
                Instruction::At(Address::Constant(value)) => rom.push(Resolved::At(*value)),
                Instruction::At(Address::Symbol(symbol)) => {
                    let address = *symbols.entry(symbol.clone()).or_insert_with(|| {
                        let address = next_variable;
                        next_variable += 1;
                        address
                    });

                    rom.push(Resolved::At(address));
                }
                Instruction::Compute { dest, comp, jump } => rom.push(Resolved::Compute {
                    dest: *dest,
                    comp: *comp,
                    jump: *jump,
                }),
                Instruction::Label(_) | Instruction::Comment(_) => (),
            }
        }

        Machine {
            rom,
            symbols,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
        }
    }

    /// The RAM address a symbol resolved to, if the program mentions it.
    pub fn address_of(&self, symbol: &str) -> Option<u16> {
        self.symbols.get(symbol).copied()
    }

    pub fn get(&self, symbol: &str) -> i16 {
        self.ram[self.address_of(symbol).unwrap() as usize]
    }

    pub fn sp(&self) -> i16 {
        self.ram[0]
    }

    /// Executes until the program counter runs off the end of the program or
    /// the step budget is exhausted (translated programs end in a spin loop,
    /// so a budget is the normal way to stop).
    pub fn run(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if self.pc >= self.rom.len() {
                return;
            }

            self.step();
        }
    }

    fn step(&mut self) {
        match self.rom[self.pc] {
            Resolved::At(address) => {
                self.a = address;
                self.pc += 1;
            }
            Resolved::Compute { dest, comp, jump } => {
                // M refers to the cell A addressed when the instruction
                // started, even if dest rewrites A
                let address = self.a as usize;
                let value = self.eval(comp);

                if let Some(dest) = dest {
                    if writes_m(dest) {
                        self.ram[address] = value;
                    }
                    if writes_a(dest) {
                        self.a = value as u16;
                    }
                    if writes_d(dest) {
                        self.d = value;
                    }
                }

                match jump {
                    Some(jump) if taken(jump, value) => self.pc = address,
                    _ => self.pc += 1,
                }
            }
        }
    }

    fn eval(&self, comp: Comp) -> i16 {
        let a = self.a as i16;
        let d = self.d;
        let m = self.ram[self.a as usize];

        match comp {
            Comp::Zero => 0,
            Comp::One => 1,
            Comp::MinusOne => -1,
            Comp::D => d,
            Comp::A => a,
            Comp::M => m,
            Comp::NotD => !d,
            Comp::NotA => !a,
            Comp::NotM => !m,
            Comp::MinusD => d.wrapping_neg(),
            Comp::MinusA => a.wrapping_neg(),
            Comp::MinusM => m.wrapping_neg(),
            Comp::DPlusOne => d.wrapping_add(1),
            Comp::APlusOne => a.wrapping_add(1),
            Comp::MPlusOne => m.wrapping_add(1),
            Comp::DMinusOne => d.wrapping_sub(1),
            Comp::AMinusOne => a.wrapping_sub(1),
            Comp::MMinusOne => m.wrapping_sub(1),
            Comp::DPlusA => d.wrapping_add(a),
            Comp::DPlusM => d.wrapping_add(m),
            Comp::DMinusA => d.wrapping_sub(a),
            Comp::DMinusM => d.wrapping_sub(m),
            Comp::AMinusD => a.wrapping_sub(d),
            Comp::MMinusD => m.wrapping_sub(d),
            Comp::DAndA => d & a,
            Comp::DAndM => d & m,
            Comp::DOrA => d | a,
            Comp::DOrM => d | m,
        }
    }
}

fn writes_a(dest: Dest) -> bool {
    match dest {
        Dest::A | Dest::AM | Dest::AD | Dest::AMD => true,
        _ => false,
    }
}

fn writes_d(dest: Dest) -> bool {
    match dest {
        Dest::D | Dest::MD | Dest::AD | Dest::AMD => true,
        _ => false,
    }
}

fn writes_m(dest: Dest) -> bool {
    match dest {
        Dest::M | Dest::MD | Dest::AM | Dest::AMD => true,
        _ => false,
    }
}

fn taken(jump: Jump, value: i16) -> bool {
    match jump {
        Jump::Greater => value > 0,
        Jump::Equal => value == 0,
        Jump::GreaterEqual => value >= 0,
        Jump::Less => value < 0,
        Jump::NotEqual => value != 0,
        Jump::LessEqual => value <= 0,
        Jump::Unconditional => true,
    }
}

fn predefined_symbols() -> HashMap<String, u16> {
    let mut symbols = HashMap::new();

    symbols.insert("SP".to_string(), 0);
    symbols.insert("LCL".to_string(), 1);
    symbols.insert("ARG".to_string(), 2);
    symbols.insert("THIS".to_string(), 3);
    symbols.insert("THAT".to_string(), 4);

    for register in 0u16..16 {
        symbols.insert(format!("R{}", register), register);
    }

    symbols.insert("SCREEN".to_string(), 16_384);
    symbols.insert("KBD".to_string(), 24_576);

    symbols
}
