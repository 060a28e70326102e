//! A crate for translating programs written for the Hack virtual machine
//! into symbolic assembly for the Hack computer, the minimal 16-bit machine
//! of the nand2tetris course.
//!
//! The VM is stack-oriented: arithmetic, memory-segment access, branching and
//! procedure linkage all operate on one logical stack. The target machine has
//! one data register `D`, one address register `A`, word-addressed RAM and
//! jumps keyed off `D`, so every VM command becomes a fixed sequence of
//! assembly instructions implementing that command against a stack-pointer
//! cell and a handful of fixed memory cells.
//!
//! Currently this crate provides the functionality to:
//! - Read `.vm` files containing VM commands.
//! - Translate one or more source units into a single assembly program,
//!   complete with bootstrap code and a cross-unit calling convention.
//! - Render the result in the exact grammar the downstream Hack assembler
//!   parses.
//!
//! # Example
//! ```
//! use hackvm::{
//!     source::SourceUnit,
//!     translator::Translator,
//! };
//!
//! fn main() {
//!     // Simple VM program that adds 7 and 8 and halts.
//!     let vm_source = r#"
//!         function Sys.init 0
//!         push constant 7
//!         push constant 8
//!         add
//!         label HALT
//!         goto HALT
//!     "#;
//!
//!     // Normalize and classify the source into a unit.
//!     let unit = SourceUnit::parse("Sys", vm_source).unwrap();
//!
//!     // Translate the program: bootstrap first, then the unit's code.
//!     let translation = Translator::new().translate(&[unit]);
//!
//!     // One assembly instruction per line.
//!     println!("{}", translation);
//! }
//! ```
//!
//! # Executables
//!
//! ## `hackvm-translate`
//!
//! Translates a single `.vm` file, or every `.vm` file in a directory, into
//! one `.asm` output file. Directory input is ordered lexically so repeated
//! runs produce identical output.

pub mod asm;
pub mod command;
pub mod error;
pub mod source;
pub mod translator;
