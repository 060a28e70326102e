//! Function calls, returns and frame bookkeeping.

mod harness;

use harness::Machine;

use hackvm::source::SourceUnit;
use hackvm::translator::Translator;

/// Translates a single unit as a full program, bootstrap included.
fn boot(source: &str) -> Machine {
    let unit = SourceUnit::parse("Sys", source).expect("could not parse the source code");
    let translation = Translator::new().translate(&[unit]);

    let mut machine = Machine::load(&translation);
    machine.run(100_000);

    machine
}

#[test]
fn test_call_and_return_round_trip() {
    let machine = boot(include_str!("sys_add2.vm"));

    // the callee's result landed in temp 0
    assert_eq!(machine.ram[5], 12);

    // the caller's pointers survived the callee clobbering them
    assert_eq!(machine.ram[3], 3000);
    assert_eq!(machine.ram[4], 3010);

    // the working stack of Sys.init is empty again
    assert_eq!(machine.sp(), 261);
    assert_eq!(machine.ram[1], 261);
    assert_eq!(machine.ram[2], 256);
}

#[test]
fn test_argument_segment_addressing() {
    // No bootstrap here so the frame arithmetic can be checked against a
    // hand-picked stack pointer.
    let source = "\
push constant 42
call Test.grab 1
label HALT
goto HALT
function Test.grab 0
push argument 0
pop temp 2
label SPIN
goto SPIN
";
    let unit = SourceUnit::parse("Test", source).expect("could not parse the source code");
    let translation = Translator::new().translate_unit(&unit);

    let mut machine = Machine::load(&translation);
    machine.ram[0] = 300;
    machine.run(1_000);

    // one argument and a five-cell frame below the callee's stack
    assert_eq!(machine.ram[2], 300);
    assert_eq!(machine.ram[300], 42);
    assert_eq!(machine.ram[1], 306);
    assert_eq!(machine.ram[7], 42);
}

#[test]
fn test_function_initializes_locals_to_zero() {
    let source = "\
function Sys.init 3
push local 0
push local 1
add
push local 2
add
pop temp 0
label HALT
goto HALT
";
    let machine = boot(source);

    assert_eq!(machine.ram[5], 0);
}

#[test]
fn test_recursive_calls() {
    let machine = boot(include_str!("recursive_sum.vm"));

    assert_eq!(machine.ram[5], 15);
    assert_eq!(machine.sp(), 261);
}

#[test]
fn test_nested_calls_restore_each_frame() {
    let source = "\
function Sys.init 0
push constant 1
call Sys.outer 1
pop temp 0
label HALT
goto HALT
function Sys.outer 1
push argument 0
pop local 0
push constant 10
call Sys.inner 1
push local 0
add
return
function Sys.inner 0
push argument 0
push constant 100
add
return
";
    let machine = boot(source);

    // inner returns 110, outer adds its local back on top
    assert_eq!(machine.ram[5], 111);
    assert_eq!(machine.sp(), 261);
}
