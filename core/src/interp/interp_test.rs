use super::{InterpErrorKind, Interpreter, MAX_CALL_DEPTH, interpret_program};
use crate::{op::OpError, parse_program, run_source, val::Val, vm::CompileErrorKind};

fn interpret(src: &str) -> String {
    let program = parse_program(src).unwrap();
    let mut out = Vec::new();
    interpret_program(&program, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn interpret_err(src: &str) -> (InterpErrorKind, u32) {
    let program = parse_program(src).unwrap();
    let err = interpret_program(&program, &mut Vec::new()).unwrap_err();
    (err.kind, err.line)
}

fn compiled(src: &str) -> String {
    let mut out = Vec::new();
    run_source(src, true, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn for_counts_up_by_one_by_default() {
    assert_eq!(interpret("for i := 0, 3 do print i end"), "012");
    assert_eq!(interpret("n := 4 for i := 1, n + 1 do print i * i print ' ' end"), "1 4 9 16 ");
}

#[test]
fn for_with_explicit_step() {
    assert_eq!(interpret("for i := 1, 10, 3 do print i end"), "147");
    assert_eq!(
        interpret("for x := 0, 1, 0.25 do print x print ' ' end"),
        "0 0.25 0.5 0.75 "
    );
}

#[test]
fn for_end_is_exclusive_and_empty_ranges_skip_the_body() {
    assert_eq!(interpret("for i := 0, 0 do print i end print 'none'"), "none");
    assert_eq!(interpret("for i := 5, 1 do print i end print 'none'"), "none");
    assert_eq!(interpret("for i := 5, 1, 0 do print i end print 'none'"), "none");
}

#[test]
fn for_counter_is_reassigned_each_pass_and_survives_the_loop() {
    assert_eq!(interpret("for i := 0, 3 do i := i + 10 print i end"), "101112");
    assert_eq!(interpret("for i := 0, 3 do end println i"), "2\n");
}

#[test]
fn for_body_gets_a_fresh_scope_each_pass() {
    let src = "
        for i := 0, 3 do
            if i == 0 then seen := 'first' end
            local tmp := i * 2
            print tmp
        end
        print tmp
    ";
    assert_eq!(
        interpret_err(src),
        (InterpErrorKind::UndefinedVariable("tmp".into()), 7)
    );
}

#[test]
fn for_range_errors() {
    assert_eq!(interpret_err("for i := 0, 3, 0 do end"), (InterpErrorKind::NonPositiveStep, 1));
    assert_eq!(interpret_err("for i := 0, 3, -1 do end"), (InterpErrorKind::NonPositiveStep, 1));
    assert_eq!(
        interpret_err("for i := 'a', 3 do end"),
        (
            InterpErrorKind::NonNumericRange {
                part: "start",
                found: "string"
            },
            1
        )
    );
    assert_eq!(
        interpret_err("for i := 0,\ntrue do end"),
        (
            InterpErrorKind::NonNumericRange {
                part: "end",
                found: "bool"
            },
            2
        )
    );
}

#[test]
fn return_from_inside_for() {
    let src = "
        func first_square_over(n)
            for i := 0, 100 do
                if i * i > n then ret i end
            end
            ret -1
        end
        print first_square_over(50) print ' ' print first_square_over(100000)
    ";
    assert_eq!(interpret(src), "8 -1");
}

#[test]
fn and_or_short_circuit() {
    let src = "
        func loud(v) print 'x' ret v end
        print false and loud(true)
        print ' '
        print true or loud(false)
        print ' '
        print true and loud(true)
    ";
    assert_eq!(interpret(src), "false true xtrue");
    // The bytecode pipeline evaluates both sides.
    assert_eq!(compiled(src), "xfalse xtrue xtrue");
}

#[test]
fn xor_and_non_bool_operands_still_type_check() {
    assert_eq!(interpret("print true xor true"), "false");
    assert_eq!(
        interpret_err("print 1 and true"),
        (
            InterpErrorKind::InvalidOperands(OpError {
                op: "AND",
                left: "number",
                right: Some("bool"),
            }),
            1
        )
    );
    // A deciding left operand skips the right one, type errors included.
    assert_eq!(interpret("print false and 1"), "false");
}

#[test]
fn conditions_must_be_bool() {
    assert_eq!(
        interpret_err("if 1 then print 1 end"),
        (
            InterpErrorKind::NonBoolCondition {
                construct: "if",
                found: "number"
            },
            1
        )
    );
    assert_eq!(
        interpret_err("\nwhile 'yes' do end"),
        (
            InterpErrorKind::NonBoolCondition {
                construct: "while",
                found: "string"
            },
            2
        )
    );
}

#[test]
fn agrees_with_the_vm_without_for_loops() {
    let programs = [
        "x := 1; print x",
        "if 3 > 2 then println \"yes\" else println \"no\" end",
        "func add(a,b) ret a+b end; print add(2,3)",
        "i := 0; while i < 3 do print i i := i + 1 end",
        "println 7 + 2 * 3 println -2 ^ 2 println -7 % 3 println 1 / 0 println 'n=' + 1.5",
        "func fib(n) if n < 2 then ret n end ret fib(n - 1) + fib(n - 2) end println fib(15)",
        "x := 1 if true then local x := 5 print x end print x",
        "func even(n) if n == 0 then ret true end ret odd(n - 1) end \
         func odd(n) if n == 0 then ret false end ret even(n - 1) end \
         print even(10) print odd(7)",
        "func set() g := 2 end set() g := g + 1 print g",
        "func f() end print f()",
        "print 'tab\\there\\n'",
    ];
    for src in programs {
        assert_eq!(interpret(src), compiled(src), "{src}");
    }
}

#[test]
fn callee_cannot_see_caller_locals() {
    let src = "func peek() ret secret end\nif true then secret := 1 print peek() end";
    assert_eq!(
        interpret_err(src),
        (InterpErrorKind::UndefinedVariable("secret".into()), 1)
    );
}

#[test]
fn block_assignments_do_not_leak() {
    assert_eq!(
        interpret_err("if true then y := 1 end\nprint y"),
        (InterpErrorKind::UndefinedVariable("y".into()), 2)
    );
}

#[test]
fn function_errors() {
    assert_eq!(
        interpret_err("func f(a) end\nf(1, 2)"),
        (
            InterpErrorKind::ArityMismatch {
                name: "f".into(),
                expected: 1,
                found: 2
            },
            2
        )
    );
    assert_eq!(
        interpret_err("nope()"),
        (InterpErrorKind::UndefinedFunction("nope".into()), 1)
    );
    assert_eq!(
        interpret_err("func f() end\nprint f"),
        (InterpErrorKind::FunctionAsValue("f".into()), 2)
    );
    assert_eq!(
        interpret_err("func f() end\nif true then f := 1 end"),
        (InterpErrorKind::AssignToFunction("f".into()), 2)
    );
    assert_eq!(
        interpret_err("func f() end\nf := 2"),
        (InterpErrorKind::Declaration(CompileErrorKind::NameCollision("f".into())), 2)
    );
    assert_eq!(interpret_err("print 1\nret 1"), (InterpErrorKind::ReturnOutsideFunction, 2));
}

#[test]
fn output_before_an_error_is_kept() {
    let program = parse_program("print 'a'\nprint 1 - 'b'").unwrap();
    let mut out = Vec::new();
    let err = interpret_program(&program, &mut out).unwrap_err();
    assert_eq!(out, b"a");
    assert_eq!(err.to_string(), "[line 2] Invalid types for SUB: number and string");
}

#[test]
fn runaway_recursion_is_an_error() {
    // Generous stack so the limit, not the host stack, stops the recursion.
    let handle = std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(|| interpret_err("func down(n) ret down(n + 1) end\nprint down(0)"))
        .unwrap();
    assert_eq!(
        handle.join().unwrap(),
        (InterpErrorKind::CallDepthExceeded(MAX_CALL_DEPTH), 1)
    );
}

#[test]
fn globals_are_inspectable_after_run() {
    let program = parse_program("total := 0 for i := 1, 5 do total := total + i end").unwrap();
    let mut interp = Interpreter::new(&program).unwrap();
    interp.run(&mut Vec::new()).unwrap();
    assert_eq!(interp.global("total"), Some(&Val::Num(10.0)));
    assert_eq!(interp.global("i"), Some(&Val::Num(4.0)));
}
