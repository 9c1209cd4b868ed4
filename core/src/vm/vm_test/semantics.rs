use super::*;

#[test]
fn test_arithmetic_matches_folding() {
    for (src, expected) in [
        ("print 7 + 2 * 3", "13"),
        ("print (7 + 2) * 3", "27"),
        ("print 10 - 4 - 3", "3"),
        ("print 2 ^ 3 ^ 2", "512"),
        ("print -2 ^ 2", "-4"),
        ("print 7 / 2", "3.5"),
        ("print -7 % 3", "2"),
        ("print 1 / 3", "0.3333333333333333"),
    ] {
        let unfolded = compile_program(&parse_program(src).unwrap()).unwrap();
        let folded = compile_program(&parse_program(src).unwrap().fold_constants()).unwrap();
        assert_eq!(run_code(&unfolded), expected, "{src}");
        assert_eq!(run_code(&folded), expected, "{src} (folded)");
    }
}

#[test]
fn test_string_concat_is_order_sensitive() {
    assert_eq!(run("x := 4 print 'n=' + x"), "n=4");
    assert_eq!(run("x := 4 print x + 'px'"), "4px");
    assert_eq!(run("x := 1.5 print 'v' + x + true"), "v1.5true");
}

#[test]
fn test_shadowed_name_restored_after_block() {
    let src = "
        func f(x)
            if true then
                local x := 'inner'
                print x
                if true then
                    local x := 'innermost'
                    print x
                end
                print x
            end
            print x
        end
        f('outer')
    ";
    assert_eq!(run(src), "innerinnermostinnerouter");
}

#[test]
fn test_local_initializer_reads_outer_binding() {
    assert_eq!(run("func f(n) if true then local n := n * 10 print n end print n end f(3)"), "303");
}

#[test]
fn test_equality_across_kinds() {
    assert_eq!(run("print 1 == '1'"), "false");
    assert_eq!(run("print 1 ~= '1'"), "true");
    assert_eq!(run("print 'a' == 'a'"), "true");
    assert_eq!(run("print true == 1"), "false");
}

#[test]
fn test_logic_evaluates_both_sides() {
    let src = "
        calls := 0
        func touch(v) calls := calls + 1 ret v end
        r := touch(false) and touch(true)
        print r print calls
    ";
    assert_eq!(run(src), "false2");
}

#[test]
fn test_not_and_xor() {
    assert_eq!(run("print ~true print ~(1 > 2) print true xor true"), "falsetruefalse");
}

#[test]
fn test_print_decodes_escapes() {
    assert_eq!(run(r#"print "a\tb\n""#), "a\tb\n");
    assert_eq!(run(r#"println 'it\'s'"#), "it's\n");
    assert_eq!(run(r#"x := "\x41" print x + "\q""#), "A\\q");
}

#[test]
fn test_number_formatting() {
    assert_eq!(run("print 3.0 println '' print 0.1 + 0.2"), "3\n0.30000000000000004");
    assert_eq!(run("print 1 / 0 print ' ' print -1 / 0"), "inf -inf");
    assert_eq!(run("print 0 / 0"), "NaN");
}

#[test]
fn test_running_twice_is_idempotent() {
    let code = compile("x := 2 func sq(n) ret n * n end while x < 100 do x := sq(x) print x end");
    let first = run_code(&code);
    let second = run_code(&code);
    assert_eq!(first, "416256");
    assert_eq!(first, second);
}

#[test]
fn test_runtime_type_errors() {
    let cases = [
        ("print true + 1", "Invalid types for ADD: bool and number"),
        ("print 'a' - 1", "Invalid types for SUB: string and number"),
        ("print 1 < 'b'", "Invalid types for LT: number and string"),
        ("print 1 and true", "Invalid types for AND: number and bool"),
        ("print -'x'", "Invalid type for NEG: string"),
        ("if 1 then print 1 end print ~1", "Invalid types for XOR: number and bool"),
    ];
    for (src, msg) in cases {
        let code = compile(src);
        let mut out = Vec::new();
        let err = Vm::new(&code).unwrap().run(&mut out).unwrap_err();
        let VmErrorKind::InvalidOperands(op_err) = &err.kind else {
            panic!("{src}: unexpected error {err}");
        };
        assert_eq!(op_err.to_string(), msg, "{src}");
        assert!(matches!(
            code[err.pc],
            Op::Add | Op::Sub | Op::Lt | Op::And | Op::Neg | Op::Xor
        ));
    }
}

#[test]
fn test_output_before_error_is_kept() {
    let code = compile("print 'before' print true * 2");
    let mut out = Vec::new();
    assert!(Vm::new(&code).unwrap().run(&mut out).is_err());
    assert_eq!(out, b"before");
}

#[test]
fn test_undefined_global_at_runtime() {
    let code = compile("print x x := 1");
    assert_eq!(run_err(&code), (VmErrorKind::UndefinedGlobal("x".into()), 1));
}

#[test]
fn test_bytecode_level_errors() {
    assert_eq!(
        run_err(&[Op::Start, Op::Jump("nowhere".into()), Op::Halt]),
        (VmErrorKind::UnknownLabel("nowhere".into()), 1)
    );
    assert_eq!(run_err(&[Op::Start, Op::Add, Op::Halt]), (VmErrorKind::StackUnderflow, 1));
    assert_eq!(
        run_err(&[Op::Start, Op::Push(Val::Num(1.0)), Op::Return, Op::Halt]),
        (VmErrorKind::ReturnWithoutFrame, 2)
    );
    assert_eq!(
        run_err(&[Op::Start, Op::LoadLocal(3), Op::Halt]),
        (VmErrorKind::LocalOutOfRange(3), 1)
    );
    assert_eq!(
        run_err(&[Op::Start, Op::LoadLocal(usize::MAX), Op::Halt]),
        (VmErrorKind::LocalOutOfRange(usize::MAX), 1)
    );
    assert_eq!(
        run_err(&[Op::Start, Op::Push(Val::Num(1.0)), Op::StoreLocal(usize::MAX), Op::Halt]),
        (VmErrorKind::LocalOutOfRange(usize::MAX), 2)
    );
    assert_eq!(
        run_err(&[Op::Start, Op::Push(Val::Num(1.0)), Op::StoreLocal(1 << 40), Op::Halt]),
        (VmErrorKind::LocalOutOfRange(1 << 40), 2)
    );
    assert_eq!(run_err(&[Op::Start, Op::Push(Val::Num(1.0))]), (VmErrorKind::PcOutOfRange, 2));
    assert_eq!(run_err(&[Op::Print, Op::Halt]), (VmErrorKind::NotRunning, 0));
}

#[test]
fn test_duplicate_label_rejected_at_load() {
    let code = [Op::Start, Op::Label("a".into()), Op::Label("a".into()), Op::Halt];
    let err = Vm::new(&code).err().unwrap();
    assert_eq!(err.kind, VmErrorKind::DuplicateLabel("a".into()));
    assert_eq!(err.pc, 2);
}

#[test]
fn test_store_local_grows_stack_with_placeholder() {
    let code = [
        Op::Start,
        Op::Push(Val::Num(9.0)),
        Op::StoreLocal(2),
        Op::Halt,
    ];
    let mut vm = Vm::new(&code).unwrap();
    vm.run(&mut Vec::new()).unwrap();
    assert_eq!(vm.stack(), &[Val::Bool(false), Val::Bool(false), Val::Num(9.0)]);
}
