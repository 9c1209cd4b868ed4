use super::*;

#[test]
fn test_assign_and_print() {
    assert_eq!(run("x := 1; print x"), "1");
}

#[test]
fn test_if_else() {
    assert_eq!(run("if 3 > 2 then println \"yes\" else println \"no\" end"), "yes\n");
    assert_eq!(run("if 2 > 3 then println \"yes\" else println \"no\" end"), "no\n");
    assert_eq!(run("if false then print 1 end print 2"), "2");
}

#[test]
fn test_while_loop() {
    assert_eq!(run("i := 0; while i < 3 do print i i := i + 1 end"), "012");
}

#[test]
fn test_nested_loops_with_block_locals() {
    let src = "
        i := 0
        while i < 3 do
            j := 0
            while j < i do
                print j
                j := j + 1
            end
            println '|'
            i := i + 1
        end
        print 'done'
    ";
    assert_eq!(run(src), "|\n0|\n01|\ndone");
}

#[test]
fn test_block_exit_restores_stack_height() {
    let src = "i := 0 while i < 50 do a := i b := a * 2 if b > 10 then c := b end i := i + 1 end";
    let code = compile(src);
    let mut vm = Vm::new(&code).unwrap();
    let mut out = Vec::new();
    vm.run(&mut out).unwrap();
    assert!(vm.stack().is_empty(), "leftover stack: {:?}", vm.stack());
    assert_eq!(vm.global("i"), Some(&Val::Num(50.0)));
}

#[test]
fn test_jump_if_false_only_branches_on_false() {
    // A number condition never takes the false branch.
    let code = vec![
        Op::Start,
        Op::Push(Val::Num(0.0)),
        Op::JumpIfFalse("skip".into()),
        Op::Push(Val::str("taken")),
        Op::Print,
        Op::Label("skip".into()),
        Op::Halt,
    ];
    assert_eq!(run_code(&code), "taken");
}

#[test]
fn test_state_transitions() {
    let code = compile("print 1");
    let mut vm = Vm::new(&code).unwrap();
    let mut out = Vec::new();
    assert_eq!(vm.state(), VmState::Ready);
    assert_eq!(vm.step(&mut out).unwrap(), VmState::Running);
    vm.run(&mut out).unwrap();
    assert_eq!(vm.state(), VmState::Halted);
    // Stepping after halt does nothing.
    let pc = vm.pc();
    assert_eq!(vm.step(&mut out).unwrap(), VmState::Halted);
    assert_eq!(vm.pc(), pc);
}
