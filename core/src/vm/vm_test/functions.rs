use super::*;

#[test]
fn test_call_and_return() {
    assert_eq!(run("func add(a,b) ret a+b end; print add(2,3)"), "5");
}

#[test]
fn test_default_return_value() {
    assert_eq!(run("func f() end print f()"), "false");
    assert_eq!(run("func g() ret end print g()"), "false");
}

#[test]
fn test_recursive_factorial() {
    let src = "
        func fact(n)
            if n <= 1 then ret 1 end
            ret n * fact(n - 1)
        end
        println fact(10)
    ";
    assert_eq!(run(src), "3628800\n");
}

#[test]
fn test_mutual_recursion_and_forward_reference() {
    let src = "
        println is_even(10)
        func is_even(n) if n == 0 then ret true end ret is_odd(n - 1) end
        func is_odd(n) if n == 0 then ret false end ret is_even(n - 1) end
        println is_odd(7)
    ";
    assert_eq!(run(src), "true\ntrue\n");
}

#[test]
fn test_function_locals_and_globals() {
    let src = "
        total := 0
        func accumulate(n)
            i := 0
            while i < n do
                total := total + i
                i := i + 1
            end
            ret i
        end
        print accumulate(5) print ' ' print total
    ";
    assert_eq!(run(src), "5 10");
}

#[test]
fn test_call_inside_block_with_live_locals() {
    let src = "
        func sq(x) ret x * x end
        if true then
            a := 3
            b := sq(a) + sq(a + 1)
            print a print ',' print b
        end
    ";
    assert_eq!(run(src), "3,25");
}

/// Stack height after a call returns is the height before the arguments were
/// pushed plus one, at every nesting depth.
#[test]
fn test_call_return_stack_depth() {
    let src = "
        func inner(a, b, c) local t := a + b ret t + c end
        func outer(x) if true then y := x * 2 ret inner(x, y, 1) end end
        if true then keep := 7 print outer(inner(1, 2, 3)) end
    ";
    let code = compile(src);
    let mut vm = Vm::new(&code).unwrap();
    let mut out = Vec::new();
    // (stack height before the arguments were pushed, frame depth) per pending call
    let mut pending: Vec<(usize, usize)> = Vec::new();
    let mut checked = 0;

    while vm.state() != VmState::Halted {
        let pc = vm.pc();
        let depth = vm.frame_depth();
        if let Op::Call(_, argc) = &code[pc] {
            pending.push((vm.stack().len() - argc, depth));
        }
        let was_return = code[pc] == Op::Return;
        vm.step(&mut out).unwrap();
        if was_return {
            let (before, frame_depth) = pending.pop().unwrap();
            assert_eq!(vm.stack().len(), before + 1);
            assert_eq!(vm.frame_depth(), frame_depth);
            checked += 1;
        }
    }
    assert_eq!(checked, 3);
    assert_eq!(String::from_utf8(out).unwrap(), "19");
}

#[test]
fn test_frame_pointer_is_first_argument() {
    let code = compile("func f(a, b) ret a end x := 10 print f(x, 2)");
    let mut vm = Vm::new(&code).unwrap();
    let mut out = Vec::new();
    while !matches!(code[vm.pc()], Op::Call(..)) {
        vm.step(&mut out).unwrap();
    }
    let height = vm.stack().len();
    vm.step(&mut out).unwrap();
    assert_eq!(vm.frame_depth(), 1);
    assert_eq!(vm.bp(), height - 2);
    assert_eq!(vm.frames()[0].name, "f");
    assert_eq!(vm.stack()[vm.bp()], Val::Num(10.0));
}

#[test]
fn test_deep_recursion() {
    let src = "func count(n) if n == 0 then ret 0 end ret 1 + count(n - 1) end print count(2000)";
    assert_eq!(run(src), "2000");
}
