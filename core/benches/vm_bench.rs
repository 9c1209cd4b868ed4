use criterion::{Criterion, criterion_group, criterion_main};
use nv_core::{interp, parse_program, vm};
use std::hint::black_box;
use std::io;

const LOOP_SRC: &str = "
    i := 0
    acc := 0
    while i < 10000 do
        acc := acc + i % 7
        i := i + 1
    end
";

const FIB_SRC: &str = "
    func fib(n)
        if n < 2 then ret n end
        ret fib(n - 1) + fib(n - 2)
    end
    x := fib(20)
";

const BLOCK_SRC: &str = "
    i := 0
    while i < 5000 do
        a := i * 2
        if a > 10 then
            b := a - 10
            c := b + 'x'
        end
        i := i + 1
    end
";

fn compile(src: &str) -> Vec<vm::Op> {
    vm::compile_program(&parse_program(src).unwrap()).unwrap()
}

fn run(code: &[vm::Op]) {
    let mut machine = vm::Vm::new(code).unwrap();
    machine.run(&mut io::sink()).unwrap();
    black_box(machine.global("i").cloned());
}

fn vm_bench(c: &mut Criterion) {
    let loop_code = compile(LOOP_SRC);
    let fib_code = compile(FIB_SRC);
    let block_code = compile(BLOCK_SRC);

    c.bench_function("vm_while_loop_10k", |b| b.iter(|| run(black_box(&loop_code))));
    c.bench_function("vm_recursive_fib_20", |b| b.iter(|| run(black_box(&fib_code))));
    c.bench_function("vm_block_locals_5k", |b| b.iter(|| run(black_box(&block_code))));
}

fn compile_bench(c: &mut Criterion) {
    let src = format!("{FIB_SRC}{}", BLOCK_SRC.repeat(20));
    c.bench_function("compile_fold_and_lower", |b| {
        b.iter(|| {
            let program = parse_program(black_box(&src)).unwrap().fold_constants();
            black_box(vm::compile_program(&program).unwrap())
        })
    });
}

fn interp_bench(c: &mut Criterion) {
    let loop_program = parse_program(LOOP_SRC).unwrap();
    let fib_program = parse_program(FIB_SRC).unwrap();

    c.bench_function("interp_while_loop_10k", |b| {
        b.iter(|| interp::interpret_program(black_box(&loop_program), &mut io::sink()).unwrap())
    });
    c.bench_function("interp_recursive_fib_20", |b| {
        b.iter(|| interp::interpret_program(black_box(&fib_program), &mut io::sink()).unwrap())
    });
}

criterion_group!(benches, vm_bench, compile_bench, interp_bench);
criterion_main!(benches);
