use criterion::{black_box, criterion_group, criterion_main, Criterion};
use teeny::compiler;

fn compile_samples(c: &mut Criterion) {
    let sources: Vec<String> = ["fib", "average", "countdown"]
        .iter()
        .map(|name| std::fs::read_to_string(format!("programs/{}.teeny", name)))
        .collect::<Result<_, _>>()
        .expect("could not read the sample programs");

    c.bench_function("compile samples", |b| {
        b.iter(|| {
            for source in sources.iter() {
                compiler::compile(black_box(source)).expect("sample program did not compile");
            }
        })
    });
}

fn compile_long_program(c: &mut Criterion) {
    let mut source = String::from("LET total = 0\n");
    for i in 0..2000 {
        source.push_str(&format!(
            "LET v{} = {} * 2 + total / 3\nIF v{} >= 10 THEN\nLET total = total + v{}\nENDIF\n",
            i, i, i, i
        ));
    }

    c.bench_function("compile long program", |b| {
        b.iter(|| compiler::compile(black_box(&source)).expect("generated program did not compile"))
    });
}

criterion_group!(benches, compile_samples, compile_long_program);
criterion_main!(benches);
