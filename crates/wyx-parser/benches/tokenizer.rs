use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wyx_parser::{tokenize, Arena, Diagnostics, SyntaxTree};

fn sample_source(classes: usize) -> String {
    let mut out = String::new();
    for i in 0..classes {
        out.push_str(&format!(
            "class Widget{i} {{\n\
             \x20   int count;\n\
             \x20   string name = \"widget-{i}\";\n\
             \x20   int Total(List<int> values) {{\n\
             \x20       var sum = 0;\n\
             \x20       foreach (var v in values) {{ sum += v; }}\n\
             \x20       return sum * count;\n\
             \x20   }}\n\
             \x20   int Count {{ get => count; set {{ count = value; }} }}\n\
             }}\n"
        ));
    }
    out
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for classes in [1, 16, 256] {
        let source = sample_source(classes);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(classes), &source, |b, source| {
            b.iter(|| {
                let arena = Arena::with_capacity(source.len() * 4);
                let mut diagnostics = Diagnostics::new();
                let result = tokenize(black_box(source), &mut diagnostics, &arena);
                black_box(result.tokens.len())
            });
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for classes in [1, 16, 256] {
        let source = sample_source(classes);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(classes), &source, |b, source| {
            b.iter(|| {
                let tree = SyntaxTree::parse(black_box(source));
                black_box(tree.root().members.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse);
criterion_main!(benches);
