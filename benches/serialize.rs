use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xmlmapper::{serialize, ExampleSchemaInferrer, SchemaInferrer, Value};

fn order(lines: usize) -> Value {
    let items = (0..lines)
        .map(|i| {
            Value::object()
                .with("@sku", format!("SKU-{}", i))
                .with("quantity", i.to_string())
                .with("price", Value::object().with("@currency", "EUR"))
        })
        .collect::<Vec<_>>();
    Value::object()
        .with("@id", "1001")
        .with("customer", Value::object().with("name", "Alice").with("email", "a@example.com"))
        .with("line", items)
}

fn bench_serialize(c: &mut Criterion) {
    let value = order(500);
    c.bench_function("serialize 500 lines", |b| {
        b.iter(|| serialize(black_box("order"), black_box(&value)))
    });
}

fn bench_infer_example(c: &mut Criterion) {
    let xml = serialize("order", &order(500)).unwrap();
    let inferrer = ExampleSchemaInferrer::new();
    c.bench_function("infer example 500 lines", |b| {
        b.iter(|| inferrer.infer(black_box(&xml)))
    });
}

criterion_group!(benches, bench_serialize, bench_infer_example);
criterion_main!(benches);
