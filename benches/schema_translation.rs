//! Benchmarks for MCP → Gemini schema translation
//!
//! This benchmark measures:
//! - Translation of the produce catalog
//! - Scaling with nesting depth of object/array schemas

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

use mcp_tool_bridge::utils::schema::{count_nested_nodes, normalize_schema, to_function_declaration};
use mcp_tool_bridge::ProduceBackend;

/// Object schema nested `depth` levels deep, alternating objects and arrays.
fn nested_schema(depth: usize) -> Value {
    let mut schema = json!({ "type": "string", "description": "leaf" });
    for level in 0..depth {
        schema = if level % 2 == 0 {
            json!({
                "type": "object",
                "properties": {
                    "child": schema,
                    "label": { "type": "string" },
                    "count": { "type": "integer", "minimum": 0 }
                },
                "required": ["child"]
            })
        } else {
            json!({ "type": "array", "items": schema })
        };
    }
    schema
}

fn bench_catalog_translation(c: &mut Criterion) {
    let backend = ProduceBackend::new().expect("produce catalog");
    let catalog = backend.catalog();

    c.bench_function("translate_produce_catalog", |b| {
        b.iter(|| {
            let decls: Vec<_> = catalog.iter().map(to_function_declaration).collect();
            black_box(decls)
        })
    });
}

fn bench_nested_schemas(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_schema");

    for depth in [2usize, 8, 32] {
        let schema = nested_schema(depth);
        group.throughput(Throughput::Elements(count_nested_nodes(&schema) as u64));
        group.bench_with_input(BenchmarkId::new("depth", depth), &schema, |b, schema| {
            b.iter(|| black_box(normalize_schema(black_box(schema))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_catalog_translation, bench_nested_schemas);
criterion_main!(benches);
