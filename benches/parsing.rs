use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tagconf::{ini, json, IniDocument, JsonOptions, OrderedMultimap};

fn sample_ini(sections: usize, keys: usize) -> String {
    let mut doc = IniDocument::new();
    for s in 0..sections {
        let section = format!("Section{}", s);
        for k in 0..keys {
            doc.add(&section, &format!("key{}", k), format!("value {} {}", s, k));
        }
    }
    ini::to_string(&doc)
}

fn sample_json(items: usize) -> String {
    let mut text = String::from("{ \"items\": [");
    for i in 0..items {
        if i > 0 {
            text.push(',');
        }
        text.push_str(&format!(
            "{{ \"id\": {}, name: item {}, \"ratio\": {}.5, \"on\": true, \"tags\": [a, b] }}",
            i, i, i
        ));
    }
    text.push_str("] }");
    text
}

fn benchmark_ini(c: &mut Criterion) {
    let mut group = c.benchmark_group("ini");
    for sections in [1, 10, 100] {
        let text = sample_ini(sections, 20);
        group.bench_with_input(BenchmarkId::new("parse", sections), &text, |b, text| {
            b.iter(|| ini::from_str(black_box(text)).unwrap())
        });
        let doc = ini::from_str(&text).unwrap();
        group.bench_with_input(BenchmarkId::new("write", sections), &doc, |b, doc| {
            b.iter(|| ini::to_string(black_box(doc)))
        });
    }
    group.finish();
}

fn benchmark_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("json");
    for items in [10, 100, 1000] {
        let text = sample_json(items);
        group.bench_with_input(BenchmarkId::new("parse", items), &text, |b, text| {
            b.iter(|| json::from_str(black_box(text)).unwrap())
        });
        let doc = json::from_str(&text).unwrap();
        group.bench_with_input(BenchmarkId::new("write", items), &doc, |b, doc| {
            b.iter(|| json::to_string(black_box(doc.root()), &JsonOptions::new()))
        });
        group.bench_with_input(BenchmarkId::new("find", items), &doc, |b, doc| {
            b.iter(|| doc.find(black_box("tags")))
        });
    }
    group.finish();
}

fn benchmark_multimap(c: &mut Criterion) {
    let keys: Vec<String> = (0..1000).map(|i| format!("key{}", i)).collect();

    c.bench_function("multimap_add_1000", |b| {
        b.iter(|| {
            let mut map = OrderedMultimap::new();
            for (i, key) in keys.iter().enumerate() {
                map.add(key, i);
            }
            map
        })
    });

    let map: OrderedMultimap<usize> = keys.iter().enumerate().map(|(i, k)| (k, i)).collect();
    c.bench_function("multimap_get_1000", |b| {
        b.iter(|| {
            keys.iter()
                .filter_map(|key| map.try_get(black_box(key), 0))
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, benchmark_ini, benchmark_json, benchmark_multimap);
criterion_main!(benches);
