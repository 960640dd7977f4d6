use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ini_doc::{from_slice_with_options, from_str, to_string, to_vec, Document, IniOptions};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
struct Server {
    host: String,
    port: u16,
    secure: bool,
    mirrors: Vec<String>,
    ratio: f64,
}

fn sample_text(sections: usize) -> String {
    let mut text = String::from("; generated configuration\n\n");
    for i in 0..sections {
        text.push_str(&format!("; section {}\n[Section {}]\n", i, i));
        text.push_str(&format!("name = Item {} ; display name\n", i));
        text.push_str(&format!("count={}\n", i * 7));
        text.push_str("path=@{Section 0|name}/data\n");
        text.push_str("flags={a, b, c}\n\n");
    }
    text
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 1000].iter() {
        let text = sample_text(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [10, 100, 1000].iter() {
        let doc = from_str(&sample_text(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| to_string(black_box(doc)))
        });
    }
    group.finish();
}

fn benchmark_bind(c: &mut Criterion) {
    let doc = from_str(&sample_text(100)).unwrap();

    c.bench_function("bind_100_sections", |b| {
        b.iter(|| {
            let mut doc = doc.clone();
            black_box(doc.bind())
        })
    });
}

fn benchmark_mapping(c: &mut Criterion) {
    let server = Server {
        host: "example.org".to_string(),
        port: 8443,
        secure: true,
        mirrors: vec!["a.example.org".to_string(), "b.example.org".to_string()],
        ratio: 0.75,
    };

    c.bench_function("serialize_section", |b| {
        b.iter(|| {
            let mut doc = Document::default();
            doc.serialize_section("Server", black_box(&server)).unwrap();
            doc
        })
    });

    let mut doc = Document::default();
    doc.serialize_section("Server", &server).unwrap();
    c.bench_function("deserialize_section", |b| {
        b.iter(|| black_box(&doc).deserialize_section::<Server>("Server"))
    });
}

fn benchmark_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope");
    let text = sample_text(100);

    let compressed = IniOptions::new().with_compression(true);
    let doc = ini_doc::from_str_with_options(&text, compressed.clone()).unwrap();
    let bytes = to_vec(&doc).unwrap();
    group.bench_function("compress", |b| b.iter(|| to_vec(black_box(&doc))));
    group.bench_function("decompress", |b| {
        b.iter(|| from_slice_with_options(black_box(&bytes), compressed.clone()))
    });

    let encrypted = IniOptions::new().with_encryption_password("benchmark");
    let doc = ini_doc::from_str_with_options(&text, encrypted.clone()).unwrap();
    let bytes = to_vec(&doc).unwrap();
    group.sample_size(10);
    group.bench_function("encrypt", |b| b.iter(|| to_vec(black_box(&doc))));
    group.bench_function("decrypt", |b| {
        b.iter(|| from_slice_with_options(black_box(&bytes), encrypted.clone()))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_write,
    benchmark_bind,
    benchmark_mapping,
    benchmark_envelope
);
criterion_main!(benches);
