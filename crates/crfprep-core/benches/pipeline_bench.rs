use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use crfprep_core::{DocumentReader, Encoder, LabelRegistry, TemplateParser, dictionary, expand};

const TEMPLATE: &str = "\
U00:%x[-2,0]
U01:%x[-1,0]
U02:%x[0,0]
U03:%x[1,0]
U04:%x[2,0]
U05:%x[-1,0]/%x[0,0]
U06:%x[0,0]/%x[1,0]
U10:%x[0,1]
U11:%x[-1,1]/%x[0,1]
B
";

fn synthetic_corpus(documents: usize) -> String {
    let words = ["the", "cat", "sat", "on", "a", "mat", "and", "slept", "well"];
    let tags = ["DT", "NN", "VBD", "IN", "DT", "NN", "CC", "VBD", "RB"];
    let labels = ["B-NP", "I-NP", "B-VP", "B-PP", "B-NP", "I-NP", "O", "B-VP", "B-ADVP"];

    let mut corpus = String::new();
    for d in 0..documents {
        for t in 0..12 {
            let i = (d * 7 + t * 3) % words.len();
            corpus.push_str(&format!("{}{} {} {}\n", words[i], d % 50, tags[i], labels[i]));
        }
        corpus.push('\n');
    }
    corpus
}

fn bench_expand(c: &mut Criterion) {
    let parser = TemplateParser::new().unwrap();
    let line = parser
        .parse_line("U11:%x[-1,1]/%x[0,1]/%x[1,1]", 1)
        .unwrap()
        .unwrap();
    let corpus = synthetic_corpus(1);
    let doc = DocumentReader::new(Cursor::new(corpus.as_str()))
        .next()
        .unwrap()
        .unwrap();

    c.bench_function("expand_compound_line", |b| {
        b.iter(|| expand(black_box(&line), black_box(&doc), black_box(5)).unwrap());
    });
}

fn bench_build_and_encode(c: &mut Criterion) {
    let corpus = synthetic_corpus(500);
    let template = TemplateParser::new()
        .unwrap()
        .parse(Cursor::new(TEMPLATE))
        .unwrap();
    let labels = LabelRegistry::collect(DocumentReader::new(Cursor::new(corpus.as_str()))).unwrap();

    c.bench_function("build_dictionary_500_docs", |b| {
        b.iter(|| {
            dictionary::build(
                DocumentReader::new(Cursor::new(black_box(corpus.as_str()))),
                &template,
                labels.len(),
            )
            .unwrap()
        });
    });

    let dict = dictionary::build(
        DocumentReader::new(Cursor::new(corpus.as_str())),
        &template,
        labels.len(),
    )
    .unwrap();

    c.bench_function("encode_500_docs", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(1 << 20);
            Encoder::new(&labels, &dict, &template)
                .encode_to(DocumentReader::new(Cursor::new(black_box(corpus.as_str()))), &mut out)
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_expand, bench_build_and_encode);
criterion_main!(benches);
