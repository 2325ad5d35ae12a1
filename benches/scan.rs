use criterion::{black_box, criterion_group, criterion_main, Criterion};
use srcspell::checker::dictionary::{FstDictionary, WordSet};
use srcspell::checker::filter::TokenFilter;
use srcspell::checker::SourceFile;
use srcspell::fix::source_map::SourceMap;
use srcspell::parser::LexerRegistry;

const SAMPLE: &str = r#"
/// Parse the configuration file and retrun the merged settings.
fn load(path: &str) -> Config {
    // Fall back to the defualt values when the file is missing
    let message = "could not open the configuraton file";
    todo!()
}
"#;

const WORDS: &[&str] = &[
    "parse", "the", "configuration", "file", "and", "return", "merged", "settings", "fall",
    "back", "to", "default", "values", "when", "is", "missing", "could", "not", "open",
];

fn bench_scan(c: &mut Criterion) {
    let registry = LexerRegistry::builtin();
    let rust = registry.by_name("Rust").expect("rust lexer");
    let words: Vec<String> = WORDS.iter().map(|w| w.to_string()).collect();
    let dictionary = FstDictionary::new(WordSet::from_words(&words).expect("word set"), 10);
    let file = SourceFile::new("bench.rs", SAMPLE.repeat(200), rust);

    c.bench_function("scan_rust", |b| {
        b.iter(|| {
            file.scan(TokenFilter::new(&registry), &dictionary)
                .filter_map(Result::ok)
                .count()
        })
    });
}

fn bench_source_map(c: &mut Criterion) {
    let content = SAMPLE.repeat(200);

    c.bench_function("source_map_round_trip", |b| {
        b.iter(|| {
            let mut map = SourceMap::build(black_box(&content));
            map.apply(content.find("retrun").unwrap_or(0), "return");
            map.serialize()
        })
    });
}

criterion_group!(benches, bench_scan, bench_source_map);
criterion_main!(benches);
