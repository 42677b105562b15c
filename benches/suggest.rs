use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use suggest_engine::{
    InputContext, KeyCollator, LearningDictionary, LookAheadDictionary, QwertyLayout, Suggestor,
    SuggestorBuilder, WordDictionary,
};

struct NoContext;

impl InputContext for NoContext {
    fn words_before_cursor(&self) -> (String, String) {
        (String::new(), String::new())
    }
}

static WORDS: &[(&str, u32)] = &[
    ("the", 22038615),
    ("be", 12545825),
    ("and", 10741073),
    ("of", 10343885),
    ("a", 10144200),
    ("in", 6996437),
    ("to", 6332195),
    ("have", 4303955),
    ("it", 3872477),
    ("that", 3430996),
    ("for", 3281454),
    ("you", 3081151),
    ("he", 2909254),
    ("with", 2683014),
    ("on", 2485306),
    ("do", 2573587),
    ("say", 1915138),
    ("this", 1885366),
    ("they", 1865580),
    ("at", 1767638),
    ("but", 1776767),
    ("we", 1820935),
    ("his", 1801708),
    ("from", 1635914),
    ("not", 1638883),
    ("there", 1462702),
    ("then", 558130),
    ("them", 887959),
    ("these", 541003),
    ("ten", 128093),
    ("tea", 93578),
    ("teach", 82996),
    ("teacher", 126897),
    ("team", 180598),
    ("tear", 44827),
    ("telephone", 60724),
    ("television", 110954),
    ("tell", 568511),
    ("temperature", 75229),
    ("tennis", 50284),
];

fn bench_suggestor() -> Suggestor {
    let collator = Arc::new(KeyCollator::new(Arc::new(QwertyLayout)));
    let words = Arc::new(WordDictionary::new(Arc::clone(&collator)));
    for &(word, count) in WORDS {
        words.insert(word, count);
    }
    let lookahead = Arc::new(LookAheadDictionary::new(Arc::clone(&collator)));
    lookahead.insert_static("the", 22038615);
    lookahead.insert_static("the best", 251384);
    lookahead.insert_static("the best way", 32017);
    lookahead.insert_static("the best thing", 28402);
    SuggestorBuilder::new(
        collator,
        words as Arc<dyn LearningDictionary>,
        lookahead as Arc<dyn LearningDictionary>,
        Arc::new(NoContext),
    )
    .build()
}

static INPUTS: &[(&str, &str)] = &[
    ("exact", "tea"),
    ("typo", "teh"),
    ("short", "te"),
    ("long", "telephnoe"),
];

fn bench_find_suggestions(c: &mut Criterion) {
    let suggestor = bench_suggestor();
    let mut group = c.benchmark_group("suggestor/find");
    for &(label, composing) in INPUTS {
        group.bench_with_input(
            BenchmarkId::new(label, composing.len()),
            &composing,
            |b, &composing| {
                b.iter(|| suggestor.find_suggestions(composing));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_find_suggestions);
criterion_main!(benches);
