use criterion::{black_box, criterion_group, criterion_main, Criterion};
use php_array_parser::{parse_all, parse_list, parse_literal, Value};

fn perf_parse_flat(b: &mut Criterion) {
    let input = "[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]";

    b.bench_function("parse flat integer list", |b| {
        b.iter(|| {
            assert_eq!(
                black_box(parse_literal(black_box(input)).unwrap())[15i64],
                16
            );
        });
    });
}

fn perf_parse_strings(b: &mut Criterion) {
    let input = r#"array(
        'single' => 'aut dolores excepturi rerum est velit ad natus eveniet quo tenetur',
        'single_escaped' => 'aut dolores excepturi \'rerum\' est velit ad natus eveniet',
        "double" => "aut dolores excepturi rerum est velit ad natus eveniet quo tenetur",
        "double_escaped" => "aut dolores \"excepturi\"\n rerum est velit ad natus eveniet",
    )"#;

    b.bench_function("parse string table", |b| {
        b.iter(|| {
            assert!(black_box(parse_literal(black_box(input)).unwrap())["double"].is_string());
        });
    });
}

fn perf_parse_nested(b: &mut Criterion) {
    let input = r#"[
        'db' => ['host' => 'localhost', 'port' => 3306, 'options' => array(1, 2, 3)],
        'cache' => ['ttl' => 3.5, 'enabled' => true, 'backend' => $backend], // runtime value
        'paths' => ['/var/www', '/tmp', null],
    ]"#;

    b.bench_function("parse nested config", |b| {
        b.iter(|| {
            assert!(black_box(parse_literal(black_box(input)).unwrap())["cache"]["backend"]
                .is_unresolved());
        });
    });
}

fn perf_parse_list(b: &mut Criterion) {
    let input = "'HELLO' => 'Hello', 'BYE' => 'Goodbye', 'COUNT' => 3,";

    b.bench_function("parse bare element list", |b| {
        b.iter(|| {
            assert_eq!(
                black_box(parse_list(black_box(input)).unwrap())["COUNT"],
                Value::Int(3)
            );
        });
    });
}

fn perf_extract(b: &mut Criterion) {
    let source = "<?php\n".to_string()
        + &(0..50)
            .map(|i| format!("$lang = array_merge($lang, array('KEY_{i}' => 'value {i}'));\n"))
            .collect::<String>();
    let pattern = r"array_merge\(\$lang, array\((.*?)\)\);";

    b.bench_function("extract 50 tables", |b| {
        b.iter(|| {
            assert_eq!(
                parse_all(pattern, black_box(&source), 1).unwrap().len(),
                50
            );
        });
    });
}

criterion_group!(
    benches,
    perf_parse_flat,
    perf_parse_strings,
    perf_parse_nested,
    perf_parse_list,
    perf_extract
);
criterion_main!(benches);
