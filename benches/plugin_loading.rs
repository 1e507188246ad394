//! Plugin Loading Benchmarks
//!
//! Run with: cargo bench --bench plugin_loading

use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use slashdeck::plugins::{parse_argument_hint, parse_frontmatter, FileRegistryStore};
use slashdeck::Marketplace;
use tempfile::TempDir;

const COMMAND_FILE: &str = "---\ndescription: Review a file\nargument-hint: [file] [depth] [format=markdown]\nmodel: fast\n---\nReview {{file}} up to depth {{depth}} and answer in {{format}}.\n\nBe thorough.\n";

fn write_plugin_tree(root: &Path, plugins: usize, commands: usize) {
    for p in 0..plugins {
        let dir = root.join(format!("plugin-{}", p));
        fs::create_dir_all(dir.join("commands")).unwrap();
        fs::write(
            dir.join("plugin.json"),
            format!(
                r#"{{ "name": "plugin-{}", "version": "1.0.0", "description": "Bench plugin" }}"#,
                p
            ),
        )
        .unwrap();
        for c in 0..commands {
            fs::write(dir.join("commands").join(format!("cmd-{}.md", c)), COMMAND_FILE).unwrap();
        }
    }
}

fn benchmark_parsers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsers");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_frontmatter", |b| {
        b.iter(|| parse_frontmatter(black_box(COMMAND_FILE)));
    });

    group.bench_function("parse_argument_hint", |b| {
        b.iter(|| parse_argument_hint(black_box(Some("[file] [depth] [format=markdown]"))));
    });

    group.finish();
}

fn benchmark_initialize(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let plugins_dir = tmp.path().join("plugins");
    write_plugin_tree(&plugins_dir, 20, 10);
    let registry_path = tmp.path().join("registry.json");

    let mut group = c.benchmark_group("marketplace");
    group.throughput(Throughput::Elements(200));

    group.bench_function("initialize_20x10", |b| {
        b.iter(|| {
            let mut market =
                Marketplace::new(&plugins_dir, FileRegistryStore::new(&registry_path));
            market.initialize().unwrap();
            black_box(market.stats())
        });
    });

    group.bench_function("execute_command", |b| {
        let mut market = Marketplace::new(&plugins_dir, FileRegistryStore::new(&registry_path));
        market.initialize().unwrap();
        let args = vec!["src/main.rs".to_string(), "2".to_string()];
        b.iter(|| {
            market
                .execute_command(black_box("plugin-7:cmd-3"), &args)
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_parsers, benchmark_initialize);
criterion_main!(benches);
