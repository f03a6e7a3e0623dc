//! Route generation performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fsroutes::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// `sections` folders, each with `pages` sub-pages, a layout and a dynamic
/// child, some of them behind grouping folders.
fn synthetic_tree(root: &Path, sections: usize, pages: usize) {
    fs::write(root.join("page.tsx"), "").unwrap();
    fs::write(root.join("layout.tsx"), "").unwrap();
    for s in 0..sections {
        let section = if s % 3 == 0 {
            root.join(format!("(group{})", s)).join(format!("section{}", s))
        } else {
            root.join(format!("section{}", s))
        };
        fs::create_dir_all(section.join("[id]")).unwrap();
        fs::write(section.join("layout.tsx"), "").unwrap();
        fs::write(section.join("layout.fr.tsx"), "").unwrap();
        fs::write(section.join("[id]").join("page.tsx"), "").unwrap();
        for p in 0..pages {
            let page = section.join(format!("page{}", p));
            fs::create_dir_all(&page).unwrap();
            fs::write(page.join("page.mdx"), "").unwrap();
        }
    }
}

fn bench_build_tree(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    synthetic_tree(temp_dir.path(), 20, 10);

    c.bench_function("build_route_tree", |b| {
        b.iter(|| build_route_tree(black_box(temp_dir.path())).unwrap())
    });
}

fn bench_flatten_and_emit(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    synthetic_tree(temp_dir.path(), 20, 10);
    let tree = build_route_tree(temp_dir.path()).unwrap();

    c.bench_function("flatten_and_emit", |b| {
        b.iter(|| {
            let routes = flatten_routes(black_box(&tree));
            generate(&tree, &routes).unwrap()
        })
    });
}

fn bench_find_route_for_path(c: &mut Criterion) {
    let mut table = RouteTable::new();
    for s in 0..50 {
        table.insert(&format!("/section{}", s));
        table.insert(&format!("/section{}/[id]", s));
        table.insert(&format!("/section{}/[id]/detail", s));
    }

    c.bench_function("find_route_for_path", |b| {
        b.iter(|| table.find_route_for_path(black_box("/section42/7/detail/missing")))
    });
}

criterion_group!(
    benches,
    bench_build_tree,
    bench_flatten_and_emit,
    bench_find_route_for_path
);
criterion_main!(benches);
