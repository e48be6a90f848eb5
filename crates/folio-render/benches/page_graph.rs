//! Benchmarks for page-graph indexing and tree match discovery.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use folio_model::{BookRef, CaptureLevel, ContentSource, MemorySource, Node, PageBuilder, PageRef};
use folio_render::tree::discover_matches;
use folio_render::{CssClasses, PageIndex, RenderContext, ViewRegistry};

fn page_ref(path: &str) -> PageRef {
    PageRef::new(BookRef::new("bench.local", "/docs"), path)
}

/// Layered DAG: `width` pages per layer, each linked from two pages of the
/// layer above, so most pages are reachable through several parents.
fn generate_graph(layers: usize, width: usize) -> MemorySource {
    let mut source = MemorySource::new();
    let mut root = PageBuilder::new(page_ref("/"), "Root");
    for i in 0..width {
        root = root.child(page_ref(&format!("/l0/p{i}")));
    }
    source = source.with_page(root.build());

    for layer in 0..layers {
        for i in 0..width {
            let path = format!("/l{layer}/p{i}");
            let mut page = PageBuilder::new(page_ref(&path), format!("Page {layer}.{i}"));
            if layer + 1 < layers {
                page = page
                    .child(page_ref(&format!("/l{}/p{i}", layer + 1)))
                    .child(page_ref(&format!("/l{}/p{}", layer + 1, (i + 1) % width)));
            } else if i % 7 == 0 {
                page = page.link(page_ref("/"));
            }
            source = source.with_page(page.build());
        }
    }
    source
}

fn bench_page_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_index_build");

    for (layers, width) in [(5, 20), (10, 50), (20, 100)] {
        let source = generate_graph(layers, width);
        group.throughput(Throughput::Elements((layers * width) as u64));
        group.bench_with_input(
            BenchmarkId::new("dag", format!("{layers}x{width}")),
            &source,
            |b, source| b.iter(|| PageIndex::build(source, &page_ref("/")).unwrap()),
        );
    }

    group.finish();
}

fn bench_discover_matches(c: &mut Criterion) {
    let views = ViewRegistry::new();
    let css = CssClasses::new();
    let target = page_ref("/");
    let mut group = c.benchmark_group("discover_matches");

    for (layers, width) in [(5, 20), (10, 50), (20, 100)] {
        let source = generate_graph(layers, width);
        let root = Node::Page(source.capture(&target, CaptureLevel::Meta).unwrap());
        let ctx = RenderContext::new(&source, &views, &css);
        group.throughput(Throughput::Elements((layers * width) as u64));
        group.bench_function(BenchmarkId::new("links_to", format!("{layers}x{width}")), |b| {
            b.iter(|| discover_matches(&ctx, &root, false, |node: &Node| node.links().contains(&target)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_page_index, bench_discover_matches);
criterion_main!(benches);
