//! Re-render throughput over the in-memory host.

use criterion::{criterion_group, criterion_main, Criterion};

use weft_core::{Element, MemoryHost, Props, RenderHost, Renderer};

fn row_list(rows: usize, toggle: bool) -> Element {
    let items = (0..rows)
        .map(|i| {
            let label = if toggle && i % 2 == 0 {
                format!("row {i} (updated)")
            } else {
                format!("row {i}")
            };
            Element::node(
                "li",
                Props::new().attr("id", format!("row-{i}")),
                vec![Element::text(label)],
            )
        })
        .collect();
    Element::node("ul", Props::new(), items)
}

fn bench_initial_render(c: &mut Criterion) {
    c.bench_function("initial_render_200_rows", |b| {
        b.iter(|| {
            let mut host = MemoryHost::new();
            let container = host.create_element("root");
            let mut renderer = Renderer::new(host, container);
            renderer.render(row_list(200, false)).unwrap();
            renderer.flush();
            renderer
        });
    });
}

fn bench_rerender(c: &mut Criterion) {
    c.bench_function("rerender_200_rows_half_changed", |b| {
        let mut host = MemoryHost::new();
        let container = host.create_element("root");
        let mut renderer = Renderer::new(host, container);
        renderer.render(row_list(200, false)).unwrap();
        renderer.flush();

        let mut toggle = true;
        b.iter(|| {
            renderer.render(row_list(200, toggle)).unwrap();
            renderer.flush();
            toggle = !toggle;
        });
    });
}

criterion_group!(benches, bench_initial_render, bench_rerender);
criterion_main!(benches);
