//! Benchmarks for adocgen rendering performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks render synthetic documentation of various sizes.

use adocgen::model::{ListItem, Style};
use adocgen::{
    AsciidocGenerator, Compound, CompoundKind, DocNode, MemberDef, MemberList, MemberListType,
    MemberType, RenderContext, RenderOptions, SkipDiagrams,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &[
    "the", "shape", "returns", "area", "of", "a", "polygon", "with", "vertices", "scaled",
    "by", "factor", "x_y", "*ptr", "std::vector<int>", "[index]", "a|b", "{attr}",
];

/// Creates a paragraph of random words, some bold or code.
fn random_para(rng: &mut StdRng, words: usize) -> DocNode {
    let mut children = Vec::new();
    for i in 0..words {
        if i > 0 {
            children.push(DocNode::space());
        }
        let word = WORDS[rng.gen_range(0..WORDS.len())];
        match rng.gen_range(0..10) {
            0 => {
                children.push(DocNode::style(Style::Bold, true));
                children.push(DocNode::word(word));
                children.push(DocNode::style(Style::Bold, false));
            }
            1 => {
                children.push(DocNode::style(Style::Code, true));
                children.push(DocNode::word(word));
                children.push(DocNode::style(Style::Code, false));
            }
            _ => children.push(DocNode::word(word)),
        }
    }
    DocNode::para(children)
}

/// Creates a documentation tree with paragraphs and a nested list.
fn create_test_doc(para_count: usize) -> DocNode {
    let mut rng = StdRng::seed_from_u64(42);
    let mut children = Vec::new();
    for i in 0..para_count {
        children.push(random_para(&mut rng, 20));
        if i % 10 == 9 {
            let inner = DocNode::AutoList {
                is_enum: true,
                items: vec![ListItem::new(vec![random_para(&mut rng, 5)])],
            };
            children.push(DocNode::AutoList {
                is_enum: false,
                items: vec![
                    ListItem::new(vec![random_para(&mut rng, 8), inner]),
                    ListItem::new(vec![random_para(&mut rng, 8)]),
                ],
            });
        }
    }
    DocNode::root(children)
}

/// Creates a class with the given number of documented member functions.
fn create_test_compound(member_count: usize) -> Compound {
    let mut rng = StdRng::seed_from_u64(7);
    let members = (0..member_count)
        .map(|i| {
            MemberDef::new(MemberType::Function, format!("method{}", i % 50), format!("a{}", i))
                .with_type("double")
                .with_args("(int scale, const char *name) const")
                .with_brief(DocNode::root(vec![random_para(&mut rng, 8)]))
                .with_detailed(DocNode::root(vec![random_para(&mut rng, 40)]))
        })
        .collect();
    let mut compound = Compound::new(CompoundKind::Class, "Shape", "classShape");
    compound.language = Some("cpp".to_string());
    compound
        .member_lists
        .push(MemberList::new(MemberListType::PubMethods, members));
    compound
}

/// Benchmark documentation tree rendering.
fn bench_doc_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("doc_rendering");

    for para_count in [10, 100, 1000].iter() {
        let doc = create_test_doc(*para_count);
        group.throughput(Throughput::Elements(*para_count as u64));

        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &doc, |b, doc| {
            let options = RenderOptions::default();
            b.iter(|| adocgen::render::render_doc(black_box(doc), &options));
        });
    }

    group.finish();
}

/// Benchmark compound page rendering.
fn bench_page_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_rendering");

    for member_count in [10, 100, 500].iter() {
        let compound = create_test_compound(*member_count);
        group.throughput(Throughput::Elements(*member_count as u64));

        group.bench_with_input(
            BenchmarkId::new("members", member_count),
            &compound,
            |b, compound| {
                let ctx = RenderContext::default().with_diagram_renderer(Box::new(SkipDiagrams));
                let mut generator = AsciidocGenerator::new(ctx);
                b.iter(|| generator.write_compound(black_box(compound)));
            },
        );
    }

    group.finish();
}

/// Benchmark text escaping.
fn bench_escaping(c: &mut Criterion) {
    let text = WORDS.join(" ").repeat(50);

    c.bench_function("convert_to_asciidoc", |b| {
        b.iter(|| adocgen::text::convert_to_asciidoc(black_box(&text)));
    });
}

criterion_group!(benches, bench_escaping, bench_doc_rendering, bench_page_rendering);
criterion_main!(benches);
