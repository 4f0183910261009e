//! Performance benchmarks for FastRemap
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fast_remap::core::{
    collection_from_agp, FeatureReconciler, Interval, MappingCollection, Orientation, PairMapping,
    ReconcileOptions,
};
use fast_remap::gff::Feature;

const CONTIGS: u64 = 2000;
const CONTIG_LEN: u64 = 50_000;
const GAP_LEN: u64 = 100;

/// Synthetic AGP: CONTIGS contigs on one chromosome, alternating orientation
fn synthetic_agp() -> String {
    let mut agp = String::new();
    let mut pos = 1;
    for i in 0..CONTIGS {
        let orientation = if i % 2 == 0 { "+" } else { "-" };
        agp.push_str(&format!(
            "chr1\t{}\t{}\t{}\tW\tctg{}\t1\t{}\t{}\n",
            pos,
            pos + CONTIG_LEN - 1,
            2 * i + 1,
            i,
            CONTIG_LEN,
            orientation
        ));
        pos += CONTIG_LEN;
        agp.push_str(&format!(
            "chr1\t{}\t{}\t{}\tN\t{}\tscaffold\tyes\tpaired-ends\n",
            pos,
            pos + GAP_LEN - 1,
            2 * i + 2,
            GAP_LEN
        ));
        pos += GAP_LEN;
    }
    agp
}

fn synthetic_collection() -> MappingCollection {
    let pairs = (0..CONTIGS).map(|i| {
        let a_start = i * (CONTIG_LEN + GAP_LEN) + 1;
        let orientation = if i % 2 == 0 {
            Orientation::Forward
        } else {
            Orientation::Reverse
        };
        let component = Interval::new(format!("ctg{}", i), 1, CONTIG_LEN, Orientation::Forward);
        let assembled = Interval::new("chr1", a_start, a_start + CONTIG_LEN - 1, orientation);
        PairMapping::new(component.unwrap(), assembled.unwrap()).unwrap()
    });
    MappingCollection::from_pairs(pairs)
}

/// GFF3 features spread over the contigs; every 50th one runs off its contig
fn synthetic_gff(n: usize) -> String {
    let mut gff = String::from("##gff-version 3\n");
    for i in 0..n {
        let contig = (i as u64 * 7) % CONTIGS;
        let start = (i as u64 * 997) % (CONTIG_LEN - 2000) + 1;
        let end = if i % 50 == 0 {
            CONTIG_LEN + 10
        } else {
            start + 1500
        };
        gff.push_str(&format!(
            "ctg{}\tbench\tgene\t{}\t{}\t.\t+\t.\tID=g{};Name=gene{}\n",
            contig, start, end, i, i
        ));
    }
    gff
}

fn bench_collection_build(c: &mut Criterion) {
    let agp = synthetic_agp();
    c.bench_function("build_from_agp", |b| {
        b.iter(|| {
            let (collection, _) = collection_from_agp(black_box(agp.as_bytes())).unwrap();
            black_box(collection)
        })
    });
}

fn bench_single_map(c: &mut Criterion) {
    let collection = synthetic_collection();
    let query = Interval::new("ctg17", 1000, 2500, Orientation::Forward).unwrap();

    c.bench_function("map_single_interval", |b| {
        b.iter(|| black_box(collection.classify(black_box(&query))))
    });
}

fn bench_batch_map(c: &mut Criterion) {
    let collection = synthetic_collection();
    let mut group = c.benchmark_group("batch_map");

    for size in [100u64, 1000, 10000].iter() {
        let queries: Vec<Interval> = (0..*size)
            .map(|i| {
                let start = (i * 389) % (CONTIG_LEN - 500) + 1;
                Interval::new(format!("ctg{}", i % CONTIGS), start, start + 499, Orientation::Forward)
                    .unwrap()
            })
            .collect();

        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &queries, |b, queries| {
            b.iter(|| {
                for q in queries {
                    black_box(collection.map(q));
                }
            })
        });
    }
    group.finish();
}

fn bench_feature_parsing(c: &mut Criterion) {
    let line = b"ctg1\tmaker\tmRNA\t1001\t2500\t.\t+\t.\tID=mrna1;Parent=gene1;Name=abc";
    c.bench_function("parse_gff_feature", |b| {
        b.iter(|| black_box(Feature::parse(black_box(line)).unwrap()))
    });
}

fn bench_reconcile_stream(c: &mut Criterion) {
    let collection = synthetic_collection();
    let gff = synthetic_gff(10_000);

    let mut group = c.benchmark_group("reconcile");
    group.throughput(Throughput::Bytes(gff.len() as u64));
    group.bench_function("stream_10k_features", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(gff.len());
            let mut reconciler = FeatureReconciler::new(&collection, ReconcileOptions::default());
            let stats = reconciler.run(gff.as_bytes(), &mut out, None).unwrap();
            black_box((stats, out))
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_collection_build,
    bench_single_map,
    bench_batch_map,
    bench_feature_parsing,
    bench_reconcile_stream,
);

criterion_main!(benches);
