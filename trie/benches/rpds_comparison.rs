use bitmapped_trie::Trie;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn collect(c: &mut Criterion) {
    let input = vec![0; 10000];
    let mut group = c.benchmark_group("collect");

    group.bench_function("ours 10000, N=8", |b| {
        b.iter(|| black_box(input.iter().copied().collect::<Trie<i32, 8>>()))
    });

    group.bench_function("ours 10000, N=32", |b| {
        b.iter(|| black_box(input.iter().copied().collect::<Trie<i32, 32>>()))
    });

    group.bench_function("rpds 10000", |b| {
        b.iter(|| black_box(input.iter().copied().collect::<rpds::Vector<i32>>()))
    });
}

pub fn append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    group.bench_function("ours 10000, N=32", |b| {
        b.iter(|| {
            let mut trie = Trie::<u32>::new();
            for i in 0..10000 {
                trie = trie.append(i);
            }
            black_box(trie)
        })
    });

    group.bench_function("ours in place 10000, N=32", |b| {
        b.iter(|| {
            let mut trie = Trie::<u32>::new();
            for i in 0..10000 {
                trie.push_back(i);
            }
            black_box(trie)
        })
    });

    group.bench_function("rpds 10000", |b| {
        b.iter(|| {
            let mut vec = rpds::Vector::<u32>::new();
            for i in 0..10000 {
                vec = vec.push_back(i);
            }
            black_box(vec)
        })
    });
}

pub fn prepend(c: &mut Criterion) {
    c.bench_function("prepend 10000, N=32", |b| {
        b.iter(|| {
            let mut trie = Trie::<u32>::new();
            for i in 0..10000 {
                trie = trie.prepend(i);
            }
            black_box(trie)
        })
    });
}

pub fn count(c: &mut Criterion) {
    let input = vec![0; 10000];
    let trie8: Trie<u32, 8> = input.iter().copied().collect();
    let trie32: Trie<u32, 32> = input.iter().copied().collect();
    let rpds: rpds::Vector<u32> = input.iter().copied().collect();
    let mut group = c.benchmark_group("iter");

    group.bench_function("ours 10000, N=8", |b| {
        b.iter(|| black_box(trie8.iter().count()));
    });

    group.bench_function("ours 10000, N=32", |b| {
        b.iter(|| black_box(trie32.iter().count()));
    });

    group.bench_function("rpds 10000", |b| {
        b.iter(|| black_box(rpds.iter().count()));
    });
}

pub fn get(c: &mut Criterion) {
    let input = vec![0; 10000];
    let trie8: Trie<u32, 8> = input.iter().copied().collect();
    let trie32: Trie<u32, 32> = input.iter().copied().collect();
    let rpds: rpds::Vector<u32> = input.iter().copied().collect();
    let mut group = c.benchmark_group("get");

    group.bench_function("ours 10000, N=8", |b| {
        b.iter(|| {
            for i in 0..10000 {
                black_box(trie8.get(i));
            }
        });
    });

    group.bench_function("ours 10000, N=32", |b| {
        b.iter(|| {
            for i in 0..10000 {
                black_box(trie32.get(i));
            }
        });
    });

    group.bench_function("rpds 10000", |b| {
        b.iter(|| {
            for i in 0..10000 {
                black_box(rpds.get(i));
            }
        });
    });
}

criterion_group!(benches, collect, append, prepend, count, get);
criterion_main!(benches);
