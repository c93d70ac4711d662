use criterion::{black_box, criterion_group, criterion_main, Criterion};
use x25519_kex::{compute_shared_secret, derive_public_key};

fn bench_x25519(c: &mut Criterion) {
    let mut group = c.benchmark_group("x25519");

    let secret = [0x5au8; 32];
    let peer = derive_public_key(&[0xa5u8; 32]).unwrap();

    group.bench_function("derive_public_key", |b| {
        b.iter(|| derive_public_key(black_box(&secret)))
    });

    group.bench_function("compute_shared_secret", |b| {
        b.iter(|| compute_shared_secret(black_box(&secret), black_box(&peer)))
    });

    group.finish();
}

criterion_group!(benches, bench_x25519);
criterion_main!(benches);
