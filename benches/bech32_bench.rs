use criterion::{black_box, criterion_group, criterion_main, Criterion};

use basalt::{BECH32, BECH32M};

const PROGRAM: [u8; 32] = [
    0x18, 0x63, 0x14, 0x3c, 0x14, 0xc5, 0x16, 0x68, 0x04, 0xbd, 0x19, 0x20, 0x33, 0x56, 0xda, 0x13,
    0x6c, 0x98, 0x56, 0x78, 0xcd, 0x4d, 0x27, 0xa1, 0xb8, 0xc6, 0x32, 0x96, 0x04, 0x90, 0x32, 0x62,
];

fn bech32_encode_bench(c: &mut Criterion) {
    let words = BECH32.to_words(&PROGRAM).unwrap();
    c.bench_function("bech32_encode", |b| {
        b.iter(|| BECH32.encode(black_box("bc"), black_box(&words)))
    });
    c.bench_function("bech32m_encode", |b| {
        b.iter(|| BECH32M.encode(black_box("bc"), black_box(&words)))
    });
}

fn bech32_decode_bench(c: &mut Criterion) {
    let words = BECH32.to_words(&PROGRAM).unwrap();
    let text = BECH32.encode("bc", &words).unwrap();
    c.bench_function("bech32_decode", move |b| {
        b.iter(|| BECH32.decode_to_bytes(black_box(&text)))
    });
}

criterion_group! {
    name = bech32_benches;
    config = Criterion::default();
    targets = bech32_encode_bench, bech32_decode_bench
}

criterion_main!(bech32_benches);
