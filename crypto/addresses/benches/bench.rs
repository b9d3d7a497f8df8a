use criterion::{Criterion, black_box, criterion_group, criterion_main};

use bitcann_addresses::{Address, Prefix, Version};

fn cashaddr_benchmark(c: &mut Criterion) {
    let covenant = Address::new(Prefix::Mainnet, Version::TokenP2sh32, &[0x5f; 32]);
    c.bench_function("encode token-aware P2SH32", |b| b.iter(|| black_box(&covenant).to_string()));

    // cspell:disable-next-line
    let encoded = "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2";
    c.bench_function("decode P2PKH", |b| b.iter(|| black_box(encoded).parse::<Address>()));
}

criterion_group!(benches, cashaddr_benchmark);
criterion_main!(benches);
