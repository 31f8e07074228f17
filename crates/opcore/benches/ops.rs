use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use opcore::alu::{arith, muldiv, shift};
use opcore::simd::{aes, crc, fp, int, MXCSR_DEFAULT};
use opcore::x87::{arith as fpu, Fp80, FCW_DEFAULT};
use opcore::Eflags;

fn criterion_config() -> Criterion {
    match std::env::var("OPCORE_BENCH_PROFILE").as_deref() {
        Ok("ci") => Criterion::default()
            // Keep PR runtime low.
            .warm_up_time(Duration::from_millis(150))
            .measurement_time(Duration::from_millis(400))
            .sample_size(20)
            .noise_threshold(0.05),
        _ => Criterion::default()
            .warm_up_time(Duration::from_secs(1))
            .measurement_time(Duration::from_secs(2))
            .sample_size(50)
            .noise_threshold(0.03),
    }
}

const OPS_PER_ITER: u64 = 10_000;

fn bench_alu(c: &mut Criterion) {
    let mut group = c.benchmark_group("alu");
    group.throughput(Throughput::Elements(OPS_PER_ITER));

    group.bench_function("add_u64", |b| {
        b.iter(|| {
            let mut efl = Eflags::empty();
            let mut acc = 0u64;
            for i in 0..OPS_PER_ITER {
                arith::add_u64(&mut acc, black_box(i), &mut efl);
            }
            (acc, efl)
        })
    });

    group.bench_function("shl_u32_intel", |b| {
        b.iter(|| {
            let mut efl = Eflags::empty();
            let mut acc = 0x1234_5678u32;
            for i in 0..OPS_PER_ITER {
                shift::shl_u32_intel(&mut acc, (i & 0x1F) as u8, &mut efl);
                acc = acc.wrapping_add(1);
            }
            (acc, efl)
        })
    });

    group.bench_function("div_u64", |b| {
        b.iter(|| {
            let mut efl = Eflags::empty();
            let mut total = 0u64;
            for i in 1..=OPS_PER_ITER {
                let mut lo = black_box(0xDEAD_BEEF_0000_0000u64 | i);
                let mut hi = 0u64;
                muldiv::div_u64_intel(&mut lo, &mut hi, black_box(i | 1), &mut efl)
                    .expect("in-range");
                total = total.wrapping_add(lo);
            }
            total
        })
    });

    group.finish();
}

fn bench_x87(c: &mut Criterion) {
    let mut group = c.benchmark_group("x87");
    group.throughput(Throughput::Elements(OPS_PER_ITER));

    let half = Fp80::new(0x3FFE, 1 << 63);
    group.bench_function("fmul", |b| {
        b.iter(|| {
            let mut fsw = 0u16;
            let mut acc = Fp80::ONE;
            for _ in 0..OPS_PER_ITER {
                fpu::fmul(FCW_DEFAULT, &mut fsw, &mut acc, black_box(half));
                fpu::fadd(FCW_DEFAULT, &mut fsw, &mut acc, black_box(Fp80::ONE));
            }
            (acc, fsw)
        })
    });

    group.finish();
}

fn bench_simd(c: &mut Criterion) {
    let mut group = c.benchmark_group("simd");
    group.throughput(Throughput::Elements(OPS_PER_ITER));

    group.bench_function("paddsw", |b| {
        b.iter(|| {
            let mut acc = 0x0001_0002_0003_0004_0005_0006_0007_0008u128;
            for _ in 0..OPS_PER_ITER {
                int::paddsw(&mut acc, black_box(0x0101_0101_0101_0101_0101_0101_0101_0101));
            }
            acc
        })
    });

    group.bench_function("addps", |b| {
        let lane = 1.0f32.to_bits() as u128;
        let one = lane | lane << 32 | lane << 64 | lane << 96;
        b.iter(|| {
            let mut mxcsr = MXCSR_DEFAULT;
            let mut acc = 0u128;
            for _ in 0..OPS_PER_ITER {
                fp::addps(&mut mxcsr, &mut acc, black_box(one)).expect("masked");
            }
            (acc, mxcsr)
        })
    });

    group.bench_function("aesenc", |b| {
        b.iter(|| {
            let mut state = black_box(0x0011_2233_4455_6677_8899_AABB_CCDD_EEFFu128);
            for _ in 0..OPS_PER_ITER {
                aes::aesenc(&mut state, black_box(0x0F0E_0D0C_0B0A_0908_0706_0504_0302_0100));
            }
            state
        })
    });

    group.bench_function("crc32_u64", |b| {
        b.iter(|| {
            let mut crc = !0u32;
            for i in 0..OPS_PER_ITER {
                crc = crc::crc32_u64(crc, black_box(i.wrapping_mul(0x9E37_79B9_7F4A_7C15)));
            }
            crc
        })
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_alu, bench_x87, bench_simd
}
criterion_main!(benches);
