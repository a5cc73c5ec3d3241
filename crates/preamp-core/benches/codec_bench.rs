//! Criterion benchmarks for the preamp JSON codec.
//!
//! Run with:
//! ```bash
//! cargo bench --package preamp-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use preamp_core::{decode_state, encode_command, Control};

const STATE_FRAMES: [(&str, &str); 2] = [
    ("string_volume", r#"{"source":"CD","volume":"45","mute":"off"}"#),
    ("numeric_volume", r#"{"source":"     CD    ","volume":-447,"mute":"on"}"#),
];

fn bench_encode_command(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_command");
    for control in Control::ALL {
        let cmd = control.toggle();
        group.bench_with_input(BenchmarkId::from_parameter(control), &cmd, |b, cmd| {
            b.iter(|| encode_command(black_box(cmd)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_state");
    for (name, frame) in STATE_FRAMES {
        group.bench_with_input(BenchmarkId::from_parameter(name), frame, |b, frame| {
            b.iter(|| decode_state(black_box(frame)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode_command, bench_decode_state);
criterion_main!(benches);
