/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Throughput of the sequential worker stage against fan-out/fan-in.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stream_pipelines::{fan_in, fan_out, from_iter, worker_stage, Stream};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

const ITEMS: u64 = 2_000;

fn checksum(_token: &CancellationToken, n: u64) -> u64 {
    (0..64).fold(n, |acc, round| acc.rotate_left(5) ^ (round * 0x9e37_79b9))
}

async fn drain(stream: Stream<u64>) -> u64 {
    let mut sum = 0u64;
    while let Some(value) = stream.recv().await {
        sum = sum.wrapping_add(value);
    }
    sum
}

fn bench_worker_stage(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("worker_stage");
    group.throughput(Throughput::Elements(ITEMS));

    group.bench_function("sequential", |b| {
        b.to_async(&runtime).iter(|| async {
            let token = CancellationToken::new();
            let source = from_iter(&token, 0..ITEMS).expect("inside runtime");
            let output = worker_stage(&token, source, checksum).expect("inside runtime");
            black_box(drain(output).await)
        });
    });
    group.finish();
}

fn bench_fan_out_fan_in(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("fan_out_fan_in");
    group.throughput(Throughput::Elements(ITEMS));

    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.to_async(&runtime).iter(|| async move {
                let token = CancellationToken::new();
                let source = from_iter(&token, 0..ITEMS).expect("inside runtime");
                let pool = fan_out(&token, source, workers, checksum).expect("inside runtime");
                let merged = fan_in(&token, pool).expect("inside runtime");
                black_box(drain(merged).await)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_worker_stage, bench_fan_out_fan_in);
criterion_main!(benches);
