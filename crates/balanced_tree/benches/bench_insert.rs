//! Benchmarks for the insert operations of the red-black tree.
//!
//! This benchmark fills an empty tree with random keys, once with a tree that grows its node storage as it goes and
//! once with a tree whose storage was reserved up front.
//!
//! ## Benchmark execution
//!
//! Running this exact benchmark can be done with the following command:
//!
//! `> cargo bench -p balanced_tree --bench bench_insert`
//!
//! If you wish to run a subset of benchmarks in this file, you can filter them by name:
//!
//! `> cargo bench -p balanced_tree --bench bench_insert -- <filter>`
//!
//! ## Examples
//!
//! ```bash
//! > cargo bench -p balanced_tree --bench bench_insert -- reserved
//! > cargo bench -p balanced_tree --bench bench_insert -- 32bit
//! > cargo bench -p balanced_tree --bench bench_insert
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use balanced_tree::Rbt;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::{collections::HashSet, hash::Hash};
use uint::construct_uint;

const MAX_SIZE: usize = 4096;

construct_uint! {
    pub struct U384(6);
}

fn random_numbers<D>(min: D, max: D) -> Vec<D>
where
    D: Copy + Eq + std::cmp::PartialOrd + Hash + rand::distributions::uniform::SampleUniform,
{
    let mut rng = rand::thread_rng();
    let mut nums: HashSet<D> = HashSet::new();
    while nums.len() < MAX_SIZE {
        let num: D = rng.gen_range(min..=max);
        nums.insert(num);
    }
    nums.into_iter().collect()
}

fn bench_keys<K>(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>, size: &str, nums: &[K])
where
    K: Copy + Ord,
{
    group.bench_with_input(BenchmarkId::new("growing", size), nums, |b, nums| {
        b.iter(|| {
            let mut rbt: Rbt<K> = Rbt::new();
            for i in nums {
                rbt.insert(*i);
            }
            rbt
        })
    });

    group.bench_with_input(BenchmarkId::new("reserved", size), nums, |b, nums| {
        b.iter(|| {
            let mut rbt: Rbt<K> = Rbt::with_capacity(MAX_SIZE);
            for i in nums {
                rbt.insert(*i);
            }
            rbt
        })
    });
}

pub fn benchmark_insert_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    let nums = random_numbers::<u32>(0, 100_000);
    bench_keys(&mut group, "32bit", &nums);

    let nums = random_numbers::<u128>(0, 100_000);
    bench_keys(&mut group, "128bit", &nums);

    let nums = random_numbers::<u32>(0, 100_000).into_iter().map(U384::from).collect::<Vec<_>>();
    bench_keys(&mut group, "384bit", &nums);

    group.finish();
}

criterion_group!(benches, benchmark_insert_function);
criterion_main!(benches);
