//! Benchmarks for the search operations of the red-black tree.
//!
//! This benchmark searches a filled tree for every key it holds, once with the key-based lookup and once with the
//! handle-returning search.
//!
//! ## Benchmark execution
//!
//! Running this exact benchmark can be done with the following command:
//!
//! `> cargo bench -p balanced_tree --bench bench_search`
//!
//! If you wish to run a subset of benchmarks in this file, you can filter them by name:
//!
//! `> cargo bench -p balanced_tree --bench bench_search -- <filter>`
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use balanced_tree::Rbt;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{prelude::SliceRandom, Rng};
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
    let mut rbt: Rbt<K> = Rbt::with_capacity(MAX_SIZE);
    rbt.insert_many(nums.iter().copied());

    let mut nums_shuffled = nums.to_vec();
    nums_shuffled.shuffle(&mut rand::thread_rng());

    group.bench_with_input(BenchmarkId::new("search", size), &nums_shuffled, |b, nums| {
        b.iter(|| {
            for i in nums {
                rbt.search(None, i).unwrap();
            }
        })
    });

    group.bench_with_input(BenchmarkId::new("get", size), &nums_shuffled, |b, nums| {
        b.iter(|| {
            for i in nums {
                rbt.get(i).unwrap();
            }
        })
    });
}

pub fn benchmark_search_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let nums = random_numbers::<u32>(0, 100_000);
    bench_keys(&mut group, "32bit", &nums);

    let nums = random_numbers::<u128>(0, 100_000);
    bench_keys(&mut group, "128bit", &nums);

    let nums = random_numbers::<u32>(0, 100_000).into_iter().map(U384::from).collect::<Vec<_>>();
    bench_keys(&mut group, "384bit", &nums);

    group.finish();
}

criterion_group!(benches, benchmark_search_function);
criterion_main!(benches);
