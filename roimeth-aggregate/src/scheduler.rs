//! Fan-out of one chromosome's per-sample aggregation over a worker pool.

use std::collections::VecDeque;
use std::sync::Mutex;

use log::debug;

use roimeth_core::models::{Region, RegionSet};

use crate::aggregator::aggregate_sample;
use crate::config::Sample;
use crate::errors::{Result, RoiError};
use crate::table::{AggregationTable, SampleColumn};

///
/// Runs per-sample aggregation for one chromosome at a time on a fixed
/// number of workers.
///
/// Workers pull sample indices from a shared queue until it is empty. Each
/// sample's column is built privately and merged into the table once every
/// worker has returned, so the table never sees concurrent writes and the
/// result does not depend on the worker count.
///
pub struct AggregationScheduler {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl AggregationScheduler {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(RoiError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("roimeth-worker-{}", i))
            .build()
            .map_err(|e| RoiError::WorkerPool(workers, e.to_string()))?;

        Ok(AggregationScheduler { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    ///
    /// Aggregate every sample over `chrom`'s regions of interest.
    ///
    /// # Arguments
    /// - samples: all samples, in output column order
    /// - chrom: chromosome being processed
    /// - roi: regions of interest on `chrom`
    /// - mask: the full mask; only its `chrom` regions are used
    ///
    /// # Errors
    /// The first error any worker hits. Remaining queued samples are not
    /// started once an error is recorded.
    ///
    pub fn run(
        &self,
        samples: &[Sample],
        chrom: &str,
        roi: &RegionSet,
        mask: &RegionSet,
    ) -> Result<AggregationTable> {
        let mut table = AggregationTable::new(chrom, roi, samples.len());
        let mask: Vec<Region> = mask.iter_chr_regions(chrom).cloned().collect();
        let mask = RegionSet::from(mask);

        let queue: Mutex<VecDeque<usize>> = Mutex::new((0..samples.len()).collect());
        let finished: Mutex<Vec<(usize, SampleColumn)>> =
            Mutex::new(Vec::with_capacity(samples.len()));
        let failure: Mutex<Option<RoiError>> = Mutex::new(None);

        // never more workers than samples
        let workers = self.workers.min(samples.len());

        self.pool.scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|_| {
                    loop {
                        if lock(&failure).is_some() {
                            break;
                        }
                        let Some(idx) = lock(&queue).pop_front() else {
                            break;
                        };

                        match aggregate_sample(&samples[idx], &table, roi, &mask) {
                            Ok(column) => lock(&finished).push((idx, column)),
                            Err(e) => {
                                lock(&failure).get_or_insert(e);
                                break;
                            }
                        }
                    }
                });
            }
        });

        if let Some(e) = into_inner(failure) {
            return Err(e);
        }

        for (idx, column) in into_inner(finished) {
            debug!("{} {}: merged {} rows", samples[idx].name, chrom, column.len());
            table.set_column(idx, column);
        }

        Ok(table)
    }
}

/// A poisoned lock still holds usable data: workers only push or pop.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn into_inner<T>(mutex: Mutex<T>) -> T {
    mutex
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
