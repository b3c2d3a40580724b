//! Three-phase clone detection pipeline.
//!
//! Phase one tokenizes the source tree into a frozen corpus
//! ([`Preprocessor`]). Phases two and three run per partition: an inverted
//! n-gram index is built over a contiguous id range, then every query
//! sequence above the partition start is located against it, filtered by
//! n-gram overlap, and verified by LCS similarity when the fast path is
//! inconclusive.
//!
//! The query loop fans out across a rayon pool; accepted pairs stream
//! through a bounded channel into a single writer thread, which applies
//! backpressure when the sink lags. Within a partition the emission order
//! follows worker completion; across partitions it is strictly sequential.

pub mod preprocess;

pub use preprocess::{PreprocessStats, Preprocessor};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Sender};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::config::DetectionConfig;
use crate::core::corpus::Corpus;
use crate::core::errors::{DraupnirError, Result};
use crate::detectors::index::PartitionIndex;
use crate::detectors::lcs::lcs_similarity;
use crate::detectors::locate::{locate, ngram_similarity, LocationScratch};
use crate::detectors::ngram::{gram_count, NgramSet};
use crate::io::pairs::{ClonePair, PairWriter};

/// Capacity of the bounded channel between detection workers and the
/// pair-file writer. Workers block on send when the sink lags this far
/// behind, which keeps memory bounded on pair-dense corpora.
const PAIR_SINK_CAPACITY: usize = 4096;

/// Counters reported after detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionStats {
    /// Sequences in the corpus
    pub sequences: usize,

    /// Partition iterations that ran
    pub partitions: usize,

    /// Accepted clone pairs written to the pair file
    pub pairs: u64,
}

/// Detection stage: frozen corpus in, pair file out.
pub struct CloneDetector {
    config: Arc<DetectionConfig>,
}

impl CloneDetector {
    /// Create a detector for the given configuration.
    pub fn new(config: Arc<DetectionConfig>) -> Self {
        Self { config }
    }

    /// Run partitioned detection over the corpus, appending accepted pairs
    /// to `pair_path`.
    ///
    /// When `interrupt` is raised the run stops at the next query boundary,
    /// the sink flushes what it has, and [`DraupnirError::Interrupted`]
    /// surfaces; the partial pair file is a valid prefix of a complete run.
    pub fn run(
        &self,
        corpus: &Arc<Corpus>,
        pair_path: &Path,
        interrupt: Arc<AtomicBool>,
    ) -> Result<DetectionStats> {
        let writer = PairWriter::create(pair_path)?;
        let total = corpus.len();

        if total == 0 {
            writer.finish()?;
            return Ok(DetectionStats::default());
        }

        let gram_size = self.config.gram_size;
        let gram_counts: Vec<u32> = corpus
            .iter()
            .map(|seq| gram_count(seq.tokens.len(), gram_size))
            .collect();

        let partition_size = partition_size(total, self.config.partition_count)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.effective_threads())
            .build()
            .map_err(|err| DraupnirError::internal(format!("failed to build thread pool: {err}")))?;

        let (sink, pair_rx) = bounded::<ClonePair>(PAIR_SINK_CAPACITY);

        let (detect_result, writer_result) = thread::scope(|scope| {
            let writer_handle = scope.spawn(move || -> Result<u64> {
                let mut writer = writer;
                for pair in pair_rx.iter() {
                    writer.write_pair(&pair)?;
                }
                let pairs = writer.pairs();
                writer.finish()?;
                Ok(pairs)
            });

            let mut partitions = 0usize;
            let mut outcome: Result<()> = Ok(());

            for partition in 0..self.config.partition_count {
                let Some(start) = partition.checked_mul(partition_size) else {
                    break;
                };
                if start >= total {
                    // Extra partitions are no-ops, not errors
                    break;
                }
                if interrupt.load(Ordering::Relaxed) {
                    outcome = Err(DraupnirError::Interrupted);
                    break;
                }

                let index = PartitionIndex::build(corpus, start, partition_size, gram_size);
                debug!(partition, start, partition_size, "partition index built");

                let result = pool.install(|| {
                    (start + 1..total).into_par_iter().try_for_each_init(
                        LocationScratch::new,
                        |scratch, query_id| {
                            self.process_query(
                                corpus,
                                &gram_counts,
                                &index,
                                query_id,
                                scratch,
                                &sink,
                                &interrupt,
                            )
                        },
                    )
                });

                if let Err(err) = result {
                    outcome = Err(err);
                    break;
                }
                partitions += 1;
            }

            drop(sink);
            let writer_result = writer_handle
                .join()
                .unwrap_or_else(|_| Err(DraupnirError::internal("pair writer thread panicked")));

            (outcome.map(|()| partitions), writer_result)
        });

        // A writer-side failure is the root cause when workers merely saw
        // the sink disconnect
        let pairs = writer_result?;
        let partitions = detect_result?;

        let stats = DetectionStats {
            sequences: total,
            partitions,
            pairs,
        };
        info!(
            sequences = stats.sequences,
            partitions = stats.partitions,
            pairs = stats.pairs,
            "detection complete"
        );
        Ok(stats)
    }

    /// Locate, filter, and verify all candidates of one query sequence.
    fn process_query(
        &self,
        corpus: &Corpus,
        gram_counts: &[u32],
        index: &PartitionIndex,
        query_id: usize,
        scratch: &mut LocationScratch,
        sink: &Sender<ClonePair>,
        interrupt: &AtomicBool,
    ) -> Result<()> {
        if interrupt.load(Ordering::Relaxed) {
            return Err(DraupnirError::Interrupted);
        }

        let query_tokens = corpus.tokens_of(query_id);
        let query = NgramSet::build(query_tokens, self.config.gram_size);
        if query.is_empty() {
            return Ok(());
        }

        for (candidate, shared) in locate(index, &query, query_id as u32, scratch) {
            let similarity =
                ngram_similarity(shared, query.total(), gram_counts[candidate as usize]);
            if similarity < self.config.filtration_threshold {
                continue;
            }

            let pair = if similarity >= self.config.verification_threshold {
                // Fast path: the n-gram similarity alone is conclusive
                ClonePair {
                    id1: candidate,
                    id2: query_id as u32,
                    ngram_similarity: similarity,
                    lcs_similarity: None,
                }
            } else {
                let verified =
                    lcs_similarity(query_tokens, corpus.tokens_of(candidate as usize));
                if verified < self.config.verification_threshold {
                    // A failed verification is a negative result, not an error
                    continue;
                }
                ClonePair {
                    id1: candidate,
                    id2: query_id as u32,
                    ngram_similarity: similarity,
                    lcs_similarity: Some(verified),
                }
            };

            sink.send(pair)
                .map_err(|_| DraupnirError::internal("pair sink disconnected"))?;
        }

        Ok(())
    }
}

/// Partition size covering `total` sequences in `partition_count` slices.
///
/// The driver defends itself here rather than relying on
/// [`DetectionConfig::validate`], which a direct library caller may skip.
fn partition_size(total: usize, partition_count: usize) -> Result<usize> {
    if partition_count == 0 {
        return Err(DraupnirError::config_field(
            "partition_count must be greater than 0",
            "partition_count",
        ));
    }
    let padded = total.checked_add(partition_count - 1).ok_or_else(|| {
        DraupnirError::config("partition size computation overflowed for this corpus")
    })?;
    Ok(padded / partition_count)
}
