use crate::{SyncConfig, SyncFailure};
use skarn_blockchain::{Blockchain, BlockchainError};
use skarn_db::Database;
use skarn_interfaces::{DataError, StarknetData};
use skarn_primitives::{Block, BlockNumber, ClassMap, StateUpdate};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// The block synchronizer.
///
/// Drives the chain forward from `height() + 1` (or 0 on an empty store) by
/// pipelining upstream fetches over a bounded fetcher pool and committing
/// the results through a bounded verifier pool. See the crate documentation
/// for the rollback protocol.
#[derive(Debug)]
pub struct Synchronizer<DB, S> {
    blockchain: Arc<Blockchain<DB>>,
    source: Arc<S>,
    config: SyncConfig,
}

/// A fetched block triple, tagged with the rollback epoch it was fetched
/// under. Results from a cancelled epoch are discarded on receipt.
struct FetchedBlock {
    epoch: u64,
    block: Block,
    state_update: StateUpdate,
    classes: ClassMap,
}

impl<DB, S> Synchronizer<DB, S>
where
    DB: Database + 'static,
    S: StarknetData + 'static,
{
    /// Creates a synchronizer with the default configuration.
    pub fn new(blockchain: Arc<Blockchain<DB>>, source: Arc<S>) -> Self {
        Self::with_config(blockchain, source, SyncConfig::default())
    }

    /// Creates a synchronizer with the given configuration.
    pub fn with_config(
        blockchain: Arc<Blockchain<DB>>,
        source: Arc<S>,
        config: SyncConfig,
    ) -> Self {
        Self { blockchain, source, config }
    }

    /// Runs the synchronizer until `shutdown` is cancelled.
    ///
    /// The event loop owns the next height to fetch and the pipeline
    /// cancellation scope. On a [`SyncFailure`] it cancels the scope, which
    /// turns every in-flight fetcher and verifier into a no-op, and resumes
    /// from the lowest uncommitted height. On shutdown it drains both pools
    /// before returning.
    pub async fn run(self, shutdown: CancellationToken) {
        let Self { blockchain, source, config } = self;
        let max_inflight = config.max_inflight.max(1);

        let (failure_tx, mut failure_rx) = mpsc::channel::<(u64, SyncFailure)>(1);
        let commit_lock = Arc::new(Mutex::new(()));
        let mut fetchers: JoinSet<Option<FetchedBlock>> = JoinSet::new();
        let mut verifiers: JoinSet<()> = JoinSet::new();

        let mut pipeline = shutdown.child_token();
        let mut epoch = 0u64;
        let mut next_height = match blockchain.height() {
            Ok(height) => height + 1,
            Err(_) => 0,
        };

        loop {
            while fetchers.len() < max_inflight && !shutdown.is_cancelled() {
                fetchers.spawn(fetch_task(
                    Arc::clone(&source),
                    next_height,
                    epoch,
                    pipeline.clone(),
                    config.retry_interval,
                ));
                next_height += 1;
            }

            tokio::select! {
                Some((failed_epoch, failure)) = failure_rx.recv() => {
                    // the lowest height the store does not hold yet
                    let resume_height = match blockchain.height() {
                        Ok(height) => height + 1,
                        Err(_) => 0,
                    };
                    // Failures from a cancelled epoch are stale, as are
                    // failures below the head: a sibling verifier committed
                    // the height in the meantime.
                    if failed_epoch == epoch && failure.height >= resume_height {
                        warn!(target: "sync", height = failure.height, %failure, "Rolling back sync process to failed height");
                        pipeline.cancel();
                        pipeline = shutdown.child_token();
                        epoch += 1;
                        next_height = resume_height;
                    }
                }
                Some(result) = fetchers.join_next(), if verifiers.len() < max_inflight => {
                    match result {
                        Ok(Some(fetched)) if fetched.epoch == epoch => {
                            verifiers.spawn(verify_task(
                                Arc::clone(&blockchain),
                                fetched,
                                pipeline.clone(),
                                Arc::clone(&commit_lock),
                                failure_tx.clone(),
                            ));
                        }
                        Ok(_) => {}
                        Err(err) => error!(target: "sync", %err, "Fetcher task failed"),
                    }
                }
                Some(result) = verifiers.join_next() => {
                    if let Err(err) = result {
                        error!(target: "sync", %err, "Verifier task failed");
                    }
                }
                _ = shutdown.cancelled() => {
                    while fetchers.join_next().await.is_some() {}
                    while verifiers.join_next().await.is_some() {}
                    return;
                }
            }
        }
    }
}

/// Fetches the triple at `height`, retrying forever.
///
/// Every upstream error is treated as transient, including "block not yet
/// produced". The only way out without a result is pipeline cancellation.
async fn fetch_task<S: StarknetData>(
    source: Arc<S>,
    height: BlockNumber,
    epoch: u64,
    pipeline: CancellationToken,
    retry_interval: Duration,
) -> Option<FetchedBlock> {
    loop {
        tokio::select! {
            _ = pipeline.cancelled() => return None,
            result = fetch_block_at(source.as_ref(), height) => match result {
                Ok((block, state_update, classes)) => {
                    return Some(FetchedBlock { epoch, block, state_update, classes })
                }
                Err(error) => {
                    trace!(target: "sync", height, %error, "Upstream fetch failed, retrying");
                    tokio::select! {
                        _ = pipeline.cancelled() => return None,
                        _ = tokio::time::sleep(retry_interval) => {}
                    }
                }
            }
        }
    }
}

/// Fetches the block and state update at `height` and resolves every class
/// referenced by the state diff.
async fn fetch_block_at<S: StarknetData + ?Sized>(
    source: &S,
    height: BlockNumber,
) -> Result<(Block, StateUpdate, ClassMap), DataError> {
    let block = source.block_by_number(height).await?;
    let state_update = source.state_update(height).await?;

    let mut classes = ClassMap::default();
    for class_hash in state_update.state_diff.class_hashes() {
        let class = source.class(&class_hash).await?;
        classes.insert(class_hash, class);
    }
    Ok((block, state_update, classes))
}

/// Sanity checks a fetched triple and commits it.
///
/// Commits run one at a time under the commit lock, the verifier pool's
/// serialized completion phase.
async fn verify_task<DB: Database>(
    blockchain: Arc<Blockchain<DB>>,
    fetched: FetchedBlock,
    pipeline: CancellationToken,
    commit_lock: Arc<Mutex<()>>,
    failure_tx: mpsc::Sender<(u64, SyncFailure)>,
) {
    let FetchedBlock { epoch, block, state_update, classes } = fetched;
    let number = block.number();
    let hash = format!("{:#x}", block.hash());

    if pipeline.is_cancelled() {
        return;
    }

    // the expensive part of the check (commitment recomputation) runs in
    // parallel across the verifier pool
    let mut outcome = blockchain.sanity_check_new_height(&block, &state_update);

    let _commit = commit_lock.lock().await;
    if pipeline.is_cancelled() {
        return;
    }

    if matches!(outcome, Err(BlockchainError::IncompatibleBlock(_))) {
        // the linkage check races sibling commits; settle it at the
        // serialization point, where the head cannot move anymore
        outcome = blockchain.sanity_check_new_height(&block, &state_update);
    }
    match outcome {
        Err(error @ BlockchainError::CantVerifyTransactionHash { .. }) => {
            // expected for some historical blocks: log the whole cause chain
            // and continue to store
            let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(&error);
            while let Some(err) = cause {
                debug!(target: "sync", number, %hash, %err, "Sanity checks failed");
                cause = err.source();
            }
        }
        Err(error) => {
            warn!(target: "sync", number, %hash, %error, "Sanity checks failed");
            let failure = SyncFailure { height: number, error };
            report_failure(&pipeline, &failure_tx, epoch, failure).await;
            return;
        }
        Ok(()) => {}
    }

    match blockchain.store(&block, &state_update, &classes) {
        Ok(()) => {
            let root = format!("{:#x}", block.header.global_state_root);
            info!(target: "sync", number, %hash, %root, "Stored block");
        }
        Err(error) => {
            warn!(target: "sync", number, %hash, %error, "Failed storing block");
            let failure = SyncFailure { height: number, error };
            report_failure(&pipeline, &failure_tx, epoch, failure).await;
        }
    }
}

/// Publishes a failure on the failure channel unless the pipeline was
/// cancelled in the meantime.
async fn report_failure(
    pipeline: &CancellationToken,
    failure_tx: &mpsc::Sender<(u64, SyncFailure)>,
    epoch: u64,
    failure: SyncFailure,
) {
    tokio::select! {
        _ = pipeline.cancelled() => {}
        _ = failure_tx.send((epoch, failure)) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skarn_db::{mem::MemDatabase, Batch, DatabaseError};
    use skarn_primitives::{test_utils, Class, ClassHash, Felt, Network, Transaction};
    use std::sync::atomic::{AtomicUsize, Ordering};

    type ChainData = Vec<(Block, StateUpdate, ClassMap)>;

    /// In-memory upstream serving a pre-generated chain, rejecting heights
    /// beyond its tip like the real gateway does.
    struct TestSource {
        chain: ChainData,
    }

    #[async_trait]
    impl StarknetData for TestSource {
        async fn block_by_number(&self, number: BlockNumber) -> Result<Block, DataError> {
            self.chain
                .get(number as usize)
                .map(|(block, _, _)| block.clone())
                .ok_or(DataError::BlockNotFound(number))
        }

        async fn state_update(&self, number: BlockNumber) -> Result<StateUpdate, DataError> {
            self.chain
                .get(number as usize)
                .map(|(_, state_update, _)| state_update.clone())
                .ok_or(DataError::BlockNotFound(number))
        }

        async fn class(&self, hash: &ClassHash) -> Result<Class, DataError> {
            self.chain
                .iter()
                .find_map(|(_, _, classes)| classes.get(hash).cloned())
                .ok_or(DataError::ClassNotFound(*hash))
        }
    }

    /// Wraps [`MemDatabase`] and fails the batch commit with the given
    /// ordinal exactly once.
    #[derive(Clone, Debug)]
    struct FailingDatabase {
        inner: MemDatabase,
        commits: Arc<AtomicUsize>,
        fail_at_commit: usize,
    }

    impl FailingDatabase {
        fn new(fail_at_commit: usize) -> Self {
            Self {
                inner: MemDatabase::new(),
                commits: Arc::new(AtomicUsize::new(0)),
                fail_at_commit,
            }
        }
    }

    impl Database for FailingDatabase {
        type Batch = FailingBatch;

        fn get(&self, key: &[u8]) -> Result<Vec<u8>, DatabaseError> {
            self.inner.get(key)
        }

        fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError> {
            self.inner.put(key, value)
        }

        fn delete(&self, key: &[u8]) -> Result<(), DatabaseError> {
            self.inner.delete(key)
        }

        fn batch(&self) -> Self::Batch {
            FailingBatch {
                inner: self.inner.batch(),
                commits: Arc::clone(&self.commits),
                fail_at_commit: self.fail_at_commit,
            }
        }
    }

    #[derive(Debug)]
    struct FailingBatch {
        inner: <MemDatabase as Database>::Batch,
        commits: Arc<AtomicUsize>,
        fail_at_commit: usize,
    }

    impl Batch for FailingBatch {
        fn put(&mut self, key: &[u8], value: &[u8]) {
            self.inner.put(key, value);
        }

        fn delete(&mut self, key: &[u8]) {
            self.inner.delete(key);
        }

        fn commit(self) -> Result<(), DatabaseError> {
            let ordinal = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
            if ordinal == self.fail_at_commit {
                return Err(DatabaseError::Backend("injected commit failure".into()));
            }
            self.inner.commit()
        }
    }

    fn config() -> SyncConfig {
        SyncConfig { max_inflight: 2, retry_interval: Duration::from_millis(5) }
    }

    async fn wait_for_height<DB: Database>(blockchain: &Blockchain<DB>, height: BlockNumber) {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                if blockchain.height().is_ok_and(|h| h >= height) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("chain did not reach the target height in time");
    }

    #[tokio::test]
    async fn syncs_a_chain_from_genesis() {
        let chain_data = test_utils::test_chain(5);
        let blockchain = Arc::new(Blockchain::new(MemDatabase::new(), Network::Goerli));
        let source = Arc::new(TestSource { chain: chain_data.clone() });

        let shutdown = CancellationToken::new();
        let engine = Synchronizer::with_config(Arc::clone(&blockchain), source, config());
        let handle = tokio::spawn(engine.run(shutdown.clone()));

        wait_for_height(&blockchain, 4).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(blockchain.head().unwrap(), chain_data[4].0);
        assert_eq!(blockchain.state_commitment().unwrap(), chain_data[4].1.new_root);

        // classes referenced along the way were persisted
        let class_hash = test_utils::test_class_hash(3);
        assert_eq!(
            blockchain.class_by_hash(&class_hash).unwrap(),
            test_utils::test_class(&class_hash)
        );
    }

    #[tokio::test]
    async fn resumes_from_the_persisted_head() {
        let chain_data = test_utils::test_chain(5);
        let blockchain = Arc::new(Blockchain::new(MemDatabase::new(), Network::Goerli));
        for (block, state_update, classes) in &chain_data[..2] {
            blockchain.store(block, state_update, classes).unwrap();
        }

        let source = Arc::new(TestSource { chain: chain_data.clone() });
        let shutdown = CancellationToken::new();
        let engine = Synchronizer::with_config(Arc::clone(&blockchain), source, config());
        let handle = tokio::spawn(engine.run(shutdown.clone()));

        wait_for_height(&blockchain, 4).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(blockchain.head().unwrap(), chain_data[4].0);
    }

    #[tokio::test]
    async fn rolls_back_and_retries_a_failed_store() {
        let chain_data = test_utils::test_chain(4);
        // commits 1 and 2 store blocks 0 and 1; the first store of block 2
        // is commit 3 and fails once
        let db = FailingDatabase::new(3);
        let commits = Arc::clone(&db.commits);
        let blockchain = Arc::new(Blockchain::new(db, Network::Goerli));
        let source = Arc::new(TestSource { chain: chain_data.clone() });

        let shutdown = CancellationToken::new();
        let engine = Synchronizer::with_config(Arc::clone(&blockchain), source, config());
        let handle = tokio::spawn(engine.run(shutdown.clone()));

        wait_for_height(&blockchain, 3).await;
        shutdown.cancel();
        handle.await.unwrap();

        // the pipeline rolled back and stored height 2 on a second attempt
        assert_eq!(blockchain.head().unwrap(), chain_data[3].0);
        assert!(commits.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test]
    async fn unverifiable_transaction_hashes_do_not_stop_the_chain() {
        let mut chain_data = test_utils::test_chain(3);
        {
            let (block, _, _) = &mut chain_data[1];
            match &mut block.transactions[0] {
                Transaction::Invoke(tx) => tx.hash = Felt::ZERO,
                _ => unreachable!("the test chain starts each block with an invoke"),
            }
            block.header.transaction_commitment =
                skarn_primitives::proofs::transaction_commitment(&block.transactions).unwrap();
        }

        let blockchain = Arc::new(Blockchain::new(MemDatabase::new(), Network::Goerli));
        let source = Arc::new(TestSource { chain: chain_data.clone() });
        let shutdown = CancellationToken::new();
        let engine = Synchronizer::with_config(Arc::clone(&blockchain), source, config());
        let handle = tokio::spawn(engine.run(shutdown.clone()));

        // the flagged block is stored anyway and the chain keeps advancing
        wait_for_height(&blockchain, 2).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(blockchain.block_by_number(1).unwrap(), chain_data[1].0);
        assert_eq!(blockchain.head().unwrap(), chain_data[2].0);
    }

    #[tokio::test]
    async fn shutdown_drains_the_pools() {
        // a fully synced source keeps every fetcher in its retry loop
        let chain_data = test_utils::test_chain(1);
        let blockchain = Arc::new(Blockchain::new(MemDatabase::new(), Network::Goerli));
        let source = Arc::new(TestSource { chain: chain_data });

        let shutdown = CancellationToken::new();
        let engine = Synchronizer::with_config(Arc::clone(&blockchain), source, config());
        let handle = tokio::spawn(engine.run(shutdown.clone()));

        wait_for_height(&blockchain, 0).await;
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("synchronizer did not drain on shutdown")
            .unwrap();
    }
}
