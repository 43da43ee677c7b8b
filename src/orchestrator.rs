//! Retrieval orchestrator for checking every dependency
//!
//! This module provides:
//! - One retrieval task per dependency: fetch → filter → update set
//! - A fixed-size worker pool bounding concurrent version-source calls
//! - Results assembled in dependency order, independent of completion order
//! - Fail-fast on the first task error, and distinct interruption

use crate::domain::{Dependency, UpdateSummary, VersionTuple};
use crate::error::{RetrievalError, TaskError, UpdateError};
use crate::progress::Progress;
use crate::registry::VersionSource;
use crate::update::{is_acceptable_update, AcceptancePolicy, FilteredSequence, UpdateSet};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default number of retrieval workers
pub const DEFAULT_WORKER_COUNT: usize = 8;

/// A dependency together with its result slot
type Job = (usize, Dependency);

/// A finished task together with its result slot
type Outcome = (usize, Result<UpdateSet, TaskError>);

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Number of concurrent retrieval workers
    pub worker_count: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

/// Update sets of all dependencies, iterated in dependency order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalResult {
    updates: BTreeMap<Dependency, UpdateSet>,
}

impl RetrievalResult {
    /// Number of dependencies
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// True if no dependency was checked
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Update set of a dependency
    pub fn get(&self, dependency: &Dependency) -> Option<&UpdateSet> {
        self.updates.get(dependency)
    }

    /// Dependencies and their update sets in dependency order
    pub fn iter(&self) -> impl Iterator<Item = (&Dependency, &UpdateSet)> {
        self.updates.iter()
    }

    /// Dependencies in order
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.updates.keys()
    }

    /// Counts each dependency in the bucket of its nearest update
    pub fn summary(&self) -> Result<UpdateSummary, UpdateError> {
        self.updates
            .values()
            .map(UpdateSet::smallest_difference)
            .collect()
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<Dependency, UpdateSet> {
        self.updates
    }
}

impl FromIterator<UpdateSet> for RetrievalResult {
    fn from_iter<I: IntoIterator<Item = UpdateSet>>(iter: I) -> Self {
        Self {
            updates: iter
                .into_iter()
                .map(|set| (set.dependency().clone(), set))
                .collect(),
        }
    }
}

/// Orchestrator fanning retrieval out over a bounded worker pool
pub struct Orchestrator {
    source: Arc<dyn VersionSource>,
    policy: Arc<dyn AcceptancePolicy>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the default configuration
    pub fn new(source: Arc<dyn VersionSource>, policy: Arc<dyn AcceptancePolicy>) -> Self {
        Self {
            source,
            policy,
            config: OrchestratorConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of workers used per retrieval
    pub fn worker_count(&self) -> usize {
        self.config.worker_count.max(1)
    }

    /// Retrieve the update set of every dependency
    ///
    /// Cancelling `interrupt` ends the retrieval with [`RetrievalError::Interrupted`].
    pub async fn retrieve(
        &self,
        dependencies: &BTreeSet<Dependency>,
        interrupt: &CancellationToken,
    ) -> Result<RetrievalResult, RetrievalError> {
        self.retrieve_with_progress(dependencies, interrupt, &Progress::hidden())
            .await
    }

    /// Retrieve, advancing `progress` once per finished dependency
    pub async fn retrieve_with_progress(
        &self,
        dependencies: &BTreeSet<Dependency>,
        interrupt: &CancellationToken,
        progress: &Progress,
    ) -> Result<RetrievalResult, RetrievalError> {
        let dependencies: Vec<Dependency> = dependencies.iter().cloned().collect();
        let worker_count = self.worker_count().min(dependencies.len());
        info!(
            dependencies = dependencies.len(),
            workers = worker_count,
            source = self.source.source_name(),
            "retrieving updates"
        );

        let queue: VecDeque<Job> = dependencies.iter().cloned().enumerate().collect();
        let queue = Arc::new(Mutex::new(queue));
        let stop = interrupt.child_token();
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let mut workers = JoinSet::new();
        for _ in 0..worker_count {
            workers.spawn(worker(
                Arc::clone(&queue),
                Arc::clone(&self.source),
                Arc::clone(&self.policy),
                stop.clone(),
                sender.clone(),
            ));
        }
        drop(sender);

        let collected = collect(
            &dependencies,
            &mut receiver,
            &mut workers,
            interrupt,
            progress,
        )
        .await;

        stop.cancel();
        workers.shutdown().await;

        let result: RetrievalResult = collected?.into_iter().collect();
        info!(dependencies = result.len(), "retrieval finished");
        Ok(result)
    }
}

/// Wait for one outcome per dependency, failing fast
async fn collect(
    dependencies: &[Dependency],
    receiver: &mut mpsc::UnboundedReceiver<Outcome>,
    workers: &mut JoinSet<()>,
    interrupt: &CancellationToken,
    progress: &Progress,
) -> Result<Vec<UpdateSet>, RetrievalError> {
    let mut slots: Vec<Option<UpdateSet>> = dependencies.iter().map(|_| None).collect();
    let mut remaining = dependencies.len();

    while remaining > 0 {
        tokio::select! {
            biased;

            () = interrupt.cancelled() => {
                info!("retrieval interrupted");
                return Err(RetrievalError::Interrupted);
            }

            received = receiver.recv() => match received {
                Some((slot, Ok(set))) => {
                    progress.checked(set.dependency());
                    slots[slot] = Some(set);
                    remaining -= 1;
                }
                Some((slot, Err(e))) => {
                    return Err(RetrievalError::failed(dependencies[slot].to_string(), e));
                }
                None => break,
            },

            Some(joined) = workers.join_next() => {
                if let Err(e) = joined {
                    return Err(RetrievalError::WorkerPanicked { message: e.to_string() });
                }
            }
        }
    }

    // every sender is gone, so any missing slot belongs to a worker that died
    if remaining > 0 {
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                return Err(RetrievalError::WorkerPanicked {
                    message: e.to_string(),
                });
            }
        }
        return Err(RetrievalError::WorkerPanicked {
            message: format!("{} dependencies were never checked", remaining),
        });
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Pull jobs until the queue is empty or the retrieval stops
async fn worker(
    queue: Arc<Mutex<VecDeque<Job>>>,
    source: Arc<dyn VersionSource>,
    policy: Arc<dyn AcceptancePolicy>,
    stop: CancellationToken,
    results: mpsc::UnboundedSender<Outcome>,
) {
    loop {
        if stop.is_cancelled() {
            break;
        }
        let Some((slot, dependency)) = queue.lock().await.pop_front() else {
            break;
        };

        // dropping the set aborts the task if this worker is torn down
        let mut task = JoinSet::new();
        task.spawn(run_task(Arc::clone(&source), Arc::clone(&policy), dependency));

        let outcome = tokio::select! {
            biased;

            () = stop.cancelled() => break,

            Some(joined) = task.join_next() => joined.unwrap_or_else(|e| {
                Err(TaskError::Panicked {
                    message: panic_message(e),
                })
            }),
        };

        if results.send((slot, outcome)).is_err() {
            break;
        }
    }
}

/// Text of a task's panic payload
fn panic_message(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Fetch, filter and verify the update set of one dependency
async fn run_task(
    source: Arc<dyn VersionSource>,
    policy: Arc<dyn AcceptancePolicy>,
    dependency: Dependency,
) -> Result<UpdateSet, TaskError> {
    debug!(dependency = %dependency, "checking");
    let versions = source.fetch_versions(&dependency).await?;

    let accepted: Vec<VersionTuple> = FilteredSequence::new(versions, |candidate: &VersionTuple| {
        is_acceptable_update(&dependency, candidate, policy.as_ref())
    })
    .collect();

    let set = UpdateSet::new(dependency, accepted);
    set.verify()?;
    debug!(
        dependency = %set.dependency(),
        updates = set.len(),
        next = ?set.next_version().map(VersionTuple::as_str),
        "checked"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Magnitude;
    use crate::error::RegistryError;
    use crate::update::{AcceptAll, QualifierPolicy};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory version source keyed by artifactId
    #[derive(Default)]
    struct FixedSource {
        versions: HashMap<String, Vec<&'static str>>,
        failing: Vec<String>,
        panicking: Vec<String>,
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FixedSource {
        fn with(mut self, artifact: &str, versions: &[&'static str]) -> Self {
            self.versions.insert(artifact.to_string(), versions.to_vec());
            self
        }

        fn failing(mut self, artifact: &str) -> Self {
            self.failing.push(artifact.to_string());
            self
        }

        fn panicking(mut self, artifact: &str) -> Self {
            self.panicking.push(artifact.to_string());
            self
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl VersionSource for FixedSource {
        fn source_name(&self) -> &str {
            "fixed"
        }

        async fn fetch_versions(
            &self,
            dependency: &Dependency,
        ) -> Result<Vec<VersionTuple>, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panicking.contains(&dependency.artifact_id) {
                panic!("source exploded");
            }
            if self.failing.contains(&dependency.artifact_id) {
                return Err(RegistryError::network_error(
                    dependency.coordinate(),
                    "fixed",
                    "connection reset",
                ));
            }
            Ok(self
                .versions
                .get(&dependency.artifact_id)
                .map(|vs| vs.iter().map(|v| VersionTuple::parse(v)).collect())
                .unwrap_or_default())
        }
    }

    fn deps(specs: &[(&str, &str)]) -> BTreeSet<Dependency> {
        specs
            .iter()
            .map(|(artifact, version)| Dependency::new("org.example", *artifact, *version))
            .collect()
    }

    fn numbered_deps(count: usize) -> BTreeSet<Dependency> {
        (0..count)
            .map(|i| Dependency::new("org.example", format!("lib-{:02}", i), "1.0.0"))
            .collect()
    }

    fn orchestrator(source: Arc<FixedSource>, workers: usize) -> Orchestrator {
        Orchestrator::new(source, Arc::new(QualifierPolicy::default()))
            .with_config(OrchestratorConfig {
                worker_count: workers,
            })
    }

    fn versions(set: &UpdateSet, magnitude: Magnitude) -> Vec<String> {
        set.versions_of(magnitude)
            .unwrap()
            .into_iter()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn test_orchestrator_config_default() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.worker_count, 8);
    }

    #[test]
    fn test_worker_count_at_least_one() {
        let source = Arc::new(FixedSource::default());
        assert_eq!(orchestrator(source, 0).worker_count(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_builds_update_sets() {
        let source = Arc::new(
            FixedSource::default()
                .with("core", &["1.2.3", "1.2.4", "1.3.0", "2.0.0", "1.2.3-RC1", "1.0.0"])
                .with("util", &["3.0.0", "3.0.1-SNAPSHOT"])
                .with("api", &[]),
        );
        let dependencies = deps(&[("core", "1.2.3"), ("util", "3.0.0"), ("api", "0.1")]);

        let result = orchestrator(source, 2)
            .retrieve(&dependencies, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        let core = result
            .get(&Dependency::new("org.example", "core", "1.2.3"))
            .unwrap();
        assert_eq!(core.next_version().map(|v| v.to_string()), Some("1.2.4".into()));
        assert_eq!(core.smallest_difference(), Ok(Magnitude::Incremental));
        assert_eq!(versions(core, Magnitude::Major), vec!["2.0.0"]);
        assert_eq!(versions(core, Magnitude::Minor), vec!["1.3.0"]);
        assert_eq!(versions(core, Magnitude::Incremental), vec!["1.2.4"]);

        let util = result
            .get(&Dependency::new("org.example", "util", "3.0.0"))
            .unwrap();
        assert!(util.is_empty());

        let summary = result.summary().unwrap();
        assert_eq!(summary.using_last_version, 2);
        assert_eq!(summary.next_incremental_available, 1);
    }

    #[tokio::test]
    async fn test_retrieve_fewer_workers_than_dependencies() {
        let source = Arc::new(FixedSource::default().delayed(Duration::from_millis(10)));
        let dependencies = numbered_deps(10);

        let result = orchestrator(Arc::clone(&source), 3)
            .retrieve(&dependencies, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.len(), 10);
        assert_eq!(source.calls.load(Ordering::SeqCst), 10);
        assert!(source.max_in_flight.load(Ordering::SeqCst) <= 3);
        let keys: Vec<&Dependency> = result.dependencies().collect();
        let expected: Vec<&Dependency> = dependencies.iter().collect();
        assert_eq!(keys, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_retrieve_order_is_deterministic() {
        let source = Arc::new(FixedSource::default().delayed(Duration::from_millis(1)));
        let dependencies = numbered_deps(25);
        let orchestrator = orchestrator(source, 6);

        let first = orchestrator
            .retrieve(&dependencies, &CancellationToken::new())
            .await
            .unwrap();
        let second = orchestrator
            .retrieve(&dependencies, &CancellationToken::new())
            .await
            .unwrap();

        let first: Vec<String> = first.dependencies().map(|d| d.to_string()).collect();
        let second: Vec<String> = second.dependencies().map(|d| d.to_string()).collect();
        assert_eq!(first, second);
        let expected: Vec<String> = dependencies.iter().map(|d| d.to_string()).collect();
        assert_eq!(first, expected);
    }

    #[tokio::test]
    async fn test_retrieve_empty() {
        let source = Arc::new(FixedSource::default());
        let result = orchestrator(Arc::clone(&source), 4)
            .retrieve(&BTreeSet::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retrieve_fails_on_single_fetch_error() {
        let source = Arc::new(
            FixedSource::default()
                .with("good", &["2.0.0"])
                .failing("bad"),
        );
        let dependencies = deps(&[("good", "1.0.0"), ("bad", "1.0.0")]);

        let err = orchestrator(source, 2)
            .retrieve(&dependencies, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.dependency(), Some("org.example:bad:jar:1.0.0"));
        match err {
            RetrievalError::Failed {
                source: TaskError::Fetch(RegistryError::NetworkError { message, .. }),
                ..
            } => assert_eq!(message, "connection reset"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retrieve_stops_scheduling_after_failure() {
        let source = Arc::new(
            FixedSource::default()
                .failing("lib-00")
                .delayed(Duration::from_millis(5)),
        );
        let dependencies = numbered_deps(20);

        let err = orchestrator(Arc::clone(&source), 1)
            .retrieve(&dependencies, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RetrievalError::Failed { .. }));
        assert!(source.calls.load(Ordering::SeqCst) < dependencies.len());
    }

    #[tokio::test]
    async fn test_retrieve_interrupted() {
        let source = Arc::new(FixedSource::default().delayed(Duration::from_secs(30)));
        let dependencies = numbered_deps(4);
        let interrupt = CancellationToken::new();

        let trigger = interrupt.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            orchestrator(source, 2).retrieve(&dependencies, &interrupt),
        )
        .await
        .expect("retrieval did not stop after interrupt");

        assert!(matches!(result, Err(RetrievalError::Interrupted)));
    }

    #[tokio::test]
    async fn test_retrieve_already_interrupted() {
        let source = Arc::new(FixedSource::default());
        let interrupt = CancellationToken::new();
        interrupt.cancel();

        let result = orchestrator(source, 2)
            .retrieve(&numbered_deps(3), &interrupt)
            .await;
        assert!(matches!(result, Err(RetrievalError::Interrupted)));
    }

    #[tokio::test]
    async fn test_retrieve_with_progress_counts_each_dependency() {
        let source = Arc::new(FixedSource::default());
        let mut progress = Progress::hidden();
        progress.checking(5);
        orchestrator(source, 3)
            .retrieve_with_progress(&numbered_deps(5), &CancellationToken::new(), &progress)
            .await
            .unwrap();
        assert_eq!(progress.checked_count(), 5);
    }

    #[tokio::test]
    async fn test_retrieve_task_panic_names_dependency() {
        let source = Arc::new(FixedSource::default().panicking("lib-01"));
        let err = orchestrator(source, 2)
            .retrieve(&numbered_deps(3), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.dependency(), Some("org.example:lib-01:jar:1.0.0"));
        match err {
            RetrievalError::Failed {
                source: TaskError::Panicked { message },
                ..
            } => assert_eq!(message, "source exploded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retrieve_panic_among_healthy_dependencies() {
        let source = Arc::new(
            FixedSource::default()
                .with("alpha", &["1.1.0"])
                .with("gamma", &["2.0.0"])
                .panicking("boom"),
        );
        let dependencies = deps(&[("alpha", "1.0.0"), ("boom", "1.0.0"), ("gamma", "1.0.0")]);
        let err = orchestrator(source, 1)
            .retrieve(&dependencies, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.dependency(), Some("org.example:boom:jar:1.0.0"));
        assert!(err.to_string().contains("task panicked: source exploded"));
    }

    #[tokio::test]
    async fn test_retrieve_with_accept_all_policy() {
        let source = Arc::new(FixedSource::default().with("core", &["1.0.0", "1.1.0-RC1", "0.9"]));
        let result = Orchestrator::new(source, Arc::new(AcceptAll))
            .retrieve(&deps(&[("core", "1.0.0")]), &CancellationToken::new())
            .await
            .unwrap();

        let set = result.iter().next().map(|(_, set)| set).unwrap();
        assert_eq!(versions(set, Magnitude::Minor), vec!["1.1.0-RC1"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_retrieval_result_from_update_sets() {
        let a = UpdateSet::new(Dependency::new("g", "b", "1.0"), vec![VersionTuple::parse("2.0")]);
        let b = UpdateSet::new(Dependency::new("g", "a", "1.0"), Vec::new());
        let result: RetrievalResult = vec![a, b].into_iter().collect();

        let artifacts: Vec<&str> = result.dependencies().map(|d| d.artifact_id.as_str()).collect();
        assert_eq!(artifacts, vec!["a", "b"]);
        let summary = result.summary().unwrap();
        assert_eq!(summary.next_major_available, 1);
        assert_eq!(summary.using_last_version, 1);
    }
}
