//! GraphService - Channel-Owned Wait-For Graph
//!
//! # Message Flow
//!
//! ```text
//! GraphHandle (clone per caller)
//!     │  Command { .., reply: oneshot::Sender }
//!     ▼
//! bounded mpsc ──▶ owner task ──▶ WaitForGraph<N>   (no lock, single owner)
//!                      │
//!                      └── oneshot reply ──▶ caller
//! ```
//!
//! Commands from one handle are applied in send order. Every call waits for
//! its reply, so once `add_edge(..).await` returns `Ok`, any later call from
//! any handle observes the edge.
//!
//! # Shutdown
//!
//! The task exits on an explicit `shutdown()` or when the last handle is
//! dropped. Calls made after that fail with `ServiceClosed`.
//!
//! # Bounded Detection
//!
//! `detect_deadlock_within` bounds how long the *caller* waits. The scan
//! itself runs to completion inside the owner task and its answer is dropped
//! if nobody is listening anymore.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::OracleConfig;
use crate::domain::graph::{GraphNode, GraphStats, NodeId, WaitForGraph};
use crate::error::{OracleError, OracleResult};

enum Command<N> {
    AddEdge {
        from: N,
        to: N,
        reply: oneshot::Sender<()>,
    },
    Detect {
        reply: oneshot::Sender<bool>,
    },
    FindCycle {
        reply: oneshot::Sender<Option<Vec<N>>>,
    },
    Stats {
        reply: oneshot::Sender<GraphStats>,
    },
    Clear {
        reply: oneshot::Sender<()>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Owner task state
pub struct GraphService<N = NodeId> {
    graph: WaitForGraph<N>,
    rx: mpsc::Receiver<Command<N>>,
}

impl<N: GraphNode + Send + 'static> GraphService<N> {
    /// Start the owner task on the current tokio runtime
    ///
    /// Returns the first handle and the task's join handle. The config is
    /// assumed validated (see [`OracleConfig::validate`]).
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, like `tokio::spawn`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use alloc_oracle::adapters::service::GraphService;
    /// use alloc_oracle::{NodeId, OracleConfig};
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let (graph, task) = GraphService::<NodeId>::spawn(&OracleConfig::default());
    ///
    /// graph.add_edge(NodeId(1), NodeId(2)).await.unwrap();
    /// graph.add_edge(NodeId(2), NodeId(1)).await.unwrap();
    /// assert!(graph.detect_deadlock().await.unwrap());
    ///
    /// graph.shutdown().await.unwrap();
    /// task.await.unwrap();
    /// # });
    /// ```
    pub fn spawn(config: &OracleConfig) -> (GraphHandle<N>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.service.channel_capacity.max(1));
        let service = Self {
            graph: WaitForGraph::with_capacity(config.graph.initial_capacity),
            rx,
        };
        let handle = GraphHandle {
            tx,
            default_timeout: Duration::from_millis(config.service.detection_timeout_ms),
        };

        info!(
            channel_capacity = config.service.channel_capacity,
            initial_capacity = config.graph.initial_capacity,
            "graph service started"
        );
        let task = tokio::spawn(service.run());

        (handle, task)
    }

    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            // A failed reply means the caller stopped waiting; nothing to do.
            match command {
                Command::AddEdge { from, to, reply } => {
                    self.graph.add_edge(from, to);
                    let _ = reply.send(());
                }
                Command::Detect { reply } => {
                    let _ = reply.send(self.graph.detect_deadlock());
                }
                Command::FindCycle { reply } => {
                    let _ = reply.send(self.graph.find_cycle());
                }
                Command::Stats { reply } => {
                    let _ = reply.send(self.graph.stats());
                }
                Command::Clear { reply } => {
                    self.graph.clear();
                    let _ = reply.send(());
                }
                Command::Shutdown { reply } => {
                    debug!("graph service shutdown requested");
                    let _ = reply.send(());
                    break;
                }
            }
        }

        let stats = self.graph.stats();
        info!(nodes = stats.nodes, edges = stats.edges, "graph service stopped");
    }
}

/// Cloneable client of a [`GraphService`]
pub struct GraphHandle<N = NodeId> {
    tx: mpsc::Sender<Command<N>>,
    default_timeout: Duration,
}

impl<N> Clone for GraphHandle<N> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            default_timeout: self.default_timeout,
        }
    }
}

impl<N> std::fmt::Debug for GraphHandle<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphHandle")
            .field("closed", &self.tx.is_closed())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl<N: GraphNode + Send + 'static> GraphHandle<N> {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command<N>,
    ) -> OracleResult<T> {
        let (reply, answer) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| OracleError::ServiceClosed)?;
        answer.await.map_err(|_| OracleError::ServiceClosed)
    }

    /// Record that `from` waits for `to`
    pub async fn add_edge(&self, from: N, to: N) -> OracleResult<()> {
        self.request(|reply| Command::AddEdge { from, to, reply }).await
    }

    /// True iff the graph currently contains a directed cycle
    pub async fn detect_deadlock(&self) -> OracleResult<bool> {
        self.request(|reply| Command::Detect { reply }).await
    }

    /// Node sequence of the first cycle found
    pub async fn find_cycle(&self) -> OracleResult<Option<Vec<N>>> {
        self.request(|reply| Command::FindCycle { reply }).await
    }

    /// Node and edge counters
    pub async fn stats(&self) -> OracleResult<GraphStats> {
        self.request(|reply| Command::Stats { reply }).await
    }

    /// Drop every node and edge
    pub async fn clear(&self) -> OracleResult<()> {
        self.request(|reply| Command::Clear { reply }).await
    }

    /// [`detect_deadlock`](Self::detect_deadlock), but give up after `timeout`
    ///
    /// # Errors
    ///
    /// `DetectionTimeout` if no answer arrived in time, `ServiceClosed` if
    /// the task is gone.
    pub async fn detect_deadlock_within(&self, timeout: Duration) -> OracleResult<bool> {
        match tokio::time::timeout(timeout, self.detect_deadlock()).await {
            Ok(answer) => answer,
            Err(_) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                debug!(timeout_ms, "deadlock detection timed out");
                Err(OracleError::DetectionTimeout { timeout_ms })
            }
        }
    }

    /// Bounded detection using the configured `detection_timeout_ms`
    pub async fn detect_deadlock_bounded(&self) -> OracleResult<bool> {
        self.detect_deadlock_within(self.default_timeout).await
    }

    /// Ask the owner task to stop
    ///
    /// Returns once the task has acknowledged; queued commands sent before
    /// this one are still applied.
    pub async fn shutdown(&self) -> OracleResult<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// True once the owner task has stopped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> (GraphHandle<u32>, JoinHandle<()>) {
        GraphService::spawn(&OracleConfig::default())
    }

    #[tokio::test]
    async fn test_add_and_detect() {
        let (graph, _task) = spawn();

        graph.add_edge(1, 2).await.unwrap();
        graph.add_edge(2, 3).await.unwrap();
        assert!(!graph.detect_deadlock().await.unwrap());
        assert_eq!(graph.find_cycle().await.unwrap(), None);

        graph.add_edge(3, 1).await.unwrap();
        assert!(graph.detect_deadlock().await.unwrap());
        assert_eq!(graph.find_cycle().await.unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(graph.stats().await.unwrap(), GraphStats { nodes: 3, edges: 3 });
    }

    #[tokio::test]
    async fn test_clear_resets_graph() {
        let (graph, _task) = spawn();
        graph.add_edge(7, 7).await.unwrap();
        assert!(graph.detect_deadlock().await.unwrap());

        graph.clear().await.unwrap();
        assert!(!graph.detect_deadlock().await.unwrap());
        assert_eq!(graph.stats().await.unwrap(), GraphStats::default());
    }

    #[tokio::test]
    async fn test_shutdown_closes_every_handle() {
        let (graph, task) = spawn();
        let other = graph.clone();

        graph.shutdown().await.unwrap();
        task.await.unwrap();

        assert!(other.is_closed());
        assert_eq!(other.add_edge(1, 2).await, Err(OracleError::ServiceClosed));
        assert_eq!(other.detect_deadlock().await, Err(OracleError::ServiceClosed));
    }

    #[tokio::test]
    async fn test_task_exits_when_handles_dropped() {
        let (graph, task) = spawn();
        graph.add_edge(1, 2).await.unwrap();
        drop(graph);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_unanswered_detection_times_out() {
        // A receiver that is never drained stands in for a stalled owner task.
        let (tx, _rx) = mpsc::channel::<Command<u32>>(4);
        let graph = GraphHandle {
            tx,
            default_timeout: Duration::from_millis(20),
        };

        assert_eq!(
            graph.detect_deadlock_bounded().await,
            Err(OracleError::DetectionTimeout { timeout_ms: 20 })
        );
    }

    #[tokio::test]
    async fn test_bounded_detection_answers_in_time() {
        let (graph, _task) = spawn();
        graph.add_edge(1, 1).await.unwrap();
        assert_eq!(
            graph.detect_deadlock_within(Duration::from_secs(5)).await,
            Ok(true)
        );
    }
}
