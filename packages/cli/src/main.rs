use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use alloc_oracle::{
    AllocationState, GrantDecision, GraphService, NodeId, OracleConfig, SafetyChecker,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit code for "unsafe", "must wait" and "deadlock" verdicts
const EXIT_VERDICT_NEGATIVE: u8 = 2;

/// Allocation oracle CLI
/// Deadlock detection and Banker's safety checks over JSON snapshots
#[derive(Parser)]
#[command(name = "alloc-oracle", version)]
#[command(about = "Deadlock detection and Banker's safety checks", long_about = None)]
struct Cli {
    /// Oracle configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an allocation state is safe
    Check {
        /// State file: available, max_demand, allocation, optional need
        state: PathBuf,
    },
    /// Decide whether a process may be granted a request now
    Request {
        /// State file, as for `check`
        state: PathBuf,
        /// Requesting process index
        #[arg(short, long)]
        process: usize,
        /// Units per resource kind, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        amounts: Vec<u64>,
    },
    /// Look for a circular wait in a wait-for graph
    Detect {
        /// Edge file: {"edges": [[from, to], ...]}
        edges: PathBuf,
    },
}

#[derive(Deserialize)]
struct EdgeFile {
    edges: Vec<(NodeId, NodeId)>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<OracleConfig> {
    let Some(path) = path else {
        return Ok(OracleConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    OracleConfig::from_json_str(&raw)
        .with_context(|| format!("invalid config {}", path.display()))
}

/// Outcome of one subcommand: the line printed and whether it was positive
#[derive(Debug, Clone, PartialEq, Eq)]
struct Verdict {
    positive: bool,
    line: String,
}

impl Verdict {
    fn new(positive: bool, line: impl Into<String>) -> Self {
        Self {
            positive,
            line: line.into(),
        }
    }

    /// 0 for safe / granted / no deadlock, 2 otherwise
    fn code(&self) -> u8 {
        if self.positive {
            0
        } else {
            EXIT_VERDICT_NEGATIVE
        }
    }
}

fn check(state: &AllocationState) -> Verdict {
    let report = SafetyChecker::check(state);
    if report.is_safe() {
        Verdict::new(true, format!("SAFE sequence={:?}", report.sequence))
    } else {
        Verdict::new(false, format!("UNSAFE stuck={:?}", report.stuck))
    }
}

fn request(state: &AllocationState, process: usize, amounts: &[u64]) -> Result<Verdict> {
    let decision = SafetyChecker::evaluate_request(state, process, amounts)
        .context("request rejected")?;

    let line = match &decision {
        GrantDecision::Grant(next) => format!("GRANT available={:?}", next.available()),
        GrantDecision::MustWait {
            resource,
            requested,
            available,
        } => format!("WAIT resource={resource} requested={requested} available={available}"),
        GrantDecision::Unsafe { stuck } => format!("UNSAFE stuck={stuck:?}"),
    };
    Ok(Verdict::new(decision.is_granted(), line))
}

async fn detect(edges: Vec<(NodeId, NodeId)>, config: &OracleConfig) -> Result<Verdict> {
    let (graph, task) = GraphService::<NodeId>::spawn(config);

    for (from, to) in edges {
        graph.add_edge(from, to).await?;
    }
    let deadlocked = graph.detect_deadlock_bounded().await?;
    let cycle = if deadlocked {
        graph.find_cycle().await?
    } else {
        None
    };

    graph.shutdown().await?;
    task.await.context("graph service task failed")?;

    Ok(match cycle {
        Some(cycle) => {
            let path: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            Verdict::new(false, format!("DEADLOCK cycle={}", path.join(" -> ")))
        }
        None => Verdict::new(true, "NO DEADLOCK"),
    })
}

async fn run(command: Commands, config: &OracleConfig) -> Result<Verdict> {
    match command {
        Commands::Check { state } => Ok(check(&read_json(&state)?)),
        Commands::Request {
            state,
            process,
            amounts,
        } => request(&read_json(&state)?, process, &amounts),
        Commands::Detect { edges } => {
            let EdgeFile { edges } = read_json(&edges)?;
            detect(edges, config).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    info!(version = alloc_oracle::VERSION, "alloc-oracle");

    let verdict = run(cli.command, &config).await?;
    println!("{}", verdict.line);
    Ok(ExitCode::from(verdict.code()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    const CLASSIC: &str = r#"{
        "available": [3, 3, 2],
        "max_demand": [[7,5,3],[3,2,2],[9,0,2],[2,2,2],[4,3,3]],
        "allocation": [[0,1,0],[2,0,0],[3,0,2],[2,1,1],[0,0,2]]
    }"#;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn classic() -> AllocationState {
        serde_json::from_str(CLASSIC).unwrap()
    }

    #[test]
    fn test_check_exit_codes() {
        let safe = check(&classic());
        assert_eq!(safe.code(), 0);
        assert_eq!(safe.line, "SAFE sequence=[1, 3, 4, 0, 2]");

        let mut starved = serde_json::to_value(classic()).unwrap();
        starved["available"] = serde_json::json!([0, 0, 0]);
        let starved: AllocationState = serde_json::from_value(starved).unwrap();
        let unsafe_verdict = check(&starved);
        assert_eq!(unsafe_verdict.code(), 2);
        assert!(unsafe_verdict.line.starts_with("UNSAFE"));
    }

    #[test]
    fn test_request_exit_codes() {
        let state = classic();
        let granted = request(&state, 1, &[1, 0, 2]).unwrap();
        assert_eq!(granted.code(), 0);
        assert_eq!(granted.line, "GRANT available=[2, 3, 0]");

        let wait = request(&state, 0, &[4, 0, 0]).unwrap();
        assert_eq!(wait.code(), 2);
        assert!(wait.line.starts_with("WAIT resource=0"));
    }

    #[test]
    fn test_request_beyond_need_is_an_error() {
        let err = request(&classic(), 3, &[1, 0, 0]).unwrap_err();
        assert!(err.to_string().contains("request rejected"));
    }

    #[tokio::test]
    async fn test_detect_exit_codes() {
        let config = OracleConfig::default();

        let chain = vec![(NodeId(1), NodeId(2)), (NodeId(2), NodeId(3))];
        let clear = detect(chain, &config).await.unwrap();
        assert_eq!(clear.code(), 0);
        assert_eq!(clear.line, "NO DEADLOCK");

        let ring = vec![(NodeId(1), NodeId(2)), (NodeId(2), NodeId(1))];
        let deadlock = detect(ring, &config).await.unwrap();
        assert_eq!(deadlock.code(), 2);
        assert_eq!(deadlock.line, "DEADLOCK cycle=n1 -> n2");
    }

    #[tokio::test]
    async fn test_run_reads_files() {
        let config = OracleConfig::default();

        let state = json_file(CLASSIC);
        let verdict = run(
            Commands::Check {
                state: state.path().to_path_buf(),
            },
            &config,
        )
        .await
        .unwrap();
        assert!(verdict.positive);

        let edges = json_file(r#"{"edges": [[5, 5]]}"#);
        let verdict = run(
            Commands::Detect {
                edges: edges.path().to_path_buf(),
            },
            &config,
        )
        .await
        .unwrap();
        assert_eq!(verdict.code(), 2);
    }

    #[tokio::test]
    async fn test_malformed_input_is_an_error() {
        let ragged = json_file(
            r#"{"available": [1], "max_demand": [[1], [1, 1]], "allocation": [[0], [0]]}"#,
        );
        let result = run(
            Commands::Check {
                state: ragged.path().to_path_buf(),
            },
            &OracleConfig::default(),
        )
        .await;
        assert!(result.is_err());

        let missing = Path::new("/nonexistent/state.json");
        assert!(read_json::<AllocationState>(missing).is_err());
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap(), OracleConfig::default());

        let file = json_file(r#"{"service": {"channel_capacity": 4}}"#);
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.service.channel_capacity, 4);

        let bad = json_file(r#"{"service": {"detection_timeout_ms": 0}}"#);
        assert!(load_config(Some(bad.path())).is_err());
    }
}
