//! Time and memory bounded execution of a search strategy.
//!
//! The strategy runs on its own worker thread and polls a [`Budget`] between
//! steps. The caller waits for the result up to the time limit; past it, the
//! worker is told to stop and abandoned, and whatever it sends later is
//! dropped along with the channel.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::memory::MemoryGauge;
use crate::{brute_force, greedy, Cover, CoverError, Graph, PenaltyRule};

/// Per-call resource ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub time_limit: Duration,
    /// Ceiling in bytes for the gauge reading, checked between steps.
    pub memory_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            time_limit: Duration::from_secs(60),
            memory_limit: 1 << 30,
        }
    }
}

impl Limits {
    pub fn new(time_limit: Duration, memory_limit: usize) -> Self {
        Limits {
            time_limit,
            memory_limit,
        }
    }

    pub fn from_secs_f64(seconds: f64, memory_limit: usize) -> Result<Self, CoverError> {
        let time_limit = Duration::try_from_secs_f64(seconds)
            .ok()
            .filter(|limit| !limit.is_zero())
            .ok_or_else(|| {
                CoverError::InvalidLimits(format!(
                    "time limit must be a positive number of seconds, got {seconds}"
                ))
            })?;
        let limits = Limits::new(time_limit, memory_limit);
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<(), CoverError> {
        if self.time_limit.is_zero() {
            return Err(CoverError::InvalidLimits("time limit must be positive".into()));
        }
        if self.memory_limit == 0 {
            return Err(CoverError::InvalidLimits("memory limit must be positive".into()));
        }
        Ok(())
    }
}

/// Search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    BruteForce,
    Greedy,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::BruteForce => "brute_force",
            Method::Greedy => "greedy",
        }
    }
}

impl FromStr for Method {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brute_force" => Ok(Method::BruteForce),
            "greedy" => Ok(Method::Greedy),
            other => Err(CoverError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a strategy stopped before finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    TimedOut,
    MemoryExceeded,
}

/// Cooperative resource check, polled once per search step.
pub struct Budget {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
    gauge: Option<Arc<dyn MemoryGauge>>,
    memory_limit: usize,
    steps: u64,
}

impl Budget {
    pub fn new(limits: Limits, gauge: Arc<dyn MemoryGauge>, cancelled: Arc<AtomicBool>) -> Self {
        if !gauge.is_active() {
            warn!("memory gauge is inactive, the memory limit will not be enforced");
        }
        Budget {
            deadline: Instant::now().checked_add(limits.time_limit),
            cancelled,
            gauge: Some(gauge),
            memory_limit: limits.memory_limit,
            steps: 0,
        }
    }

    /// A budget that never runs out.
    pub fn unlimited() -> Self {
        Budget {
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            gauge: None,
            memory_limit: usize::MAX,
            steps: 0,
        }
    }

    pub fn check(&mut self) -> Result<(), Interrupt> {
        self.steps += 1;
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(Interrupt::TimedOut);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Interrupt::TimedOut);
            }
        }
        if let Some(gauge) = &self.gauge {
            let used = gauge.current_bytes();
            if used > self.memory_limit {
                warn!(used, limit = self.memory_limit, "memory limit exceeded");
                return Err(Interrupt::MemoryExceeded);
            }
        }
        Ok(())
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    /// The search finished but no cover of size at most k was reached.
    NoCoverFound,
    TimedOut,
    MemoryExceeded,
}

impl From<Interrupt> for Outcome {
    fn from(value: Interrupt) -> Self {
        match value {
            Interrupt::TimedOut => Outcome::TimedOut,
            Interrupt::MemoryExceeded => Outcome::MemoryExceeded,
        }
    }
}

/// Result of a bounded search. The cover is empty unless the outcome is
/// [`Outcome::Found`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverReport {
    pub cover: Cover,
    pub outcome: Outcome,
    pub method: Method,
    pub elapsed: Duration,
    /// Budget polls performed, `None` when the worker was abandoned.
    pub steps: Option<u64>,
}

impl CoverReport {
    pub fn is_found(&self) -> bool {
        self.outcome == Outcome::Found
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Request {
    pub method: Method,
    pub k: usize,
    pub limits: Limits,
    pub penalty_rule: PenaltyRule,
}

fn run_strategy(
    graph: &Graph,
    method: Method,
    k: usize,
    rule: PenaltyRule,
    budget: &mut Budget,
) -> Result<Option<Cover>, Interrupt> {
    match method {
        Method::BruteForce => brute_force::search(graph, k, budget),
        Method::Greedy => greedy::search(graph, k, rule, budget),
    }
}

pub fn run_bounded(
    graph: Arc<Graph>,
    request: Request,
    gauge: Arc<dyn MemoryGauge>,
) -> Result<CoverReport, CoverError> {
    request.limits.validate()?;
    let Request {
        method,
        k,
        limits,
        penalty_rule,
    } = request;

    debug!(%method, k, ?limits, "starting bounded search");
    let start = Instant::now();
    let cancelled = Arc::new(AtomicBool::new(false));
    let (sender, receiver) = mpsc::channel();

    let worker_cancelled = cancelled.clone();
    thread::Builder::new()
        .name(format!("cover-{method}"))
        .spawn(move || {
            let mut budget = Budget::new(limits, gauge, worker_cancelled);
            let result = run_strategy(&graph, method, k, penalty_rule, &mut budget);
            // The receiver is gone once the caller gave up waiting.
            let _ = sender.send((result, budget.steps()));
        })?;

    let report = |cover: Cover, outcome: Outcome, steps: Option<u64>| CoverReport {
        cover,
        outcome,
        method,
        elapsed: start.elapsed(),
        steps,
    };

    let report = match receiver.recv_timeout(limits.time_limit) {
        Ok((Ok(Some(cover)), steps)) => report(cover, Outcome::Found, Some(steps)),
        Ok((Ok(None), steps)) => report(Cover::default(), Outcome::NoCoverFound, Some(steps)),
        Ok((Err(interrupt), steps)) => report(Cover::default(), interrupt.into(), Some(steps)),
        Err(RecvTimeoutError::Timeout) => {
            cancelled.store(true, Ordering::Relaxed);
            warn!(%method, limit = ?limits.time_limit, "search timed out");
            report(Cover::default(), Outcome::TimedOut, None)
        }
        Err(RecvTimeoutError::Disconnected) => return Err(CoverError::WorkerPanicked),
    };
    debug!(
        %method,
        outcome = ?report.outcome,
        size = report.cover.len(),
        elapsed = ?report.elapsed,
        "bounded search finished"
    );
    Ok(report)
}
