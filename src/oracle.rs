//! The logic-engine boundary.
//!
//! Deriving the symbolic instruction list from a declarative rule is an
//! external concern; the engine only sees an [`InstructionOracle`] that
//! yields one derived structure per query. The subprocess-backed oracle
//! runs under a hard wall-clock budget so a runaway query can be killed
//! without corrupting the caller; a timeout is a retryable attempt
//! failure, never fatal.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::error::OracleError;

/// One derived structure: the raw fact list plus the rule and query text
/// it was derived from, carried through to the ground-truth output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivedStructure {
    pub rule: String,
    pub query: String,
    pub facts: String,
}

/// Source of derived structures.
pub trait InstructionOracle {
    fn derive_structure(&self) -> Result<DerivedStructure, OracleError>;
}

/// Serves canned fact lists round-robin. Used by tests and for offline
/// generation from a prepared structures file.
#[derive(Debug)]
pub struct FixedOracle {
    structures: Vec<String>,
    next: AtomicUsize,
}

impl FixedOracle {
    pub fn new(structures: Vec<String>) -> Self {
        Self {
            structures,
            next: AtomicUsize::new(0),
        }
    }
}

impl InstructionOracle for FixedOracle {
    fn derive_structure(&self) -> Result<DerivedStructure, OracleError> {
        if self.structures.is_empty() {
            return Err(OracleError::Failed("no canned structures".to_string()));
        }
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.structures.len();
        Ok(DerivedStructure {
            rule: String::new(),
            query: String::new(),
            facts: self.structures[idx].clone(),
        })
    }
}

/// Runs an external command (e.g. a Prolog query script) in an isolated
/// subprocess and returns its stdout as the fact list.
///
/// The child is polled against a wall-clock deadline and killed on
/// overrun, so an infinite query cannot hang a worker.
#[derive(Clone, Debug)]
pub struct CommandOracle {
    command: Vec<String>,
    timeout: Duration,
}

impl CommandOracle {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }
}

impl InstructionOracle for CommandOracle {
    fn derive_structure(&self) -> Result<DerivedStructure, OracleError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| OracleError::Failed("empty oracle command".to_string()))?;
        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| OracleError::Failed(format!("failed to spawn `{}`: {}", program, e)))?;

        // Drain stdout on its own thread. A child producing more output
        // than the OS pipe buffer holds would otherwise block on the full
        // pipe, never exit, and hit the deadline despite having finished
        // its work.
        let stdout = child.stdout.take();
        let reader = std::thread::spawn(move || -> std::io::Result<String> {
            let mut output = String::new();
            if let Some(mut stdout) = stdout {
                stdout.read_to_string(&mut output)?;
            }
            Ok(output)
        });

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let output = reader
                        .join()
                        .map_err(|_| OracleError::Failed("stdout reader panicked".to_string()))?
                        .map_err(|e| OracleError::Failed(e.to_string()))?;
                    if !status.success() {
                        return Err(OracleError::Failed(format!(
                            "oracle command exited with {}",
                            status
                        )));
                    }
                    return Ok(DerivedStructure {
                        rule: self.command.join(" "),
                        query: String::new(),
                        facts: output,
                    });
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        // Kill the runaway query; reap it so no zombie is
                        // left. Killing closes the pipe, so the reader
                        // sees EOF and can be joined.
                        let _ = child.kill();
                        let _ = child.wait();
                        let _ = reader.join();
                        return Err(OracleError::Timeout {
                            secs: self.timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(e) => return Err(OracleError::Failed(e.to_string())),
            }
        }
    }
}
