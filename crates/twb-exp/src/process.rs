//! Timeout-bounded execution of one algorithm invocation.

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, warn};
use twb_model::Sample;

use crate::algorithms::SamplingAlgorithm;

/// Poll interval while waiting for the child process.
const WAIT_POLL: Duration = Duration::from_millis(10);

/// Outcome of one (configuration, repetition) execution.
///
/// Exists only for the duration of one grid-cell evaluation and its
/// immediate recording.
#[derive(Debug)]
pub struct RunResult {
    /// Wall-clock time from pre-processing to process exit (or kill).
    pub elapsed: Duration,
    /// False when the child had to be terminated at the timeout.
    pub terminated_in_time: bool,
    /// False when pre-processing, spawning, or parsing failed.
    pub no_error: bool,
    /// The parsed sample, when the run produced one.
    pub sample: Option<Sample>,
}

/// Executes algorithm lifecycles as external processes under a hard timeout.
///
/// Every failure inside the lifecycle is caught at this boundary and folded
/// into the returned [`RunResult`]; the grid traversal must be able to
/// continue no matter what a single run does.
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    /// Creates a runner with the given per-invocation timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Runs one algorithm invocation to completion, timeout, or failure.
    pub fn run(&self, algorithm: &mut dyn SamplingAlgorithm) -> RunResult {
        let start = Instant::now();

        if let Err(err) = algorithm.pre_process() {
            error!(algorithm = algorithm.name(), %err, "pre-processing failed");
            algorithm.post_process();
            return RunResult {
                elapsed: start.elapsed(),
                terminated_in_time: true,
                no_error: false,
                sample: None,
            };
        }

        let argv = algorithm.command_line();
        let mut result = if argv.is_empty() {
            // In-process no-op baseline; nothing to spawn or time out.
            RunResult {
                elapsed: start.elapsed(),
                terminated_in_time: true,
                no_error: true,
                sample: None,
            }
        } else {
            self.run_command(algorithm, &argv, start)
        };

        if result.terminated_in_time && result.no_error {
            match algorithm.parse_results() {
                Ok(sample) => result.sample = Some(sample),
                Err(err) => {
                    error!(algorithm = algorithm.name(), %err, "result parsing failed");
                    result.no_error = false;
                }
            }
        }

        algorithm.post_process();
        result
    }

    fn run_command(
        &self,
        algorithm: &dyn SamplingAlgorithm,
        argv: &[String],
        start: Instant,
    ) -> RunResult {
        let mut child = match Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                error!(
                    algorithm = algorithm.name(),
                    command = %argv[0],
                    %err,
                    "failed to spawn process"
                );
                return RunResult {
                    elapsed: start.elapsed(),
                    terminated_in_time: true,
                    no_error: false,
                    sample: None,
                };
            }
        };

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if !status.success() {
                        warn!(
                            algorithm = algorithm.name(),
                            status = %status,
                            "process exited with non-zero status"
                        );
                    }
                    return RunResult {
                        elapsed: start.elapsed(),
                        terminated_in_time: true,
                        no_error: true,
                        sample: None,
                    };
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        if let Err(err) = child.kill() {
                            warn!(algorithm = algorithm.name(), %err, "failed to kill process");
                        }
                        // Reap the child so no zombie outlives the cell.
                        let _ = child.wait();
                        return RunResult {
                            elapsed: start.elapsed(),
                            terminated_in_time: false,
                            no_error: true,
                            sample: None,
                        };
                    }
                    thread::sleep(WAIT_POLL);
                }
                Err(err) => {
                    error!(algorithm = algorithm.name(), %err, "failed to poll process");
                    let _ = child.kill();
                    let _ = child.wait();
                    return RunResult {
                        elapsed: start.elapsed(),
                        terminated_in_time: true,
                        no_error: false,
                        sample: None,
                    };
                }
            }
        }
    }
}
