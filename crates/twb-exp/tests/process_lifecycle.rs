use std::cell::Cell;
use std::time::Duration;

use twb_core::{ErrorInfo, EvalError};
use twb_exp::{ProcessRunner, SamplingAlgorithm};
use twb_model::{Sample, VariableMap};

/// Shell-backed test tool with scriptable behavior.
#[derive(Debug)]
struct ShellTool {
    script: &'static str,
    parse_ok: bool,
    post_processed: Cell<bool>,
}

impl ShellTool {
    fn new(script: &'static str, parse_ok: bool) -> Self {
        Self {
            script,
            parse_ok,
            post_processed: Cell::new(false),
        }
    }
}

impl SamplingAlgorithm for ShellTool {
    fn command_line(&self) -> Vec<String> {
        if self.script.is_empty() {
            Vec::new()
        } else {
            vec!["sh".to_string(), "-c".to_string(), self.script.to_string()]
        }
    }

    fn parse_results(&self) -> Result<Sample, EvalError> {
        if self.parse_ok {
            Ok(Sample::empty(VariableMap::new(Vec::new())?))
        } else {
            Err(EvalError::Sample(ErrorInfo::new(
                "sample-read",
                "output artifact missing",
            )))
        }
    }

    fn post_process(&self) {
        self.post_processed.set(true);
    }

    fn name(&self) -> &str {
        "shell-tool"
    }

    fn parameter_settings(&self) -> String {
        "t2".to_string()
    }

    fn strength(&self) -> u32 {
        2
    }

    fn iterations(&self) -> usize {
        1
    }
}

#[test]
fn fast_process_completes_in_time() {
    let runner = ProcessRunner::new(Duration::from_secs(5));
    let mut tool = ShellTool::new("true", true);
    let result = runner.run(&mut tool);
    assert!(result.terminated_in_time);
    assert!(result.no_error);
    assert!(result.sample.is_some());
    assert!(tool.post_processed.get());
}

#[test]
fn slow_process_is_killed_at_the_timeout() {
    let runner = ProcessRunner::new(Duration::from_millis(200));
    let mut tool = ShellTool::new("sleep 5", true);
    let result = runner.run(&mut tool);
    assert!(!result.terminated_in_time);
    assert!(result.sample.is_none());
    assert!(result.elapsed >= Duration::from_millis(200));
    assert!(result.elapsed < Duration::from_secs(5));
    assert!(tool.post_processed.get());
}

#[test]
fn parse_failure_is_folded_into_the_result() {
    let runner = ProcessRunner::new(Duration::from_secs(5));
    let mut tool = ShellTool::new("true", false);
    let result = runner.run(&mut tool);
    assert!(result.terminated_in_time);
    assert!(!result.no_error);
    assert!(result.sample.is_none());
    assert!(tool.post_processed.get());
}

#[test]
fn spawn_failure_is_folded_into_the_result() {
    #[derive(Debug)]
    struct Unspawnable;
    impl SamplingAlgorithm for Unspawnable {
        fn command_line(&self) -> Vec<String> {
            vec!["/nonexistent/twb-no-such-tool".to_string()]
        }
        fn parse_results(&self) -> Result<Sample, EvalError> {
            Ok(Sample::empty(VariableMap::new(Vec::new())?))
        }
        fn post_process(&self) {}
        fn name(&self) -> &str {
            "unspawnable"
        }
        fn parameter_settings(&self) -> String {
            String::new()
        }
        fn strength(&self) -> u32 {
            2
        }
        fn iterations(&self) -> usize {
            1
        }
    }

    let runner = ProcessRunner::new(Duration::from_secs(1));
    let result = runner.run(&mut Unspawnable);
    assert!(result.terminated_in_time);
    assert!(!result.no_error);
    assert!(result.sample.is_none());
}

#[test]
fn empty_argv_is_an_in_process_success() {
    let runner = ProcessRunner::new(Duration::from_millis(50));
    let mut tool = ShellTool::new("", true);
    let result = runner.run(&mut tool);
    assert!(result.terminated_in_time);
    assert!(result.no_error);
    assert!(result.sample.is_some());
    assert!(result.elapsed < Duration::from_millis(50));
}
