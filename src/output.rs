// ABOUTME: Output formatting for CLI feedback and CI host outputs.
// ABOUTME: Supports normal, quiet (CI), and JSON modes plus GitHub Actions outputs.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a warning (always shown, on stderr).
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit_err("warning", message),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "success",
                    message,
                    duration_secs: self.duration(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.emit_err("error", message),
        }
    }

    fn emit_err(&self, event: &str, message: &str) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.duration(),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            eprintln!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

/// Step outputs and annotations for the CI host (GitHub Actions conventions).
///
/// Outside Actions, outputs are printed as `key=value` lines instead.
#[derive(Debug, Clone, Default)]
pub struct HostOutputs {
    output_file: Option<PathBuf>,
    annotations: bool,
}

impl HostOutputs {
    pub fn new(output_file: Option<PathBuf>, annotations: bool) -> Self {
        Self {
            output_file,
            annotations,
        }
    }

    /// Read `GITHUB_OUTPUT` and `GITHUB_ACTIONS` from the environment.
    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        let annotations = std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
        Self::new(output_file, annotations)
    }

    pub fn output_file(&self) -> Option<&PathBuf> {
        self.output_file.as_ref()
    }

    /// Ask the host to redact `value` from all later log lines.
    pub fn mask(&self, value: &str) {
        if self.annotations && !value.is_empty() {
            println!("::add-mask::{value}");
        }
    }

    /// Publish a step output.
    pub fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let line = format_output(key, value);
        match &self.output_file {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(line.as_bytes())
            }
            None => {
                print!("{line}");
                Ok(())
            }
        }
    }

    /// Emit a failure annotation. The process exit code is the caller's job.
    pub fn fail(&self, message: &str) {
        if self.annotations {
            println!("::error::{}", escape_annotation(message));
        }
    }
}

const MULTILINE_DELIMITER: &str = "RAILYARD_EOF";

fn format_output(key: &str, value: &str) -> String {
    if value.contains('\n') {
        format!("{key}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}\n")
    } else {
        format!("{key}={value}\n")
    }
}

fn escape_annotation(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
