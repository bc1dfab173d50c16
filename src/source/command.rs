use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::FetchError;
use super::generator::TextGenerator;

/// Runs an external program as the text generator.
///
/// The prompt is written to the program's stdin and whatever it prints on
/// stdout is taken as the reply. A non-zero exit status counts as a failure.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Splits a command line on whitespace, e.g. `"llm -m fast"`.
    pub fn from_command_line(command_line: &str, timeout: Duration) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect(), timeout))
    }

    async fn run(&self, prompt: &str) -> Result<String, FetchError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FetchError::Generator(format!("cannot start {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|e| FetchError::Generator(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| FetchError::Generator(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Generator(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, FetchError> {
        tokio::time::timeout(self.timeout, self.run(prompt))
            .await
            .map_err(|_| FetchError::Timeout)?
    }
}
