pub mod layout;
pub mod lexer;

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::FormatOptions;
use crate::error::FormatError;

/// Trait for Java source formatters.
pub trait Formatter: Send + Sync + 'static {
    fn format(&self, source: String) -> impl Future<Output = Result<String, FormatError>> + Send;
}

/// In-process formatter; see [`layout`].
#[derive(Debug, Clone, Default)]
pub struct BuiltinFormatter {
    options: FormatOptions,
}

impl BuiltinFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }
}

impl Formatter for BuiltinFormatter {
    fn format(&self, source: String) -> impl Future<Output = Result<String, FormatError>> + Send {
        std::future::ready(layout::format(&source, &self.options))
    }
}

/// Pipes source through an external program (stdin in, stdout out).
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandFormatter {
    pub fn new(command: &[String], timeout_secs: u64) -> Result<Self, FormatError> {
        let (program, args) = command.split_first().ok_or_else(|| FormatError::Command {
            command: String::new(),
            message: "formatter command is empty".to_string(),
        })?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn run(&self, source: String) -> Result<String, FormatError> {
        let command_error = |message: String| FormatError::Command {
            command: self.display(),
            message,
        };
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| command_error(e.to_string()))?;

        // stdin must be fed while stdout drains.
        let stdin = child.stdin.take();
        let write = async move {
            if let Some(mut stdin) = stdin {
                // The exit status reports a program that quit without reading.
                if let Err(e) = stdin.write_all(source.as_bytes()).await {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(e);
                    }
                }
            }
            Ok(())
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        written?;
        let output = output?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(command_error(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        String::from_utf8(output.stdout).map_err(|e| command_error(e.to_string()))
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, source: String) -> impl Future<Output = Result<String, FormatError>> + Send {
        async move {
            tracing::trace!("Running formatter command {}", self.display());
            match tokio::time::timeout(self.timeout, self.run(source)).await {
                Ok(result) => result,
                Err(_) => Err(FormatError::Timeout {
                    command: self.display(),
                    seconds: self.timeout.as_secs(),
                }),
            }
        }
    }
}

/// The formatter selected by configuration.
#[derive(Debug, Clone)]
pub enum JavaFormatter {
    Builtin(BuiltinFormatter),
    Command(CommandFormatter),
}

impl JavaFormatter {
    pub fn from_options(options: &FormatOptions) -> Result<Self, FormatError> {
        match &options.command {
            Some(command) => Ok(JavaFormatter::Command(CommandFormatter::new(
                command,
                options.timeout_secs,
            )?)),
            None => Ok(JavaFormatter::Builtin(BuiltinFormatter::new(options.clone()))),
        }
    }
}

impl Formatter for JavaFormatter {
    fn format(&self, source: String) -> impl Future<Output = Result<String, FormatError>> + Send {
        async move {
            match self {
                JavaFormatter::Builtin(f) => f.format(source).await,
                JavaFormatter::Command(f) => f.format(source).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_formatter() {
        let formatter = JavaFormatter::from_options(&FormatOptions::default()).unwrap();
        assert!(matches!(formatter, JavaFormatter::Builtin(_)));
        let text = formatter
            .format("class A { int x; }".to_string())
            .await
            .unwrap();
        assert_eq!(text, "class A {\n\n    int x;\n}\n");
    }

    #[tokio::test]
    async fn test_builtin_formatter_rejects_bad_source() {
        let formatter = BuiltinFormatter::default();
        let err = formatter.format("class A {".to_string()).await.unwrap_err();
        assert!(matches!(err, FormatError::Syntax { .. }));
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let options = FormatOptions {
            command: Some(vec![]),
            ..FormatOptions::default()
        };
        assert!(matches!(
            JavaFormatter::from_options(&options),
            Err(FormatError::Command { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_formatter_pipes_source() {
        let formatter = CommandFormatter::new(&["cat".to_string()], 5).unwrap();
        let text = formatter.format("class A {}\n".to_string()).await.unwrap();
        assert_eq!(text, "class A {}\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_formatter_large_source() {
        let formatter = CommandFormatter::new(&["cat".to_string()], 30).unwrap();
        let source = "// filler line for a large unit\n".repeat(32 * 1024);
        let text = formatter.format(source.clone()).await.unwrap();
        assert_eq!(text.len(), source.len());
        assert_eq!(text, source);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_formatter_failure() {
        let formatter = CommandFormatter::new(&["false".to_string()], 5).unwrap();
        let err = formatter.format("class A {}".to_string()).await.unwrap_err();
        assert!(matches!(err, FormatError::Command { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_formatter_timeout() {
        let command = vec!["sleep".to_string(), "5".to_string()];
        let formatter = CommandFormatter::new(&command, 0).unwrap();
        let err = formatter.format(String::new()).await.unwrap_err();
        assert!(matches!(err, FormatError::Timeout { seconds: 0, .. }));
    }
}
