use crate::error::{QcError, QcResult};
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::process::{Child, Command, Output, Stdio};
use tracing::{debug, info};

/// An external program invocation, built up argument by argument.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
}

/// Captured output of a tool that exited successfully.
#[derive(Debug, Default)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Forwards the tool's output to our own stdout and stderr.
    pub fn echo(&self) -> io::Result<()> {
        io::stdout().write_all(&self.stdout)?;
        io::stderr().write_all(&self.stderr)?;
        Ok(())
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

impl ToolCommand {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// `KEY=value` argument in Picard's command-line style.
    pub fn key_value(self, key: &str, value: impl AsRef<OsStr>) -> Self {
        let mut arg = OsString::from(format!("{}=", key));
        arg.push(value.as_ref());
        self.arg(arg)
    }

    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    pub fn arguments(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Shell-equivalent rendering, for logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program_name())
            .chain(self.arguments())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    fn launch_error(&self, source: io::Error) -> QcError {
        QcError::ToolLaunch {
            program: self.program_name(),
            source,
        }
    }

    /// Runs the command to completion, capturing its output.
    pub fn run(&self) -> QcResult<ToolOutput> {
        info!(command = %self.display(), "running");
        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.launch_error(e))?;
        self.check(output)
    }

    fn spawn_producer(&self) -> QcResult<Child> {
        self.command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.launch_error(e))
    }

    fn check(&self, output: Output) -> QcResult<ToolOutput> {
        self.check_into(output, &mut io::stdout())
    }

    /// On failure the tool's stdout is forwarded to `sink` before the error is returned.
    fn check_into(&self, output: Output, sink: &mut dyn Write) -> QcResult<ToolOutput> {
        debug!(
            command = %self.display(),
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "finished"
        );
        if !output.status.success() {
            sink.write_all(&output.stdout)?;
            sink.flush()?;
            return Err(QcError::ToolFailed {
                command: self.display(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(ToolOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Runs `producer | consumer`. The consumer's output is captured, the
/// producer's stderr goes straight to ours. Both must exit successfully.
pub fn run_piped(producer: &ToolCommand, consumer: &ToolCommand) -> QcResult<ToolOutput> {
    info!(
        command = %format!("{} | {}", producer.display(), consumer.display()),
        "running"
    );
    let mut upstream = producer.spawn_producer()?;
    let pipe = upstream
        .stdout
        .take()
        .ok_or_else(|| QcError::Io(io::Error::other("producer stdout was not captured")))?;

    let downstream = consumer
        .command()
        .stdin(Stdio::from(pipe))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    let downstream = match downstream {
        Ok(child) => child,
        Err(e) => {
            let _ = upstream.kill();
            let _ = upstream.wait();
            return Err(consumer.launch_error(e));
        }
    };

    // Reap the producer before any error from the consumer side is returned.
    let consumer_output = downstream.wait_with_output();
    let producer_status = upstream.wait();

    let output = consumer.check(consumer_output?)?;
    let producer_status = producer_status?;
    if !producer_status.success() {
        return Err(QcError::ToolFailed {
            command: producer.display(),
            code: producer_status.code(),
            stderr: String::new(),
        });
    }
    Ok(output)
}

/// First line of `<program> --version`, e.g. `samtools 1.17`.
pub fn tool_version(program: &str) -> QcResult<String> {
    let command = ToolCommand::new(program).arg("--version");
    let output = command.run()?;
    first_version_line(&command.display(), &output.stdout_text())
}

fn first_version_line(command: &str, stdout: &str) -> QcResult<String> {
    stdout
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| QcError::MissingVersion(command.to_string()))
}
