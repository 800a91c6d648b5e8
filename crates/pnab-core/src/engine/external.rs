use super::cancel::CancellationToken;
use super::error::EngineError;
use crate::core::models::descriptors::{
    BackboneDescriptor, BaseDescriptor, DescriptorSet, RuntimeDescriptor,
};
use crate::core::models::helical::HelicalPoint;
use crate::core::models::results::{COLUMN_COUNT, ConformerRecord};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace};

/// Environment variable carrying the configuration prefix to the engine process.
pub const PREFIX_ENV: &str = "PNAB_PREFIX";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Everything the engine needs to evaluate one configuration.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EngineRequest<'a> {
    pub prefix: &'a str,
    pub runtime: &'a RuntimeDescriptor,
    pub backbone: &'a BackboneDescriptor,
    pub bases: &'a [BaseDescriptor],
    pub helical: &'a HelicalPoint,
}

impl<'a> EngineRequest<'a> {
    pub fn new(descriptors: &'a DescriptorSet, helical: &'a HelicalPoint, prefix: &'a str) -> Self {
        Self {
            prefix,
            runtime: &descriptors.runtime,
            backbone: &descriptors.backbone,
            bases: &descriptors.bases,
            helical,
        }
    }
}

/// The conformer search engine, invoked once per configuration.
///
/// Implementations return the engine's raw comma-separated result rows (possibly
/// empty). They must give up promptly with [`EngineError::Interrupted`] once
/// `cancel` is tripped, but never trip it themselves.
pub trait ConformerEngine: Send + Sync {
    fn evaluate(
        &self,
        request: &EngineRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, EngineError>;
}

impl<F> ConformerEngine for F
where
    F: Fn(&EngineRequest<'_>, &CancellationToken) -> Result<String, EngineError> + Send + Sync,
{
    fn evaluate(
        &self,
        request: &EngineRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, EngineError> {
        self(request, cancel)
    }
}

/// Runs an external program per configuration.
///
/// The request is written as JSON to the program's stdin, its working directory
/// is the scratch directory, and the result rows are read from its stdout. The
/// process is started in its own process group so terminal interrupts reach
/// only the coordinator; on cancellation it is killed without waiting for it to
/// finish.
#[derive(Debug, Clone)]
pub struct ExternalCommandEngine {
    program: PathBuf,
    args: Vec<String>,
    scratch_dir: PathBuf,
    poll_interval: Duration,
}

impl ExternalCommandEngine {
    pub fn new(program: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            scratch_dir: scratch_dir.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    fn command(&self, prefix: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.scratch_dir)
            .env(PREFIX_ENV, prefix)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }
}

impl ConformerEngine for ExternalCommandEngine {
    fn evaluate(
        &self,
        request: &EngineRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, EngineError> {
        cancel.check_cancelled()?;
        let failed = |reason: String| EngineError::Invocation {
            prefix: request.prefix.to_string(),
            reason,
        };

        let payload = serde_json::to_vec(request)
            .map_err(|e| failed(format!("could not encode request: {e}")))?;

        let mut child = self.command(request.prefix).spawn().map_err(|e| {
            failed(format!(
                "could not spawn '{}': {e}",
                self.program.display()
            ))
        })?;
        debug!(prefix = request.prefix, pid = child.id(), "Spawned engine process.");

        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);
        // Written off-thread: a request larger than the pipe buffer blocks until
        // the engine reads it, and cancellation must still be observed meanwhile.
        let writer = child.stdin.take().map(|stdin| spawn_writer(stdin, payload));

        let status = loop {
            if cancel.is_cancelled() {
                terminate(&mut child);
                return Err(EngineError::Interrupted);
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(self.poll_interval),
                Err(e) => {
                    terminate(&mut child);
                    return Err(failed(format!("could not wait for engine: {e}")));
                }
            }
        };

        let written = writer.map(join_writer).unwrap_or(Ok(()));
        let stdout = collect(stdout);
        let stderr = collect(stderr).unwrap_or_else(|e| format!("<stderr unreadable: {e}>"));

        if !status.success() {
            return Err(failed(format!(
                "engine exited with {status}: {}",
                stderr.trim()
            )));
        }
        written.map_err(|e| failed(format!("could not write request: {e}")))?;
        let stdout = stdout.map_err(|e| failed(format!("could not read engine output: {e}")))?;
        trace!(prefix = request.prefix, %status, bytes = stdout.len(), "Engine process exited.");
        Ok(stdout)
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    })
}

fn spawn_writer<W: Write + Send + 'static>(
    mut sink: W,
    payload: Vec<u8>,
) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || match sink.write_all(&payload) {
        // An engine that exits without reading its request closes the pipe early.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    })
}

fn join_writer(handle: JoinHandle<io::Result<()>>) -> io::Result<()> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("request writer panicked")))
}

fn collect(reader: Option<JoinHandle<io::Result<String>>>) -> io::Result<String> {
    match reader {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("output reader panicked"))),
        None => Ok(String::new()),
    }
}

/// Kills the engine and everything it started.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        // The engine leads its own process group, so its id is the group id.
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: killpg only sends a signal; the group has not been reaped yet.
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

/// Parses the engine's output into records tagged with `prefix`.
///
/// Blank lines and `#` comment lines are ignored. Any row without exactly ten
/// numeric fields rejects the whole output.
pub fn parse_engine_output(text: &str, prefix: u64) -> Result<Vec<ConformerRecord>, EngineError> {
    let malformed = |reason: String| EngineError::MalformedOutput {
        prefix: prefix.to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (number, record) in reader.records().enumerate() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != COLUMN_COUNT {
            return Err(malformed(format!(
                "row {} has {} fields, expected {COLUMN_COUNT}",
                number + 1,
                record.len()
            )));
        }

        let mut values = [0.0; COLUMN_COUNT];
        for (slot, field) in values.iter_mut().zip(record.iter()) {
            *slot = field
                .parse()
                .map_err(|_| malformed(format!("row {}: '{field}' is not a number", number + 1)))?;
        }
        let row = ConformerRecord::from_engine_row(prefix, &values).ok_or_else(|| {
            malformed(format!(
                "row {}: conformer index {} is not a non-negative integer",
                number + 1,
                values[1]
            ))
        })?;
        rows.push(row);
    }
    Ok(rows)
}
