//! Producing the serialized form of WIT source with an external compiler.
//!
//! The parser and resolver for the WIT text format live in `wasm-tools`; this module only runs it
//! (`wasm-tools component wit -j`) and hands its output to the [resolver](crate::Resolver).

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{LoadError, TypeGraph};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// The WIT source to compile: either a file or directory on disk, or text supplied through a
/// reader.
pub enum WitInput {
    Path(PathBuf),
    Reader(Box<dyn Read + Send>),
}

impl WitInput {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Builds an input from optional parts, of which exactly one has to be present.
    pub fn from_parts(
        path: Option<PathBuf>,
        reader: Option<Box<dyn Read + Send>>,
    ) -> Result<Self, LoadError> {
        match (path, reader) {
            (Some(path), None) => Ok(Self::Path(path)),
            (None, Some(reader)) => Ok(Self::Reader(reader)),
            _ => Err(LoadError::InputConflict),
        }
    }
}

impl fmt::Debug for WitInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

/// Something that turns WIT source into the JSON document understood by
/// [`Document`](crate::json::Document).
pub trait WitCompiler {
    fn resolve_to_json(&self, input: WitInput) -> Result<Vec<u8>, LoadError>;
}

/// Requests cancellation of a running compilation. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs `wasm-tools component wit -j`.
///
/// ```no_run
/// use std::time::Duration;
/// use dt_wit::{load, WasmTools, WitInput};
///
/// let compiler = WasmTools::new().timeout(Duration::from_secs(30));
/// let graph = load(&compiler, WitInput::path("wit/")).unwrap();
/// println!("{} packages", graph.package_count());
/// ```
#[derive(Clone, Debug)]
pub struct WasmTools {
    executable: PathBuf,
    all_features: bool,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl Default for WasmTools {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("wasm-tools"),
            all_features: true,
            timeout: None,
            cancel: None,
        }
    }
}

impl WasmTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// The program to run. A bare name is looked up in `PATH`, anything containing a path
    /// separator is used as is.
    pub fn executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Whether to pass `--all-features`, which includes items gated behind `@unstable`.
    pub fn all_features(mut self, all_features: bool) -> Self {
        self.all_features = all_features;
        self
    }

    /// Kill the tool if it has not finished after `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn tool_name(&self) -> String {
        self.executable.display().to_string()
    }

    fn locate(&self) -> Result<PathBuf, LoadError> {
        if self.executable.components().count() > 1 {
            return Ok(self.executable.clone());
        }
        let not_found = || LoadError::ToolNotFound {
            tool: self.tool_name(),
        };
        let search_path = env::var_os("PATH").ok_or_else(not_found)?;
        find_executable(&search_path, self.executable.as_os_str()).ok_or_else(not_found)
    }

    fn command(&self, program: &Path, path: Option<&Path>) -> Command {
        let mut command = Command::new(program);
        command.args(["component", "wit", "-j"]);
        if self.all_features {
            command.arg("--all-features");
        }
        if let Some(path) = path {
            command.arg(path);
        }
        command
    }

    fn wait(&self, child: &mut Child) -> Result<std::process::ExitStatus, LoadError> {
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(|source| self.io_error(source))? {
                return Ok(status);
            }
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                debug!(tool = %self.tool_name(), "cancelled, killing child process");
                kill(child);
                return Err(LoadError::Cancelled {
                    tool: self.tool_name(),
                });
            }
            if let Some(timeout) = self.timeout.filter(|t| started.elapsed() >= *t) {
                debug!(tool = %self.tool_name(), ?timeout, "timed out, killing child process");
                kill(child);
                return Err(LoadError::TimedOut {
                    tool: self.tool_name(),
                    timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn io_error(&self, source: io::Error) -> LoadError {
        LoadError::ToolIo {
            tool: self.tool_name(),
            source,
        }
    }

    fn join<T>(&self, handle: JoinHandle<io::Result<T>>) -> Result<T, LoadError> {
        handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "pipe thread panicked")))
            .map_err(|source| self.io_error(source))
    }
}

/// First entry of `search_path` holding a runnable file called `name`. Files that are not
/// executable are skipped and the search goes on.
fn find_executable(search_path: &OsStr, name: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .flat_map(|dir| candidates(&dir, name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &OsStr) -> Vec<PathBuf> {
    let mut with_extension = std::ffi::OsString::from(name);
    with_extension.push(".exe");
    vec![dir.join(name), dir.join(with_extension)]
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &OsStr) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn read_to_end(mut pipe: impl Read + Send + 'static) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

impl WitCompiler for WasmTools {
    fn resolve_to_json(&self, input: WitInput) -> Result<Vec<u8>, LoadError> {
        let program = self.locate()?;
        let (path, reader) = match input {
            WitInput::Path(path) => (Some(path), None),
            WitInput::Reader(reader) => (None, Some(reader)),
        };
        let mut command = self.command(&program, path.as_deref());
        command
            .stdin(if reader.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!(?command, "running WIT compiler");

        let mut child = command.spawn().map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoadError::ToolNotFound {
                tool: self.tool_name(),
            },
            _ => self.io_error(source),
        })?;

        let missing_pipe = |name: &str| {
            self.io_error(io::Error::new(
                io::ErrorKind::Other,
                format!("{name} of the child process was not captured"),
            ))
        };
        let stdin = match reader {
            Some(mut reader) => {
                let mut pipe = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
                Some(thread::spawn(move || -> io::Result<()> {
                    match io::copy(&mut reader, &mut pipe).and_then(|_| pipe.flush()) {
                        // The tool may exit before reading all of its input
                        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                        other => other,
                    }
                }))
            }
            None => None,
        };
        let stdout = read_to_end(child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?);
        let stderr = read_to_end(child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?);

        let status = self.wait(&mut child)?;
        let stdout = self.join(stdout)?;
        let stderr = self.join(stderr)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).into_owned();
            warn!(tool = %self.tool_name(), %status, %stderr, "WIT compiler failed");
            return Err(LoadError::ToolExecutionFailure {
                tool: self.tool_name(),
                status,
                stderr,
            });
        }
        if let Some(stdin) = stdin {
            self.join(stdin)?;
        }

        debug!(bytes = stdout.len(), "WIT compiler finished");
        Ok(stdout)
    }
}

/// Compiles `input` with `compiler` and resolves the result.
pub fn load<C>(compiler: &C, input: WitInput) -> Result<TypeGraph, LoadError>
where
    C: WitCompiler + ?Sized,
{
    let json = compiler.resolve_to_json(input)?;
    Ok(crate::resolve_slice(&json)?)
}

/// Compiles the WIT file or directory at `path` with a default [`WasmTools`].
pub fn load_wit(path: impl AsRef<Path>) -> Result<TypeGraph, LoadError> {
    load(&WasmTools::new(), WitInput::path(path.as_ref()))
}

/// Compiles WIT source read from `reader` with a default [`WasmTools`].
pub fn decode_wit(reader: impl Read + Send + 'static) -> Result<TypeGraph, LoadError> {
    load(&WasmTools::new(), WitInput::reader(reader))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl WitCompiler for Canned {
        fn resolve_to_json(&self, _input: WitInput) -> Result<Vec<u8>, LoadError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[test]
    fn input_needs_exactly_one_source() {
        let both = WitInput::from_parts(Some("a.wit".into()), Some(Box::new(io::empty())));
        assert!(matches!(both, Err(LoadError::InputConflict)));
        assert!(matches!(
            WitInput::from_parts(None, None),
            Err(LoadError::InputConflict)
        ));
        assert!(matches!(
            WitInput::from_parts(Some("a.wit".into()), None),
            Ok(WitInput::Path(_))
        ));
    }

    #[test]
    fn arguments_follow_the_configuration() {
        let args = |tools: &WasmTools, path: Option<&Path>| -> Vec<String> {
            tools
                .command(Path::new("wasm-tools"), path)
                .get_args()
                .map(|a| a.to_string_lossy().into_owned())
                .collect()
        };
        assert_eq!(
            args(&WasmTools::new(), Some(Path::new("wit"))),
            ["component", "wit", "-j", "--all-features", "wit"]
        );
        assert_eq!(
            args(&WasmTools::new().all_features(false), None),
            ["component", "wit", "-j"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn search_skips_files_that_cannot_run() {
        use std::os::unix::fs::PermissionsExt;

        let shadow = tempfile::tempdir().unwrap();
        let real = tempfile::tempdir().unwrap();
        let name = OsStr::new("wasm-tools");
        for (dir, mode) in [(&shadow, 0o644), (&real, 0o755)] {
            let path = dir.path().join(name);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        }

        let search_path = env::join_paths([shadow.path(), real.path()]).unwrap();
        assert_eq!(
            find_executable(&search_path, name),
            Some(real.path().join(name))
        );

        let search_path = env::join_paths([shadow.path()]).unwrap();
        assert_eq!(find_executable(&search_path, name), None);
        fs::create_dir(real.path().join("wit-dir")).unwrap();
        let search_path = env::join_paths([real.path()]).unwrap();
        assert_eq!(find_executable(&search_path, OsStr::new("wit-dir")), None);
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn compiler_output_is_resolved() {
        let compiler = Canned(r#"{"worlds": [], "interfaces": [], "types": [], "packages": []}"#);
        let graph = load(&compiler, WitInput::reader(io::empty())).unwrap();
        assert_eq!(graph.package_count(), 0);
    }

    #[test]
    fn resolution_errors_stay_apart_from_tool_errors() {
        let compiler = Canned("{}");
        let err = load(&compiler, WitInput::reader(io::empty())).unwrap_err();
        assert!(matches!(err, LoadError::Resolve(_)));
    }
}
