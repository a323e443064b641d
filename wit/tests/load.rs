use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use dt_wit::{load, CancellationToken, LoadError, WasmTools, WitCompiler, WitInput};

/// Writing an executable while another test forks can make `exec` fail with ETXTBSY, so tests
/// that spawn processes run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

/// Fails the test if anything tries to run it.
struct Unreachable;

impl WitCompiler for Unreachable {
    fn resolve_to_json(&self, input: WitInput) -> Result<Vec<u8>, LoadError> {
        panic!("compiler invoked with {input:?}");
    }
}

fn load_parts(
    compiler: &impl WitCompiler,
    path: Option<PathBuf>,
    reader: Option<Box<dyn io::Read + Send>>,
) -> Result<dt_wit::TypeGraph, LoadError> {
    load(compiler, WitInput::from_parts(path, reader)?)
}

#[test]
fn conflicting_inputs_fail_before_running_anything() {
    let err = load_parts(
        &Unreachable,
        Some("world.wit".into()),
        Some(Box::new(io::Cursor::new("package a:b;"))),
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::InputConflict));
}

#[test]
fn missing_executable_is_reported() {
    let compiler = WasmTools::new().executable("wit-resolve-test-no-such-tool");
    let err = load(&compiler, WitInput::path("world.wit")).unwrap_err();
    match err {
        LoadError::ToolNotFound { tool } => assert_eq!(tool, "wit-resolve-test-no-such-tool"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_executable_path_is_reported() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let compiler = WasmTools::new().executable(dir.path().join("wasm-tools"));
    assert!(matches!(
        load(&compiler, WitInput::path("world.wit")),
        Err(LoadError::ToolNotFound { .. })
    ));
}

#[cfg(unix)]
mod fake_tool {
    use std::fs;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::time::{Duration, Instant};

    use super::*;

    struct FakeTool {
        _dir: tempfile::TempDir,
        path: PathBuf,
    }

    fn fake_tool(script: &str) -> FakeTool {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wasm-tools");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{script}").unwrap();
        file.sync_all().unwrap();
        drop(file);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        FakeTool { _dir: dir, path }
    }

    fn run(tool: &FakeTool, compiler: WasmTools, input: WitInput) -> Result<Vec<u8>, LoadError> {
        compiler.executable(&tool.path).resolve_to_json(input)
    }

    const EMPTY_DOCUMENT: &str =
        r#"{"worlds": [], "interfaces": [], "types": [], "packages": []}"#;

    #[test]
    fn failing_tool_reports_its_stderr() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tool = fake_tool("echo 'error: expected `;`' >&2\nexit 3");
        let err = run(&tool, WasmTools::new(), WitInput::path("world.wit")).unwrap_err();
        match err {
            LoadError::ToolExecutionFailure { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "error: expected `;`\n");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn output_of_a_successful_run_is_resolved() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tool = fake_tool(&format!("cat >/dev/null\necho '{EMPTY_DOCUMENT}'"));
        let compiler = WasmTools::new().executable(&tool.path);
        let graph = load(&compiler, WitInput::reader(io::Cursor::new("package a:b;"))).unwrap();
        assert_eq!(graph.package_count(), 0);
    }

    #[test]
    fn arguments_and_stdin_reach_the_tool() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tool = fake_tool("echo \"$@\"\ncat");
        let output = run(
            &tool,
            WasmTools::new().all_features(false),
            WitInput::reader(io::Cursor::new("package a:b;")),
        )
        .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "component wit -j\npackage a:b;");

        let output = run(&tool, WasmTools::new(), WitInput::path("dir/world.wit")).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "component wit -j --all-features dir/world.wit\n"
        );
    }

    #[test]
    fn invalid_output_is_a_resolution_error() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tool = fake_tool("echo 'not json'");
        let compiler = WasmTools::new().executable(&tool.path);
        assert!(matches!(
            load(&compiler, WitInput::path("world.wit")),
            Err(LoadError::Resolve(dt_wit::ResolveError::Decode(_)))
        ));
    }

    #[test]
    fn slow_tool_times_out() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tool = fake_tool("exec sleep 10");
        let started = Instant::now();
        let err = run(
            &tool,
            WasmTools::new().timeout(Duration::from_millis(200)),
            WitInput::path("world.wit"),
        )
        .unwrap_err();
        assert!(
            matches!(err, LoadError::TimedOut { timeout, .. } if timeout == Duration::from_millis(200)),
            "{err:?}"
        );
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn cancelled_tool_is_killed() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tool = fake_tool("exec sleep 10");
        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(100));
                token.cancel();
            })
        };
        let started = Instant::now();
        let err = run(
            &tool,
            WasmTools::new().cancel_with(token),
            WitInput::path("world.wit"),
        )
        .unwrap_err();
        canceller.join().unwrap();
        assert!(matches!(err, LoadError::Cancelled { .. }), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
