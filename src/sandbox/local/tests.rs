use std::fs::File;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::time::Duration;

use oci_spec::runtime::{Process, Root};
use serde_json as json;
use tempfile::tempdir;

use super::*;

const EXIT_ZERO_WAT: &str = "(module (func (export \"_start\")))";
const EXIT_TWO_WAT: &str = r#"(module
    (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
    (memory (export "memory") 1)
    (func (export "_start") (call $proc_exit (i32.const 2))))"#;
const SPIN_WAT: &str = "(module (func (export \"_start\") (loop br 0)))";

fn base_spec() -> Spec {
    let mut process = Process::default();
    process.set_args(Some(vec!["task.wasm".to_string()]));
    let mut root = Root::default();
    root.set_path(PathBuf::from("rootfs"));
    let mut spec = Spec::default();
    spec.set_process(Some(process));
    spec.set_root(Some(root));
    spec
}

fn create_bundle(dir: &Path, spec: &Spec, wat_src: Option<&str>) {
    let rootfs = dir.join("rootfs");
    create_dir_all(&rootfs).unwrap();
    if let Some(src) = wat_src {
        std::fs::write(rootfs.join("task.wasm"), wat::parse_str(src).unwrap()).unwrap();
    }
    json::to_writer(File::create(dir.join("config.json")).unwrap(), spec).unwrap();
}

fn new_local() -> Arc<Local<()>> {
    Arc::new(Local::new(
        EngineHost::new().unwrap(),
        (),
        Arc::new(ExitSignal::default()),
    ))
}

fn create_req(id: &str, bundle: &Path) -> CreateTaskRequest {
    CreateTaskRequest {
        id: id.to_string(),
        bundle: bundle.to_str().unwrap().to_string(),
        ..Default::default()
    }
}

fn kill_req(id: &str, signal: u32) -> KillRequest {
    KillRequest {
        id: id.to_string(),
        signal,
        ..Default::default()
    }
}

fn state_req(id: &str) -> StateRequest {
    StateRequest {
        id: id.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_lifecycle_normal_exit() {
    let dir = tempdir().unwrap();
    create_bundle(dir.path(), &base_spec(), Some(EXIT_ZERO_WAT));
    let local = new_local();

    let resp = local.task_create(create_req("test", dir.path())).unwrap();
    assert_eq!(resp.pid, std::process::id());

    let state = local.task_state(state_req("test")).unwrap();
    assert_eq!(state.status(), Status::CREATED);

    local
        .task_start(StartRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();

    let resp = local
        .task_wait(WaitRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(resp.exit_status, 0);
    assert!(resp.exited_at.is_some());

    let state = local.task_state(state_req("test")).unwrap();
    assert_eq!(state.status(), Status::STOPPED);
    assert_eq!(state.exit_status, 0);

    let resp = local
        .task_delete(DeleteRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(resp.pid, std::process::id());
    assert_eq!(resp.exit_status, 0);

    match local.task_state(state_req("test")).unwrap_err() {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_exit_code_is_reported() {
    let dir = tempdir().unwrap();
    create_bundle(dir.path(), &base_spec(), Some(EXIT_TWO_WAT));
    let local = new_local();

    local.task_create(create_req("test", dir.path())).unwrap();
    local
        .task_start(StartRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();

    let resp = local
        .task_wait(WaitRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(resp.exit_status, 2);
}

#[test]
fn test_kill_interrupts_execution() {
    let dir = tempdir().unwrap();
    create_bundle(dir.path(), &base_spec(), Some(SPIN_WAT));
    let local = new_local();

    local.task_create(create_req("test", dir.path())).unwrap();
    local
        .task_start(StartRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();

    let state = local.task_state(state_req("test")).unwrap();
    assert_eq!(state.status(), Status::RUNNING);

    let (tx, rx) = channel();
    let waiter = local.clone();
    thread::spawn(move || {
        let resp = waiter.task_wait(WaitRequest {
            id: "test".to_string(),
            ..Default::default()
        });
        tx.send(resp).unwrap();
    });
    rx.try_recv().unwrap_err();

    // only SIGKILL is supported
    match local.task_kill(kill_req("test", 15)).unwrap_err() {
        Error::NotImplemented(_) => {}
        e => panic!("unexpected error: {e}"),
    }
    let state = local.task_state(state_req("test")).unwrap();
    assert_eq!(state.status(), Status::RUNNING);

    local.task_kill(kill_req("test", 9)).unwrap();

    let resp = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
    assert_eq!(resp.exit_status, 137);

    let state = local.task_state(state_req("test")).unwrap();
    assert_eq!(state.status(), Status::STOPPED);

    local
        .task_delete(DeleteRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();
}

#[test]
fn test_delete_rejected_while_running() {
    let dir = tempdir().unwrap();
    create_bundle(dir.path(), &base_spec(), Some(SPIN_WAT));
    let local = new_local();

    local.task_create(create_req("test", dir.path())).unwrap();
    local
        .task_start(StartRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();

    match local
        .task_delete(DeleteRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap_err()
    {
        Error::FailedPrecondition(_) => {}
        e => panic!("unexpected error: {e}"),
    }

    // the instance survived the rejected delete
    let state = local.task_state(state_req("test")).unwrap();
    assert_eq!(state.status(), Status::RUNNING);

    local.task_kill(kill_req("test", 9)).unwrap();
    local
        .task_wait(WaitRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();

    local
        .task_delete(DeleteRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap();

    // repeated delete reports NotFound
    match local
        .task_delete(DeleteRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap_err()
    {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_create_missing_module() {
    let dir = tempdir().unwrap();
    create_bundle(dir.path(), &base_spec(), None);
    let local = new_local();

    match local
        .task_create(create_req("test", dir.path()))
        .unwrap_err()
    {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }

    // no record was created
    match local.task_state(state_req("test")).unwrap_err() {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_create_terminal_not_supported() {
    let dir = tempdir().unwrap();
    create_bundle(dir.path(), &base_spec(), Some(EXIT_ZERO_WAT));
    let local = new_local();

    let mut req = create_req("test", dir.path());
    req.terminal = true;
    match local.task_create(req).unwrap_err() {
        Error::NotImplemented(_) => {}
        e => panic!("unexpected error: {e}"),
    }

    match local.task_state(state_req("test")).unwrap_err() {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_create_rejects_malformed_env() {
    let dir = tempdir().unwrap();
    let mut spec = base_spec();
    let mut process = Process::default();
    process.set_args(Some(vec!["task.wasm".to_string()]));
    process.set_env(Some(vec!["NOSEPARATOR".to_string()]));
    spec.set_process(Some(process));
    create_bundle(dir.path(), &spec, Some(EXIT_ZERO_WAT));
    let local = new_local();

    match local
        .task_create(create_req("test", dir.path()))
        .unwrap_err()
    {
        Error::InvalidArgument(_) => {}
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_start_missing_entrypoint() {
    let dir = tempdir().unwrap();
    create_bundle(dir.path(), &base_spec(), Some("(module)"));
    let local = new_local();

    local.task_create(create_req("test", dir.path())).unwrap();
    match local
        .task_start(StartRequest {
            id: "test".to_string(),
            ..Default::default()
        })
        .unwrap_err()
    {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_unknown_ids_are_not_found() {
    let local = new_local();

    match local.task_kill(kill_req("nope", 9)).unwrap_err() {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }
    match local
        .task_wait(WaitRequest {
            id: "nope".to_string(),
            ..Default::default()
        })
        .unwrap_err()
    {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }
    match local
        .task_connect(ConnectRequest {
            id: "nope".to_string(),
            ..Default::default()
        })
        .unwrap_err()
    {
        Error::NotFound(_) => {}
        e => panic!("unexpected error: {e}"),
    }
}
