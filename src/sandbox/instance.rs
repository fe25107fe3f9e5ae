//! Per-container runtime state and the map of live containers.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use containerd_shim::protos::types::task::Status;
use wasmtime::InterruptHandle;

use super::engine::ExecUnit;
use super::sync::WaitableCell;

struct ExitState {
    status: Status,
    exit_code: u32,
    exited_at: Option<DateTime<Utc>>,
}

/// The runtime state of one container: the instantiated module waiting to
/// be started, its lifecycle status, and the exit bookkeeping `wait`
/// blocks on.
pub struct InstanceRecord {
    bundle: String,
    stdin: String,
    stdout: String,
    stderr: String,
    pid: u32,
    interrupt: InterruptHandle,
    exec: Mutex<Option<ExecUnit>>,
    state: Mutex<ExitState>,
    cond: Condvar,
    term: WaitableCell<()>,
}

impl InstanceRecord {
    pub fn new(
        exec: ExecUnit,
        interrupt: InterruptHandle,
        bundle: String,
        stdin: String,
        stdout: String,
        stderr: String,
        pid: u32,
    ) -> Self {
        Self {
            bundle,
            stdin,
            stdout,
            stderr,
            pid,
            interrupt,
            exec: Mutex::new(Some(exec)),
            state: Mutex::new(ExitState {
                status: Status::CREATED,
                exit_code: 0,
                exited_at: None,
            }),
            cond: Condvar::new(),
            term: WaitableCell::new(),
        }
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    pub fn stdio(&self) -> (&str, &str, &str) {
        (&self.stdin, &self.stdout, &self.stderr)
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Claims the instantiated module for execution. Returns `None` once
    /// the instance has been started.
    pub fn take_exec(&self) -> Option<ExecUnit> {
        self.exec.lock().unwrap().take()
    }

    /// Puts the module back after a failed start so the start can be
    /// retried.
    pub fn restore_exec(&self, exec: ExecUnit) {
        *self.exec.lock().unwrap() = Some(exec);
    }

    /// Traps the running guest at its next safe point.
    pub fn interrupt(&self) {
        self.interrupt.interrupt();
    }

    pub fn set_running(&self) {
        let mut state = self.state.lock().unwrap();
        if state.status == Status::CREATED {
            state.status = Status::RUNNING;
        }
    }

    /// Records the exit of the execution task. The first call wins; the
    /// stopped state never changes afterwards.
    pub fn set_exited(&self, exit_code: u32) {
        let mut state = self.state.lock().unwrap();
        if state.status != Status::STOPPED {
            state.status = Status::STOPPED;
            state.exit_code = exit_code;
            state.exited_at = Some(Utc::now());
        }
        let _ = self.term.set(());
        self.cond.notify_all();
    }

    /// Current lifecycle status. The termination signal is checked on
    /// both sides of the lock so that an execution that completed between
    /// the caller's check and the lock acquisition still reads as
    /// stopped.
    pub fn status(&self) -> Status {
        if self.term.get().is_some() {
            return Status::STOPPED;
        }
        let state = self.state.lock().unwrap();
        if self.term.get().is_some() {
            return Status::STOPPED;
        }
        state.status
    }

    /// Blocks until the instance has stopped, then returns its exit code
    /// and exit time.
    pub fn wait(&self) -> (u32, DateTime<Utc>) {
        let mut state = self.state.lock().unwrap();
        while state.status != Status::STOPPED {
            state = self.cond.wait(state).unwrap();
        }
        (state.exit_code, state.exited_at.unwrap_or_else(Utc::now))
    }

    /// Non-blocking read of the exit state; `None` until stopped.
    pub fn exit_info(&self) -> Option<(u32, DateTime<Utc>)> {
        let state = self.state.lock().unwrap();
        if state.status != Status::STOPPED {
            return None;
        }
        Some((state.exit_code, state.exited_at.unwrap_or_else(Utc::now)))
    }

    /// Like `wait`, but gives up after the timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<(u32, DateTime<Utc>)> {
        let state = self.state.lock().unwrap();
        let (state, _) = self
            .cond
            .wait_timeout_while(state, timeout, |s| s.status != Status::STOPPED)
            .unwrap();
        if state.status != Status::STOPPED {
            return None;
        }
        Some((state.exit_code, state.exited_at.unwrap_or_else(Utc::now)))
    }
}

/// Container id → instance record. Adding an id that already exists
/// overwrites silently; the upstream manager calls create at most once
/// per id.
#[derive(Default)]
pub struct InstanceStore {
    instances: Mutex<HashMap<String, Arc<InstanceRecord>>>,
}

impl InstanceStore {
    pub fn add(&self, id: &str, instance: Arc<InstanceRecord>) {
        self.instances
            .lock()
            .unwrap()
            .insert(id.to_string(), instance);
    }

    pub fn get(&self, id: &str) -> Option<Arc<InstanceRecord>> {
        self.instances.lock().unwrap().get(id).cloned()
    }

    pub fn delete(&self, id: &str) {
        self.instances.lock().unwrap().remove(id);
    }

    pub fn len(&self) -> usize {
        self.instances.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;
    use std::path::PathBuf;
    use std::thread;

    use oci_spec::runtime::{Process, Root, Spec};
    use tempfile::tempdir;

    use super::super::engine::EngineHost;
    use super::*;

    fn new_record(dir: &std::path::Path) -> InstanceRecord {
        let rootfs = dir.join("rootfs");
        create_dir_all(&rootfs).unwrap();
        std::fs::write(
            rootfs.join("task.wasm"),
            wat::parse_str("(module (func (export \"_start\")))").unwrap(),
        )
        .unwrap();

        let mut process = Process::default();
        process.set_args(Some(vec!["task.wasm".to_string()]));
        let mut root = Root::default();
        root.set_path(PathBuf::from("rootfs"));
        let mut spec = Spec::default();
        spec.set_process(Some(process));
        spec.set_root(Some(root));

        let host = EngineHost::new().unwrap();
        let (exec, interrupt) = host.instantiate(dir, &spec, "", "", "").unwrap();
        InstanceRecord::new(
            exec,
            interrupt,
            dir.display().to_string(),
            String::new(),
            String::new(),
            String::new(),
            std::process::id(),
        )
    }

    #[test]
    fn test_status_transitions() {
        let dir = tempdir().unwrap();
        let record = new_record(dir.path());

        assert_eq!(record.status(), Status::CREATED);
        assert_eq!(record.exit_info(), None);

        record.set_running();
        assert_eq!(record.status(), Status::RUNNING);

        record.set_exited(7);
        assert_eq!(record.status(), Status::STOPPED);
        let (code, _) = record.exit_info().unwrap();
        assert_eq!(code, 7);

        // stopped is final; a second exit does not overwrite
        record.set_exited(42);
        let (code, _) = record.exit_info().unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn test_wait_releases_on_exit() {
        let dir = tempdir().unwrap();
        let record = Arc::new(new_record(dir.path()));

        assert!(record
            .wait_timeout(std::time::Duration::from_millis(10))
            .is_none());

        let waiter = record.clone();
        let handle = thread::spawn(move || waiter.wait());
        record.set_exited(0);
        let (code, _) = handle.join().unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_exec_claimed_once() {
        let dir = tempdir().unwrap();
        let record = new_record(dir.path());

        let exec = record.take_exec().unwrap();
        assert!(record.take_exec().is_none());
        record.restore_exec(exec);
        assert!(record.take_exec().is_some());
    }

    #[test]
    fn test_store() {
        let dir = tempdir().unwrap();
        let store = InstanceStore::default();
        assert!(store.is_empty());
        assert!(store.get("a").is_none());

        store.add("a", Arc::new(new_record(dir.path())));
        assert_eq!(store.len(), 1);
        assert!(store.get("a").is_some());

        store.delete("a");
        assert!(store.get("a").is_none());
        assert!(store.is_empty());
    }
}
