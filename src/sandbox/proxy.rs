//! The grouped-mode task service: a thin forwarder to a child process
//! that owns the engine for the whole sandbox. The child is this same
//! binary re-executed with `_RUNWASI_SANDBOX=1`, serving the direct
//! service on `sandbox.sock` in the shim's working directory.

use std::env::current_dir;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use containerd_shim::api::{
    ConnectRequest, ConnectResponse, CreateTaskRequest, CreateTaskResponse, DeleteRequest,
    DeleteResponse, Empty, KillRequest, ShutdownRequest, StartRequest, StartResponse,
    StateRequest, StateResponse, WaitRequest, WaitResponse,
};
use containerd_shim::protos::ttrpc::Client;
use containerd_shim::protos::types::task::Status;
use containerd_shim::protos::TaskClient;
use containerd_shim::ExitSignal;
use log::{debug, warn};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use oci_spec::runtime::Spec;
use ttrpc::context;

use super::error::{Error, Result};
use super::events::ToTimestamp;
use super::oci;
use super::sync::WaitableCell;

/// Environment switch that puts the re-executed binary into
/// sandbox-child mode.
pub const SANDBOX_MODE_ENV: &str = "_RUNWASI_SANDBOX";
/// Network namespace path handed to the sandbox child.
pub const NETNS_PATH_ENV: &str = "_RUNWASI_NETNS_PATH";
/// containerd namespace handed to the sandbox child, so it can publish
/// task events under the right namespace.
pub const NAMESPACE_ENV: &str = "_RUNWASI_NAMESPACE";
/// Event endpoint the manager hands to every shim; the sandbox child
/// inherits it and publishes its own task events there.
pub const TTRPC_ADDRESS_ENV: &str = "TTRPC_ADDRESS";
/// Socket the sandbox child serves on, relative to the shim's working
/// directory.
pub const SANDBOX_SOCKET: &str = "sandbox.sock";

const DIAL_TIMEOUT: Duration = Duration::from_secs(30);
const DIAL_RETRY: Duration = Duration::from_millis(10);
const SIGKILL: u32 = 9;

struct ProxyState {
    sandbox_id: String,
    pid: u32,
    spawned: bool,
}

pub struct Proxy {
    sandbox_bin: PathBuf,
    namespace: String,
    exit: Arc<ExitSignal>,
    client: WaitableCell<TaskClient>,
    child_exit: WaitableCell<(u32, DateTime<Utc>)>,
    state: Mutex<ProxyState>,
}

impl Proxy {
    pub fn new(sandbox_bin: PathBuf, namespace: impl AsRef<str>, exit: Arc<ExitSignal>) -> Self {
        Self {
            sandbox_bin,
            namespace: namespace.as_ref().to_string(),
            exit,
            client: WaitableCell::new(),
            child_exit: WaitableCell::new(),
            state: Mutex::new(ProxyState {
                sandbox_id: String::new(),
                pid: 0,
                spawned: false,
            }),
        }
    }

    /// Blocks until the sandbox child has been dialed. Released by the
    /// create that spawns the child.
    fn client(&self) -> TaskClient {
        self.client.wait()
    }

    fn try_client(&self) -> Option<TaskClient> {
        self.client.get()
    }

    fn is_sandbox(&self, id: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.spawned && state.sandbox_id == id
    }

    fn sandbox_pid(&self) -> u32 {
        self.state.lock().unwrap().pid
    }

    /// Spawns the sandbox child and dials its socket, retrying connect
    /// failures until the deadline.
    fn spawn_sandbox(&self, req: &CreateTaskRequest, spec: &Spec) -> Result<u32> {
        let mut cmd = Command::new(&self.sandbox_bin);
        cmd.env(SANDBOX_MODE_ENV, "1");
        cmd.env(NAMESPACE_ENV, &self.namespace);
        if let Some(netns) = oci::netns_path(spec) {
            cmd.env(NETNS_PATH_ENV, netns);
        }

        let mut child = cmd
            .spawn()
            .map_err(|err| Error::Others(format!("could not start sandbox: {err}")))?;
        let pid = child.id();
        debug!("sandbox started with pid {pid}");

        let child_exit = self.child_exit.clone();
        let exit = self.exit.clone();
        thread::Builder::new()
            .name("sandbox-wait".to_string())
            .spawn(move || {
                let code = match child.wait() {
                    Ok(status) => status.code().map(|c| c as u32).unwrap_or(137),
                    Err(err) => {
                        warn!("could not wait on sandbox: {err}");
                        137
                    }
                };
                let _ = child_exit.set((code, Utc::now()));
                // Nothing left to serve once the sandbox is gone.
                exit.signal();
            })
            .map_err(|err| Error::Others(format!("could not spawn sandbox monitor: {err}")))?;

        let sock = current_dir()
            .map_err(|err| Error::Others(format!("could not get working directory: {err}")))?
            .join(SANDBOX_SOCKET);
        let address = format!("unix://{}", sock.display());

        let deadline = Instant::now() + DIAL_TIMEOUT;
        let client = loop {
            match Client::connect(&address) {
                Ok(conn) => break TaskClient::new(conn),
                Err(err) => {
                    if Instant::now() >= deadline {
                        return Err(Error::Others(format!(
                            "could not dial sandbox at {address}: {err}"
                        )));
                    }
                    thread::sleep(DIAL_RETRY);
                }
            }
        };

        let mut state = self.state.lock().unwrap();
        state.sandbox_id = req.id().to_string();
        state.pid = pid;
        state.spawned = true;
        drop(state);

        // Releases everything blocked in client().
        let _ = self.client.set(client);
        Ok(pid)
    }

    pub fn task_create(&self, req: CreateTaskRequest) -> Result<CreateTaskResponse> {
        if !req.checkpoint().is_empty() || !req.parent_checkpoint().is_empty() {
            return Err(Error::NotImplemented(
                "checkpoint is not supported".to_string(),
            ));
        }
        if req.terminal {
            return Err(Error::NotImplemented(
                "terminal is not supported".to_string(),
            ));
        }

        if let Some(client) = self.try_client() {
            return Ok(client.create(context::Context::default(), &req)?);
        }

        let spec = oci::load(&Path::new(req.bundle()).join("config.json"))
            .map_err(|err| Error::InvalidArgument(format!("could not load runtime spec: {err}")))?;

        let pid = self.spawn_sandbox(&req, &spec)?;

        if oci::sandbox_id(&spec).is_some() {
            // The group's infra ("pause") container: the sandbox child is
            // its process, nothing to forward.
            return Ok(CreateTaskResponse {
                pid,
                ..Default::default()
            });
        }

        Ok(self.client().create(context::Context::default(), &req)?)
    }

    pub fn task_start(&self, req: StartRequest) -> Result<StartResponse> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        if self.is_sandbox(req.id()) {
            return Ok(StartResponse {
                pid: self.sandbox_pid(),
                ..Default::default()
            });
        }
        Ok(self.client().start(context::Context::default(), &req)?)
    }

    pub fn task_wait(&self, req: WaitRequest) -> Result<WaitResponse> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        if self.is_sandbox(req.id()) {
            let (exit_code, exited_at) = self.child_exit.wait();
            return Ok(WaitResponse {
                exit_status: exit_code,
                exited_at: Some(exited_at.to_timestamp()).into(),
                ..Default::default()
            });
        }
        Ok(self.client().wait(context::Context::default(), &req)?)
    }

    pub fn task_kill(&self, req: KillRequest) -> Result<Empty> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        if self.is_sandbox(req.id()) {
            if req.signal() != SIGKILL {
                return Err(Error::NotImplemented(format!(
                    "signal {} is not supported",
                    req.signal()
                )));
            }
            kill(Pid::from_raw(self.sandbox_pid() as i32), Signal::SIGKILL)?;
            return Ok(Empty::new());
        }
        Ok(self.client().kill(context::Context::default(), &req)?)
    }

    pub fn task_delete(&self, req: DeleteRequest) -> Result<DeleteResponse> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }
        Ok(self.client().delete(context::Context::default(), &req)?)
    }

    pub fn task_state(&self, req: StateRequest) -> Result<StateResponse> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        if self.is_sandbox(req.id()) {
            let cwd = current_dir()
                .map_err(|err| Error::Others(format!("could not get working directory: {err}")))?;
            return Ok(StateResponse {
                id: req.id().to_string(),
                bundle: cwd.display().to_string(),
                pid: std::process::id(),
                status: Status::RUNNING.into(),
                ..Default::default()
            });
        }
        Ok(self.client().state(context::Context::default(), &req)?)
    }

    pub fn task_connect(&self, req: ConnectRequest) -> Result<ConnectResponse> {
        Ok(self.client().connect(context::Context::default(), &req)?)
    }

    pub fn task_shutdown(&self, req: ShutdownRequest) -> Result<Empty> {
        match self.try_client() {
            Some(client) => {
                // The child exits once its store drains; the monitor
                // thread then signals shim exit.
                if let Err(err) = client.shutdown(context::Context::default(), &req) {
                    debug!("sandbox shutdown returned: {err}");
                }
            }
            None => self.exit.signal(),
        }
        Ok(Empty::new())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs::File;
    use std::os::unix::net::UnixListener;

    use serde_json as json;
    use tempfile::tempdir;

    use super::*;
    use crate::sandbox::oci::SANDBOX_ID_ANNOTATION;

    fn annotated_bundle(dir: &Path, sandbox_id: &str) {
        let mut spec = Spec::default();
        let annotations = HashMap::from([(
            SANDBOX_ID_ANNOTATION.to_string(),
            sandbox_id.to_string(),
        )]);
        spec.set_annotations(Some(annotations));
        json::to_writer(File::create(dir.join("config.json")).unwrap(), &spec).unwrap();
    }

    // The first create in the group is the pause container: the proxy
    // spawns the sandbox child and answers with its pid without
    // forwarding anything, and the sandbox id then answers the fast
    // paths locally. A plain listener stands in for the child's socket;
    // /bin/true stands in for the child so its exit is observable.
    #[test]
    fn test_pause_create_short_circuits() {
        let sock = current_dir().unwrap().join(SANDBOX_SOCKET);
        let _ = std::fs::remove_file(&sock);
        let listener = UnixListener::bind(&sock).unwrap();
        let accepter = thread::spawn(move || {
            let _conn = listener.accept();
        });

        let dir = tempdir().unwrap();
        annotated_bundle(dir.path(), "test-sandbox");

        let proxy = Proxy::new(
            PathBuf::from("/bin/true"),
            "test-namespace",
            Arc::new(ExitSignal::default()),
        );

        let resp = proxy
            .task_create(CreateTaskRequest {
                id: "pause".to_string(),
                bundle: dir.path().to_str().unwrap().to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_ne!(resp.pid, 0);

        let state = proxy
            .task_state(StateRequest {
                id: "pause".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(state.status(), Status::RUNNING);

        let start = proxy
            .task_start(StartRequest {
                id: "pause".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(start.pid, resp.pid);

        match proxy
            .task_kill(KillRequest {
                id: "pause".to_string(),
                signal: 15,
                ..Default::default()
            })
            .unwrap_err()
        {
            Error::NotImplemented(_) => {}
            e => panic!("unexpected error: {e}"),
        }

        let wait = proxy
            .task_wait(WaitRequest {
                id: "pause".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(wait.exit_status, 0);

        accepter.join().unwrap();
        let _ = std::fs::remove_file(&sock);
    }
}
