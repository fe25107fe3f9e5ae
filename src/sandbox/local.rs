//! The direct task service: owns the engine host and serves the task
//! lifecycle against in-process wasm instances. This is the whole shim in
//! single-container mode and the authoritative side of `sandbox.sock` in
//! grouped mode; the group's infra ("pause") container never reaches it.

use std::fs::{create_dir_all, remove_dir_all};
use std::path::Path;
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use containerd_shim::api::{
    ConnectRequest, ConnectResponse, CreateTaskRequest, CreateTaskResponse, DeleteRequest,
    DeleteResponse, Empty, KillRequest, ShutdownRequest, StartRequest, StartResponse,
    StateRequest, StateResponse, WaitRequest, WaitResponse,
};
use containerd_shim::mount::mount_rootfs;
use containerd_shim::protos::events::task::{TaskCreate, TaskDelete, TaskExit, TaskIO, TaskStart};
use containerd_shim::protos::types::task::Status;
use containerd_shim::util::IntoOption;
use containerd_shim::ExitSignal;
use log::{debug, warn};
use nix::errno::Errno;
use nix::mount::{umount2, MntFlags};
use oci_spec::runtime::Spec;

use super::engine::EngineHost;
use super::error::{Error, Result};
use super::events::{EventSender, RemoteEventSender, ToTimestamp};
use super::instance::{InstanceRecord, InstanceStore};
use super::oci;

#[cfg(test)]
mod tests;

const SIGKILL: u32 = 9;

pub struct Local<E: EventSender = RemoteEventSender> {
    host: EngineHost,
    instances: InstanceStore,
    events: E,
    exit: Arc<ExitSignal>,
}

impl<E: EventSender> Local<E> {
    pub fn new(host: EngineHost, events: E, exit: Arc<ExitSignal>) -> Self {
        Self {
            host,
            instances: InstanceStore::default(),
            events,
            exit,
        }
    }

    fn get_instance(&self, id: &str) -> Result<Arc<InstanceRecord>> {
        self.instances
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn send_create_event(&self, req: &CreateTaskRequest) {
        self.events.send(TaskCreate {
            container_id: req.id().into(),
            bundle: req.bundle().into(),
            rootfs: req.rootfs.clone(),
            io: Some(TaskIO {
                stdin: req.stdin().into(),
                stdout: req.stdout().into(),
                stderr: req.stderr().into(),
                ..Default::default()
            })
            .into(),
            ..Default::default()
        });
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

        let bundle = Path::new(req.bundle());
        let spec = oci::load(&bundle.join("config.json"))
            .map_err(|err| Error::InvalidArgument(format!("could not load runtime spec: {err}")))?;

        match self.setup_instance(&req, &spec, bundle) {
            Ok(record) => {
                self.instances.add(req.id(), Arc::new(record));
                self.send_create_event(&req);
                debug!("create done for {}", req.id());
                Ok(CreateTaskResponse {
                    pid: std::process::id(),
                    ..Default::default()
                })
            }
            Err(err) => {
                if !req.rootfs.is_empty() {
                    detach_rootfs(&bundle.join("rootfs"));
                }
                Err(err)
            }
        }
    }

    /// Mounts the rootfs and instantiates the module. The caller unwinds
    /// the mounts if this fails.
    fn setup_instance(
        &self,
        req: &CreateTaskRequest,
        spec: &Spec,
        bundle: &Path,
    ) -> Result<InstanceRecord> {
        if !req.rootfs.is_empty() {
            let rootfs = bundle.join("rootfs");
            let _ = create_dir_all(&rootfs);
            for m in req.rootfs() {
                let mount_type = m.type_().none_if(|&t| t.is_empty());
                let source = m.source.as_str().none_if(|&s| s.is_empty());
                mount_rootfs(mount_type, source, &m.options.to_vec(), &rootfs)
                    .map_err(|err| Error::Others(format!("mount rootfs: {err}")))?;
            }
        }

        let (exec, interrupt) =
            self.host
                .instantiate(bundle, spec, req.stdin(), req.stdout(), req.stderr())?;

        Ok(InstanceRecord::new(
            exec,
            interrupt,
            req.bundle().to_string(),
            req.stdin().to_string(),
            req.stdout().to_string(),
            req.stderr().to_string(),
            std::process::id(),
        ))
    }

    pub fn task_start(&self, req: StartRequest) -> Result<StartResponse> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        let record = self.get_instance(req.id())?;
        let mut exec = record.take_exec().ok_or_else(|| {
            Error::FailedPrecondition("task was already started".to_string())
        })?;
        let func = match exec.start_func() {
            Some(f) => f,
            None => {
                record.restore_exec(exec);
                return Err(Error::NotFound(
                    "module does not export a _start function".to_string(),
                ));
            }
        };

        record.set_running();
        self.events.send(TaskStart {
            container_id: req.id().into(),
            pid: record.pid(),
            ..Default::default()
        });

        let id = req.id().to_string();
        let events = self.events.clone();
        let instance = record.clone();
        thread::Builder::new()
            .name(id.clone())
            .spawn(move || {
                debug!("starting instance {id}");
                let code = exec.invoke(func);
                debug!("instance {id} exited with code {code}");
                instance.set_exited(code);

                let (exit_code, exited_at) = instance.exit_info().unwrap_or((code, Utc::now()));
                events.send(TaskExit {
                    container_id: id.clone(),
                    id,
                    pid: instance.pid(),
                    exit_status: exit_code,
                    exited_at: Some(exited_at.to_timestamp()).into(),
                    ..Default::default()
                });
            })
            .map_err(|err| Error::Others(format!("could not spawn execution thread: {err}")))?;

        Ok(StartResponse {
            pid: record.pid(),
            ..Default::default()
        })
    }

    pub fn task_wait(&self, req: WaitRequest) -> Result<WaitResponse> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        let record = self.get_instance(req.id())?;
        let (exit_code, exited_at) = record.wait();
        debug!("wait done for {}", req.id());
        Ok(WaitResponse {
            exit_status: exit_code,
            exited_at: Some(exited_at.to_timestamp()).into(),
            ..Default::default()
        })
    }

    pub fn task_kill(&self, req: KillRequest) -> Result<Empty> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        let record = self.get_instance(req.id())?;
        if req.signal() != SIGKILL {
            return Err(Error::NotImplemented(format!(
                "signal {} is not supported",
                req.signal()
            )));
        }
        record.interrupt();
        Ok(Empty::new())
    }

    pub fn task_delete(&self, req: DeleteRequest) -> Result<DeleteResponse> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        let record = self.get_instance(req.id())?;
        match record.status() {
            Status::RUNNING | Status::PAUSED | Status::PAUSING => {
                return Err(Error::FailedPrecondition(
                    "cannot delete a running task".to_string(),
                ));
            }
            _ => {}
        }

        detach_rootfs(&Path::new(record.bundle()).join("rootfs"));
        if let Err(err) = remove_dir_all(record.bundle()) {
            if err.kind() != std::io::ErrorKind::NotFound {
                return Err(Error::Others(format!("remove bundle: {err}")));
            }
        }

        self.instances.delete(req.id());

        let (exit_code, exited_at) = record.exit_info().unzip();
        let exited_at = exited_at.map(ToTimestamp::to_timestamp);

        self.events.send(TaskDelete {
            container_id: req.id().into(),
            pid: record.pid(),
            exit_status: exit_code.unwrap_or_default(),
            exited_at: exited_at.clone().into(),
            ..Default::default()
        });

        Ok(DeleteResponse {
            pid: record.pid(),
            exit_status: exit_code.unwrap_or_default(),
            exited_at: exited_at.into(),
            ..Default::default()
        })
    }

    pub fn task_state(&self, req: StateRequest) -> Result<StateResponse> {
        if !req.exec_id().is_empty() {
            return Err(Error::NotImplemented("exec is not supported".to_string()));
        }

        let record = self.get_instance(req.id())?;
        let status = record.status();
        let (exit_code, exited_at) = match status {
            Status::STOPPED => record.exit_info().unzip(),
            _ => (None, None),
        };
        let (stdin, stdout, stderr) = record.stdio();

        Ok(StateResponse {
            id: req.id().to_string(),
            bundle: record.bundle().to_string(),
            stdin: stdin.to_string(),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            pid: record.pid(),
            status: status.into(),
            exit_status: exit_code.unwrap_or_default(),
            exited_at: exited_at.map(ToTimestamp::to_timestamp).into(),
            ..Default::default()
        })
    }

    pub fn task_connect(&self, req: ConnectRequest) -> Result<ConnectResponse> {
        let record = self.get_instance(req.id())?;
        Ok(ConnectResponse {
            shim_pid: std::process::id(),
            task_pid: record.pid(),
            ..Default::default()
        })
    }

    pub fn task_shutdown(&self, _req: ShutdownRequest) -> Result<Empty> {
        if !self.instances.is_empty() {
            return Ok(Empty::new());
        }
        self.exit.signal();
        Ok(Empty::new())
    }
}

/// Lazy-unmounts the rootfs. Not being mounted at all is the common case
/// (no rootfs mounts were supplied) and is not an error.
fn detach_rootfs(rootfs: &Path) {
    match umount2(rootfs, MntFlags::MNT_DETACH) {
        Ok(()) | Err(Errno::EINVAL) | Err(Errno::ENOENT) => {}
        Err(err) => warn!("could not detach rootfs {}: {err}", rootfs.display()),
    }
}
