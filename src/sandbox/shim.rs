//! The shim CLI glue the containerd manager drives: `start` allocates the
//! task socket and forks the long-lived shim in its own mount namespace;
//! `delete` dials the running shim and issues Delete.

use std::env;
use std::env::current_dir;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use containerd_shim::error::Error as ShimError;
use containerd_shim::protos::ttrpc::Client;
use containerd_shim::protos::TaskClient;
use containerd_shim::publisher::RemotePublisher;
use containerd_shim::util::write_address;
use containerd_shim::{self as shim, api, ExitSignal, Flags};
use log::warn;
use nix::mount::{mount, MsFlags};
use nix::sched::{unshare, CloneFlags};
use ttrpc::context;

use super::engine::EngineHost;
use super::error::{Error, Result};
use super::events::{RemoteEventSender, ToTimestamp};
use super::local::Local;
use super::oci;
use super::proxy::Proxy;
use super::task::Service;

/// Set on the spawned shim when the bundle carries the sandbox
/// annotation; selects the proxy service shape.
pub const GROUPING_ENV: &str = "CRI_SANDBOX_ENABLED";

const STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Cli implements the containerd-shim command line interface with
/// `Service` as the task service.
pub struct Cli {
    host: EngineHost,
    namespace: String,
    exit: Arc<ExitSignal>,
    id: String,
}

impl shim::Shim for Cli {
    type T = Service;

    fn new(_runtime_id: &str, args: &Flags, _config: &mut shim::Config) -> Self {
        Cli {
            host: EngineHost::new().expect("could not create wasmtime engine"),
            namespace: args.namespace.to_string(),
            exit: Arc::new(ExitSignal::default()),
            id: args.id.to_string(),
        }
    }

    fn start_shim(&mut self, opts: shim::StartOpts) -> shim::Result<String> {
        let dir = current_dir().map_err(|err| ShimError::Other(err.to_string()))?;
        let spec = oci::load(&dir.join("config.json")).map_err(|err| {
            ShimError::InvalidArgument(format!("error loading runtime spec: {err}"))
        })?;

        let id = opts.id.clone();
        let grouping = oci::sandbox_id(&spec).unwrap_or(&id).to_string();
        let envs = match oci::sandbox_id(&spec) {
            Some(_) => vec![(GROUPING_ENV, "1")],
            None => vec![],
        };

        // Keep all mount changes (such as for the rootfs) private to the
        // shim; they are torn down with the mount namespace when the shim
        // exits.
        unshare(CloneFlags::CLONE_NEWNS).map_err(|err| {
            ShimError::Other(format!("failed to unshare mount namespace: {err}"))
        })?;
        mount::<str, Path, str, str>(
            None,
            "/".as_ref(),
            None,
            MsFlags::MS_REC | MsFlags::MS_SLAVE,
            None,
        )
        .map_err(|err| ShimError::Other(format!("failed to remount rootfs as slave: {err}")))?;

        let (_child, address) = shim::spawn(opts, &grouping, envs)?;

        write_address(&address)?;

        // Reserved for shim configuration; nothing is defined yet.
        let _ = std::io::copy(&mut std::io::stdin().lock(), &mut std::io::sink());

        Ok(address)
    }

    fn wait(&mut self) {
        self.exit.wait();
    }

    fn create_task_service(&self, publisher: RemotePublisher) -> Self::T {
        if env::var_os(GROUPING_ENV).is_some() {
            let bin = env::current_exe().unwrap_or_else(|_| PathBuf::from("/proc/self/exe"));
            return Service::Proxy(Proxy::new(bin, &self.namespace, self.exit.clone()));
        }

        let events = RemoteEventSender::new(&self.namespace, publisher);
        Service::Local(Local::new(self.host.clone(), events, self.exit.clone()))
    }

    fn delete_shim(&mut self) -> shim::Result<api::DeleteResponse> {
        match stop_shim(&self.id) {
            Ok(resp) => Ok(resp),
            Err(err) => {
                warn!("could not reach shim for delete: {err}");
                Ok(api::DeleteResponse {
                    exit_status: 137,
                    exited_at: Some(Utc::now().to_timestamp()).into(),
                    ..Default::default()
                })
            }
        }
    }
}

/// Dials the running shim through the address file and issues Delete.
/// A NotFound from Delete means the task is already gone and counts as
/// success.
fn stop_shim(id: &str) -> Result<api::DeleteResponse> {
    let address = fs::read_to_string("address")?;
    let client = Client::connect(address.trim())?;
    let task = TaskClient::new(client);

    let ctx = context::with_timeout(STOP_TIMEOUT.as_nanos() as i64);
    let req = api::DeleteRequest {
        id: id.to_string(),
        ..Default::default()
    };
    match task.delete(ctx, &req) {
        Ok(resp) => Ok(resp),
        Err(ttrpc::Error::RpcStatus(status)) if status.code == ttrpc::Code::NOT_FOUND => {
            Ok(api::DeleteResponse {
                exited_at: Some(Utc::now().to_timestamp()).into(),
                ..Default::default()
            })
        }
        Err(err) => Err(Error::Rpc(err)),
    }
}
