use std::env;
use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::sync::Arc;

use anyhow::Context as AnyhowContext;
use containerd_shim::protos::shim::shim_ttrpc::create_task;
use containerd_shim::protos::ttrpc::Server;
use containerd_shim::publisher::RemotePublisher;
use containerd_shim::{self as shim, ExitSignal};
use containerd_wasmtime_shim::sandbox::{
    Cli, EngineHost, Local, RemoteEventSender, Service, NAMESPACE_ENV, NETNS_PATH_ENV,
    SANDBOX_MODE_ENV, SANDBOX_SOCKET, TTRPC_ADDRESS_ENV,
};
use nix::sched::{setns, CloneFlags};

fn main() {
    if env::var(SANDBOX_MODE_ENV).map(|v| v == "1").unwrap_or(false) {
        env_logger::init();
        if let Err(err) = run_sandbox() {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
        return;
    }

    shim::run::<Cli>("io.containerd.wasmtime.v1", None);
}

/// Sandbox-child mode: join the pod's network namespace when one was
/// handed down, then serve the direct task service on `sandbox.sock`
/// until Shutdown drains it. Task events go to the event endpoint the
/// child inherited from the shim.
fn run_sandbox() -> anyhow::Result<()> {
    if let Ok(netns) = env::var(NETNS_PATH_ENV) {
        if !netns.is_empty() {
            let f = File::open(&netns)
                .with_context(|| format!("could not open network namespace {netns}"))?;
            setns(f.as_raw_fd(), CloneFlags::CLONE_NEWNET)
                .context("could not join network namespace")?;
        }
    }

    let ttrpc_address = env::var(TTRPC_ADDRESS_ENV).context("event endpoint is not set")?;
    let namespace = env::var(NAMESPACE_ENV).unwrap_or_else(|_| "default".to_string());
    let publisher =
        RemotePublisher::new(ttrpc_address).context("could not connect to the event endpoint")?;
    let events = RemoteEventSender::new(&namespace, publisher);

    let exit = Arc::new(ExitSignal::default());
    let local = Local::new(EngineHost::new()?, events, exit.clone());
    let service = Service::Local(local);

    let address = format!(
        "unix://{}",
        env::current_dir()
            .context("could not get working directory")?
            .join(SANDBOX_SOCKET)
            .display()
    );
    let task = create_task(Arc::new(Box::new(service)));
    let mut server = Server::new()
        .bind(&address)
        .context("could not bind sandbox socket")?
        .register_service(task);
    server.start().context("could not start sandbox service")?;

    exit.wait();
    server.shutdown();
    Ok(())
}
