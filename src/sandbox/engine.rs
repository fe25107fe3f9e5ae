//! The engine host owns the wasmtime engine shared by every container of
//! the shim and turns an OCI bundle into an instantiated, startable wasm
//! module.

use std::fs::OpenOptions;
use std::path::Path;

use log::debug;
use oci_spec::runtime::Spec;
use wasmtime::{
    Config as EngineConfig, Engine, Func, Instance, InterruptHandle, Linker, Module, Store, Trap,
};
use wasmtime_wasi::sync::file::File as WasiFile;
use wasmtime_wasi::{WasiCtx, WasiCtxBuilder};

use super::error::{Error, Result};
use super::oci;

/// A wasm module instantiated into its own store, ready for `_start`.
///
/// Each container gets a dedicated store so that the interrupt handle is
/// scoped to that container; the engine (and its compiled-module cache)
/// is shared.
pub struct ExecUnit {
    store: Store<WasiCtx>,
    instance: Instance,
}

impl ExecUnit {
    /// The module's WASI entrypoint, if it exports one.
    pub fn start_func(&mut self) -> Option<Func> {
        self.instance.get_func(&mut self.store, "_start")
    }

    /// Runs the entrypoint to completion and maps the outcome to an exit
    /// code. Consumes the unit; a wasm instance is not restartable.
    pub fn invoke(mut self, func: Func) -> u32 {
        match func.call(&mut self.store, &[], &mut []) {
            Ok(()) => 0,
            Err(trap) => trap_exit_code(&trap),
        }
    }
}

/// Exit code for a trapped execution: the WASI exit status when the guest
/// called `proc_exit`, 137 for every other trap (including the interrupt
/// trap raised by kill).
fn trap_exit_code(trap: &Trap) -> u32 {
    match trap.i32_exit_status() {
        Some(status) => status as u32,
        None => 137,
    }
}

#[derive(Clone)]
pub struct EngineHost {
    engine: Engine,
}

impl EngineHost {
    pub fn new() -> Result<Self> {
        let engine = Engine::new(EngineConfig::new().interruptable(true))
            .map_err(|err| Error::Others(format!("could not create engine: {err}")))?;
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Builds the WASI context for the container (args, env, rootfs
    /// preopened at `/`, stdio bound from the request paths), loads the
    /// module at `<rootfs>/<args[0]>` and instantiates it.
    pub fn instantiate(
        &self,
        bundle: &Path,
        spec: &Spec,
        stdin: &str,
        stdout: &str,
        stderr: &str,
    ) -> Result<(ExecUnit, InterruptHandle)> {
        let rootfs = oci::resolve_rootfs(spec, bundle)?;
        let args = oci::get_args(spec);
        if args.is_empty() {
            return Err(Error::InvalidArgument(
                "process args are not set in the runtime spec".to_string(),
            ));
        }
        let env = oci::env_pairs(spec)?;

        debug!("opening rootfs {}", rootfs.display());
        let rootfs_dir = oci::wasi_dir(&rootfs, OpenOptions::new().read(true))
            .map_err(|err| Error::Others(format!("could not open rootfs: {err}")))?;

        let mut builder = WasiCtxBuilder::new()
            .args(args)?
            .envs(env.as_slice())?
            .preopened_dir(rootfs_dir, "/")?;

        if let Some(f) = open_stdio(stdin)? {
            builder = builder.stdin(Box::new(f));
        }
        if let Some(f) = open_stdio(stdout)? {
            builder = builder.stdout(Box::new(f));
        }
        if let Some(f) = open_stdio(stderr)? {
            builder = builder.stderr(Box::new(f));
        }

        let wasi = builder.build();

        let entry = args[0]
            .strip_prefix(std::path::MAIN_SEPARATOR)
            .unwrap_or(&args[0]);
        let module_path = rootfs.join(entry);
        if !module_path.exists() {
            return Err(Error::NotFound(module_path.display().to_string()));
        }

        debug!("loading module {}", module_path.display());
        let module = Module::from_file(&self.engine, &module_path)
            .map_err(|err| Error::Others(format!("could not load module: {err}")))?;

        let mut store = Store::new(&self.engine, wasi);
        let interrupt = store
            .interrupt_handle()
            .map_err(|err| Error::Others(format!("could not get interrupt handle: {err}")))?;

        let mut linker = Linker::new(&self.engine);
        wasmtime_wasi::add_to_linker(&mut linker, |ctx| ctx)
            .map_err(|err| Error::Others(format!("could not link wasi imports: {err}")))?;

        let instance = linker
            .instantiate(&mut store, &module)
            .map_err(|err| Error::Others(format!("could not instantiate module: {err}")))?;

        Ok((ExecUnit { store, instance }, interrupt))
    }
}

// containerd can send an empty path or a non-existent path.
// In both cases the stdio stream was intentionally not set up.
// Any other error is a real error.
fn open_stdio(path: &str) -> Result<Option<WasiFile>> {
    if path.is_empty() {
        return Ok(None);
    }
    match oci::wasi_file(path, OpenOptions::new().read(true).write(true)) {
        Ok(f) => Ok(Some(f)),
        Err(err) => match err.kind() {
            std::io::ErrorKind::NotFound => Ok(None),
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;
    use std::path::PathBuf;

    use oci_spec::runtime::{Process, Root};
    use tempfile::tempdir;

    use super::*;

    fn write_bundle(dir: &Path, wat_src: Option<&str>) -> Spec {
        let rootfs = dir.join("rootfs");
        create_dir_all(&rootfs).unwrap();
        if let Some(src) = wat_src {
            std::fs::write(rootfs.join("task.wasm"), wat::parse_str(src).unwrap()).unwrap();
        }

        let mut process = Process::default();
        process.set_args(Some(vec!["task.wasm".to_string()]));
        process.set_env(Some(vec!["A=b".to_string()]));
        let mut root = Root::default();
        root.set_path(PathBuf::from("rootfs"));
        let mut spec = Spec::default();
        spec.set_process(Some(process));
        spec.set_root(Some(root));
        spec
    }

    #[test]
    fn test_normal_exit() {
        let dir = tempdir().unwrap();
        let spec = write_bundle(dir.path(), Some("(module (func (export \"_start\")))"));

        let host = EngineHost::new().unwrap();
        let (mut exec, _interrupt) = host.instantiate(dir.path(), &spec, "", "", "").unwrap();
        let func = exec.start_func().unwrap();
        assert_eq!(exec.invoke(func), 0);
    }

    #[test]
    fn test_proc_exit_status() {
        let dir = tempdir().unwrap();
        let spec = write_bundle(
            dir.path(),
            Some(
                r#"(module
                    (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
                    (memory (export "memory") 1)
                    (func (export "_start") (call $proc_exit (i32.const 2))))"#,
            ),
        );

        let host = EngineHost::new().unwrap();
        let (mut exec, _interrupt) = host.instantiate(dir.path(), &spec, "", "", "").unwrap();
        let func = exec.start_func().unwrap();
        assert_eq!(exec.invoke(func), 2);
    }

    #[test]
    fn test_trap_exit_code() {
        let dir = tempdir().unwrap();
        let spec = write_bundle(
            dir.path(),
            Some("(module (func (export \"_start\") unreachable))"),
        );

        let host = EngineHost::new().unwrap();
        let (mut exec, _interrupt) = host.instantiate(dir.path(), &spec, "", "", "").unwrap();
        let func = exec.start_func().unwrap();
        assert_eq!(exec.invoke(func), 137);
    }

    #[test]
    fn test_missing_module_is_not_found() {
        let dir = tempdir().unwrap();
        let spec = write_bundle(dir.path(), None);

        let host = EngineHost::new().unwrap();
        match host
            .instantiate(dir.path(), &spec, "", "", "")
            .unwrap_err()
        {
            Error::NotFound(_) => {}
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_missing_start_export() {
        let dir = tempdir().unwrap();
        let spec = write_bundle(dir.path(), Some("(module (func (export \"other\")))"));

        let host = EngineHost::new().unwrap();
        let (mut exec, _interrupt) = host.instantiate(dir.path(), &spec, "", "", "").unwrap();
        assert!(exec.start_func().is_none());
    }

    #[test]
    fn test_invalid_env_entry() {
        let dir = tempdir().unwrap();
        let mut spec = write_bundle(dir.path(), Some("(module (func (export \"_start\")))"));
        let mut process = Process::default();
        process.set_args(Some(vec!["task.wasm".to_string()]));
        process.set_env(Some(vec!["NOSEPARATOR".to_string()]));
        spec.set_process(Some(process));

        let host = EngineHost::new().unwrap();
        match host
            .instantiate(dir.path(), &spec, "", "", "")
            .unwrap_err()
        {
            Error::InvalidArgument(_) => {}
            e => panic!("unexpected error: {e}"),
        }
    }
}
