//! A containerd shim that runs WASI workloads on a shared wasmtime
//! engine instead of forking OS processes, with optional CRI sandbox
//! grouping (one engine per pod, isolated in a child process).

pub mod sandbox;
