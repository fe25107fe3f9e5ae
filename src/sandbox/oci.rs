//! Helpers for picking apart the parts of an OCI runtime spec the shim
//! actually consumes: process args and env, the rootfs location, the CRI
//! sandbox annotation and the network namespace path.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use cap_std::fs::File as CapFile;
use oci_spec::runtime::{LinuxNamespaceType, Spec};
use wasmtime_wasi::sync::file::File as WasiFile;
use wasmtime_wasi::Dir as WasiDir;

use super::error::{Error, Result};

/// Annotation the CRI layer uses to group the containers of a pod.
pub const SANDBOX_ID_ANNOTATION: &str = "io.kubernetes.cri.sandbox-id";

pub fn load(path: &Path) -> Result<Spec> {
    Ok(Spec::load(path)?)
}

/// The sandbox group this container belongs to, if any.
pub fn sandbox_id(spec: &Spec) -> Option<&str> {
    spec.annotations()
        .as_ref()
        .and_then(|a| a.get(SANDBOX_ID_ANNOTATION))
        .map(String::as_str)
}

pub fn get_args(spec: &Spec) -> &[String] {
    match spec.process() {
        Some(p) => p.args().as_deref().unwrap_or(&[]),
        None => &[],
    }
}

/// Splits each `KEY=VALUE` entry once on `=`. An entry with no `=` is a
/// hard error rather than an empty value.
pub fn env_pairs(spec: &Spec) -> Result<Vec<(String, String)>> {
    let default = vec![];
    let env = spec
        .process()
        .as_ref()
        .and_then(|p| p.env().as_ref())
        .unwrap_or(&default);

    env.iter()
        .map(|kv| {
            kv.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| {
                    Error::InvalidArgument(format!("invalid environment variable: {kv}"))
                })
        })
        .collect()
}

/// Resolves the directory to preopen as the guest `/`: the spec's root
/// path when set (relative paths are taken under the bundle), otherwise
/// `<bundle>/rootfs`.
pub fn resolve_rootfs(spec: &Spec, bundle: &Path) -> Result<PathBuf> {
    let root = spec
        .root()
        .as_ref()
        .map(|r| r.path().as_path())
        .unwrap_or_else(|| Path::new(""));

    if root.as_os_str().is_empty() {
        if bundle.as_os_str().is_empty() {
            return Err(Error::InvalidArgument(
                "no rootfs or bundle path specified".to_string(),
            ));
        }
        return Ok(bundle.join("rootfs"));
    }

    if root.is_relative() {
        Ok(bundle.join(root))
    } else {
        Ok(root.to_path_buf())
    }
}

/// Path of the network namespace declared in the spec, if any.
pub fn netns_path(spec: &Spec) -> Option<PathBuf> {
    spec.linux()
        .as_ref()
        .and_then(|l| l.namespaces().as_ref())
        .and_then(|nss| {
            nss.iter()
                .find(|ns| ns.typ() == LinuxNamespaceType::Network)
        })
        .and_then(|ns| ns.path().clone())
}

pub fn wasi_dir(path: &Path, opts: &OpenOptions) -> std::io::Result<WasiDir> {
    let f = opts.open(path)?;
    Ok(WasiDir::from_std_file(f))
}

pub fn wasi_file<P: AsRef<Path>>(path: P, opts: &mut OpenOptions) -> std::io::Result<WasiFile> {
    let f = opts.open(path)?;
    Ok(WasiFile::from_cap_std(CapFile::from_std(f)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use oci_spec::runtime::{Linux, LinuxNamespace, Process, Root};

    use super::*;

    fn spec_with_env(env: Vec<String>) -> Spec {
        let mut process = Process::default();
        process.set_env(Some(env));
        let mut spec = Spec::default();
        spec.set_process(Some(process));
        spec
    }

    #[test]
    fn test_env_pairs() {
        let spec = spec_with_env(vec![
            "PATH=/usr/bin".to_string(),
            "EMPTY=".to_string(),
            "EQ=a=b".to_string(),
        ]);
        let pairs = env_pairs(&spec).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("PATH".to_string(), "/usr/bin".to_string()),
                ("EMPTY".to_string(), "".to_string()),
                ("EQ".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn test_env_pairs_rejects_missing_separator() {
        let spec = spec_with_env(vec!["NOSEPARATOR".to_string()]);
        match env_pairs(&spec).unwrap_err() {
            Error::InvalidArgument(msg) => assert!(msg.contains("NOSEPARATOR")),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_resolve_rootfs() {
        let bundle = Path::new("/run/bundle");

        let mut spec = Spec::default();
        spec.set_root(None);
        assert_eq!(
            resolve_rootfs(&spec, bundle).unwrap(),
            PathBuf::from("/run/bundle/rootfs")
        );

        let mut root = Root::default();
        root.set_path(PathBuf::from("rootfs"));
        spec.set_root(Some(root));
        assert_eq!(
            resolve_rootfs(&spec, bundle).unwrap(),
            PathBuf::from("/run/bundle/rootfs")
        );

        let mut root = Root::default();
        root.set_path(PathBuf::from("/srv/rootfs"));
        spec.set_root(Some(root));
        assert_eq!(
            resolve_rootfs(&spec, bundle).unwrap(),
            PathBuf::from("/srv/rootfs")
        );

        spec.set_root(None);
        match resolve_rootfs(&spec, Path::new("")).unwrap_err() {
            Error::InvalidArgument(_) => {}
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_sandbox_id() {
        let mut spec = Spec::default();
        assert_eq!(sandbox_id(&spec), None);

        let annotations = HashMap::from([(
            SANDBOX_ID_ANNOTATION.to_string(),
            "pod-1234".to_string(),
        )]);
        spec.set_annotations(Some(annotations));
        assert_eq!(sandbox_id(&spec), Some("pod-1234"));
    }

    #[test]
    fn test_netns_path() {
        let mut spec = Spec::default();
        spec.set_linux(None);
        assert_eq!(netns_path(&spec), None);

        let mut ns = LinuxNamespace::default();
        ns.set_typ(LinuxNamespaceType::Network);
        ns.set_path(Some(PathBuf::from("/var/run/netns/cni-1234")));
        let mut linux = Linux::default();
        linux.set_namespaces(Some(vec![ns]));
        spec.set_linux(Some(linux));
        assert_eq!(
            netns_path(&spec),
            Some(PathBuf::from("/var/run/netns/cni-1234"))
        );
    }
}
