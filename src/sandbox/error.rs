use anyhow::Error as AnyError;
use oci_spec::OciSpecError;
use thiserror::Error;
use ttrpc;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Oci(#[from] OciSpecError),
    #[error("{0}")]
    Stdio(#[from] std::io::Error),
    #[error("{0}")]
    Others(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    NotImplemented(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    FailedPrecondition(String),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Errno(#[from] nix::errno::Errno),
    #[error("{0}")]
    WasiStringArray(#[from] wasi_common::StringArrayError),
    #[error("{0}")]
    Rpc(#[from] ttrpc::Error),
    #[error("{0}")]
    Any(#[from] AnyError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Prefixes the originating RPC name onto the error message, keeping
    /// the status code. Errors that already crossed an RPC hop are left
    /// alone; the far side prefixed them.
    pub(crate) fn with_op(self, op: &str) -> Self {
        match self {
            Error::Rpc(err) => Error::Rpc(err),
            Error::NotFound(msg) => Error::NotFound(format!("{op}: {msg}")),
            Error::NotImplemented(msg) => Error::NotImplemented(format!("{op}: {msg}")),
            Error::InvalidArgument(msg) => Error::InvalidArgument(format!("{op}: {msg}")),
            Error::FailedPrecondition(msg) => Error::FailedPrecondition(format!("{op}: {msg}")),
            Error::Others(msg) => Error::Others(format!("{op}: {msg}")),
            err => Error::Others(format!("{op}: {err}")),
        }
    }
}

impl From<Error> for ttrpc::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Rpc(err) => err,
            Error::NotFound(ref s) => {
                ttrpc::Error::RpcStatus(ttrpc::get_status(ttrpc::Code::NOT_FOUND, s))
            }
            Error::NotImplemented(ref s) => {
                ttrpc::Error::RpcStatus(ttrpc::get_status(ttrpc::Code::UNIMPLEMENTED, s))
            }
            Error::InvalidArgument(ref s) => {
                ttrpc::Error::RpcStatus(ttrpc::get_status(ttrpc::Code::INVALID_ARGUMENT, s))
            }
            Error::FailedPrecondition(ref s) => {
                ttrpc::Error::RpcStatus(ttrpc::get_status(ttrpc::Code::FAILED_PRECONDITION, s))
            }
            _ => ttrpc::Error::RpcStatus(ttrpc::get_status(ttrpc::Code::UNKNOWN, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_to_ttrpc_status() {
        let e = Error::InvalidArgument("bad env".to_string());
        let t: ttrpc::Error = e.into();
        match t {
            ttrpc::Error::RpcStatus(s) => {
                assert_eq!(s.code, ttrpc::Code::INVALID_ARGUMENT);
                assert_eq!(s.message, "bad env");
            }
            _ => panic!("unexpected error"),
        }

        let e = Error::NotFound("some-id".to_string());
        let t: ttrpc::Error = e.into();
        match t {
            ttrpc::Error::RpcStatus(s) => {
                assert_eq!(s.code, ttrpc::Code::NOT_FOUND);
                assert_eq!(s.message, "some-id");
            }
            _ => panic!("unexpected error"),
        }

        let e = Error::NotImplemented("pids is not supported".to_string());
        let t: ttrpc::Error = e.into();
        match t {
            ttrpc::Error::RpcStatus(s) => {
                assert_eq!(s.code, ttrpc::Code::UNIMPLEMENTED);
                assert_eq!(s.message, "pids is not supported");
            }
            _ => panic!("unexpected error"),
        }

        let e = Error::FailedPrecondition("cannot delete a running task".to_string());
        let t: ttrpc::Error = e.into();
        match t {
            ttrpc::Error::RpcStatus(s) => {
                assert_eq!(s.code, ttrpc::Code::FAILED_PRECONDITION);
            }
            _ => panic!("unexpected error"),
        }
    }

    #[test]
    fn test_with_op_keeps_code() {
        let e = Error::NotFound("some-id".to_string()).with_op("delete");
        let t: ttrpc::Error = e.into();
        match t {
            ttrpc::Error::RpcStatus(s) => {
                assert_eq!(s.code, ttrpc::Code::NOT_FOUND);
                assert_eq!(s.message, "delete: some-id");
            }
            _ => panic!("unexpected error"),
        }

        let e = Error::Others("mount rootfs: device busy".to_string()).with_op("create");
        let t: ttrpc::Error = e.into();
        match t {
            ttrpc::Error::RpcStatus(s) => {
                assert_eq!(s.code, ttrpc::Code::UNKNOWN);
                assert_eq!(s.message, "create: mount rootfs: device busy");
            }
            _ => panic!("unexpected error"),
        }
    }
}
