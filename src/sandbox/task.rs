//! The shim-facing task service: one surface over the two service
//! shapes, direct (the shim owns the engine) or proxy (the shim forwards
//! to its sandbox child).

use containerd_shim::api;
use containerd_shim::protos::shim::shim_ttrpc::Task;
use containerd_shim::{TtrpcContext, TtrpcResult};
use log::debug;

use super::error::{Error, Result};
use super::events::{EventSender, RemoteEventSender};
use super::local::Local;
use super::proxy::Proxy;

pub enum Service<E: EventSender = RemoteEventSender> {
    Local(Local<E>),
    Proxy(Proxy),
}

impl<E: EventSender> Service<E> {
    fn task_create(&self, req: api::CreateTaskRequest) -> Result<api::CreateTaskResponse> {
        match self {
            Service::Local(s) => s.task_create(req),
            Service::Proxy(s) => s.task_create(req),
        }
    }

    fn task_start(&self, req: api::StartRequest) -> Result<api::StartResponse> {
        match self {
            Service::Local(s) => s.task_start(req),
            Service::Proxy(s) => s.task_start(req),
        }
    }

    fn task_wait(&self, req: api::WaitRequest) -> Result<api::WaitResponse> {
        match self {
            Service::Local(s) => s.task_wait(req),
            Service::Proxy(s) => s.task_wait(req),
        }
    }

    fn task_kill(&self, req: api::KillRequest) -> Result<api::Empty> {
        match self {
            Service::Local(s) => s.task_kill(req),
            Service::Proxy(s) => s.task_kill(req),
        }
    }

    fn task_delete(&self, req: api::DeleteRequest) -> Result<api::DeleteResponse> {
        match self {
            Service::Local(s) => s.task_delete(req),
            Service::Proxy(s) => s.task_delete(req),
        }
    }

    fn task_state(&self, req: api::StateRequest) -> Result<api::StateResponse> {
        match self {
            Service::Local(s) => s.task_state(req),
            Service::Proxy(s) => s.task_state(req),
        }
    }

    fn task_connect(&self, req: api::ConnectRequest) -> Result<api::ConnectResponse> {
        match self {
            Service::Local(s) => s.task_connect(req),
            Service::Proxy(s) => s.task_connect(req),
        }
    }

    fn task_shutdown(&self, req: api::ShutdownRequest) -> Result<api::Empty> {
        match self {
            Service::Local(s) => s.task_shutdown(req),
            Service::Proxy(s) => s.task_shutdown(req),
        }
    }
}

fn not_implemented(op: &str) -> ttrpc::Error {
    Error::NotImplemented(format!("{op} is not supported")).into()
}

impl<E: EventSender> Task for Service<E> {
    fn create(
        &self,
        _ctx: &TtrpcContext,
        req: api::CreateTaskRequest,
    ) -> TtrpcResult<api::CreateTaskResponse> {
        debug!("create: {:?}", req);
        Ok(self.task_create(req).map_err(|err| err.with_op("create"))?)
    }

    fn start(&self, _ctx: &TtrpcContext, req: api::StartRequest) -> TtrpcResult<api::StartResponse> {
        debug!("start: {:?}", req);
        Ok(self.task_start(req).map_err(|err| err.with_op("start"))?)
    }

    fn wait(&self, _ctx: &TtrpcContext, req: api::WaitRequest) -> TtrpcResult<api::WaitResponse> {
        debug!("wait: {:?}", req);
        Ok(self.task_wait(req).map_err(|err| err.with_op("wait"))?)
    }

    fn kill(&self, _ctx: &TtrpcContext, req: api::KillRequest) -> TtrpcResult<api::Empty> {
        debug!("kill: {:?}", req);
        Ok(self.task_kill(req).map_err(|err| err.with_op("kill"))?)
    }

    fn delete(
        &self,
        _ctx: &TtrpcContext,
        req: api::DeleteRequest,
    ) -> TtrpcResult<api::DeleteResponse> {
        debug!("delete: {:?}", req);
        Ok(self.task_delete(req).map_err(|err| err.with_op("delete"))?)
    }

    fn state(&self, _ctx: &TtrpcContext, req: api::StateRequest) -> TtrpcResult<api::StateResponse> {
        debug!("state: {:?}", req);
        Ok(self.task_state(req).map_err(|err| err.with_op("state"))?)
    }

    fn connect(
        &self,
        _ctx: &TtrpcContext,
        req: api::ConnectRequest,
    ) -> TtrpcResult<api::ConnectResponse> {
        debug!("connect: {:?}", req);
        Ok(self
            .task_connect(req)
            .map_err(|err| err.with_op("connect"))?)
    }

    fn shutdown(&self, _ctx: &TtrpcContext, req: api::ShutdownRequest) -> TtrpcResult<api::Empty> {
        debug!("shutdown");
        Ok(self
            .task_shutdown(req)
            .map_err(|err| err.with_op("shutdown"))?)
    }

    fn pids(&self, _ctx: &TtrpcContext, _req: api::PidsRequest) -> TtrpcResult<api::PidsResponse> {
        Err(not_implemented("pids"))
    }

    fn pause(&self, _ctx: &TtrpcContext, _req: api::PauseRequest) -> TtrpcResult<api::Empty> {
        Err(not_implemented("pause"))
    }

    fn resume(&self, _ctx: &TtrpcContext, _req: api::ResumeRequest) -> TtrpcResult<api::Empty> {
        Err(not_implemented("resume"))
    }

    fn checkpoint(
        &self,
        _ctx: &TtrpcContext,
        _req: api::CheckpointTaskRequest,
    ) -> TtrpcResult<api::Empty> {
        Err(not_implemented("checkpoint"))
    }

    fn exec(&self, _ctx: &TtrpcContext, _req: api::ExecProcessRequest) -> TtrpcResult<api::Empty> {
        Err(not_implemented("exec"))
    }

    fn resize_pty(
        &self,
        _ctx: &TtrpcContext,
        _req: api::ResizePtyRequest,
    ) -> TtrpcResult<api::Empty> {
        Err(not_implemented("resize_pty"))
    }

    fn close_io(&self, _ctx: &TtrpcContext, _req: api::CloseIORequest) -> TtrpcResult<api::Empty> {
        Err(not_implemented("close_io"))
    }

    fn update(&self, _ctx: &TtrpcContext, _req: api::UpdateTaskRequest) -> TtrpcResult<api::Empty> {
        Err(not_implemented("update"))
    }

    fn stats(&self, _ctx: &TtrpcContext, _req: api::StatsRequest) -> TtrpcResult<api::StatsResponse> {
        Err(not_implemented("stats"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::mpsc::{channel, Receiver};
    use std::sync::Arc;

    use containerd_shim::ExitSignal;
    use ttrpc::MessageHeader;

    use super::*;
    use crate::sandbox::engine::EngineHost;

    fn test_ctx() -> (TtrpcContext, Receiver<(MessageHeader, Vec<u8>)>) {
        let (res_tx, rx) = channel();
        let ctx = TtrpcContext {
            fd: -1,
            mh: MessageHeader::default(),
            res_tx,
            metadata: HashMap::new(),
            timeout_nano: 0,
        };
        (ctx, rx)
    }

    fn code_of<T>(res: TtrpcResult<T>) -> ttrpc::Code {
        match res.unwrap_err() {
            ttrpc::Error::RpcStatus(status) => status.code,
            e => panic!("unexpected error: {e}"),
        }
    }

    fn assert_all_unimplemented<E: EventSender>(service: &Service<E>) {
        let (ctx, _rx) = test_ctx();
        let unimplemented = ttrpc::Code::UNIMPLEMENTED;

        assert_eq!(code_of(service.pids(&ctx, Default::default())), unimplemented);
        assert_eq!(code_of(service.pause(&ctx, Default::default())), unimplemented);
        assert_eq!(code_of(service.resume(&ctx, Default::default())), unimplemented);
        assert_eq!(
            code_of(service.checkpoint(&ctx, Default::default())),
            unimplemented
        );
        assert_eq!(code_of(service.exec(&ctx, Default::default())), unimplemented);
        assert_eq!(
            code_of(service.resize_pty(&ctx, Default::default())),
            unimplemented
        );
        assert_eq!(
            code_of(service.close_io(&ctx, Default::default())),
            unimplemented
        );
        assert_eq!(code_of(service.update(&ctx, Default::default())), unimplemented);
        assert_eq!(code_of(service.stats(&ctx, Default::default())), unimplemented);
    }

    #[test]
    fn test_unsupported_rpcs_local() {
        let local = Local::new(
            EngineHost::new().unwrap(),
            (),
            Arc::new(ExitSignal::default()),
        );
        assert_all_unimplemented(&Service::Local(local));
    }

    #[test]
    fn test_unsupported_rpcs_proxy() {
        let proxy = Proxy::new(
            PathBuf::from("/does/not/exist"),
            "test-namespace",
            Arc::new(ExitSignal::default()),
        );
        assert_all_unimplemented::<()>(&Service::Proxy(proxy));
    }
}
