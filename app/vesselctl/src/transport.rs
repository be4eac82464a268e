use std::path::{Path, PathBuf};

use eyre::Context;
use futures::{future::LocalBoxFuture, stream::StreamExt};
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tonic::{
    transport::{Channel, Endpoint, Uri},
    Status,
};
use tower::service_fn;
use tracing::debug;
use vessel_protocol::{rpc, DaemonClient};

use crate::dispatch::{Method, ReplyStream, Transport};

/// gRPC connection to vesseld over its Unix socket.
///
/// The channel connects lazily, so an unreachable daemon shows up as an
/// `Unavailable` status from the first call rather than as a setup error.
pub struct DaemonTransport {
    client: DaemonClient<Channel>,
}

impl DaemonTransport {
    pub fn connect_lazy(socket: &Path) -> eyre::Result<Self> {
        debug!(socket = %socket.display(), "using daemon socket");

        let socket: PathBuf = socket.to_path_buf();
        // The authority is ignored; every connection goes to the socket.
        let channel = Endpoint::try_from("http://[::]:50051")
            .context("build daemon endpoint")?
            .connect_with_connector_lazy(service_fn(move |_: Uri| {
                let socket = socket.clone();
                async move {
                    let stream = UnixStream::connect(socket).await?;
                    Ok::<_, std::io::Error>(TokioIo::new(stream))
                }
            }));

        Ok(Self {
            client: DaemonClient::new(channel),
        })
    }
}

impl Transport for DaemonTransport {
    fn invoke<M: Method>(
        &mut self,
        request: M::Request,
    ) -> LocalBoxFuture<'_, Result<ReplyStream<M::Reply>, Status>> {
        M::call(&mut self.client, request)
    }
}

macro_rules! daemon_method {
    ($(#[$doc:meta])* $method:ident, $name:literal, $call:ident, $request:ty, $reply:ty) => {
        $(#[$doc])*
        pub struct $method;

        impl Method for $method {
            type Request = $request;
            type Reply = $reply;

            const NAME: &'static str = $name;

            fn instance_names(request: &Self::Request) -> &[String] {
                &request.instance_names
            }

            fn call(
                client: &mut DaemonClient<Channel>,
                request: Self::Request,
            ) -> LocalBoxFuture<'_, Result<ReplyStream<Self::Reply>, Status>> {
                Box::pin(async move {
                    let response = client.$call(request).await?;
                    Ok(response.into_inner().boxed_local())
                })
            }
        }
    };
}

daemon_method!(Start, "start", start, rpc::StartRequest, rpc::StartReply);
daemon_method!(Stop, "stop", stop, rpc::StopRequest, rpc::StopReply);
daemon_method!(Suspend, "suspend", suspend, rpc::SuspendRequest, rpc::SuspendReply);
daemon_method!(Restart, "restart", restart, rpc::RestartRequest, rpc::RestartReply);
daemon_method!(
    /// Deleted instances stay recoverable unless the request asks for a purge.
    Delete,
    "delete",
    delete,
    rpc::DeleteRequest,
    rpc::DeleteReply
);
daemon_method!(Recover, "recover", recover, rpc::RecoverRequest, rpc::RecoverReply);
