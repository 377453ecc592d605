use async_trait::async_trait;
use std::{io, sync::Arc};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};
use tracing::debug;

/// Opens the byte stream a whois query runs over.
///
/// Timeouts are applied by the caller; implementations only connect.
/// Dropping the returned stream must close the connection.
#[async_trait]
pub trait Dialer: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn dial(&self, address: &str) -> io::Result<Self::Stream>;
}

/// Plain TCP, resolving `host:port` through the system resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self, address: &str) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(address).await?;

        if let Err(e) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {}", e);
        }

        Ok(stream)
    }
}

#[async_trait]
impl<D: Dialer + ?Sized> Dialer for Arc<D> {
    type Stream = D::Stream;

    async fn dial(&self, address: &str) -> io::Result<D::Stream> {
        (**self).dial(address).await
    }
}
