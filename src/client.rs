/*!
 * Blocking RESP Client
 *
 * One client per endpoint, owning at most one stream. The stream is opened
 * lazily through a `Dialer`, every command is written as a single frame and
 * then blocks until its one reply is decoded. No pipelining.
 */

use crate::config::Endpoint;
use crate::error::{ProbeError, Result};
use crate::protocol::{encode_command, parse_info, read_reply, InfoMap, Reply};
use log::debug;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io::{self, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Opens streams to endpoints
///
/// The TCP implementation is what the binary uses; tests plug in scripted
/// in-memory streams.
pub trait Dialer {
    type Stream: Read + Write;

    fn dial(&self, endpoint: &Endpoint) -> io::Result<Self::Stream>;
}

/// Plain TCP dialer
///
/// Applies the same timeout to connect, read and write. `None` blocks.
#[derive(Debug, Clone, Default)]
pub struct TcpDialer {
    timeout: Option<Duration>,
}

impl TcpDialer {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Dialer for TcpDialer {
    type Stream = TcpStream;

    /// Try each resolved address in turn, returning the first that connects
    fn dial(&self, endpoint: &Endpoint) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in (endpoint.host.as_str(), endpoint.port).to_socket_addrs()? {
            match connect_addr(addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!("connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("{} did not resolve to any address", endpoint.host),
            )
        }))
    }
}

/// Connect a single address with socket2 so the connect itself can time out
fn connect_addr(addr: SocketAddr, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let domain = match addr {
        SocketAddr::V4(_) => Domain::IPV4,
        SocketAddr::V6(_) => Domain::IPV6,
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    let addr = SockAddr::from(addr);

    match timeout {
        Some(t) => socket.connect_timeout(&addr, t)?,
        None => socket.connect(&addr)?,
    }
    socket.set_read_timeout(timeout)?;
    socket.set_write_timeout(timeout)?;
    // Requests are single small frames; don't let Nagle hold them back
    socket.set_nodelay(true)?;

    Ok(socket.into())
}

/// RESP client bound to one endpoint
pub struct RespClient<'d, D: Dialer> {
    dialer: &'d D,
    endpoint: Endpoint,
    conn: Option<BufReader<D::Stream>>,
}

impl<'d, D: Dialer> RespClient<'d, D> {
    /// Create a client; nothing is dialed until the first command or `connect`
    pub fn new(dialer: &'d D, endpoint: Endpoint) -> Self {
        Self {
            dialer,
            endpoint,
            conn: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the stream now instead of on the first command
    pub fn connect(&mut self) -> Result<()> {
        self.conn_mut().map(|_| ())
    }

    fn conn_mut(&mut self) -> Result<&mut BufReader<D::Stream>> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                debug!("connecting to {}", self.endpoint);
                BufReader::new(self.dialer.dial(&self.endpoint)?)
            }
        };
        Ok(self.conn.insert(conn))
    }

    /// Send one command and block for its reply
    ///
    /// The whole request frame is encoded up front and written with a single
    /// `write_all`. On an I/O failure the stream is dropped; a later command
    /// dials again.
    pub fn invoke<A: AsRef<[u8]>>(&mut self, command: &str, args: &[A]) -> Result<Reply> {
        let frame = encode_command(command, args);
        debug!("{} <- {} ({} args)", self.endpoint, command, args.len());

        let res = round_trip(self.conn_mut()?, &frame);

        if let Err(ProbeError::Connection(e)) = &res {
            debug!("{}: dropping connection after I/O error: {}", self.endpoint, e);
            self.conn = None;
        }
        res
    }

    /// SENTINEL <subcommand> [args...]
    pub fn sentinel(&mut self, args: &[&str]) -> Result<Reply> {
        self.invoke("SENTINEL", args)
    }

    /// INFO, folded into its key:value fields
    pub fn info(&mut self) -> Result<InfoMap> {
        match self.invoke::<&str>("INFO", &[])? {
            Reply::Bulk(Some(payload)) => Ok(parse_info(&payload)),
            Reply::Bulk(None) => Ok(InfoMap::new()),
            other => Err(ProbeError::UnknownProtocol(format!(
                "expected bulk string reply to INFO, got {:?}",
                other
            ))),
        }
    }

    /// Release the stream
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!("closed connection to {}", self.endpoint);
        }
    }
}

fn round_trip<S: Read + Write>(conn: &mut BufReader<S>, frame: &[u8]) -> Result<Reply> {
    let stream = conn.get_mut();
    stream.write_all(frame)?;
    stream.flush()?;
    read_reply(conn)
}
