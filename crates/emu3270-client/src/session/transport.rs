//! Line transports to the emulator.
//!
//! A [`Transport`] moves command lines to the emulator and response lines
//! back. Two concrete transports are provided: a TCP connection to the
//! emulator's script port, and the stdin/stdout pipes of a child process.

use std::ffi::OsStr;
use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

/// A bidirectional, line-oriented channel to the emulator.
#[async_trait]
pub trait Transport: Send {
    /// Write one command line; the newline is added here.
    async fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Read one response line. Returns `None` at end of stream.
    async fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Close the channel.
    async fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A transport over any async reader/writer pair.
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Screen text arrives in the emulator's locale charset unless it runs
    /// with `-utf8`; bytes that are not UTF-8 become U+FFFD.
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut line).await?;
        if bytes_read == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    async fn close(&mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }
}

/// Transport to an emulator started with `-scriptport`.
pub type TcpTransport = LineTransport<OwnedReadHalf, OwnedWriteHalf>;

/// Connect to an emulator script port.
pub async fn connect_tcp(addr: impl ToSocketAddrs) -> io::Result<TcpTransport> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    debug!("Connected to script port {:?}", stream.peer_addr());
    let (reader, writer) = stream.into_split();
    Ok(LineTransport::new(reader, writer))
}

/// Transport to an emulator child process reading commands on stdin.
pub struct ProcessTransport {
    child: Child,
    lines: LineTransport<ChildStdout, ChildStdin>,
}

impl ProcessTransport {
    /// Start `program` with `args`. The child is killed if the transport is
    /// dropped without being closed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<I, S>(program: &str, args: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("emulator stdin was not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("emulator stdout was not captured"))?;

        info!("Started emulator '{}' (pid {:?})", program, child.id());

        Ok(Self {
            child,
            lines: LineTransport::new(stdout, stdin),
        })
    }
}

#[async_trait]
impl Transport for ProcessTransport {
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.write_line(line).await
    }

    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.read_line().await
    }

    /// Close stdin, which makes the emulator exit, then reap it.
    async fn close(&mut self) -> io::Result<()> {
        self.lines.close().await?;
        let status = self.child.wait().await?;
        debug!("Emulator exited with {}", status);
        Ok(())
    }
}
