//! Scripted in-memory peer for unit tests.
//!
//! Every frame written is recorded. Connects and writes can be made to fail
//! on demand, and each read returns one canned reply frame.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use super::Connector;
use crate::error::{PresenceError, Result};
use crate::protocol::{build_frame, Header, Opcode, HEADER_SIZE};

pub(crate) const READY_REPLY: &[u8] = br#"{"cmd":"DISPATCH","evt":"READY","data":{"v":1}}"#;

#[derive(Debug)]
pub(crate) struct PeerScript {
    /// Every connect call, successful or not.
    pub connect_attempts: usize,
    /// Successful connects.
    pub connects: usize,
    /// Refuse this many upcoming connects.
    pub refuse_connects: usize,
    /// Fail this many upcoming writes; a stream that failed once stays broken.
    pub break_writes: usize,
    /// Frames received, in order.
    pub frames: Vec<(i32, Vec<u8>)>,
    pub shutdowns: usize,
    /// Reply returned by every read.
    pub reply: (i32, Vec<u8>),
    /// Reads report end-of-stream instead of replying.
    pub silent: bool,
}

impl Default for PeerScript {
    fn default() -> Self {
        Self {
            connect_attempts: 0,
            connects: 0,
            refuse_connects: 0,
            break_writes: 0,
            frames: Vec::new(),
            shutdowns: 0,
            reply: (Opcode::Frame.as_i32(), READY_REPLY.to_vec()),
            silent: false,
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedConnector {
    peer: Arc<Mutex<PeerScript>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self) -> MutexGuard<'_, PeerScript> {
        self.peer.lock().unwrap()
    }

    pub fn opcodes(&self) -> Vec<i32> {
        self.script().frames.iter().map(|(op, _)| *op).collect()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.script()
            .frames
            .iter()
            .map(|(_, p)| String::from_utf8_lossy(p).into_owned())
            .collect()
    }
}

impl Connector for ScriptedConnector {
    type Stream = ScriptedStream;

    fn connect(&self) -> impl Future<Output = Result<Self::Stream>> + Send {
        let peer = Arc::clone(&self.peer);
        async move {
            let mut script = peer.lock().unwrap();
            script.connect_attempts += 1;
            if script.refuse_connects > 0 {
                script.refuse_connects -= 1;
                return Err(PresenceError::Connect {
                    path: PathBuf::from("/scripted"),
                    source: io::Error::from(io::ErrorKind::ConnectionRefused),
                });
            }
            script.connects += 1;
            drop(script);
            Ok(ScriptedStream {
                peer,
                broken: false,
            })
        }
    }
}

pub(crate) struct ScriptedStream {
    peer: Arc<Mutex<PeerScript>>,
    broken: bool,
}

impl AsyncWrite for ScriptedStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let peer = Arc::clone(&self.peer);
        let mut script = peer.lock().unwrap();
        if self.broken {
            return Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)));
        }
        if script.break_writes > 0 {
            script.break_writes -= 1;
            self.broken = true;
            return Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)));
        }
        let header = Header::decode(buf).expect("frame written in one piece");
        script.frames.push((header.opcode, buf[HEADER_SIZE..].to_vec()));
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.peer.lock().unwrap().shutdowns += 1;
        Poll::Ready(Ok(()))
    }
}

impl AsyncRead for ScriptedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let script = self.peer.lock().unwrap();
        if !script.silent {
            let (opcode, payload) = &script.reply;
            let header = Header::new(*opcode, payload.len() as i32);
            buf.put_slice(&build_frame(&header, payload));
        }
        Poll::Ready(Ok(()))
    }
}
