//! Background frame reading.
//!
//! Spawns a thread that owns a `FrameSource` (file parsing, decoding) and hands frames to the
//! classifier loop over a bounded channel, preserving order. The classifier itself stays
//! single-threaded.
//!
//! Each `FrameReader` spawns exactly one thread, which is shut down and joined on drop.
use crossbeam_channel as xch;
use pullup_traits::FrameSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{FrameError, QualifierError, Result};

type SourceError = Box<dyn std::error::Error + Send + Sync>;

enum ReaderMsg<F> {
    Frame(F),
    Failed(SourceError),
    End,
}

/// Outcome of a bounded wait on the reader.
#[derive(Debug, PartialEq)]
pub enum Received<F> {
    Frame(F),
    /// Nothing arrived within the timeout; the stream is still open.
    Idle,
    End,
}

/// Keep adapter errors typed across the thread boundary where we know them.
fn source_report(err: SourceError) -> eyre::Report {
    match err.downcast::<FrameError>() {
        Ok(fe) => eyre::Report::new(*fe),
        Err(err) => match err.downcast::<std::io::Error>() {
            Ok(io) => eyre::Report::new(*io),
            Err(err) => eyre::Report::new(QualifierError::Source(err.to_string())),
        },
    }
}

pub struct FrameReader<F> {
    rx: Option<xch::Receiver<ReaderMsg<F>>>,
    shutdown: Arc<AtomicBool>,
    finished: bool,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl<F: Send + 'static> FrameReader<F> {
    /// `capacity` bounds how far the reader may run ahead of the consumer (minimum 1).
    pub fn spawn<S>(mut source: S, capacity: usize) -> Self
    where
        S: FrameSource<Frame = F> + Send + 'static,
    {
        let (tx, rx) = xch::bounded(capacity.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("frame reader received shutdown signal");
                    break;
                }
                let msg = match source.next_frame() {
                    Ok(Some(frame)) => ReaderMsg::Frame(frame),
                    Ok(None) => {
                        let _ = tx.send(ReaderMsg::End);
                        break;
                    }
                    Err(e) => {
                        let _ = tx.send(ReaderMsg::Failed(e));
                        break;
                    }
                };
                if tx.send(msg).is_err() {
                    tracing::debug!("frame consumer disconnected, exiting reader");
                    break;
                }
            }
            tracing::trace!("frame reader thread exiting");
        });

        Self {
            rx: Some(rx),
            shutdown,
            finished: false,
            join_handle: Some(join_handle),
        }
    }

    /// Block until the next frame. `Ok(None)` once the source is exhausted or shut down.
    pub fn recv(&mut self) -> Result<Option<F>> {
        if self.finished {
            return Ok(None);
        }
        let Some(rx) = self.rx.as_ref() else {
            return Ok(None);
        };
        let msg = rx.recv().map_err(|_| ());
        match self.settle(msg)? {
            Received::Frame(f) => Ok(Some(f)),
            Received::Idle | Received::End => Ok(None),
        }
    }

    /// Wait at most `timeout` for the next frame.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Received<F>> {
        if self.finished {
            return Ok(Received::End);
        }
        let Some(rx) = self.rx.as_ref() else {
            return Ok(Received::End);
        };
        match rx.recv_timeout(timeout) {
            Err(xch::RecvTimeoutError::Timeout) => Ok(Received::Idle),
            Err(xch::RecvTimeoutError::Disconnected) => self.settle(Err(())),
            Ok(msg) => self.settle(Ok(msg)),
        }
    }

    fn settle(&mut self, msg: core::result::Result<ReaderMsg<F>, ()>) -> Result<Received<F>> {
        match msg {
            Ok(ReaderMsg::Frame(f)) => Ok(Received::Frame(f)),
            Ok(ReaderMsg::End) => {
                self.finished = true;
                Ok(Received::End)
            }
            Ok(ReaderMsg::Failed(err)) => {
                self.finished = true;
                Err(source_report(err))
            }
            Err(()) if self.shutdown.load(Ordering::Relaxed) => {
                self.finished = true;
                Ok(Received::End)
            }
            Err(()) => {
                self.finished = true;
                Err(eyre::Report::new(QualifierError::Disconnected))
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ask the reader thread to stop after its current frame.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Shared handle to the shutdown flag, e.g. for a signal handler.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Stop the reader without joining it.
    ///
    /// For sources that may block indefinitely (stdin, pipes); the thread exits after its
    /// current read returns.
    pub fn detach(mut self) {
        self.shutdown();
        drop(self.rx.take());
        drop(self.join_handle.take());
        tracing::debug!("frame reader detached");
    }
}

impl<F> Drop for FrameReader<F> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Unblocks a reader parked on a full channel.
        drop(self.rx.take());
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("frame reader joined"),
                Err(e) => tracing::warn!(?e, "frame reader panicked during shutdown"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullup_traits::IterSource;

    #[test]
    fn forwards_in_order_then_ends() {
        let mut r = FrameReader::spawn(IterSource::new(vec![1u32, 2, 3].into_iter()), 1);
        let mut got = Vec::new();
        while let Some(v) = r.recv().unwrap() {
            got.push(v);
        }
        assert_eq!(got, vec![1, 2, 3]);
        assert!(r.recv().unwrap().is_none());
    }

    struct Failing;

    impl FrameSource for Failing {
        type Frame = u32;
        fn next_frame(
            &mut self,
        ) -> core::result::Result<Option<u32>, Box<dyn std::error::Error + Send + Sync>> {
            Err("disk on fire".into())
        }
    }

    #[test]
    fn source_error_is_surfaced() {
        let mut r = FrameReader::spawn(Failing, 4);
        let err = r.recv().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QualifierError>(),
            Some(QualifierError::Source(m)) if m.contains("disk on fire")
        ));
    }

    struct BadFrame;

    impl FrameSource for BadFrame {
        type Frame = u32;
        fn next_frame(
            &mut self,
        ) -> core::result::Result<Option<u32>, Box<dyn std::error::Error + Send + Sync>> {
            Err(Box::new(FrameError::Malformed("line 3".into())))
        }
    }

    #[test]
    fn frame_errors_stay_typed() {
        let mut r = FrameReader::spawn(BadFrame, 1);
        match r.recv_timeout(Duration::from_secs(5)) {
            Err(e) => assert!(matches!(
                e.downcast_ref::<FrameError>(),
                Some(FrameError::Malformed(_))
            )),
            Ok(other) => panic!("expected error, got {other:?}"),
        }
        assert!(r.is_finished());
        assert_eq!(r.recv_timeout(Duration::from_millis(1)).unwrap(), Received::End);
    }

    struct Stalled(std::sync::mpsc::Receiver<()>);

    impl FrameSource for Stalled {
        type Frame = u32;
        fn next_frame(
            &mut self,
        ) -> core::result::Result<Option<u32>, Box<dyn std::error::Error + Send + Sync>> {
            // Parks until the test releases it.
            let _ = self.0.recv();
            Ok(None)
        }
    }

    #[test]
    fn detach_returns_while_source_is_blocked() {
        let (release, parked) = std::sync::mpsc::channel();
        let mut r = FrameReader::spawn(Stalled(parked), 1);
        assert_eq!(r.recv_timeout(Duration::from_millis(20)).unwrap(), Received::Idle);
        r.detach();
        release.send(()).unwrap();
    }

    #[test]
    fn drop_while_producer_blocked_does_not_hang() {
        let r = FrameReader::spawn(IterSource::new(0u32..), 1);
        r.shutdown();
        drop(r);
    }
}
