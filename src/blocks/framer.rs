use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Preamble;
use crate::Rate;
use crate::plcp::MAX_PSDU_SIZE;
use crate::plcp::Ppdu;
use crate::runtime::Error;
use crate::runtime::Kernel;
use crate::runtime::Result;
use crate::runtime::StreamIo;
use crate::runtime::Tag;
use crate::runtime::WorkIo;
use crate::runtime::config::config;

#[derive(Debug, Default)]
struct FrameQueue {
    frames: VecDeque<Ppdu>,
    offset: usize,
    finished: bool,
}

/// Submit PSDUs to a [`Framer`] from any thread.
#[derive(Clone, Debug)]
pub struct FramerHandle {
    queue: Arc<Mutex<FrameQueue>>,
    rate: Rate,
    preamble: Preamble,
    max_frames: usize,
}

impl FramerHandle {
    // helper to deal with poisoned Mutex
    fn lock(&self) -> MutexGuard<'_, FrameQueue> {
        self.queue.lock().unwrap_or_else(|poison| {
            warn!("Framer: frame queue poisoned, continuing with its current content");
            self.queue.clear_poison();
            poison.into_inner()
        })
    }

    /// Queue a PSDU for transmission.
    ///
    /// The PPDU is built right away. Frames that are too large or that do not
    /// fit into the queue are dropped with a warning.
    pub fn submit(&self, psdu: &[u8]) {
        if psdu.len() > MAX_PSDU_SIZE {
            warn!(
                "Framer: TX frame too large ({}, max {}). Dropping.",
                psdu.len(),
                MAX_PSDU_SIZE
            );
            return;
        }

        let ppdu = Ppdu::new(self.rate, self.preamble, psdu);

        let mut q = self.lock();
        if q.frames.len() >= self.max_frames {
            warn!(
                "Framer: max number of frames already in TX queue ({}). Dropping.",
                self.max_frames
            );
        } else {
            q.frames.push_back(ppdu);
        }
    }

    /// Signal that no more frames will be submitted.
    ///
    /// The block finishes once the queued frames are sent.
    pub fn finish(&self) {
        self.lock().finished = true;
    }

    /// Number of frames waiting or in transmission
    pub fn queued(&self) -> usize {
        self.lock().frames.len()
    }
}

/// PLCP framer
///
/// Turns submitted PSDUs into PPDUs (preamble, PLCP header, PSDU) and streams
/// them byte by byte. The first byte of each PPDU carries a
/// [`Tag::FrameStart`] with the PPDU length and, at their final positions, one
/// [`Tag::RateChange`] for every modulation switch inside the PPDU.
///
/// # Outputs
///
/// `out`: PPDU bytes
///
/// # Message Inputs
///
/// `submit`: PSDU bytes, through [`Framer::submit`] or a [`FramerHandle`]
///
/// # Usage
/// ```
/// use ieee80211b::blocks::Framer;
/// use ieee80211b::{Preamble, Rate};
///
/// let framer = Framer::new(Rate::Cck11, Preamble::Short).unwrap();
/// let handle = framer.handle();
/// std::thread::spawn(move || handle.submit(b"hello"));
///
/// assert!(Framer::new(Rate::Dbpsk1, Preamble::Short).is_err());
/// ```
pub struct Framer {
    handle: FramerHandle,
}

impl Framer {
    /// Create framer for PSDUs sent at `rate`.
    ///
    /// The short preamble is not allowed at 1 Mbps.
    pub fn new(rate: Rate, preamble: Preamble) -> Result<Self, Error> {
        if preamble == Preamble::Short && rate == Rate::Dbpsk1 {
            return Err(Error::ShortPreambleAt1Mbps(rate));
        }

        Ok(Framer {
            handle: FramerHandle {
                queue: Arc::new(Mutex::new(FrameQueue::default())),
                rate,
                preamble,
                max_frames: config().frame_queue_size,
            },
        })
    }

    /// Handle to submit frames while the block is running
    pub fn handle(&self) -> FramerHandle {
        self.handle.clone()
    }

    /// Queue a PSDU for transmission.
    pub fn submit(&self, psdu: &[u8]) {
        self.handle.submit(psdu);
    }

    /// PSDU rate
    pub fn rate(&self) -> Rate {
        self.handle.rate
    }

    /// Preamble type
    pub fn preamble(&self) -> Preamble {
        self.handle.preamble
    }
}

impl Kernel for Framer {
    type Input = ();
    type Output = u8;

    fn work(&mut self, io: &mut WorkIo, sio: &mut StreamIo<'_, (), u8>) -> Result<()> {
        let mut guard = self.handle.lock();
        let q = &mut *guard;

        let out = sio.output();
        let mut o = 0;
        let mut tags = Vec::new();

        while o < out.len() {
            let Some(ppdu) = q.frames.front() else {
                break;
            };

            if q.offset == 0 {
                debug!(
                    "Framer: start PPDU, {} bytes, PSDU at {}",
                    ppdu.len(),
                    self.handle.rate
                );
                tags.push((o, Tag::FrameStart(ppdu.len())));
                for (rel, rate) in ppdu.rate_changes() {
                    tags.push((o + rel, Tag::RateChange(*rate)));
                }
            }

            let n = std::cmp::min(out.len() - o, ppdu.len() - q.offset);
            out[o..o + n].copy_from_slice(&ppdu.bytes()[q.offset..q.offset + n]);
            o += n;
            q.offset += n;

            if q.offset == ppdu.len() {
                q.frames.pop_front();
                q.offset = 0;
            }
        }

        if q.finished && q.frames.is_empty() {
            io.finished = true;
        }
        drop(guard);

        sio.produce(o);
        for (index, tag) in tags {
            sio.add_tag(index, tag);
        }

        Ok(())
    }
}
