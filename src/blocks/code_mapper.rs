use num_complex::Complex32;

use crate::QPhase;
use crate::Rate;
use crate::runtime::Kernel;
use crate::runtime::Result;
use crate::runtime::StreamIo;
use crate::runtime::Tag;
use crate::runtime::WorkIo;

/// 11 chip Barker sequence
pub const BARKER: [i8; 11] = [1, -1, 1, 1, -1, 1, 1, 1, -1, -1, -1];

const MAX_CHIPS_PER_SYMBOL: usize = 11;

/// Chips of at most one symbol, waiting for output space.
#[derive(Debug, Default)]
struct ChipQueue {
    chips: [QPhase; MAX_CHIPS_PER_SYMBOL],
    head: usize,
    len: usize,
}

impl ChipQueue {
    fn push(&mut self, p: QPhase) {
        debug_assert!(self.len < MAX_CHIPS_PER_SYMBOL, "chip queue overflow");
        self.chips[(self.head + self.len) % MAX_CHIPS_PER_SYMBOL] = p;
        self.len += 1;
    }

    fn pop(&mut self) -> Option<QPhase> {
        if self.len == 0 {
            return None;
        }
        let p = self.chips[self.head];
        self.head = (self.head + 1) % MAX_CHIPS_PER_SYMBOL;
        self.len -= 1;
        Some(p)
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Differential encoding and spreading of the DSSS/CCK PHY.
///
/// Each byte is split into symbols (LSB first) according to the active rate.
/// The symbol rotates the accumulated phase and is spread into chips: Barker
/// at 1 and 2 Mbps, CCK at 5.5 and 11 Mbps. Every chip becomes one unit
/// magnitude sample.
///
/// A [`Tag::RateChange`] switches the rate before the tagged byte and restarts
/// the symbol count; the accumulated phase carries over.
///
/// # Inputs
///
/// `in`: Bytes (usually scrambled PPDUs)
///
/// # Outputs
///
/// `out`: Chips as `Complex32`, 11 per symbol (Barker) or 8 per symbol (CCK)
pub struct CodeMapper {
    rate: Rate,
    symbol: usize,
    phase: QPhase,
    chips: ChipQueue,
    byte: u8,
    shift: usize,
}

impl CodeMapper {
    /// Create code mapper, starting at 1 Mbps with phase 0°.
    pub fn new() -> Self {
        CodeMapper {
            rate: Rate::Dbpsk1,
            symbol: 0,
            phase: QPhase::ZERO,
            chips: ChipQueue::default(),
            byte: 0,
            shift: 8,
        }
    }

    /// Active rate
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Symbols processed since the last rate change
    pub fn symbol_index(&self) -> usize {
        self.symbol
    }

    /// Accumulated phase
    pub fn phase(&self) -> QPhase {
        self.phase
    }

    /// Chips generated but not yet emitted
    pub fn pending_chips(&self) -> usize {
        self.chips.len() + self.remaining_symbols() * self.rate.cps()
    }

    fn remaining_symbols(&self) -> usize {
        (8 - self.shift) / self.rate.bps()
    }

    fn set_rate(&mut self, rate: Rate) {
        debug!("CodeMapper: rate change {} -> {}", self.rate, rate);
        self.rate = rate;
        self.symbol = 0;
    }

    fn dqpsk_phase(bits: u8, gray_coded: bool) -> QPhase {
        if !gray_coded || bits <= 1 {
            QPhase::new(bits)
        } else {
            QPhase::new(5 - bits)
        }
    }

    fn barker_spread(&mut self) {
        for s in BARKER {
            if s == -1 {
                self.chips.push(self.phase.rotate_half());
            } else {
                self.chips.push(self.phase);
            }
        }
    }

    fn cck_spread(&mut self, p2: QPhase, p3: QPhase, p4: QPhase) {
        let p1 = self.phase;
        self.chips.push(p1 + p2 + p3 + p4);
        self.chips.push(p1 + p3 + p4);
        self.chips.push(p1 + p2 + p4);
        self.chips.push((p1 + p4).rotate_half());
        self.chips.push(p1 + p2 + p3);
        self.chips.push(p1 + p3);
        self.chips.push((p1 + p2).rotate_half());
        self.chips.push(p1);
    }

    fn dbpsk_1_symbol(&mut self, bits: u8) {
        self.phase = self.phase + QPhase::new(2 * bits);
        self.barker_spread();
    }

    fn dqpsk_2_symbol(&mut self, bits: u8) {
        self.phase = self.phase + Self::dqpsk_phase(bits, true);
        self.barker_spread();
    }

    fn cck_5_5_symbol(&mut self, bits: u8) {
        let mut p = Self::dqpsk_phase(bits & 0x03, true);
        if self.symbol % 2 == 1 {
            p = p.rotate_half();
        }
        self.phase = self.phase + p;

        let p2 = if bits & 0x04 != 0 {
            QPhase::THREE_QUARTERS
        } else {
            QPhase::QUARTER
        };
        let p4 = if bits & 0x08 != 0 {
            QPhase::HALF
        } else {
            QPhase::ZERO
        };
        self.cck_spread(p2, QPhase::ZERO, p4);
    }

    fn cck_11_symbol(&mut self, bits: u8) {
        self.phase = self.phase + Self::dqpsk_phase(bits & 0x03, true);
        let p2 = Self::dqpsk_phase((bits >> 2) & 0x03, false);
        let p3 = Self::dqpsk_phase((bits >> 4) & 0x03, false);
        let p4 = Self::dqpsk_phase(bits >> 6, false);
        self.cck_spread(p2, p3, p4);
    }

    /// Expand the next symbol of the current byte into the chip queue.
    fn next_symbol(&mut self) {
        let bps = self.rate.bps();
        let mask = ((1u16 << bps) - 1) as u8;
        let bits = (self.byte >> self.shift) & mask;
        self.shift += bps;

        match self.rate {
            Rate::Dbpsk1 => self.dbpsk_1_symbol(bits),
            Rate::Dqpsk2 => self.dqpsk_2_symbol(bits),
            Rate::Cck5_5 => self.cck_5_5_symbol(bits),
            Rate::Cck11 => self.cck_11_symbol(bits),
        }
        self.symbol += 1;
    }
}

impl Default for CodeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for CodeMapper {
    type Input = u8;
    type Output = Complex32;

    /// Bytes needed at the active rate, after the queued chips.
    ///
    /// Too low when the window switches to a rate with fewer chips per byte.
    fn forecast(&self, n_output: usize) -> usize {
        n_output
            .saturating_sub(self.pending_chips())
            .div_ceil(self.rate.chips_per_byte())
    }

    fn work(&mut self, _io: &mut WorkIo, sio: &mut StreamIo<'_, u8, Complex32>) -> Result<()> {
        let input = sio.input();
        let tags = sio.tags();
        let out = sio.output();

        let mut tag_idx = 0;
        let mut i = 0;
        let mut o = 0;

        loop {
            while o < out.len() {
                match self.chips.pop() {
                    Some(c) => {
                        out[o] = c.to_sample();
                        o += 1;
                    }
                    None => break,
                }
            }
            if o == out.len() {
                break;
            }

            if self.shift < 8 {
                self.next_symbol();
                continue;
            }

            if i == input.len() {
                break;
            }

            while tag_idx < tags.len() && tags[tag_idx].index <= i {
                if let Tag::RateChange(r) = tags[tag_idx].tag {
                    self.set_rate(r);
                }
                tag_idx += 1;
            }

            self.byte = input[i];
            self.shift = 0;
            i += 1;
        }

        sio.consume(i);
        sio.produce(o);

        Ok(())
    }
}
