use crate::runtime::Kernel;
use crate::runtime::Result;
use crate::runtime::StreamIo;
use crate::runtime::Tag;
use crate::runtime::WorkIo;
use crate::runtime::copy_tag_propagation;

/// Register seed for scrambling
pub const SCRAMBLER_SEED: u8 = 0x1B;
/// Register seed for descrambling
pub const DESCRAMBLER_SEED: u8 = 0x00;

/// Direction of the [`Scrambler`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Feed the output bits back into the register
    Scramble,
    /// Feed the input bits back into the register
    Descramble,
}

/// Self-synchronizing scrambler with polynomial z^-7 + z^-4 + 1.
///
/// Bytes are processed LSB first. The register is reset to the seed at every
/// item tagged with [`Tag::FrameStart`]; other tags pass through untouched.
///
/// # Inputs
///
/// `in`: Bytes
///
/// # Outputs
///
/// `out`: (De-)scrambled bytes, one per input byte
///
/// # Usage
/// ```
/// use ieee80211b::blocks::{Mode, Scrambler};
/// use ieee80211b::runtime::Mocker;
///
/// let mut mocker = Mocker::new(Scrambler::new(Mode::Scramble));
/// mocker.input(vec![0x7A, 0xBA]);
/// mocker.run().unwrap();
/// assert_eq!(mocker.output().0, &[0x2B, 0xFD]);
/// ```
pub struct Scrambler {
    mode: Mode,
    seed: u8,
    state: u8,
}

impl Scrambler {
    /// Create scrambler with the default seed of the mode.
    pub fn new(mode: Mode) -> Self {
        let seed = match mode {
            Mode::Scramble => SCRAMBLER_SEED,
            Mode::Descramble => DESCRAMBLER_SEED,
        };
        Self::with_seed(mode, seed)
    }

    /// Create scrambler with a custom 7 bit seed.
    pub fn with_seed(mode: Mode, seed: u8) -> Self {
        let seed = seed & 0x7F;
        Scrambler {
            mode,
            seed,
            state: seed,
        }
    }

    /// Reset the register to the seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }

    /// Current register content
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Process one byte.
    pub fn process_byte(&mut self, byte: u8) -> u8 {
        let mut out = 0;
        for b in 0..8 {
            let bit_in = (byte >> b) & 0x01;
            let feedback = ((self.state >> 3) ^ (self.state >> 6)) & 0x01;
            let bit_out = bit_in ^ feedback;
            self.state = (self.state << 1) & 0x7F;
            self.state |= match self.mode {
                Mode::Scramble => bit_out,
                Mode::Descramble => bit_in,
            };
            out |= bit_out << b;
        }
        out
    }
}

impl Kernel for Scrambler {
    type Input = u8;
    type Output = u8;

    fn forecast(&self, n_output: usize) -> usize {
        n_output
    }

    fn work(&mut self, _io: &mut WorkIo, sio: &mut StreamIo<'_, u8, u8>) -> Result<()> {
        let input = sio.input();
        let mut frame_starts = sio
            .tags()
            .iter()
            .filter(|t| matches!(t.tag, Tag::FrameStart(_)))
            .map(|t| t.index)
            .peekable();

        let out = sio.output();
        let n = std::cmp::min(input.len(), out.len());

        for (i, (o, b)) in out.iter_mut().zip(input.iter()).take(n).enumerate() {
            while frame_starts.next_if(|&s| s <= i).is_some() {
                self.reset();
            }
            *o = self.process_byte(*b);
        }

        sio.consume(n);
        sio.produce(n);
        copy_tag_propagation(sio);

        Ok(())
    }
}
