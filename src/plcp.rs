//! PLCP framing
//!
//! A PPDU is the preamble, the 48 bit PLCP header, and the PSDU. The header
//! carries the payload rate (SIGNAL), the length extension bit (SERVICE), the
//! transmit time of the PSDU in microseconds (LENGTH), and a CRC-16 over these
//! three fields.
use crate::Preamble;
use crate::Rate;

/// Size of the serialized PLCP header in bytes
pub const PLCP_HEADER_LEN: usize = 6;
/// Largest PSDU the LENGTH field of every rate can describe
pub const MAX_PSDU_SIZE: usize = 4095;

const SERVICE_LENGTH_EXTENSION: u8 = 0x80;

/// PLCP header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlcpHeader {
    signal: u8,
    service: u8,
    length: u16,
    crc: u16,
}

impl PlcpHeader {
    /// Header for a PSDU of `psdu_len` bytes sent at `rate`.
    ///
    /// `psdu_len` must not exceed [`MAX_PSDU_SIZE`], beyond that LENGTH does
    /// not fit into 16 bits at 1 Mbps.
    pub fn new(rate: Rate, psdu_len: usize) -> Self {
        debug_assert!(
            psdu_len <= MAX_PSDU_SIZE,
            "PSDU of {psdu_len} bytes exceeds {MAX_PSDU_SIZE}"
        );
        let doubled = rate.doubled_rate();
        let bits = 16 * psdu_len;
        let rem = bits % doubled;
        let deficit = if rem > 0 { doubled - rem } else { 0 };

        let mut service = 0;
        if rate == Rate::Cck11 && deficit >= 16 {
            service |= SERVICE_LENGTH_EXTENSION;
        }

        let mut header = PlcpHeader {
            signal: rate.signal(),
            service,
            length: ((bits + deficit) / doubled) as u16,
            crc: 0,
        };
        header.crc = header.calc_crc();
        header
    }

    /// SIGNAL field
    pub fn signal(&self) -> u8 {
        self.signal
    }

    /// SERVICE field
    pub fn service(&self) -> u8 {
        self.service
    }

    /// LENGTH field in microseconds
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Whether the 11 Mbps length extension bit is set.
    pub fn length_extension(&self) -> bool {
        self.service & SERVICE_LENGTH_EXTENSION != 0
    }

    /// Header check sequence
    pub fn crc(&self) -> u16 {
        self.crc
    }

    fn calc_crc(&self) -> u16 {
        let l = self.length.to_le_bytes();
        crc16(&[self.signal, self.service, l[0], l[1]])
    }

    /// Serialize as SIGNAL, SERVICE, LENGTH (LE), CRC (LE).
    pub fn to_bytes(&self) -> [u8; PLCP_HEADER_LEN] {
        let l = self.length.to_le_bytes();
        let c = self.crc.to_le_bytes();
        [self.signal, self.service, l[0], l[1], c[0], c[1]]
    }
}

/// CRC-16 of the PLCP header.
///
/// x^16 + x^12 + x^5 + 1 over the data bits in transmit order (LSB first),
/// preset to ones, complemented. The register is reflected, so the result
/// sent LSB first puts the x^15 coefficient on air first.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;

    for b in data.iter() {
        for k in 0..8 {
            let bit = if b & (1 << k) != 0 {
                1 ^ (crc & 1)
            } else {
                crc & 1
            };
            crc >>= 1;
            if bit != 0 {
                crc ^= 1 << 15;
                crc ^= 1 << 10;
                crc ^= 1 << 3;
            }
        }
    }
    !crc
}

/// One framed PPDU, ready to be streamed.
#[derive(Clone, Debug)]
pub struct Ppdu {
    bytes: Vec<u8>,
    rate_changes: Vec<(usize, Rate)>,
}

impl Ppdu {
    /// Frame `psdu` for transmission at `rate`.
    ///
    /// The PSDU must not be longer than [`MAX_PSDU_SIZE`].
    pub fn new(rate: Rate, preamble: Preamble, psdu: &[u8]) -> Self {
        let preamble_len = preamble.size();
        let prefix_len = preamble_len + PLCP_HEADER_LEN;
        let mut bytes = vec![0; prefix_len + psdu.len()];

        let mut rate_changes = vec![(0, Rate::Dbpsk1)];
        preamble.write(&mut bytes);
        if preamble == Preamble::Short {
            rate_changes.push((preamble_len, Rate::Dqpsk2));
        }

        let header = PlcpHeader::new(rate, psdu.len());
        bytes[preamble_len..prefix_len].copy_from_slice(&header.to_bytes());
        rate_changes.push((prefix_len, rate));
        bytes[prefix_len..].copy_from_slice(psdu);

        Ppdu {
            bytes,
            rate_changes,
        }
    }

    /// Frame bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A PPDU always has at least preamble and header.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Rate changes as (offset into the frame, new rate), sorted by offset.
    pub fn rate_changes(&self) -> &[(usize, Rate)] {
        &self.rate_changes
    }
}
