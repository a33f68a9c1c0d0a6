use std::fmt;
use std::str::FromStr;

use crate::runtime::Error;

/// Data rates of the DSSS/CCK PHY.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rate {
    /// 1 Mbps differential BPSK, Barker spread
    Dbpsk1,
    /// 2 Mbps differential QPSK, Barker spread
    Dqpsk2,
    /// 5.5 Mbps CCK
    Cck5_5,
    /// 11 Mbps CCK
    Cck11,
}

impl Rate {
    /// All rates, slowest first.
    pub const ALL: [Rate; 4] = [Rate::Dbpsk1, Rate::Dqpsk2, Rate::Cck5_5, Rate::Cck11];

    /// bits per symbol
    pub fn bps(&self) -> usize {
        match self {
            Rate::Dbpsk1 => 1,
            Rate::Dqpsk2 => 2,
            Rate::Cck5_5 => 4,
            Rate::Cck11 => 8,
        }
    }

    /// chips per symbol
    pub fn cps(&self) -> usize {
        match self {
            Rate::Dbpsk1 | Rate::Dqpsk2 => 11,
            Rate::Cck5_5 | Rate::Cck11 => 8,
        }
    }

    /// Chips produced by one input byte.
    pub fn chips_per_byte(&self) -> usize {
        8 / self.bps() * self.cps()
    }

    /// Value of the PLCP SIGNAL field.
    pub fn signal(&self) -> u8 {
        match self {
            Rate::Dbpsk1 => 0x0A,
            Rate::Dqpsk2 => 0x14,
            Rate::Cck5_5 => 0x37,
            Rate::Cck11 => 0x6E,
        }
    }

    /// Twice the rate in Mbps, i.e., bits per 2 µs.
    pub fn doubled_rate(&self) -> usize {
        match self {
            Rate::Dbpsk1 => 2,
            Rate::Dqpsk2 => 4,
            Rate::Cck5_5 => 11,
            Rate::Cck11 => 22,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Dbpsk1 => write!(f, "1 Mbps"),
            Rate::Dqpsk2 => write!(f, "2 Mbps"),
            Rate::Cck5_5 => write!(f, "5.5 Mbps"),
            Rate::Cck11 => write!(f, "11 Mbps"),
        }
    }
}

impl FromStr for Rate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches("Mbps").trim() {
            "1" => Ok(Rate::Dbpsk1),
            "2" => Ok(Rate::Dqpsk2),
            "5.5" => Ok(Rate::Cck5_5),
            "11" => Ok(Rate::Cck11),
            _ => Err(Error::InvalidRate(s.to_string())),
        }
    }
}

/// PLCP preamble format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preamble {
    /// 128 bit SYNC of ones, SFD 0xF3A0
    #[default]
    Long,
    /// 56 bit SYNC of zeros, SFD 0x05CF
    Short,
}

impl Preamble {
    /// Preamble length in bytes.
    pub fn size(&self) -> usize {
        match self {
            Preamble::Long => 18,
            Preamble::Short => 9,
        }
    }

    /// Write the preamble into the start of `buf`.
    pub fn write(&self, buf: &mut [u8]) {
        match self {
            Preamble::Long => {
                buf[0..16].fill(0xFF);
                buf[16] = 0xA0;
                buf[17] = 0xF3;
            }
            Preamble::Short => {
                buf[0..7].fill(0x00);
                buf[7] = 0xCF;
                buf[8] = 0x05;
            }
        }
    }
}

impl FromStr for Preamble {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" => Ok(Preamble::Long),
            "short" => Ok(Preamble::Short),
            _ => Err(Error::InvalidPreamble(s.to_string())),
        }
    }
}
