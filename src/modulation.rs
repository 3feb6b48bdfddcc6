//! Subcarrier modulations and convolutional code rates.
//!
//! Both descriptors are plain `Copy` values; every mode that uses e.g. 16-QAM
//! refers to the same constant.

use std::fmt;

use crate::error::{Error, Result};

/// Modulation applied to each OFDM data subcarrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubcarrierModulation {
    /// Binary phase shift keying
    Bpsk,
    /// Quadrature phase shift keying
    Qpsk,
    /// 16-point quadrature amplitude modulation
    Qam16,
    /// 64-point quadrature amplitude modulation
    Qam64,
}

impl SubcarrierModulation {
    /// Number of constellation points, `m`.
    pub const fn constellation_size(self) -> u32 {
        match self {
            Self::Bpsk => 2,
            Self::Qpsk => 4,
            Self::Qam16 => 16,
            Self::Qam64 => 64,
        }
    }

    /// Coded bits carried per subcarrier per symbol.
    pub const fn code_word_size(self) -> u32 {
        match self {
            Self::Bpsk => 1,
            Self::Qpsk => 2,
            Self::Qam16 => 4,
            Self::Qam64 => 6,
        }
    }
}

impl fmt::Display for SubcarrierModulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bpsk => "BPSK",
            Self::Qpsk => "QPSK",
            Self::Qam16 => "16-QAM",
            Self::Qam64 => "64-QAM",
        })
    }
}

impl std::str::FromStr for SubcarrierModulation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bpsk" => Ok(Self::Bpsk),
            "qpsk" => Ok(Self::Qpsk),
            "qam16" | "16qam" | "16-qam" => Ok(Self::Qam16),
            "qam64" | "64qam" | "64-qam" => Ok(Self::Qam64),
            other => Err(Error::Config(format!("unknown modulation `{other}`"))),
        }
    }
}

/// Punctured convolutional code of rate `k/n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConvolutionalCode {
    puncturing_k: u32,
    puncturing_n: u32,
}

impl ConvolutionalCode {
    /// Mother code, rate 1/2
    pub const RATE_1_2: Self = Self::new(1, 2);
    /// Rate 2/3
    pub const RATE_2_3: Self = Self::new(2, 3);
    /// Rate 3/4
    pub const RATE_3_4: Self = Self::new(3, 4);
    /// Rate 5/6
    pub const RATE_5_6: Self = Self::new(5, 6);

    /// Creates a code of rate `k/n`.
    pub const fn new(puncturing_k: u32, puncturing_n: u32) -> Self {
        Self {
            puncturing_k,
            puncturing_n,
        }
    }

    /// Numerator of the code rate.
    pub const fn puncturing_k(&self) -> u32 {
        self.puncturing_k
    }

    /// Denominator of the code rate.
    pub const fn puncturing_n(&self) -> u32 {
        self.puncturing_n
    }

    /// Ratio of data bits to coded bits.
    pub fn code_rate(&self) -> f64 {
        self.puncturing_k as f64 / self.puncturing_n as f64
    }

    /// Whether this is the given `k/n` rate.
    pub const fn is_rate(&self, k: u32, n: u32) -> bool {
        self.puncturing_k == k && self.puncturing_n == n
    }

    /// Data bits recovered from `encoded_length` coded bits.
    pub const fn decoded_length(&self, encoded_length: u32) -> u32 {
        encoded_length * self.puncturing_k / self.puncturing_n
    }
}

impl fmt::Display for ConvolutionalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.puncturing_k, self.puncturing_n)
    }
}

impl std::str::FromStr for ConvolutionalCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: Option<&str>| {
            part.and_then(|p| p.trim().parse::<u32>().ok())
                .filter(|&v| v > 0)
                .ok_or_else(|| Error::Config(format!("invalid code rate `{s}`")))
        };
        let mut parts = s.split('/');
        let k = parse(parts.next())?;
        let n = parse(parts.next())?;

        if parts.next().is_some() || k > n {
            return Err(Error::Config(format!("invalid code rate `{s}`")));
        }
        Ok(Self::new(k, n))
    }
}
