//! QC Flag Values and Arrays
//!
//! ## Flag Meanings
//!
//! | value | flag           | meaning                                              |
//! |-------|----------------|------------------------------------------------------|
//! | 0     | `NotUsed`      | reserved                                             |
//! | 1     | `Good`         | good data                                            |
//! | 2     | `Bad`          | bad data, measurement suspect                        |
//! | 3     | `Purge`        | purge cycle, value fixed at start of purge           |
//! | 4     | `RhRecovery`   | humidity recovering after a purge (humidity only)    |
//!
//! Flag arrays start as all `Good` and are only ever written by the
//! compositor, in a fixed precedence order. The numeric values are the
//! on-disk encoding used by the I/O layer.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::traits::Mask;

/// Categorical QC flag for one sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FlagValue {
    /// Reserved value
    NotUsed = 0,
    /// Good data
    #[default]
    Good = 1,
    /// Bad data, measurement suspect
    Bad = 2,
    /// Purge cycle, value fixed as start of purge
    Purge = 3,
    /// Humidity recovery after purge
    RhRecovery = 4,
}

impl FlagValue {
    /// Every flag, in numeric order
    pub const ALL: [FlagValue; 5] = [
        FlagValue::NotUsed,
        FlagValue::Good,
        FlagValue::Bad,
        FlagValue::Purge,
        FlagValue::RhRecovery,
    ];

    /// Numeric encoding
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a stored value
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FlagValue::NotUsed),
            1 => Some(FlagValue::Good),
            2 => Some(FlagValue::Bad),
            3 => Some(FlagValue::Purge),
            4 => Some(FlagValue::RhRecovery),
            _ => None,
        }
    }

    /// Conventional meaning string
    pub const fn meaning(self) -> &'static str {
        match self {
            FlagValue::NotUsed => "not_used",
            FlagValue::Good => "good_data",
            FlagValue::Bad => "bad_data_measurement_suspect",
            FlagValue::Purge => "bad_data_purge_cycle_value_fixed_as_start_of_purge",
            FlagValue::RhRecovery => "recovery_in_rh_after_purge",
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.meaning())
    }
}

/// Per-sample flags of one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagArray {
    flags: Vec<FlagValue>,
}

impl FlagArray {
    /// `len` samples, all `Good`
    pub fn good(len: usize) -> Self {
        Self {
            flags: vec![FlagValue::Good; len],
        }
    }

    /// Wrap existing flags
    pub fn from_flags(flags: Vec<FlagValue>) -> Self {
        Self { flags }
    }

    /// Decode stored codes; unknown codes become `NotUsed`
    pub fn from_codes(codes: &[u8]) -> Self {
        Self {
            flags: codes
                .iter()
                .map(|&c| FlagValue::from_code(c).unwrap_or(FlagValue::NotUsed))
                .collect(),
        }
    }

    /// Numeric encoding of every sample
    pub fn codes(&self) -> Vec<u8> {
        self.flags.iter().map(|f| f.code()).collect()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the array is empty
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flag at `index`
    pub fn get(&self, index: usize) -> Option<FlagValue> {
        self.flags.get(index).copied()
    }

    /// Set `start..end` (clamped) to `flag`
    pub fn fill(&mut self, start: usize, end: usize, flag: FlagValue) {
        let end = end.min(self.flags.len());
        if start < end {
            self.flags[start..end].fill(flag);
        }
    }

    /// Set every sample marked in `mask` to `flag`
    pub fn apply_mask(&mut self, mask: &[bool], flag: FlagValue) {
        for (slot, &marked) in self.flags.iter_mut().zip(mask) {
            if marked {
                *slot = flag;
            }
        }
    }

    /// Number of samples carrying `flag`
    pub fn count(&self, flag: FlagValue) -> usize {
        self.flags.iter().filter(|&&f| f == flag).count()
    }

    /// Mask of samples carrying `flag`
    pub fn mask_of(&self, flag: FlagValue) -> Mask {
        self.flags.iter().map(|&f| f == flag).collect()
    }

    /// Reset every sample carrying one of `flags` to `Good`
    pub fn reset(&mut self, flags: &[FlagValue]) {
        for slot in &mut self.flags {
            if flags.contains(slot) {
                *slot = FlagValue::Good;
            }
        }
    }
}
