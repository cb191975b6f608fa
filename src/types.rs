//! Shared scheduling types: `IoClass` and the `IoPriority` presets applied
//! to the launched job.
use serde::{Deserialize, Serialize};

/// Linux I/O scheduling class (see `ionice(1)`).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IoClass {
    BestEffort,
    Idle,
}

impl IoClass {
    /// Numeric class as understood by `ioprio_set(2)`.
    pub fn as_raw(self) -> u8 {
        match self {
            IoClass::BestEffort => 2,
            IoClass::Idle => 3,
        }
    }
}

impl std::fmt::Display for IoClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoClass::BestEffort => write!(f, "best-effort"),
            IoClass::Idle => write!(f, "idle"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IoPriority {
    pub class: IoClass,
    /// Level within the class, 0 (highest) to 7 (lowest). Ignored by the kernel for `Idle`.
    pub level: u8,
}

impl IoPriority {
    pub const BEST_EFFORT: IoPriority = IoPriority {
        class: IoClass::BestEffort,
        level: 7,
    };

    pub const IDLE: IoPriority = IoPriority {
        class: IoClass::Idle,
        level: 0,
    };

    /// Preset selected by the `--idle-io` switch.
    pub fn preset(idle: bool) -> Self {
        if idle { Self::IDLE } else { Self::BEST_EFFORT }
    }

    /// Packed `ioprio` value: class in the top bits, level in the low bits.
    pub fn to_ioprio(self) -> i32 {
        ((self.class.as_raw() as i32) << 13) | self.level as i32
    }
}

impl Default for IoPriority {
    fn default() -> Self {
        Self::BEST_EFFORT
    }
}

impl std::fmt::Display for IoPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "class {} ({}), level {}",
            self.class.as_raw(),
            self.class,
            self.level
        )
    }
}
