use std::fmt;
use std::ops::RangeInclusive;

pub const WELL_KNOWN_MAX: u16 = 1023;

/// An inclusive range of TCP ports to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

impl PortRange {
    /// The system ports, 1 to 1023.
    pub const WELL_KNOWN: PortRange = PortRange { min: 1, max: WELL_KNOWN_MAX };
    /// Every valid port, 1 to 65535.
    pub const ALL: PortRange = PortRange { min: 1, max: u16::MAX };

    pub fn new(min: u16, max: u16) -> anyhow::Result<Self> {
        anyhow::ensure!(min >= 1, "port range must start at 1 or above, got {min}");
        anyhow::ensure!(min <= max, "port range start {min} is above its end {max}");
        Ok(Self { min, max })
    }

    pub fn from_all_ports(all_ports: bool) -> Self {
        if all_ports { Self::ALL } else { Self::WELL_KNOWN }
    }

    pub fn to_iter(&self) -> RangeInclusive<u16> {
        self.min..=self.max
    }

    pub fn len(&self) -> usize {
        usize::from(self.max - self.min) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
