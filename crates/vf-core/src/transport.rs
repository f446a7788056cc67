//! How a spectator reaches the venue perimeter.

/// Transport mode drawn per entity on arrival.  Only the delay differs
/// between modes; the mode itself is recorded for reporting.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransportMode {
    Drive,
    Bus,
    Taxi,
    Walk,
    Bike,
}

impl TransportMode {
    /// Lower-case label used in CSV columns and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Drive => "drive",
            TransportMode::Bus   => "bus",
            TransportMode::Taxi  => "taxi",
            TransportMode::Walk  => "walk",
            TransportMode::Bike  => "bike",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
