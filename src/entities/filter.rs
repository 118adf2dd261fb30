//! Dataset slice selection: which error to color by, how the motion was
//! generated, and where the data came from.
//!
//! A [`Filter`] (control mode x data origin) keys one `stats.json` plus its
//! episode files on disk or behind an HTTP base URL.

use std::fmt;
use std::str::FromStr;

/// Which scalar error the scatter plot colors by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMetric {
    #[default]
    Rotation,
    Translation,
}

impl ErrorMetric {
    pub fn label(self) -> &'static str {
        match self {
            ErrorMetric::Rotation => "Rotation error",
            ErrorMetric::Translation => "Position error",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ErrorMetric::Rotation => "rad",
            ErrorMetric::Translation => "m",
        }
    }
}

/// How the episode's motion was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlMode {
    #[default]
    OpenLoop,
    ClosedLoop,
}

impl ControlMode {
    /// Directory component in the data tree.
    pub fn dir_name(self) -> &'static str {
        match self {
            ControlMode::OpenLoop => "open_loop",
            ControlMode::ClosedLoop => "closed_loop",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlMode::OpenLoop => "Open loop",
            ControlMode::ClosedLoop => "Closed loop",
        }
    }
}

impl FromStr for ControlMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" | "open_loop" | "open-loop" => Ok(ControlMode::OpenLoop),
            "closed" | "closed_loop" | "closed-loop" => Ok(ControlMode::ClosedLoop),
            other => Err(format!("unknown control mode: {other}")),
        }
    }
}

/// Whether an episode was recorded on physical hardware or in simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataOrigin {
    #[default]
    Simulation,
    Hardware,
}

impl DataOrigin {
    /// Directory component in the data tree.
    pub fn dir_name(self) -> &'static str {
        match self {
            DataOrigin::Simulation => "simulation",
            DataOrigin::Hardware => "hardware",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataOrigin::Simulation => "Simulation",
            DataOrigin::Hardware => "Hardware",
        }
    }
}

impl FromStr for DataOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sim" | "simulation" => Ok(DataOrigin::Simulation),
            "hw" | "hardware" => Ok(DataOrigin::Hardware),
            other => Err(format!("unknown data origin: {other}")),
        }
    }
}

/// One dataset slice: all episodes recorded with `mode` from `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Filter {
    pub mode: ControlMode,
    pub origin: DataOrigin,
}

impl Filter {
    pub fn new(mode: ControlMode, origin: DataOrigin) -> Self {
        Self { mode, origin }
    }

    /// Relative directory of this slice under the data root,
    /// e.g. `hardware/open_loop`.
    pub fn rel_dir(&self) -> String {
        format!("{}/{}", self.origin.dir_name(), self.mode.dir_name())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.origin.dir_name(), self.mode.dir_name())
    }
}
