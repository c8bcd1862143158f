//! Hardware presence detection
//!
//! Decides, once per session, whether a physical e-paper panel is wired to
//! this host. The answer selects between the physical driver and the ghost
//! emulator and is never re-queried mid-session.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::config::{
    BCM2835_GPIOMEM_DRIVER, DEFAULT_SPI_DEVICE, EMULATE_ENV_VAR, SOFTWARE_SPI_LIBRARY,
    SYSTEM_LIBRARY_DIRS,
};

/// Answers whether a physical panel is available
pub trait HardwarePresence {
    /// True when a physical panel can be driven from this host
    fn panel_present(&self) -> bool;
}

/// Fixed answer, for tests and explicit overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedPresence(pub bool);

impl ForcedPresence {
    /// Always report a panel
    pub const PRESENT: Self = Self(true);
    /// Never report a panel (always emulate)
    pub const ABSENT: Self = Self(false);

    /// Read the `EPD_EMULATE` override
    ///
    /// Returns `Some(ABSENT)` when the variable is set to anything other
    /// than `0`, `false` or an empty string. Returns `None` otherwise,
    /// leaving the decision to the normal probe.
    pub fn from_env() -> Option<Self> {
        let value = std::env::var(EMULATE_ENV_VAR).ok()?;
        Self::from_override(&value)
    }

    fn from_override(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "0" | "false" => None,
            _ => Some(Self::ABSENT),
        }
    }
}

impl HardwarePresence for ForcedPresence {
    fn panel_present(&self) -> bool {
        self.0
    }
}

/// Probes the host for an SPI path to the panel
///
/// A panel counts as present when the kernel SPI device can be opened, or
/// when the software SPI library is installed in one of the search
/// directories.
#[derive(Debug, Clone)]
pub struct SpiProbe {
    spi_device: PathBuf,
    library_dirs: Vec<PathBuf>,
}

impl SpiProbe {
    /// Probe the default SPI device and library directories
    ///
    /// The running executable's directory is searched first, then the
    /// system library directories.
    pub fn new() -> Self {
        let mut library_dirs = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            library_dirs.push(dir);
        }
        library_dirs.extend(SYSTEM_LIBRARY_DIRS.iter().map(PathBuf::from));

        Self {
            spi_device: PathBuf::from(DEFAULT_SPI_DEVICE),
            library_dirs,
        }
    }

    /// Probe a different SPI device node
    #[must_use]
    pub fn with_spi_device(mut self, path: impl Into<PathBuf>) -> Self {
        self.spi_device = path.into();
        self
    }

    /// Replace the library search directories
    #[must_use]
    pub fn with_library_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.library_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// True if the SPI device node can be opened read-write
    pub fn spi_device_available(&self) -> bool {
        let available = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.spi_device)
            .is_ok();
        tracing::trace!(device = %self.spi_device.display(), available, "probed SPI device");
        available
    }

    /// Location of the software SPI library, if installed
    pub fn software_spi_library(&self) -> Option<PathBuf> {
        self.library_dirs
            .iter()
            .map(|dir| dir.join(SOFTWARE_SPI_LIBRARY))
            .find(|candidate| candidate.is_file())
    }
}

impl Default for SpiProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwarePresence for SpiProbe {
    fn panel_present(&self) -> bool {
        let present = self.spi_device_available() || self.software_spi_library().is_some();
        tracing::debug!(present, "hardware presence probe");
        present
    }
}

/// Single-board computer family driving the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostBoard {
    /// Broadcom-based Raspberry Pi (kernel SPI + gpiomem)
    RaspberryPi,
    /// NVIDIA Jetson Nano (software SPI shim)
    JetsonNano,
    /// No panel path found
    Unknown,
}

impl HostBoard {
    /// Classify this host using the default probe
    pub fn detect() -> Self {
        Self::detect_with(&SpiProbe::new(), Path::new(BCM2835_GPIOMEM_DRIVER))
    }

    /// Classify with an explicit probe and gpiomem driver path
    pub fn detect_with(probe: &SpiProbe, gpiomem_driver: &Path) -> Self {
        if !probe.panel_present() {
            return HostBoard::Unknown;
        }
        if gpiomem_driver.exists() {
            HostBoard::RaspberryPi
        } else {
            HostBoard::JetsonNano
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            HostBoard::RaspberryPi => "Raspberry Pi",
            HostBoard::JetsonNano => "Jetson Nano",
            HostBoard::Unknown => "unknown",
        }
    }
}
