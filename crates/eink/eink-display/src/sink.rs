//! Where dispatched frames go

use eink_emulator::{EmulatorView, FrameBuffer, GhostEmulator};
use platform::{DriverError, PanelDriver, RegionKey};

/// Destination of every write that passes the limiter
///
/// Chosen once when the controller is opened and never changed.
#[derive(Debug)]
pub enum WriteSink<D, V> {
    /// A physical panel; its own optics produce the ghosting
    Physical(D),
    /// No panel attached: frames are simulated and shown on a view
    Emulated {
        /// Ghost simulation
        emulator: GhostEmulator,
        /// Where rendered frames are presented
        view: V,
    },
}

impl<D: PanelDriver, V: EmulatorView> WriteSink<D, V> {
    /// Send `frame` to `region`
    ///
    /// A full-frame key becomes a full write, a rectangle a partial one.
    pub fn dispatch(&mut self, region: RegionKey, frame: &FrameBuffer) -> Result<(), DriverError> {
        match self {
            WriteSink::Physical(driver) => match region {
                RegionKey::FullFrame => driver.write_full(frame.bits()),
                RegionKey::Rect(rect) => driver.write_partial(rect, frame.bits()),
            },
            WriteSink::Emulated { emulator, view } => {
                emulator.write(region, frame, view);
                Ok(())
            }
        }
    }

    /// Put the panel into deep sleep; nothing to do when emulated
    pub fn sleep(&mut self) -> Result<(), DriverError> {
        match self {
            WriteSink::Physical(driver) => driver.sleep(),
            WriteSink::Emulated { .. } => Ok(()),
        }
    }
}

impl<D, V> WriteSink<D, V> {
    /// True when no physical panel is attached
    pub fn is_emulated(&self) -> bool {
        matches!(self, WriteSink::Emulated { .. })
    }

    /// The physical driver, if any
    pub fn driver(&self) -> Option<&D> {
        match self {
            WriteSink::Physical(driver) => Some(driver),
            WriteSink::Emulated { .. } => None,
        }
    }

    /// The physical driver, mutably
    pub fn driver_mut(&mut self) -> Option<&mut D> {
        match self {
            WriteSink::Physical(driver) => Some(driver),
            WriteSink::Emulated { .. } => None,
        }
    }

    /// The ghost emulator, if emulated
    pub fn emulator(&self) -> Option<&GhostEmulator> {
        match self {
            WriteSink::Physical(_) => None,
            WriteSink::Emulated { emulator, .. } => Some(emulator),
        }
    }

    /// The emulator view, if emulated
    pub fn view(&self) -> Option<&V> {
        match self {
            WriteSink::Physical(_) => None,
            WriteSink::Emulated { view, .. } => Some(view),
        }
    }

    /// The emulator view, mutably
    pub fn view_mut(&mut self) -> Option<&mut V> {
        match self {
            WriteSink::Physical(_) => None,
            WriteSink::Emulated { view, .. } => Some(view),
        }
    }
}
