//! Host configuration constants
//!
//! Well-known paths used to decide whether an e-paper HAT is attached.
//! Everything that probes the host should reference these constants rather
//! than hardcoding values.

/// SPI device node opened by the vendor driver (bus 0, chip select 0)
pub const DEFAULT_SPI_DEVICE: &str = "/dev/spidev0.0";

/// Software SPI shim shipped for boards without a kernel SPI driver
pub const SOFTWARE_SPI_LIBRARY: &str = "sysfs_software_spi.so";

/// System directories searched for [`SOFTWARE_SPI_LIBRARY`]
pub const SYSTEM_LIBRARY_DIRS: &[&str] = &["/usr/local/lib", "/usr/lib"];

/// sysfs driver directory that only exists on Broadcom (Raspberry Pi) boards
pub const BCM2835_GPIOMEM_DRIVER: &str = "/sys/bus/platform/drivers/gpiomem-bcm2835";

/// Environment variable a host application may read to force emulation
pub const EMULATE_ENV_VAR: &str = "EPD_EMULATE";
