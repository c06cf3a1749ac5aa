//! Kernel bootstrap for Virtual Machine Introspection.
//!
//! Re-exports the core address types and collaborator traits from
//! `vmi-core`, and the OS-specific bootstrap crates behind their features.
//!
//! # Features
//!
//! - `os-windows` (default): [`os::windows`], the bootstrap of 32-bit
//!   Windows guests.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vmi_core::*;

/// OS-specific bootstrap.
pub mod os {
    pub use vmi_core::os::*;

    #[cfg(feature = "os-windows")]
    #[cfg_attr(docsrs, doc(cfg(feature = "os-windows")))]
    pub use vmi_os_windows as windows;
}
