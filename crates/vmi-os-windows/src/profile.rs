use isr_core::Profile;
use serde::{Deserialize, Serialize};
use vmi_core::VmiError;

use crate::offsets::Offsets;

/// OS-build-dependent constants used by the kernel bootstrap.
///
/// All offsets are relative to the start of a process control block
/// (`_EPROCESS`, whose first member is the `_KPROCESS`).
///
/// # Notes
///
/// The profile must match the build of the guest kernel. A mismatched
/// profile is not detected: the bootstrap happily reads the wrong fields
/// and produces a structurally valid, but meaningless, result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowsProfile {
    /// Offset of `_KPROCESS.DirectoryTableBase`.
    pub pdbase_offset: u64,

    /// Offset of `_EPROCESS.ActiveProcessLinks`.
    pub tasks_offset: u64,

    /// Offset of the page directory base inside the control block returned
    /// by the process scanner.
    #[serde(default = "WindowsProfile::default_scan_pdbase_offset")]
    pub scan_pdbase_offset: u64,

    /// Image names searched for by the process scanner, in order.
    #[serde(default = "WindowsProfile::default_scan_process_names")]
    pub scan_process_names: Vec<String>,
}

impl WindowsProfile {
    /// Offset of `DirectoryTableBase` used by the scan fallback when the
    /// profile does not override it.
    pub const DEFAULT_SCAN_PDBASE_OFFSET: u64 = 0x18;

    /// Creates a new profile from the two structure offsets.
    pub fn new(pdbase_offset: u64, tasks_offset: u64) -> Self {
        Self {
            pdbase_offset,
            tasks_offset,
            scan_pdbase_offset: Self::DEFAULT_SCAN_PDBASE_OFFSET,
            scan_process_names: Self::default_scan_process_names(),
        }
    }

    /// Creates a new profile from a debug-symbol profile.
    ///
    /// The scan fallback reuses `_KPROCESS.DirectoryTableBase`, since the
    /// symbols describe the exact build.
    pub fn from_isr(profile: &Profile) -> Result<Self, VmiError> {
        let offsets = Offsets::new(profile)?;
        let pdbase_offset = offsets._KPROCESS.DirectoryTableBase.offset();
        let tasks_offset = offsets._EPROCESS.ActiveProcessLinks.offset();

        Ok(Self::new(pdbase_offset, tasks_offset).with_scan_pdbase_offset(pdbase_offset))
    }

    /// Overrides the page directory offset used by the scan fallback.
    pub fn with_scan_pdbase_offset(self, scan_pdbase_offset: u64) -> Self {
        Self {
            scan_pdbase_offset,
            ..self
        }
    }

    /// Overrides the image names searched for by the scan fallback.
    pub fn with_scan_process_names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scan_process_names: names.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    fn default_scan_pdbase_offset() -> u64 {
        Self::DEFAULT_SCAN_PDBASE_OFFSET
    }

    fn default_scan_process_names() -> Vec<String> {
        vec![String::from("Idle"), String::from("System")]
    }
}
