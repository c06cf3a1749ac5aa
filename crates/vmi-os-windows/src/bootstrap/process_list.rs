use vmi_core::{Hex, Pa, Va, VmiError, VmiRead};

use crate::WindowsError;

/// Head of the kernel's active process list.
///
/// # Notes
///
/// The two fields use different representations on purpose. `entry` is
/// physical, derived from the physical anchor without any translation.
/// `flink` is the link stored in guest memory and is therefore a kernel
/// virtual address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessListHead {
    /// Physical address of `_EPROCESS.ActiveProcessLinks` in the anchor.
    pub entry: Pa,

    /// The `Flink` value stored at [`entry`](Self::entry).
    pub flink: Va,
}

/// Derives the process list head from a process control block.
pub struct ProcessListAnchorExtractor;

impl ProcessListAnchorExtractor {
    /// Returns the process list head of the process control block at
    /// `anchor`.
    ///
    /// The link is read physically at `anchor + tasks_offset`. Fails with
    /// [`VmiError::OutOfBounds`] if that address overflows.
    pub fn extract(
        driver: &impl VmiRead,
        anchor: Pa,
        tasks_offset: u64,
    ) -> Result<ProcessListHead, WindowsError> {
        let entry = anchor
            .checked_add(tasks_offset)
            .ok_or(VmiError::OutOfBounds)?;
        let flink = driver.read_physical_u32(entry)?;

        tracing::debug!(%entry, flink = %Hex(flink), "process list head");

        Ok(ProcessListHead {
            entry,
            flink: Va(u64::from(flink)),
        })
    }
}
