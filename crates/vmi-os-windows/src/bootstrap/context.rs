use vmi_core::{Pa, PagingMode, Va, VmiError};

use super::BootstrapDriver;
use crate::{WindowsError, WindowsProfile};

/// Mutable state of a bootstrap in progress.
///
/// Owned by a single bootstrap run. The paging mode starts as an
/// assumption and may be switched exactly once, when the kernel base
/// cannot be resolved under the initial assumption.
pub struct BootstrapContext<'a, Driver>
where
    Driver: BootstrapDriver,
{
    driver: &'a Driver,
    profile: &'a WindowsProfile,
    page_offset: Va,
    paging_mode: PagingMode,
    paging_mode_switched: bool,
}

impl<'a, Driver> BootstrapContext<'a, Driver>
where
    Driver: BootstrapDriver,
{
    /// Creates a new bootstrap context.
    pub fn new(
        driver: &'a Driver,
        profile: &'a WindowsProfile,
        page_offset: Va,
        paging_mode: PagingMode,
    ) -> Self {
        Self {
            driver,
            profile,
            page_offset,
            paging_mode,
            paging_mode_switched: false,
        }
    }

    /// Returns the driver.
    pub fn driver(&self) -> &'a Driver {
        self.driver
    }

    /// Returns the OS profile.
    pub fn profile(&self) -> &'a WindowsProfile {
        self.profile
    }

    /// Returns the base of the kernel's direct mapping.
    pub fn page_offset(&self) -> Va {
        self.page_offset
    }

    /// Returns the currently assumed paging mode.
    pub fn paging_mode(&self) -> PagingMode {
        self.paging_mode
    }

    /// Returns `true` if the paging mode was switched.
    pub fn paging_mode_switched(&self) -> bool {
        self.paging_mode_switched
    }

    /// Switches the assumed paging mode.
    ///
    /// Returns the new mode. Fails with [`WindowsError::PagingModeLocked`]
    /// if the mode was already switched.
    pub fn switch_paging_mode(&mut self) -> Result<PagingMode, WindowsError> {
        if self.paging_mode_switched {
            return Err(WindowsError::PagingModeLocked);
        }

        self.paging_mode = self.paging_mode.toggled();
        self.paging_mode_switched = true;
        Ok(self.paging_mode)
    }

    /// Converts a kernel virtual address to its frame-relative form.
    pub fn to_frame_relative(&self, va: Va) -> Result<Pa, WindowsError> {
        va.checked_sub(self.page_offset.0)
            .map(|frame| Pa(frame.0))
            .ok_or(WindowsError::Vmi(VmiError::OutOfBounds))
    }

    /// Converts a frame-relative value to its kernel virtual form.
    pub fn to_virtual(&self, pa: Pa) -> Result<Va, WindowsError> {
        self.page_offset
            .checked_add(pa.0)
            .ok_or(WindowsError::Vmi(VmiError::OutOfBounds))
    }
}
