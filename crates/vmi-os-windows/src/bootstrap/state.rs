use vmi_core::{Pa, PagingMode, Va};

use super::{DiscoveryResult, KpgdStrategy, ProcessListHead};

/// Kernel state discovered by a [`WindowsBootstrap`].
///
/// Immutable once produced. Every address carries its representation in
/// its type: the page directory base is kept in kernel virtual form, while
/// the anchor and the process list entry are physical.
///
/// [`WindowsBootstrap`]: crate::WindowsBootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowsKernelState {
    pub(super) page_offset: Va,
    pub(super) paging_mode: PagingMode,
    pub(super) kernel_base: Pa,
    pub(super) kernel_base_va: Va,
    pub(super) discovery: DiscoveryResult,
    pub(super) kpgd: Va,
    pub(super) init_task: Option<ProcessListHead>,
}

impl WindowsKernelState {
    /// Returns the base of the kernel's direct mapping.
    pub fn page_offset(&self) -> Va {
        self.page_offset
    }

    /// Returns the paging mode the guest was found to use.
    pub fn paging_mode(&self) -> PagingMode {
        self.paging_mode
    }

    /// Returns `true` if the guest uses PAE paging.
    pub fn pae(&self) -> bool {
        self.paging_mode.is_pae()
    }

    /// Returns the kernel image base in frame-relative form.
    pub fn kernel_base(&self) -> Pa {
        self.kernel_base
    }

    /// Returns the kernel image base as a kernel virtual address.
    pub fn kernel_base_va(&self) -> Va {
        self.kernel_base_va
    }

    /// Returns the kernel page directory base in kernel virtual form.
    pub fn kpgd(&self) -> Va {
        self.kpgd
    }

    /// Returns the kernel page directory base in frame-relative form.
    pub fn kpgd_physical(&self) -> Pa {
        self.discovery.kpgd_raw
    }

    /// Returns the physical address of the process control block the page
    /// directory was read from.
    pub fn anchor(&self) -> Pa {
        self.discovery.anchor
    }

    /// Returns the strategy that found the page directory.
    pub fn strategy(&self) -> KpgdStrategy {
        self.discovery.strategy
    }

    /// Returns the full discovery result.
    pub fn discovery(&self) -> &DiscoveryResult {
        &self.discovery
    }

    /// Returns the head of the active process list.
    ///
    /// `None` only when the bootstrap ran with
    /// [`ProcessListPolicy::BestEffort`] and the head could not be read.
    ///
    /// [`ProcessListPolicy::BestEffort`]: crate::ProcessListPolicy::BestEffort
    pub fn init_task(&self) -> Option<ProcessListHead> {
        self.init_task
    }
}
