//! Operating system collaborators.
//!
//! These traits describe the OS-aware services the kernel bootstrap relies
//! on without implementing them: resolving kernel symbols and scanning
//! physical memory for process control blocks.

use crate::{Pa, PagingMode, Va, VmiError};

/// Kernel symbol resolution.
///
/// Backed by the kernel export table or by debug symbols. Resolution may
/// involve reading guest memory, so it depends on the paging layout the
/// caller currently assumes.
pub trait VmiSymbols {
    /// Resolves a kernel symbol to its virtual address.
    fn symbol_address(&self, name: &str, mode: PagingMode) -> Result<Va, VmiError>;

    /// Reads the 32-bit value stored at a kernel symbol.
    ///
    /// Unlike a raw read at [`symbol_address`], the implementation is free
    /// to use whatever symbol-table-aware access it has to the value.
    ///
    /// [`symbol_address`]: Self::symbol_address
    fn read_symbol_u32(&self, name: &str, mode: PagingMode) -> Result<u32, VmiError>;
}

/// Exhaustive search of physical memory for process control blocks.
pub trait VmiProcessScanner {
    /// Finds the process control block of the process with the given
    /// image name and returns its physical address.
    ///
    /// The cost is proportional to the size of guest memory.
    fn find_process_by_name(&self, name: &str) -> Result<Pa, VmiError>;
}
