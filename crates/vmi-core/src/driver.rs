use crate::{AccessContext, Pa, PagingMode, Va, VmiError};

/// Read access to guest memory.
///
/// Implemented by the driver backing an introspection session, whether
/// that is a live hypervisor or a physical memory snapshot.
pub trait VmiRead {
    /// Reads a 32-bit little-endian value from a guest physical address.
    fn read_physical_u32(&self, address: Pa) -> Result<u32, VmiError>;

    /// Reads a 32-bit little-endian value through an access context.
    ///
    /// A context with [`TranslationMechanism::Direct`] bypasses translation
    /// and reads the address as physical memory.
    ///
    /// [`TranslationMechanism::Direct`]: crate::TranslationMechanism::Direct
    fn read_virtual_u32(&self, ctx: AccessContext) -> Result<u32, VmiError>;
}

/// Translation of kernel virtual addresses.
pub trait VmiTranslate {
    /// Translates a kernel virtual address to a guest physical address.
    ///
    /// Implementations must be able to translate before the kernel page
    /// directory is known, typically by locating the page directory with a
    /// physical scan first.
    fn translate_address(&self, va: Va, mode: PagingMode) -> Result<Pa, VmiError>;
}
