use isr_macros::{Field, offsets};

/// Kernel symbols consulted during bootstrap.
pub mod symbols {
    /// Load address of the kernel image.
    pub const KernBase: &str = "KernBase";

    /// Head of the `_EPROCESS.ActiveProcessLinks` list.
    pub const PsActiveProcessHead: &str = "PsActiveProcessHead";

    /// Pointer to the `_EPROCESS` of the System process.
    pub const PsInitialSystemProcess: &str = "PsInitialSystemProcess";
}

offsets! {
    /// Windows kernel structure offsets needed by the bootstrap.
    ///
    /// Used to derive a [`WindowsProfile`] from a debug-symbol profile.
    ///
    /// [`WindowsProfile`]: crate::WindowsProfile
    #[derive(Debug)]
    pub struct Offsets {
        struct _KPROCESS {
            DirectoryTableBase: Field,      // ULONG_PTR
        }

        struct _EPROCESS {
            ActiveProcessLinks: Field,      // _LIST_ENTRY
        }
    }
}
