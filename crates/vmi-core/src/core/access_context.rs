use serde::{Deserialize, Serialize};

use super::{PagingMode, macros::impl_ops};

impl_ops!(Pa, u64, "Guest Physical Address");
impl_ops!(Va, u64, "Guest Virtual Address");

/// The mechanism used for translating virtual addresses to physical addresses.
///
/// During kernel bootstrap there is no page directory yet, so some reads
/// have to bypass translation entirely. This enum allows specifying whether
/// a direct mapping or a paging-based translation should be used for a
/// memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TranslationMechanism {
    /// Direct mapping (no translation).
    ///
    /// In this mode, the provided address is treated as a physical address.
    /// This is the "none" translation context: the only kind of read that
    /// is meaningful before the kernel page directory is known.
    Direct,

    /// Paging-based translation through the kernel page directory.
    ///
    /// The collaborator performing the read decides how to walk the page
    /// tables, including before the kernel page directory is known.
    Paging {
        /// The paging layout used for the walk.
        mode: PagingMode,
    },
}

/// Defines the context for memory access operations in VMI.
///
/// This struct encapsulates the necessary information to perform a memory
/// access, including the target address and the mechanism to use for address
/// translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccessContext {
    /// The address to access.
    ///
    /// Depending on the [`mechanism`] field, this could be interpreted
    /// as either a virtual address or a physical address.
    ///
    /// [`mechanism`]: Self::mechanism
    pub address: u64,

    /// The mechanism used for address translation.
    pub mechanism: TranslationMechanism,
}

impl AccessContext {
    /// Creates a new `AccessContext` with direct mapping.
    pub fn direct(address: impl Into<Pa>) -> Self {
        Self {
            address: u64::from(address.into()),
            mechanism: TranslationMechanism::Direct,
        }
    }

    /// Creates a new `AccessContext` for a virtual address that is read
    /// without translation.
    ///
    /// The address value is handed to the physical read path unchanged.
    pub fn untranslated(address: impl Into<Va>) -> Self {
        Self {
            address: u64::from(address.into()),
            mechanism: TranslationMechanism::Direct,
        }
    }

    /// Creates a new `AccessContext` with paging-based translation through
    /// the kernel page directory.
    pub fn kernel(address: impl Into<Va>, mode: PagingMode) -> Self {
        Self {
            address: u64::from(address.into()),
            mechanism: TranslationMechanism::Paging { mode },
        }
    }

    /// Returns `true` if the access bypasses address translation.
    pub fn is_direct(&self) -> bool {
        matches!(self.mechanism, TranslationMechanism::Direct)
    }
}

impl From<Pa> for AccessContext {
    fn from(value: Pa) -> Self {
        Self::direct(value)
    }
}

impl ::std::fmt::Display for AccessContext {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match self.mechanism {
            TranslationMechanism::Direct => write!(f, "{} (direct)", Pa(self.address)),
            TranslationMechanism::Paging { mode } => {
                write!(f, "{} @ kernel ({mode})", Va(self.address))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untranslated_access_is_direct() {
        let ctx = AccessContext::untranslated(Va(0x8055_a158));
        assert!(ctx.is_direct());
        assert_eq!(ctx.address, 0x8055_a158);
        assert_eq!(ctx.to_string(), "0x000000008055a158 (direct)");
    }

    #[test]
    fn kernel_access_is_translated() {
        let ctx = AccessContext::kernel(Va(0x8055_a170), PagingMode::Pae);
        assert!(!ctx.is_direct());
        assert_eq!(ctx.to_string(), "0x000000008055a170 @ kernel (pae)");
    }

    #[test]
    fn address_arithmetic_is_checked() {
        assert_eq!(Pa(0x1000).checked_add(0x18), Some(Pa(0x1018)));
        assert_eq!(Pa(0x10).checked_sub(0x88), None);
        assert_eq!(Pa(u64::MAX - 4).checked_add(0x18), None);
        assert_eq!(Va(0x8000_0000).checked_add(0x2000), Some(Va(0x8000_2000)));
        assert!(Pa(0).is_null());
    }
}
