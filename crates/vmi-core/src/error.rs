use crate::{AccessContext, Va};

/// An error that can occur when working with the VMI.
#[derive(thiserror::Error, Debug)]
pub enum VmiError {
    /// An error occurred in the VMI driver.
    #[error(transparent)]
    Driver(Box<dyn std::error::Error>),

    /// An OS-specific error occurred.
    #[error(transparent)]
    Os(Box<dyn std::error::Error>),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An error occurred while parsing symbols.
    #[error(transparent)]
    Isr(#[from] isr_macros::Error),

    /// Memory at the given location could not be read.
    #[error("Failed to read memory at {0}")]
    Read(AccessContext),

    /// A virtual address could not be translated.
    #[error("Translation failed ({:?}, len: {})", .0.first(), .0.len())]
    Translation(PageFaults),

    /// A symbol could not be resolved.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// A process could not be found by name.
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    /// Operation not supported.
    #[error("Operation not supported.")]
    NotSupported,

    /// Out of bounds.
    #[error("Out of bounds")]
    OutOfBounds,

    /// Other error.
    #[error("{0}")]
    Other(&'static str),
}

/// A page fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageFault {
    /// The virtual address that caused the page fault.
    pub address: Va,
}

/// A collection of page faults.
pub type PageFaults = smallvec::SmallVec<[PageFault; 1]>;

impl From<Va> for PageFault {
    fn from(address: Va) -> Self {
        Self { address }
    }
}

impl VmiError {
    /// Creates a new translation error for a single page fault.
    pub fn page_fault(pf: impl Into<PageFault>) -> Self {
        Self::Translation(smallvec::smallvec![pf.into()])
    }

    /// Creates a new read error for the given location.
    pub fn read(ctx: impl Into<AccessContext>) -> Self {
        Self::Read(ctx.into())
    }

    /// Creates a new symbol resolution error.
    pub fn symbol_not_found(name: impl Into<String>) -> Self {
        Self::SymbolNotFound(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_error_display() {
        let err = VmiError::page_fault(Va(0x8000_1088));
        assert_eq!(
            err.to_string(),
            "Translation failed (Some(PageFault { address: 0x0000000080001088 }), len: 1)"
        );

        let err = VmiError::Translation(PageFaults::new());
        assert_eq!(err.to_string(), "Translation failed (None, len: 0)");
    }
}
