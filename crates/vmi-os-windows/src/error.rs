use vmi_core::VmiError;

use crate::{BootstrapStage, KpgdStrategy};

/// Error types for Windows operations.
#[derive(thiserror::Error, Debug)]
pub enum WindowsError {
    /// A collaborator (memory read, translation, symbol resolution or
    /// process scan) failed.
    #[error(transparent)]
    Vmi(#[from] VmiError),

    /// A discovery strategy read a zero page directory base.
    ///
    /// Zero is the "unset" sentinel, so this is treated as a failure of
    /// the strategy even though every read succeeded.
    #[error("Kernel page directory is zero ({0} strategy)")]
    ZeroPageDirectory(KpgdStrategy),

    /// Every kernel page directory discovery strategy failed.
    #[error("Kernel page directory not found")]
    KpgdNotFound,

    /// The paging mode was already switched once during this bootstrap.
    #[error("Paging mode can be switched only once")]
    PagingModeLocked,

    /// Corrupted struct.
    #[error("Corrupted struct: {0}")]
    CorruptedStruct(&'static str),

    /// The bootstrap sequence failed.
    #[error("Bootstrap failed during {stage}")]
    BootstrapFailed {
        /// The stage that failed.
        stage: BootstrapStage,

        /// The underlying failure.
        #[source]
        source: Box<WindowsError>,
    },
}

impl WindowsError {
    /// Wraps an error as a failure of the given bootstrap stage.
    pub fn bootstrap(stage: BootstrapStage, source: impl Into<WindowsError>) -> Self {
        Self::BootstrapFailed {
            stage,
            source: Box::new(source.into()),
        }
    }
}

impl From<WindowsError> for VmiError {
    fn from(value: WindowsError) -> Self {
        VmiError::Os(value.into())
    }
}
