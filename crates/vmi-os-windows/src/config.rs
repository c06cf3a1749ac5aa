use serde::{Deserialize, Serialize};
use vmi_core::{PagingMode, Va};

use crate::{KpgdStrategy, WindowsProfile};

/// What to do when the process list head cannot be read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessListPolicy {
    /// Fail the bootstrap.
    #[default]
    Required,

    /// Log a warning and finish without a process list head.
    BestEffort,
}

/// Serializable configuration of a [`WindowsBootstrap`].
///
/// # Examples
///
/// ```
/// # use vmi_os_windows::{WindowsBootstrapConfig, ProcessListPolicy};
/// let config: WindowsBootstrapConfig = serde_json::from_str(r#"{
///     "profile": { "pdbase_offset": 24, "tasks_offset": 136 },
///     "process_list": "best_effort"
/// }"#).unwrap();
///
/// assert_eq!(config.profile.scan_pdbase_offset, 0x18);
/// assert_eq!(config.process_list, ProcessListPolicy::BestEffort);
/// ```
///
/// [`WindowsBootstrap`]: crate::WindowsBootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowsBootstrapConfig {
    /// Structure offsets of the guest kernel build.
    pub profile: WindowsProfile,

    /// Base of the kernel's direct mapping of physical memory.
    #[serde(default = "WindowsBootstrapConfig::default_page_offset")]
    pub page_offset: Va,

    /// Paging mode assumed before the kernel base is located.
    #[serde(default)]
    pub paging_mode: PagingMode,

    /// Handling of a process list head that cannot be read.
    #[serde(default)]
    pub process_list: ProcessListPolicy,

    /// Kernel page directory discovery strategies, in priority order.
    #[serde(default = "WindowsBootstrapConfig::default_strategies")]
    pub strategies: Vec<KpgdStrategy>,
}

impl WindowsBootstrapConfig {
    /// Start of the 32-bit Windows kernel address space.
    pub const DEFAULT_PAGE_OFFSET: Va = Va(0x8000_0000);

    /// Creates a configuration with default settings for the given profile.
    pub fn new(profile: WindowsProfile) -> Self {
        Self {
            profile,
            page_offset: Self::DEFAULT_PAGE_OFFSET,
            paging_mode: PagingMode::default(),
            process_list: ProcessListPolicy::default(),
            strategies: Self::default_strategies(),
        }
    }

    fn default_page_offset() -> Va {
        Self::DEFAULT_PAGE_OFFSET
    }

    fn default_strategies() -> Vec<KpgdStrategy> {
        KpgdStrategy::ALL.to_vec()
    }
}
