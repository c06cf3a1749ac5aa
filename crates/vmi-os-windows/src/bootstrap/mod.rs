mod context;
mod kernel_base;
mod kpgd;
mod process_list;
mod state;


use vmi_core::{Pa, PagingMode, Va, VmiProcessScanner, VmiRead, VmiSymbols, VmiTranslate};

pub use self::{
    context::BootstrapContext,
    kernel_base::KernelBaseLocator,
    kpgd::{DiscoveryResult, KpgdResolver, KpgdStrategy},
    process_list::{ProcessListAnchorExtractor, ProcessListHead},
    state::WindowsKernelState,
};
use crate::{ProcessListPolicy, WindowsBootstrapConfig, WindowsError, WindowsProfile};

/// The collaborators a bootstrap runs on.
///
/// Implemented for every type that provides memory reads, address
/// translation, symbol resolution and process scanning.
pub trait BootstrapDriver: VmiRead + VmiTranslate + VmiSymbols + VmiProcessScanner {}

impl<T> BootstrapDriver for T where T: VmiRead + VmiTranslate + VmiSymbols + VmiProcessScanner {}

/// A stage of the bootstrap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapStage {
    /// Locating the kernel image base.
    KernelBase,

    /// Resolving the kernel page directory.
    KernelPageDirectory,

    /// Reading the head of the active process list.
    ProcessList,
}

impl std::fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::KernelBase => write!(f, "kernel base lookup"),
            Self::KernelPageDirectory => write!(f, "kernel page directory discovery"),
            Self::ProcessList => write!(f, "process list lookup"),
        }
    }
}

/// Bootstrap of a Windows introspection session.
///
/// Locates the kernel page directory and the head of the active process
/// list of a 32-bit Windows guest, without any prior knowledge of how to
/// translate addresses inside it.
///
/// The sequence is:
///
/// 1. Resolve the kernel base. If that fails, switch the paging mode
///    (PAE on/off) and retry once.
/// 2. Resolve the kernel page directory with the configured
///    [`KpgdStrategy`] cascade.
/// 3. Read the process list head of the process control block found in
///    step 2.
///
/// # Examples
///
/// ```no_run
/// # use vmi_core::{PagingMode, Va};
/// # use vmi_os_windows::{BootstrapDriver, WindowsBootstrap, WindowsError, WindowsProfile};
/// # fn example(driver: &impl BootstrapDriver) -> Result<(), WindowsError> {
/// let bootstrap = WindowsBootstrap::new(WindowsProfile::new(0x18, 0x88))
///     .with_page_offset(Va(0x8000_0000))
///     .with_paging_mode(PagingMode::Legacy);
///
/// let state = bootstrap.run(driver)?;
/// println!("kpgd: {}, pae: {}", state.kpgd(), state.pae());
/// # Ok(())
/// # }
/// ```
///
/// # Notes
///
/// The bootstrap is synchronous and has no timeouts of its own. A
/// collaborator that hangs stalls it indefinitely.
#[derive(Debug, Clone)]
pub struct WindowsBootstrap {
    profile: WindowsProfile,
    page_offset: Va,
    paging_mode: PagingMode,
    process_list: ProcessListPolicy,
    resolver: KpgdResolver,
}

impl WindowsBootstrap {
    /// Creates a new bootstrap with default settings.
    pub fn new(profile: WindowsProfile) -> Self {
        Self::from_config(WindowsBootstrapConfig::new(profile))
    }

    /// Creates a new bootstrap from a configuration.
    pub fn from_config(config: WindowsBootstrapConfig) -> Self {
        Self {
            profile: config.profile,
            page_offset: config.page_offset,
            paging_mode: config.paging_mode,
            process_list: config.process_list,
            resolver: KpgdResolver::with_strategies(config.strategies),
        }
    }

    /// Sets the base of the kernel's direct mapping.
    pub fn with_page_offset(self, page_offset: Va) -> Self {
        Self {
            page_offset,
            ..self
        }
    }

    /// Sets the paging mode assumed at the start of the bootstrap.
    pub fn with_paging_mode(self, paging_mode: PagingMode) -> Self {
        Self {
            paging_mode,
            ..self
        }
    }

    /// Sets the handling of an unreadable process list head.
    pub fn with_process_list_policy(self, process_list: ProcessListPolicy) -> Self {
        Self {
            process_list,
            ..self
        }
    }

    /// Sets the kernel page directory discovery strategies, in priority
    /// order.
    pub fn with_strategies(self, strategies: impl IntoIterator<Item = KpgdStrategy>) -> Self {
        Self {
            resolver: KpgdResolver::with_strategies(strategies),
            ..self
        }
    }

    /// Returns the OS profile.
    pub fn profile(&self) -> &WindowsProfile {
        &self.profile
    }

    /// Runs the bootstrap sequence.
    ///
    /// Every failure is reported as [`WindowsError::BootstrapFailed`] with
    /// the stage that failed. Nothing is retained from a failed run.
    pub fn run<Driver>(&self, driver: &Driver) -> Result<WindowsKernelState, WindowsError>
    where
        Driver: BootstrapDriver,
    {
        let mut ctx = BootstrapContext::new(driver, &self.profile, self.page_offset, self.paging_mode);

        let (kernel_base, kernel_base_va) = KernelBaseLocator::locate(&mut ctx)
            .and_then(|kernel_base| Ok((kernel_base, ctx.to_virtual(kernel_base)?)))
            .map_err(|err| WindowsError::bootstrap(BootstrapStage::KernelBase, err))?;

        let (discovery, kpgd) = self
            .resolver
            .resolve(&ctx)
            .and_then(|discovery| Ok((discovery, ctx.to_virtual(discovery.kpgd_raw)?)))
            .map_err(|err| WindowsError::bootstrap(BootstrapStage::KernelPageDirectory, err))?;

        let init_task = match ProcessListAnchorExtractor::extract(
            driver,
            discovery.anchor,
            self.profile.tasks_offset,
        ) {
            Ok(init_task) => Some(init_task),
            Err(err) => match self.process_list {
                ProcessListPolicy::Required => {
                    tracing::error!(%err, anchor = %discovery.anchor, "process list head not readable");
                    return Err(WindowsError::bootstrap(BootstrapStage::ProcessList, err));
                }
                ProcessListPolicy::BestEffort => {
                    tracing::warn!(%err, anchor = %discovery.anchor, "process list head not readable");
                    None
                }
            },
        };

        let state = WindowsKernelState {
            page_offset: ctx.page_offset(),
            paging_mode: ctx.paging_mode(),
            kernel_base,
            kernel_base_va,
            discovery,
            kpgd,
            init_task,
        };

        tracing::info!(
            kernel_base = %state.kernel_base_va(),
            kpgd = %state.kpgd(),
            init_task = ?state.init_task().map(|head| head.entry),
            paging_mode = %state.paging_mode(),
            "kernel bootstrapped"
        );

        Ok(state)
    }

    /// Finds the kernel page directory by scanning physical memory for the
    /// Idle or System process.
    ///
    /// Returns the page directory base in frame-relative form. Does not
    /// need address translation, which makes it suitable as the fallback of
    /// a translation collaborator that has no page directory yet.
    pub fn scan_page_directory<Driver>(&self, driver: &Driver) -> Result<Pa, WindowsError>
    where
        Driver: BootstrapDriver,
    {
        let ctx = BootstrapContext::new(driver, &self.profile, self.page_offset, self.paging_mode);
        Ok(KpgdStrategy::ProcessScan.discover(&ctx)?.kpgd_raw)
    }
}
