use serde::{Deserialize, Serialize};
use vmi_core::{AccessContext, Hex, Pa, Va, VmiError};

use super::{BootstrapContext, BootstrapDriver};
use crate::{WindowsError, offsets::symbols};

/// A strategy for discovering the kernel page directory.
///
/// Every strategy first finds the physical address of a kernel process
/// control block (the anchor) and then reads the page directory base
/// stored inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpgdStrategy {
    /// Follows `PsActiveProcessHead` to the first process in the active
    /// process list.
    ProcessListHead,

    /// Reads the `PsInitialSystemProcess` pointer.
    InitialSystemProcess,

    /// Scans physical memory for the Idle or System process.
    ///
    /// Proportional to the size of guest memory, and therefore the last
    /// resort.
    ProcessScan,
}

impl KpgdStrategy {
    /// All strategies, in priority order.
    pub const ALL: [Self; 3] = [
        Self::ProcessListHead,
        Self::InitialSystemProcess,
        Self::ProcessScan,
    ];

    /// Runs the strategy.
    ///
    /// A zero page directory base is reported as
    /// [`WindowsError::ZeroPageDirectory`]. An anchor or page directory base
    /// whose derived addresses do not fit the address space is reported as
    /// [`VmiError::OutOfBounds`].
    pub fn discover<Driver>(
        self,
        ctx: &BootstrapContext<'_, Driver>,
    ) -> Result<DiscoveryResult, WindowsError>
    where
        Driver: BootstrapDriver,
    {
        let profile = ctx.profile();

        let (anchor, pdbase_offset) = match self {
            Self::ProcessListHead => (Self::process_list_head(ctx)?, profile.pdbase_offset),
            Self::InitialSystemProcess => {
                (Self::initial_system_process(ctx)?, profile.pdbase_offset)
            }
            Self::ProcessScan => (Self::process_scan(ctx)?, profile.scan_pdbase_offset),
        };

        tracing::debug!(strategy = %self, %anchor, "found process control block");

        let pdbase = anchor
            .checked_add(pdbase_offset)
            .ok_or(VmiError::OutOfBounds)?;
        let kpgd_raw = ctx.driver().read_physical_u32(pdbase)?;

        let result = DiscoveryResult {
            strategy: self,
            anchor,
            kpgd_raw: Pa(u64::from(kpgd_raw)),
        };

        if !result.is_valid() {
            return Err(WindowsError::ZeroPageDirectory(self));
        }

        ctx.to_virtual(result.kpgd_raw)?;

        Ok(result)
    }

    fn process_list_head<Driver>(ctx: &BootstrapContext<'_, Driver>) -> Result<Pa, WindowsError>
    where
        Driver: BootstrapDriver,
    {
        let driver = ctx.driver();
        let PsActiveProcessHead =
            driver.symbol_address(symbols::PsActiveProcessHead, ctx.paging_mode())?;

        // No page directory exists yet, the list head is read untranslated.
        let flink = driver.read_virtual_u32(AccessContext::untranslated(PsActiveProcessHead))?;
        tracing::trace!(%PsActiveProcessHead, flink = %Hex(flink), "active process list head");

        let links = driver.translate_address(Va(u64::from(flink)), ctx.paging_mode())?;

        links
            .checked_sub(ctx.profile().tasks_offset)
            .ok_or(WindowsError::CorruptedStruct("_EPROCESS.ActiveProcessLinks"))
    }

    fn initial_system_process<Driver>(
        ctx: &BootstrapContext<'_, Driver>,
    ) -> Result<Pa, WindowsError>
    where
        Driver: BootstrapDriver,
    {
        let driver = ctx.driver();
        let process =
            driver.read_symbol_u32(symbols::PsInitialSystemProcess, ctx.paging_mode())?;

        Ok(driver.translate_address(Va(u64::from(process)), ctx.paging_mode())?)
    }

    fn process_scan<Driver>(ctx: &BootstrapContext<'_, Driver>) -> Result<Pa, WindowsError>
    where
        Driver: BootstrapDriver,
    {
        let mut last_error = None;

        for name in &ctx.profile().scan_process_names {
            match ctx.driver().find_process_by_name(name) {
                Ok(process) => {
                    tracing::debug!(%name, %process, "process found by scan");
                    return Ok(process);
                }
                Err(err) => {
                    tracing::debug!(%name, %err, "process not found by scan");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or(VmiError::Other("no process names to scan for"))
            .into())
    }
}

impl std::fmt::Display for KpgdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ProcessListHead => write!(f, "process list head"),
            Self::InitialSystemProcess => write!(f, "initial system process"),
            Self::ProcessScan => write!(f, "process scan"),
        }
    }
}

/// Outcome of a successful [`KpgdStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryResult {
    /// The strategy that produced the result.
    pub strategy: KpgdStrategy,

    /// Physical address of the process control block.
    pub anchor: Pa,

    /// Page directory base read from the process control block, in
    /// frame-relative form.
    pub kpgd_raw: Pa,
}

impl DiscoveryResult {
    /// Returns `true` if the page directory base is set.
    pub fn is_valid(&self) -> bool {
        !self.kpgd_raw.is_null()
    }

    /// Returns the page directory base in kernel virtual form.
    ///
    /// Returns `None` if it lies beyond the end of the address space.
    pub fn kpgd(&self, page_offset: Va) -> Option<Va> {
        page_offset.checked_add(self.kpgd_raw.0)
    }
}

/// Resolves the kernel page directory by trying discovery strategies in
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpgdResolver {
    strategies: Vec<KpgdStrategy>,
}

impl Default for KpgdResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl KpgdResolver {
    /// Creates a resolver that tries every strategy in priority order.
    pub fn new() -> Self {
        Self::with_strategies(KpgdStrategy::ALL)
    }

    /// Creates a resolver that tries the given strategies in the given
    /// order.
    pub fn with_strategies(strategies: impl IntoIterator<Item = KpgdStrategy>) -> Self {
        Self {
            strategies: strategies.into_iter().collect(),
        }
    }

    /// Returns the strategies in the order they are tried.
    pub fn strategies(&self) -> &[KpgdStrategy] {
        &self.strategies
    }

    /// Returns the result of the first strategy that succeeds.
    ///
    /// Failures of individual strategies are logged and skipped. Fails with
    /// [`WindowsError::KpgdNotFound`] when no strategy succeeds.
    pub fn resolve<Driver>(
        &self,
        ctx: &BootstrapContext<'_, Driver>,
    ) -> Result<DiscoveryResult, WindowsError>
    where
        Driver: BootstrapDriver,
    {
        for &strategy in &self.strategies {
            match strategy.discover(ctx) {
                Ok(result) => {
                    tracing::info!(
                        %strategy,
                        anchor = %result.anchor,
                        kpgd_raw = %result.kpgd_raw,
                        "kernel page directory found"
                    );
                    return Ok(result);
                }
                Err(err) => {
                    tracing::debug!(%strategy, %err, "kernel page directory strategy failed");
                }
            }
        }

        tracing::error!(
            strategies = self.strategies.len(),
            "kernel page directory not found"
        );

        Err(WindowsError::KpgdNotFound)
    }
}
