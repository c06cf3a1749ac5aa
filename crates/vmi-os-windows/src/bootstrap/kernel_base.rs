use vmi_core::Pa;

use super::{BootstrapContext, BootstrapDriver};
use crate::{WindowsError, offsets::symbols};

/// Locates the load address of the kernel image.
pub struct KernelBaseLocator;

impl KernelBaseLocator {
    /// Resolves the `KernBase` symbol and returns the kernel base in
    /// frame-relative form.
    ///
    /// If the symbol cannot be resolved under the assumed paging mode, the
    /// mode is switched and the lookup is retried once. The switch is
    /// permanent for the rest of the bootstrap, whether or not the retry
    /// succeeds. A second failure is returned as is.
    pub fn locate<Driver>(ctx: &mut BootstrapContext<'_, Driver>) -> Result<Pa, WindowsError>
    where
        Driver: BootstrapDriver,
    {
        let kernel_base = match ctx
            .driver()
            .symbol_address(symbols::KernBase, ctx.paging_mode())
        {
            Ok(kernel_base) => kernel_base,
            Err(err) => {
                let paging_mode = ctx.switch_paging_mode()?;

                tracing::debug!(
                    %err,
                    %paging_mode,
                    "kernel base not found, switching paging mode"
                );

                ctx.driver()
                    .symbol_address(symbols::KernBase, paging_mode)
                    .inspect_err(|err| tracing::error!(%err, "kernel base not found"))?
            }
        };

        let kernel_base = ctx.to_frame_relative(kernel_base)?;
        tracing::debug!(%kernel_base, paging_mode = %ctx.paging_mode(), "kernel base");
        Ok(kernel_base)
    }
}
