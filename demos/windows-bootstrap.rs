//! Bootstraps a synthetic 32-bit Windows guest.
//!
//! The guest is a handful of physical words kept in memory. Its kernel
//! symbols only resolve under PAE, so the bootstrap has to switch the
//! paging mode before it finds the kernel base.

use std::collections::HashMap;

use vmi_bootstrap::{
    AccessContext, Pa, PagingMode, TranslationMechanism, Va, VmiError, VmiProcessScanner,
    VmiRead, VmiSymbols, VmiTranslate,
    os::windows::{WindowsBootstrap, WindowsBootstrapConfig, symbols},
};

const PAGE_OFFSET: u64 = 0x8000_0000;

/// Guest memory snapshot.
struct Snapshot {
    memory: HashMap<Pa, u32>,
    symbols: HashMap<&'static str, Va>,
    processes: HashMap<&'static str, Pa>,
    paging_mode: PagingMode,
}

impl Snapshot {
    fn new() -> Self {
        let memory = HashMap::from([
            // PsActiveProcessHead.Flink -> System.ActiveProcessLinks
            (Pa(0x8055_a158), 0x8000_1088),
            // PsInitialSystemProcess
            (Pa(0x0055_a170), 0x8000_1000),
            // System.DirectoryTableBase
            (Pa(0x1018), 0x0003_9000),
            // System.ActiveProcessLinks.Flink
            (Pa(0x1088), 0x8000_5088),
        ]);

        let symbols = HashMap::from([
            (symbols::KernBase, Va(0x8040_0000)),
            (symbols::PsActiveProcessHead, Va(0x8055_a158)),
            (symbols::PsInitialSystemProcess, Va(0x8055_a170)),
        ]);

        let processes = HashMap::from([("System", Pa(0x1000))]);

        Self {
            memory,
            symbols,
            processes,
            paging_mode: PagingMode::Pae,
        }
    }
}

impl VmiRead for Snapshot {
    fn read_physical_u32(&self, address: Pa) -> Result<u32, VmiError> {
        self.memory
            .get(&address)
            .copied()
            .ok_or(VmiError::read(address))
    }

    fn read_virtual_u32(&self, ctx: AccessContext) -> Result<u32, VmiError> {
        let address = match ctx.mechanism {
            TranslationMechanism::Direct => Pa(ctx.address),
            TranslationMechanism::Paging { mode } => {
                self.translate_address(Va(ctx.address), mode)?
            }
        };

        self.read_physical_u32(address)
    }
}

impl VmiTranslate for Snapshot {
    fn translate_address(&self, va: Va, mode: PagingMode) -> Result<Pa, VmiError> {
        if mode != self.paging_mode {
            return Err(VmiError::page_fault(va));
        }

        // Direct mapping of the kernel.
        va.checked_sub(PAGE_OFFSET)
            .map(|frame| Pa(frame.0))
            .ok_or(VmiError::page_fault(va))
    }
}

impl VmiSymbols for Snapshot {
    fn symbol_address(&self, name: &str, mode: PagingMode) -> Result<Va, VmiError> {
        if mode != self.paging_mode {
            return Err(VmiError::symbol_not_found(name));
        }

        self.symbols
            .get(name)
            .copied()
            .ok_or_else(|| VmiError::symbol_not_found(name))
    }

    fn read_symbol_u32(&self, name: &str, mode: PagingMode) -> Result<u32, VmiError> {
        let address = self.symbol_address(name, mode)?;
        self.read_virtual_u32(AccessContext::kernel(address, mode))
    }
}

impl VmiProcessScanner for Snapshot {
    fn find_process_by_name(&self, name: &str) -> Result<Pa, VmiError> {
        self.processes
            .get(name)
            .copied()
            .ok_or_else(|| VmiError::ProcessNotFound(name.into()))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let config: WindowsBootstrapConfig = serde_json::from_str(
        r#"{
            "profile": {
                "pdbase_offset": 24,
                "tasks_offset": 136
            },
            "paging_mode": "legacy",
            "process_list": "best_effort"
        }"#,
    )?;

    tracing::debug!(?config);

    let snapshot = Snapshot::new();
    let bootstrap = WindowsBootstrap::from_config(config);
    let state = bootstrap.run(&snapshot)?;

    println!("Kernel base:    {}", state.kernel_base_va());
    println!("Paging mode:    {}", state.paging_mode());
    println!("Found by:       {}", state.strategy());
    println!("Anchor:         {}", state.anchor());
    println!("KPGD:           {}", state.kpgd());

    match state.init_task() {
        Some(head) => println!("Process list:   {} -> {}", head.entry, head.flink),
        None => println!("Process list:   unavailable"),
    }

    // The scan does not depend on translation at all.
    let kpgd = bootstrap.scan_page_directory(&snapshot)?;
    println!("Scanned KPGD:   {kpgd}");

    Ok(())
}
