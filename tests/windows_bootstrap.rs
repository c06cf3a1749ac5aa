use std::collections::HashMap;

use vmi_bootstrap::{
    AccessContext, Pa, PagingMode, Va, VmiError, VmiProcessScanner, VmiRead, VmiSymbols,
    VmiTranslate,
    os::windows::{
        BootstrapStage, KpgdStrategy, ProcessListPolicy, WindowsBootstrap,
        WindowsBootstrapConfig, WindowsError, symbols,
    },
};

/// A guest whose kernel is only reachable through the physical process
/// scan.
#[derive(Default)]
struct Guest {
    memory: HashMap<Pa, u32>,
    symbols: HashMap<String, Va>,
    processes: HashMap<String, Pa>,
}

impl Guest {
    fn new() -> Self {
        let mut guest = Self::default();
        guest.symbols.insert(symbols::KernBase.into(), Va(0x8040_0000));
        guest.processes.insert("Idle".into(), Pa(0x5000));
        guest.memory.insert(Pa(0x5018), 0x3000);
        guest.memory.insert(Pa(0x5088), 0x8000_6088);
        guest
    }
}

impl VmiRead for Guest {
    fn read_physical_u32(&self, address: Pa) -> Result<u32, VmiError> {
        self.memory
            .get(&address)
            .copied()
            .ok_or(VmiError::read(address))
    }

    fn read_virtual_u32(&self, ctx: AccessContext) -> Result<u32, VmiError> {
        Err(VmiError::read(ctx))
    }
}

impl VmiTranslate for Guest {
    fn translate_address(&self, va: Va, _mode: PagingMode) -> Result<Pa, VmiError> {
        Err(VmiError::page_fault(va))
    }
}

impl VmiSymbols for Guest {
    fn symbol_address(&self, name: &str, _mode: PagingMode) -> Result<Va, VmiError> {
        self.symbols
            .get(name)
            .copied()
            .ok_or_else(|| VmiError::symbol_not_found(name))
    }

    fn read_symbol_u32(&self, name: &str, _mode: PagingMode) -> Result<u32, VmiError> {
        Err(VmiError::symbol_not_found(name))
    }
}

impl VmiProcessScanner for Guest {
    fn find_process_by_name(&self, name: &str) -> Result<Pa, VmiError> {
        self.processes
            .get(name)
            .copied()
            .ok_or_else(|| VmiError::ProcessNotFound(name.into()))
    }
}

fn config(json: &str) -> WindowsBootstrapConfig {
    serde_json::from_str(json).expect("valid config")
}

#[test]
fn bootstrap_from_json_config() -> Result<(), WindowsError> {
    let config = config(
        r#"{
            "profile": { "pdbase_offset": 24, "tasks_offset": 136 }
        }"#,
    );

    assert_eq!(config.page_offset, Va(0x8000_0000));
    assert_eq!(config.paging_mode, PagingMode::Legacy);
    assert_eq!(config.process_list, ProcessListPolicy::Required);
    assert_eq!(config.strategies, KpgdStrategy::ALL);

    let state = WindowsBootstrap::from_config(config).run(&Guest::new())?;

    assert_eq!(state.strategy(), KpgdStrategy::ProcessScan);
    assert_eq!(state.anchor(), Pa(0x5000));
    assert_eq!(state.kpgd(), Va(0x8000_3000));
    assert_eq!(state.init_task().map(|head| head.entry), Some(Pa(0x5088)));
    assert_eq!(
        state.init_task().map(|head| head.flink),
        Some(Va(0x8000_6088))
    );
    Ok(())
}

#[test]
fn configured_strategies_limit_discovery() {
    let config = config(
        r#"{
            "profile": { "pdbase_offset": 24, "tasks_offset": 136 },
            "strategies": ["process_list_head", "initial_system_process"]
        }"#,
    );

    let err = WindowsBootstrap::from_config(config)
        .run(&Guest::new())
        .unwrap_err();

    match err {
        WindowsError::BootstrapFailed { stage, source } => {
            assert_eq!(stage, BootstrapStage::KernelPageDirectory);
            assert!(matches!(*source, WindowsError::KpgdNotFound));
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn configured_scan_offset_and_names() -> Result<(), WindowsError> {
    let config = config(
        r#"{
            "profile": {
                "pdbase_offset": 24,
                "tasks_offset": 136,
                "scan_pdbase_offset": 40,
                "scan_process_names": ["System"]
            },
            "process_list": "best_effort"
        }"#,
    );

    let mut guest = Guest::new();
    guest.processes.insert("System".into(), Pa(0x6000));
    guest.memory.insert(Pa(0x6028), 0x4000);

    let state = WindowsBootstrap::from_config(config).run(&guest)?;

    assert_eq!(state.anchor(), Pa(0x6000));
    assert_eq!(state.kpgd(), Va(0x8000_4000));
    assert_eq!(state.init_task(), None);
    Ok(())
}

#[test]
fn config_round_trips_through_json() {
    let config = config(
        r#"{
            "profile": { "pdbase_offset": 24, "tasks_offset": 136 },
            "page_offset": 3221225472,
            "paging_mode": "pae"
        }"#,
    );

    assert_eq!(config.page_offset, Va(0xc000_0000));
    assert!(config.paging_mode.is_pae());

    let json = serde_json::to_string(&config).expect("serializable config");
    assert_eq!(self::config(&json), config);
}

#[test]
fn bootstrap_error_names_the_failed_stage() {
    let config = config(r#"{ "profile": { "pdbase_offset": 24, "tasks_offset": 136 } }"#);

    let err = WindowsBootstrap::from_config(config)
        .run(&Guest::default())
        .unwrap_err();

    assert!(err.to_string().contains("kernel base"));
}
