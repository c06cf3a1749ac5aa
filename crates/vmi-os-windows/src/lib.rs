//! # Windows kernel bootstrap
//!
//! This crate locates the two things every other Windows introspection
//! operation depends on: the kernel page directory (KPGD) and the head of
//! the active process list. It works on a 32-bit guest about which nothing
//! is known yet, not even how to translate its virtual addresses.
//!
//! ## Overview
//!
//! - [`KernelBaseLocator`] resolves the kernel image base and settles the
//!   paging mode (PAE on/off) on the way.
//! - [`KpgdResolver`] runs the [`KpgdStrategy`] cascade: the active process
//!   list head, the `PsInitialSystemProcess` pointer and finally a scan of
//!   physical memory. The first strategy that yields a non-zero page
//!   directory wins.
//! - [`ProcessListAnchorExtractor`] reads the process list head from the
//!   process control block the winning strategy found.
//! - [`WindowsBootstrap`] runs the three in sequence and produces an
//!   immutable [`WindowsKernelState`].
//!
//! Memory reads, address translation, symbol resolution and process
//! scanning are provided by the caller through the collaborator traits of
//! `vmi-core`, bundled as [`BootstrapDriver`].
//!
//! ## Profiles
//!
//! Structure offsets come from a [`WindowsProfile`]. The profile must match
//! the guest build. A wrong profile is not detected and yields a
//! well-formed but meaningless result.

// Allow Windows-specific naming conventions to be used throughout this module.
#![allow(
    non_snake_case,         // example: PsActiveProcessHead
    non_upper_case_globals, // example: KernBase
)]

mod bootstrap;
pub use self::bootstrap::{
    BootstrapContext, BootstrapDriver, BootstrapStage, DiscoveryResult, KernelBaseLocator,
    KpgdResolver, KpgdStrategy, ProcessListAnchorExtractor, ProcessListHead, WindowsBootstrap,
    WindowsKernelState,
};

mod config;
pub use self::config::{ProcessListPolicy, WindowsBootstrapConfig};

mod error;
pub use self::error::WindowsError;

mod offsets;
pub use self::offsets::{Offsets, symbols};

mod profile;
pub use self::profile::WindowsProfile;
