//! Core VMI functionality.
//!
//! Address types, access contexts, the error type and the collaborator
//! traits shared by the OS-specific crates.

mod core;
mod driver;
mod error;
pub mod os;

pub use self::{
    core::{AccessContext, Hex, Pa, PagingMode, TranslationMechanism, Va},
    driver::{VmiRead, VmiTranslate},
    error::{PageFault, PageFaults, VmiError},
    os::{VmiProcessScanner, VmiSymbols},
};
