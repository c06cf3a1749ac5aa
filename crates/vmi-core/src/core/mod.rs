mod access_context;
mod hex;
pub(crate) mod macros;
mod paging;

pub use self::{
    access_context::{AccessContext, Pa, TranslationMechanism, Va},
    hex::Hex,
    paging::PagingMode,
};
