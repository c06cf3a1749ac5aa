use serde::{Deserialize, Serialize};

/// The paging layout assumed for a 32-bit guest kernel.
///
/// A 32-bit Windows kernel runs either with the classic two-level page
/// tables or with Physical Address Extension (PAE). Nothing in guest
/// memory tells the bootstrap which one is active before the kernel
/// page directory is known, so the mode starts as an assumption and is
/// corrected empirically (see [`toggled`]).
///
/// [`toggled`]: Self::toggled
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PagingMode {
    /// Two-level, 32-bit page tables (PAE disabled).
    #[default]
    Legacy,

    /// Three-level page tables with Physical Address Extension.
    Pae,
}

impl PagingMode {
    /// Creates a paging mode from a PAE flag.
    pub const fn from_pae(pae: bool) -> Self {
        if pae { Self::Pae } else { Self::Legacy }
    }

    /// Returns `true` if PAE is enabled.
    pub const fn is_pae(self) -> bool {
        matches!(self, Self::Pae)
    }

    /// Returns the opposite paging mode.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Legacy => Self::Pae,
            Self::Pae => Self::Legacy,
        }
    }
}

impl std::fmt::Display for PagingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Pae => write!(f, "pae"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PagingMode;

    #[test]
    fn toggled_is_an_involution() {
        for mode in [PagingMode::Legacy, PagingMode::Pae] {
            assert_ne!(mode.toggled(), mode);
            assert_eq!(mode.toggled().toggled(), mode);
        }
    }

    #[test]
    fn pae_flag_round_trips() {
        assert_eq!(PagingMode::from_pae(true), PagingMode::Pae);
        assert_eq!(PagingMode::from_pae(false), PagingMode::Legacy);
        assert!(PagingMode::Pae.is_pae());
        assert!(!PagingMode::default().is_pae());
    }
}
