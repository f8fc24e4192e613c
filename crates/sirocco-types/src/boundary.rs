//! Boundary-condition kinds and their stable wire codes.
//!
//! The codes and names match the mesh-file convention used by the flow
//! solver; both are stable interfaces (restart files and mesh exports
//! reference them), so the mapping here must never be renumbered.

use serde::{Deserialize, Serialize};

/// The closed set of boundary-condition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    SubInSimp,
    SubOutSimp,
    SubInChar,
    SubOutChar,
    SupIn,
    SupOut,
    SlipWall,
    Cyclic,
    IsothermFix,
    AdiabatFix,
    IsothermMove,
    AdiabatMove,
    Char,
    SlipWallDual,
    AdWall,
}

impl BoundaryKind {
    /// All kinds, in wire-code order.
    pub const ALL: [BoundaryKind; 15] = [
        Self::SubInSimp,
        Self::SubOutSimp,
        Self::SubInChar,
        Self::SubOutChar,
        Self::SupIn,
        Self::SupOut,
        Self::SlipWall,
        Self::Cyclic,
        Self::IsothermFix,
        Self::AdiabatFix,
        Self::IsothermMove,
        Self::AdiabatMove,
        Self::Char,
        Self::SlipWallDual,
        Self::AdWall,
    ];

    /// Returns the stable wire code for this kind.
    pub fn code(self) -> i32 {
        match self {
            Self::SubInSimp => 1,
            Self::SubOutSimp => 2,
            Self::SubInChar => 3,
            Self::SubOutChar => 4,
            Self::SupIn => 5,
            Self::SupOut => 6,
            Self::SlipWall => 7,
            Self::Cyclic => 9,
            Self::IsothermFix => 11,
            Self::AdiabatFix => 12,
            Self::IsothermMove => 13,
            Self::AdiabatMove => 14,
            Self::Char => 15,
            Self::SlipWallDual => 16,
            Self::AdWall => 50,
        }
    }

    /// Looks up a kind from its wire code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.code() == code)
    }

    /// Returns the mesh-file name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::SubInSimp => "Sub_In_Simp",
            Self::SubOutSimp => "Sub_Out_Simp",
            Self::SubInChar => "Sub_In_Char",
            Self::SubOutChar => "Sub_Out_Char",
            Self::SupIn => "Sup_In",
            Self::SupOut => "Sup_Out",
            Self::SlipWall => "Slip_Wall",
            Self::Cyclic => "Cyclic",
            Self::IsothermFix => "Isotherm_Fix",
            Self::AdiabatFix => "Adiabat_Fix",
            Self::IsothermMove => "Isotherm_Move",
            Self::AdiabatMove => "Adiabat_Move",
            Self::Char => "Char",
            Self::SlipWallDual => "Slip_Wall_Dual",
            Self::AdWall => "AD_Wall",
        }
    }

    /// Looks up a kind from its mesh-file name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Returns true for wall kinds whose vertices follow prescribed motion.
    pub fn is_moving_wall(self) -> bool {
        matches!(self, Self::IsothermMove | Self::AdiabatMove)
    }
}
