//! Structural problems found while compiling a map. None of these stop the
//! build; they are collected and announced once the BSP has been built.

use glam::DVec2;
use log::{info, warn};

use crate::handle::{LineId, SectorId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnclosedSector {
    pub sector: SectorId,
    /// Approximate position of the gap
    pub near: DVec2,
}

/// A one-sided line which looks through into another sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEffect {
    pub line: LineId,
    /// The sector behind the line, which is also the line's own front sector
    pub back_sector: SectorId,
    /// The sector visible through the line
    pub front_sector: SectorId,
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    unclosed: Vec<UnclosedSector>,
    window_effects: Vec<WindowEffect>,
}

impl Diagnostics {
    /// Record that `sector` is not closed near `(x, y)`. A sector is only
    /// recorded once; registering it again still returns `true`.
    pub fn register_unclosed_sector_near(&mut self, sector: SectorId, x: f64, y: f64) -> bool {
        if self.unclosed.iter().any(|u| u.sector == sector) {
            return true;
        }
        self.unclosed.push(UnclosedSector {
            sector,
            near: DVec2::new(x, y),
        });
        true
    }

    pub(crate) fn add_window_effect(&mut self, effect: WindowEffect) {
        self.window_effects.push(effect);
    }

    pub fn unclosed_sectors(&self) -> &[UnclosedSector] {
        &self.unclosed
    }

    pub fn window_effects(&self) -> &[WindowEffect] {
        &self.window_effects
    }

    pub fn is_empty(&self) -> bool {
        self.unclosed.is_empty() && self.window_effects.is_empty()
    }

    /// Announce everything found so far
    pub fn print(&self) {
        for usec in &self.unclosed {
            warn!(
                "Sector {} is unclosed near ({:.1},{:.1})",
                usec.sector, usec.near.x, usec.near.y
            );
        }
        if !self.window_effects.is_empty() {
            info!(
                "Found {} one-sided window lines",
                self.window_effects.len()
            );
        }
    }

    pub(crate) fn clear(&mut self) {
        self.unclosed.clear();
        self.window_effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Diagnostics;
    use crate::handle::SectorId;

    #[test]
    fn unclosed_registered_once() {
        let mut diag = Diagnostics::default();
        let sec = SectorId::new(2).unwrap();
        assert!(diag.register_unclosed_sector_near(sec, 1.0, 2.0));
        assert!(diag.register_unclosed_sector_near(sec, 5.0, 5.0));
        assert_eq!(diag.unclosed_sectors().len(), 1);
        assert_eq!(diag.unclosed_sectors()[0].near.x, 1.0);

        diag.clear();
        assert!(diag.is_empty());
    }
}
