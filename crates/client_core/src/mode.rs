//! Light/dark mode: one flag, applied to every themed region at once.

use std::collections::HashMap;

use shared::domain::{ModeRegion, VisualMode};
use tracing::info;

pub trait ThemeSurface {
    fn set_region_mode(&mut self, region: ModeRegion, mode: VisualMode);
    fn set_toggle_label(&mut self, label: &str);
}

/// Every write goes to all of [`ModeRegion::ALL`], so the regions never
/// disagree.
#[derive(Debug, Clone)]
pub struct ModeToggleController {
    mode: VisualMode,
}

impl ModeToggleController {
    pub fn new() -> Self {
        Self {
            mode: VisualMode::Dark,
        }
    }

    pub fn mode(&self) -> VisualMode {
        self.mode
    }

    /// Start-up always lands in dark mode, whatever the surface showed before.
    pub fn initialize<S: ThemeSurface + ?Sized>(&mut self, surface: &mut S) {
        self.mode = VisualMode::Dark;
        self.apply(surface);
    }

    pub fn toggle<S: ThemeSurface + ?Sized>(&mut self, surface: &mut S) -> VisualMode {
        self.mode = self.mode.flipped();
        self.apply(surface);
        info!(mode = ?self.mode, "visual mode toggled");
        self.mode
    }

    fn apply<S: ThemeSurface + ?Sized>(&self, surface: &mut S) {
        for region in ModeRegion::ALL {
            surface.set_region_mode(region, self.mode);
        }
        surface.set_toggle_label(self.mode.toggle_label());
    }
}

impl Default for ModeToggleController {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory theme surface: remembers the mode last written to each region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionModes {
    modes: HashMap<ModeRegion, VisualMode>,
    toggle_label: String,
}

impl RegionModes {
    /// Regions never written read as dark, matching a page with no
    /// `light-mode` class.
    pub fn mode_of(&self, region: ModeRegion) -> VisualMode {
        self.modes.get(&region).copied().unwrap_or_default()
    }

    pub fn toggle_label(&self) -> &str {
        &self.toggle_label
    }

    pub fn all_agree(&self) -> bool {
        let first = self.mode_of(ModeRegion::ALL[0]);
        ModeRegion::ALL.iter().all(|r| self.mode_of(*r) == first)
    }
}

impl ThemeSurface for RegionModes {
    fn set_region_mode(&mut self, region: ModeRegion, mode: VisualMode) {
        self.modes.insert(region, mode);
    }

    fn set_toggle_label(&mut self, label: &str) {
        self.toggle_label = label.to_string();
    }
}
