//! Light and dark palettes for the four themed regions.

use eframe::egui;
use shared::domain::{ModeRegion, VisualMode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionPalette {
    pub fill: egui::Color32,
    pub text: egui::Color32,
    pub muted: egui::Color32,
    pub stroke: egui::Color32,
}

pub fn palette_for(region: ModeRegion, mode: VisualMode) -> RegionPalette {
    match (mode, region) {
        (VisualMode::Dark, ModeRegion::Body) => RegionPalette {
            fill: egui::Color32::from_rgb(18, 18, 18),
            text: egui::Color32::from_rgb(230, 230, 230),
            muted: egui::Color32::from_rgb(150, 150, 150),
            stroke: egui::Color32::from_rgb(48, 48, 48),
        },
        (VisualMode::Dark, ModeRegion::Navbar) | (VisualMode::Dark, ModeRegion::Footer) => {
            RegionPalette {
                fill: egui::Color32::from_rgb(31, 31, 36),
                text: egui::Color32::WHITE,
                muted: egui::Color32::from_rgb(160, 160, 170),
                stroke: egui::Color32::from_rgb(60, 60, 68),
            }
        }
        (VisualMode::Dark, ModeRegion::CountryInfo) => RegionPalette {
            fill: egui::Color32::from_rgb(40, 40, 46),
            text: egui::Color32::WHITE,
            muted: egui::Color32::from_rgb(175, 175, 185),
            stroke: egui::Color32::from_rgb(70, 70, 80),
        },
        (VisualMode::Light, ModeRegion::Body) => RegionPalette {
            fill: egui::Color32::from_rgb(245, 245, 245),
            text: egui::Color32::from_rgb(20, 20, 20),
            muted: egui::Color32::from_rgb(100, 100, 100),
            stroke: egui::Color32::from_rgb(210, 210, 210),
        },
        (VisualMode::Light, ModeRegion::Navbar) | (VisualMode::Light, ModeRegion::Footer) => {
            RegionPalette {
                fill: egui::Color32::from_rgb(225, 228, 235),
                text: egui::Color32::from_rgb(25, 25, 35),
                muted: egui::Color32::from_rgb(90, 90, 105),
                stroke: egui::Color32::from_rgb(195, 198, 208),
            }
        }
        (VisualMode::Light, ModeRegion::CountryInfo) => RegionPalette {
            fill: egui::Color32::WHITE,
            text: egui::Color32::from_rgb(20, 20, 20),
            muted: egui::Color32::from_rgb(95, 95, 95),
            stroke: egui::Color32::from_rgb(220, 220, 220),
        },
    }
}

/// Widget visuals follow the body region's mode.
pub fn visuals_for(mode: VisualMode) -> egui::Visuals {
    match mode {
        VisualMode::Dark => egui::Visuals::dark(),
        VisualMode::Light => egui::Visuals::light(),
    }
}

pub fn error_text_color(mode: VisualMode) -> egui::Color32 {
    match mode {
        VisualMode::Dark => egui::Color32::from_rgb(255, 120, 120),
        VisualMode::Light => egui::Color32::from_rgb(180, 30, 30),
    }
}
