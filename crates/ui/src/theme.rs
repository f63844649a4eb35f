use swimlane_protocol::{Paint, ThemeToken};

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
    .to_color32()
}

/// Data colors are kept as-is in both modes; step text stays dark on them.
pub fn resolve_paint(paint: Paint, mode: ThemeMode) -> egui::Color32 {
    match paint {
        Paint::Theme(token) => resolve(token, mode),
        Paint::Custom(color) => {
            let [r, g, b, a] = color.to_rgba8();
            egui::Color32::from_rgba_unmultiplied(r, g, b, a)
        }
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Catppuccin Mocha palette
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0x11, 0x11, 0x1b), // Crust
        TitleText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),  // Text

        LaneBackground => ResolvedColor::rgb(0x1e, 0x1e, 0x2e), // Base
        LaneBorder => ResolvedColor::rgb(0x31, 0x32, 0x44),     // Surface0
        LaneHeaderBackground => ResolvedColor::rgb(0x18, 0x18, 0x25), // Mantle
        LaneHeaderText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),

        // Step boxes keep a light fill so data colors read the same in both modes.
        StepFill => ResolvedColor::rgb(0xf5, 0xf5, 0xf7),
        StepBorder => ResolvedColor::rgb(0x6c, 0x70, 0x86), // Overlay0
        StepText => ResolvedColor::rgb(0x1e, 0x1e, 0x2e),
        StepValueText => ResolvedColor::rgb(0x45, 0x47, 0x5a), // Surface1

        Connector => ResolvedColor::rgb(0x7f, 0x84, 0x9c), // Overlay1

        HoverHighlight => ResolvedColor::rgba(0x89, 0xb4, 0xfa, 90), // Blue

        TooltipBackground => ResolvedColor::rgb(0x31, 0x32, 0x44),
        TooltipText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),

        ErrorText => ResolvedColor::rgb(0xf3, 0x8b, 0xa8), // Red
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(255, 255, 255),
        TitleText => ResolvedColor::rgb(20, 20, 30),

        LaneBackground => ResolvedColor::rgb(240, 240, 240),
        LaneBorder => ResolvedColor::rgb(210, 210, 220),
        LaneHeaderBackground => ResolvedColor::rgb(228, 228, 234),
        LaneHeaderText => ResolvedColor::rgb(40, 40, 50),

        StepFill => ResolvedColor::rgb(255, 255, 255),
        StepBorder => ResolvedColor::rgb(153, 153, 153),
        StepText => ResolvedColor::rgb(20, 20, 30),
        StepValueText => ResolvedColor::rgb(85, 85, 102),

        Connector => ResolvedColor::rgb(187, 187, 187),

        HoverHighlight => ResolvedColor::rgba(0, 0, 0, 25),

        TooltipBackground => ResolvedColor::rgb(34, 34, 51),
        TooltipText => ResolvedColor::rgb(255, 255, 255),

        ErrorText => ResolvedColor::rgb(192, 57, 43),
    }
}
