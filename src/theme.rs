//! Colours: One Dark defaults plus high-contrast and colour-blind variants.

use crate::Palette;
use crate::piece::PuyoColor;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours, indexed by `PuyoColor::index`: blue, red, green, yellow, purple.
    pub puyo: [Color; 5],
    /// Well background.
    pub bg: Color,
    /// Borders.
    pub div_line: Color,
    /// Body text.
    pub main_fg: Color,
    /// Titles and highlights.
    pub title: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark()
    }
}

impl Theme {
    /// One Dark hex values.
    pub fn onedark() -> Self {
        Self {
            puyo: [
                Color::Rgb(0x61, 0xAF, 0xEF), // blue
                Color::Rgb(0xE0, 0x6C, 0x75), // red
                Color::Rgb(0x98, 0xC3, 0x79), // green
                Color::Rgb(0xE5, 0xC0, 0x7B), // yellow
                Color::Rgb(0xC6, 0x78, 0xDD), // magenta
            ],
            bg: Color::Rgb(0x31, 0x35, 0x3F),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
        }
    }

    pub fn for_palette(palette: Palette) -> Self {
        let mut theme = Self::onedark();
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                theme.puyo = [
                    Color::Rgb(0x00, 0x66, 0xFF),
                    Color::Rgb(0xFF, 0x00, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                ];
                theme.bg = Color::Black;
                theme.div_line = Color::White;
                theme.main_fg = Color::White;
            }
            Palette::Colorblind => {
                // Okabe-Ito
                theme.puyo = [
                    Color::Rgb(0x00, 0x72, 0xB2),
                    Color::Rgb(0xD5, 0x5E, 0x00),
                    Color::Rgb(0x00, 0x9E, 0x73),
                    Color::Rgb(0xF0, 0xE4, 0x42),
                    Color::Rgb(0xCC, 0x79, 0xA7),
                ];
            }
        }
        theme
    }

    pub fn puyo_color(&self, color: PuyoColor) -> Color {
        self.puyo[color.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_palette_keeps_colours_distinct() {
        for palette in [Palette::Normal, Palette::HighContrast, Palette::Colorblind] {
            let theme = Theme::for_palette(palette);
            for a in PuyoColor::ALL {
                for b in PuyoColor::ALL {
                    if a != b {
                        assert_ne!(theme.puyo_color(a), theme.puyo_color(b), "{palette:?}");
                    }
                }
            }
        }
    }
}
