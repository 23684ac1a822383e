//! Neon ASCII banner with a vertical gradient (COSMIC CRM).

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

const TITLE: &str = "COSMIC CRM";

/// Nebula Violet (#8a2be2).
pub const NEBULA_VIOLET: (u8, u8, u8) = (0x8a, 0x2b, 0xe2);
/// Star Gold (#ffd166).
pub const STAR_GOLD: (u8, u8, u8) = (0xff, 0xd1, 0x66);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Figlet art for the title, or the plain title if the font cannot render it.
fn title_art() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(TITLE).map(|figure| figure.to_string()))
        .unwrap_or_else(|| TITLE.to_string())
}

/// Prints the welcome banner: "COSMIC CRM" in figlet ASCII with a gradient from
/// Nebula Violet to Star Gold, then the version line.
pub fn print_welcome() {
    let mut out = stdout();
    let art = title_art();
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(NEBULA_VIOLET, STAR_GOLD, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: STAR_GOLD.0,
        g: STAR_GOLD.1,
        b: STAR_GOLD.2,
    }));
    let _ = out.execute(Print(format!("v{}  ✦  read the stars, keep the contacts\r\n", version)));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
