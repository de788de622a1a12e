//! The fixed caption color palette.

use serde::Serialize;

/// Alpha suffix appended to the background color in transparent mode.
pub const TRANSPARENT_ALPHA_SUFFIX: &str = "c0";

/// A named background/foreground color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub name: &'static str,
    pub bg: &'static str,
    pub fg: &'static str,
    /// Foreground to use instead of `fg` when the background is translucent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_if_transparent: Option<&'static str>,
}

const fn scheme(name: &'static str, bg: &'static str, fg: &'static str) -> ColorScheme {
    ColorScheme {
        name,
        bg,
        fg,
        fg_if_transparent: None,
    }
}

static PALETTE: [ColorScheme; 16] = [
    ColorScheme {
        name: "white",
        bg: "#ffffff",
        fg: "#000000",
        fg_if_transparent: Some("#ffffff"),
    },
    scheme("black", "#000000", "#ffffff"),
    scheme("red", "#ea403f", "#ffffff"),
    scheme("orange", "#ff933d", "#ffffff"),
    scheme("yellow", "#f2cd46", "#000000"),
    scheme("lime-green", "#78c25e", "#ffffff"),
    scheme("teal", "#77c8a6", "#ffffff"),
    scheme("light-blue", "#3496f0", "#ffffff"),
    scheme("dark-blue", "#2344b2", "#ffffff"),
    scheme("violet", "#5756d4", "#ffffff"),
    scheme("pink", "#f7d7e9", "#000000"),
    scheme("brown", "#a3895b", "#ffffff"),
    scheme("dark-green", "#32523b", "#ffffff"),
    scheme("blue-gray", "#2f688c", "#ffffff"),
    scheme("light-gray", "#92979e", "#000000"),
    scheme("dark-gray", "#333333", "#ffffff"),
];

/// Background and foreground CSS colors for painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColors {
    pub background: String,
    pub foreground: String,
}

impl ColorScheme {
    pub fn resolve(&self, transparent: bool) -> ResolvedColors {
        if transparent {
            ResolvedColors {
                background: format!("{}{}", self.bg, TRANSPARENT_ALPHA_SUFFIX),
                foreground: self.fg_if_transparent.unwrap_or(self.fg).to_string(),
            }
        } else {
            ResolvedColors {
                background: self.bg.to_string(),
                foreground: self.fg.to_string(),
            }
        }
    }
}

/// All palette entries in display order.
pub fn palette() -> &'static [ColorScheme] {
    &PALETTE
}

pub fn color_scheme(name: &str) -> Option<&'static ColorScheme> {
    PALETTE.iter().find(|scheme| scheme.name == name)
}

/// Look up `name`, falling back to the first entry (`white`).
pub fn color_scheme_or_default(name: &str) -> &'static ColorScheme {
    color_scheme(name).unwrap_or_else(|| {
        log::warn!("Unknown color scheme {name:?}, using {}", PALETTE[0].name);
        &PALETTE[0]
    })
}
