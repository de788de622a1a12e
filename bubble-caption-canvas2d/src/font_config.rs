//! Font sources for canvases, resolved once into a shared font database.

use std::path::PathBuf;
use std::sync::Arc;

/// Families tried, in order, for the generic `sans-serif` family.
const DEFAULT_SANS_SERIF: &[&str] = &[
    "Montserrat",
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
];

/// Where a canvas finds its fonts.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Scan the platform's installed fonts.
    pub load_system_fonts: bool,
    /// Extra directories scanned recursively for font files.
    pub font_dirs: Vec<PathBuf>,
    /// TTF/OTF files held in memory.
    pub font_data: Vec<Arc<Vec<u8>>>,
    /// Concrete families for the generic `sans-serif` family, first match wins.
    pub sans_serif: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_dirs: Vec::new(),
            font_data: Vec::new(),
            sans_serif: DEFAULT_SANS_SERIF.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FontConfig {
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    pub fn with_font_data(mut self, data: Vec<u8>) -> Self {
        self.font_data.push(Arc::new(data));
        self
    }

    /// Scan every source and build the font database.
    pub fn resolve(&self) -> ResolvedFontConfig {
        let mut db = fontdb::Database::new();
        if self.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &self.font_dirs {
            log::info!("Loading fonts from {}", dir.display());
            db.load_fonts_dir(dir);
        }
        for data in &self.font_data {
            db.load_font_data(data.as_ref().clone());
        }

        let sans_serif = self
            .sans_serif
            .iter()
            .find(|family| has_family(&db, family))
            .cloned();
        if let Some(family) = &sans_serif {
            db.set_sans_serif_family(family.as_str());
        }
        log::debug!("Resolved {} font faces", db.len());

        ResolvedFontConfig {
            fontdb: db,
            sans_serif,
        }
    }
}

/// A scanned font database. Cloning copies the in-memory face list without
/// touching the filesystem.
#[derive(Clone)]
pub struct ResolvedFontConfig {
    pub(crate) fontdb: fontdb::Database,
    sans_serif: Option<String>,
}

impl ResolvedFontConfig {
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    pub fn has_family(&self, family: &str) -> bool {
        has_family(&self.fontdb, family)
    }

    /// The concrete family standing in for `sans-serif`, if any was found.
    pub fn sans_serif_family(&self) -> Option<&str> {
        self.sans_serif.as_deref()
    }
}

fn has_family(db: &fontdb::Database, family: &str) -> bool {
    db.faces()
        .any(|face| face.families.iter().any(|(name, _)| name == family))
}
