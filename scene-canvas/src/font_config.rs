use std::collections::HashSet;
use std::path::PathBuf;

/// Font configuration shared by every surface of a render.
///
/// Converted into a [`fontdb::Database`] with [`FontConfig::to_fontdb`]; the
/// same database backs text measurement, raster glyph outlines and the
/// SVG-to-PDF conversion.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Mappings from generic family names to concrete font family names.
    pub generic_families: GenericFamilyMap,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// Concrete families for the generic names, in priority order.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub serif: Vec<String>,
    pub sans_serif: Vec<String>,
    pub monospace: Vec<String>,
}

impl GenericFamilyMap {
    pub fn defaults() -> Self {
        Self {
            sans_serif: vec![
                "Arial".into(),
                "Helvetica".into(),
                "Liberation Sans".into(),
                "DejaVu Sans".into(),
            ],
            monospace: vec![
                "Courier New".into(),
                "Courier".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
            serif: vec![
                "Times New Roman".into(),
                "Times".into(),
                "Liberation Serif".into(),
                "DejaVu Serif".into(),
            ],
        }
    }
}

impl FontConfig {
    /// A configuration with no fonts at all. Text measures as zero-width and
    /// draws nothing; useful for deterministic tests.
    pub fn empty() -> Self {
        Self {
            load_system_fonts: false,
            ..Self::default()
        }
    }

    /// Build the font database described by this configuration.
    pub fn to_fontdb(&self) -> fontdb::Database {
        let mut db = fontdb::Database::new();

        if self.load_system_fonts {
            db.load_system_fonts();
        }

        for dir in &self.font_dirs {
            db.load_fonts_dir(dir);
        }

        apply_generic_families(&mut db, &self.generic_families);
        log::debug!(target: "canvas", "font database has {} faces", db.len());
        db
    }
}

/// Point each generic family at the first available concrete family.
fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| {
            face.families
                .iter()
                .map(|(fam, _lang)| fam.clone())
                .collect::<Vec<_>>()
        })
        .collect();

    let first_available =
        |candidates: &[String]| candidates.iter().find(|f| available.contains(*f)).cloned();

    if let Some(family) = first_available(&families.sans_serif) {
        db.set_sans_serif_family(family);
    }
    if let Some(family) = first_available(&families.monospace) {
        db.set_monospace_family(family);
    }
    if let Some(family) = first_available(&families.serif) {
        db.set_serif_family(family);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_config() {
        let config = FontConfig::default();
        assert!(config.load_system_fonts);
        assert!(config.font_dirs.is_empty());
        assert_eq!(config.generic_families.sans_serif[0], "Arial");
    }

    #[test]
    fn test_empty_config_has_no_faces() {
        let db = FontConfig::empty().to_fontdb();
        assert_eq!(db.faces().count(), 0);
    }
}
