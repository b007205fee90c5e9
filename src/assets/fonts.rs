use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::digest_u64;
use crate::scene::style::{FontFamily, GenericFamily};

/// Environment variable holding extra font directories, separated like `PATH`.
pub const FONT_DIR_ENV: &str = "ANIVER_FONT_DIR";

/// Where faces are loaded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSources {
    /// Directories scanned (non-recursively) for `.ttf`, `.otf` and `.ttc` files.
    pub dirs: Vec<PathBuf>,
    /// Also load the platform's installed fonts.
    pub system: bool,
}

impl Default for FontSources {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            system: true,
        }
    }
}

impl FontSources {
    /// Defaults plus any directories listed in [`FONT_DIR_ENV`].
    pub fn from_env() -> Self {
        let dirs = std::env::var_os(FONT_DIR_ENV)
            .map(|v| {
                std::env::split_paths(&v)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self { dirs, system: true }
    }
}

/// A concrete face picked for a family/weight request.
#[derive(Clone)]
pub struct ResolvedFont {
    /// Family name recorded in the face's name table.
    pub family_name: String,
    /// Raw font file bytes (the whole collection for `.ttc` files).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes`.
    pub index: u32,
    /// Stable identity of `(bytes, index)`.
    pub key: u64,
    pub(crate) data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("family_name", &self.family_name)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("key", &format_args!("{:016x}", self.key))
            .finish()
    }
}

/// Face database plus a per-request cache of resolved faces.
pub struct FontBook {
    db: usvg::fontdb::Database,
    resolved: HashMap<(FontFamily, u16), ResolvedFont>,
}

impl FontBook {
    pub fn load(sources: &FontSources) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if sources.system {
            db.load_system_fonts();
        }
        for dir in &sources.dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font database loaded");
        Self::from_database(db)
    }

    pub fn from_database(db: usvg::fontdb::Database) -> Self {
        Self {
            db,
            resolved: HashMap::new(),
        }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Pick the best face for `family` at `weight`.
    ///
    /// Tries the family's named face, then its generic fallback, then any sans/serif face, and
    /// finally the first face in the database.
    pub fn resolve(&mut self, family: FontFamily, weight: u16) -> CardResult<ResolvedFont> {
        if let Some(f) = self.resolved.get(&(family, weight)) {
            return Ok(f.clone());
        }

        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let generic = match family.generic() {
            GenericFamily::Cursive => Family::Cursive,
            GenericFamily::SansSerif => Family::SansSerif,
            GenericFamily::Serif => Family::Serif,
        };
        let families = [
            Family::Name(family.face_name()),
            generic,
            Family::SansSerif,
            Family::Serif,
        ];
        let query = Query {
            families: &families,
            weight: Weight(weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| CardError::font("no font faces available"))?;

        let family_name = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "unknown".to_string());
        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| CardError::font(format!("face data for '{family_name}' unavailable")))?;

        if family_name != family.face_name() {
            tracing::debug!(
                requested = family.face_name(),
                resolved = %family_name,
                "font family fell back"
            );
        }

        let key = digest_u64(&bytes) ^ u64::from(index);
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.clone()),
            index,
        );
        let font = ResolvedFont {
            family_name,
            bytes: Arc::new(bytes),
            index,
            key,
            data,
        };
        self.resolved.insert((family, weight), font.clone());
        Ok(font)
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    let mut paths: Vec<PathBuf> = rd.flatten().map(|e| e.path()).collect();
    paths.sort();
    for path in paths {
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
