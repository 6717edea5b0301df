//! # Font Resolution
//!
//! Text is drawn with whatever outline font the host can provide. Sources
//! are tried in order; the first that loads wins. When none load, text is
//! drawn with the Spleen 12×24 bitmap font compiled into the binary, so
//! resolution itself cannot fail.
//!
//! ## Default Chain
//!
//! | Order | Source |
//! |-------|--------|
//! | 1 | `<family>.ttf` / `.otf` in the system font directories |
//! | 2 | `arial.ttf` (working directory) |
//! | 3 | `DejaVuSans.ttf` (working directory) |
//! | 4 | `/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf` |
//! | 5 | `C:/Windows/Fonts/arial.ttf` |
//! | 6 | `C:/Windows/Fonts/calibri.ttf` |
//! | - | built-in Spleen 12×24 |

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use log::{debug, warn};
use spleen_font::{FONT_12X24, PSF2Font};

/// Cell size of the built-in bitmap font.
pub const BUILTIN_CELL_WIDTH: usize = 12;
pub const BUILTIN_CELL_HEIGHT: usize = 24;

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts",
    "/Library/Fonts",
    "C:/Windows/Fonts",
];

const FALLBACK_FILES: &[&str] = &[
    "arial.ttf",
    "DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "C:/Windows/Fonts/arial.ttf",
    "C:/Windows/Fonts/calibri.ttf",
];

/// Something that may be able to produce an outline font.
pub trait FontSource: Send + Sync {
    /// Human-readable description for logs.
    fn describe(&self) -> String;

    /// Load a font for `family`, or `None` when this source has nothing.
    fn load(&self, family: &str) -> Option<FontArc>;
}

/// A fixed font file, used regardless of the requested family.
#[derive(Debug, Clone)]
pub struct FileFontSource {
    path: PathBuf,
}

impl FileFontSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontSource for FileFontSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self, _family: &str) -> Option<FontArc> {
        load_file(&self.path)
    }
}

/// Looks for a file named after the family in a list of directories.
///
/// `"Arial Narrow"` is tried as `Arial Narrow.ttf`, `ArialNarrow.ttf` and
/// `arialnarrow.ttf` (plus `.otf`) in each directory.
#[derive(Debug, Clone)]
pub struct FamilyFontSource {
    dirs: Vec<PathBuf>,
}

impl FamilyFontSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    fn candidates(family: &str) -> Vec<String> {
        let compact: String = family.chars().filter(|c| !c.is_whitespace()).collect();
        let mut stems = vec![family.to_string(), compact.clone(), compact.to_lowercase()];
        stems.dedup();

        let mut names = Vec::with_capacity(stems.len() * 2);
        for ext in ["ttf", "otf"] {
            for stem in &stems {
                names.push(format!("{}.{}", stem, ext));
            }
        }
        names
    }
}

impl FontSource for FamilyFontSource {
    fn describe(&self) -> String {
        format!("family lookup in {} directories", self.dirs.len())
    }

    fn load(&self, family: &str) -> Option<FontArc> {
        if family.trim().is_empty() {
            return None;
        }
        let names = Self::candidates(family.trim());
        self.dirs
            .iter()
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .find_map(|path| load_file(&path))
    }
}

fn load_file(path: &Path) -> Option<FontArc> {
    let bytes = fs::read(path).ok()?;
    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            debug!("{} is not a usable font: {}", path.display(), e);
            None
        }
    }
}

/// Outcome of font resolution.
#[derive(Clone)]
pub enum ResolvedFont {
    Outline(FontArc),
    /// The compiled-in Spleen bitmap font.
    Builtin,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline(_) => write!(f, "Outline"),
            Self::Builtin => write!(f, "Builtin"),
        }
    }
}

/// Ordered font sources with a built-in terminal fallback.
pub struct FontResolver {
    sources: Vec<Box<dyn FontSource>>,
}

impl FontResolver {
    pub fn new(sources: Vec<Box<dyn FontSource>>) -> Self {
        Self { sources }
    }

    /// No sources at all: every lookup yields the built-in font.
    pub fn builtin() -> Self {
        Self::new(Vec::new())
    }

    /// The default chain (see module docs).
    pub fn system() -> Self {
        let mut sources: Vec<Box<dyn FontSource>> = vec![Box::new(FamilyFontSource::new(
            SYSTEM_FONT_DIRS.iter().map(PathBuf::from).collect(),
        ))];
        sources.extend(
            FALLBACK_FILES
                .iter()
                .map(|path| Box::new(FileFontSource::new(*path)) as Box<dyn FontSource>),
        );
        Self::new(sources)
    }

    /// Put a directory at the front of the chain.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sources
            .insert(0, Box::new(FamilyFontSource::new(vec![dir.into()])));
        self
    }

    pub fn sources(&self) -> usize {
        self.sources.len()
    }

    /// Resolve a font for `family`. Never fails.
    pub fn resolve(&self, family: &str) -> ResolvedFont {
        for source in &self.sources {
            if let Some(font) = source.load(family) {
                debug!("Font '{}' resolved from {}", family, source.describe());
                return ResolvedFont::Outline(font);
            }
        }
        if !self.sources.is_empty() {
            warn!("No font source could load '{}', using built-in bitmap font", family);
        }
        ResolvedFont::Builtin
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::system()
    }
}

/// Bitmap for `ch` in the built-in font, row-major, `true` = ink.
///
/// Characters the font lacks come back as a box outline.
pub fn builtin_glyph(ch: char) -> Vec<bool> {
    let mut glyph = vec![false; BUILTIN_CELL_WIDTH * BUILTIN_CELL_HEIGHT];

    if let Ok(mut spleen) = PSF2Font::new(FONT_12X24) {
        let utf8_bytes = ch.to_string();
        if let Some(spleen_glyph) = spleen.glyph_for_utf8(utf8_bytes.as_bytes()) {
            for (row_y, row) in spleen_glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < BUILTIN_CELL_HEIGHT && col_x < BUILTIN_CELL_WIDTH {
                        glyph[row_y * BUILTIN_CELL_WIDTH + col_x] = on;
                    }
                }
            }
            return glyph;
        }
    }

    draw_box(&mut glyph, BUILTIN_CELL_WIDTH, BUILTIN_CELL_HEIGHT);
    glyph
}

fn draw_box(glyph: &mut [bool], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = true;
        glyph[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        glyph[y * width] = true;
        glyph[y * width + width - 1] = true;
    }
}
