//! Monospaced font lookup.
//!
//! RFCs are laid out on a character grid, so every line is printed with one
//! monospaced TrueType font. The font is taken from, in order:
//!
//! 1. the path passed by the caller,
//! 2. the `RFC2PDF_FONT` environment variable,
//! 3. one of [`MONOSPACE_FONT_FILES`] in `RFC2PDF_FONTS_DIR`, `assets/fonts`
//!    next to the executable, `assets/fonts` in this crate, or a system font
//!    directory.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::debug;

/// Font files recognised during the directory search, in order of preference.
pub const MONOSPACE_FONT_FILES: &[&str] = &[
    "LiberationMono-Regular.ttf",
    "LiberationMono-Bold.ttf",
    "DejaVuSansMono.ttf",
    "NotoSansMono-Regular.ttf",
    "cour.ttf",
    "consola.ttf",
];

const SYSTEM_FONT_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-mono",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu-sans-mono-fonts",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/noto",
    "/Library/Fonts",
];

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path("RFC2PDF_FONTS_DIR") {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets/fonts"));
        }
    }

    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"));
    candidates.extend(SYSTEM_FONT_DIRECTORIES.iter().map(PathBuf::from));
    candidates.extend(windows_font_directory());

    let mut unique: Vec<PathBuf> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

fn not_found(message: String) -> Error {
    Error::new(
        message,
        io::Error::new(io::ErrorKind::NotFound, "monospaced font not found"),
    )
}

/// Resolves the font file to use, following the order described in the
/// module documentation.
pub fn resolve_font_file(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(not_found(format!("Font file {} does not exist", path.display())))
        };
    }

    if let Some(path) = env_path("RFC2PDF_FONT") {
        return if path.is_file() {
            Ok(path)
        } else {
            Err(not_found(format!(
                "Font file {} from RFC2PDF_FONT does not exist",
                path.display()
            )))
        };
    }

    let candidates = font_directory_candidates();
    for directory in &candidates {
        if let Some(found) = MONOSPACE_FONT_FILES
            .iter()
            .map(|name| directory.join(name))
            .find(|candidate| candidate.is_file())
        {
            return Ok(found);
        }
    }

    let checked = candidates
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    Err(not_found(format!(
        "No monospaced font found. Checked: {}. Pass a TTF file or set RFC2PDF_FONT.",
        checked
    )))
}

/// Loads the monospaced font as a genpdf family; every style uses the same
/// face.
pub fn monospace_font_family(explicit: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    let path = resolve_font_file(explicit)?;
    debug!("loading font {}", path.display());

    let data = FontData::load(&path, None).map_err(|err| {
        Error::new(
            format!("Failed to load font {}: {}", path.display(), err),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })?;

    Ok(FontFamily {
        regular: data.clone(),
        bold: data.clone(),
        italic: data.clone(),
        bold_italic: data,
    })
}

/// Indicates whether a monospaced font can be found without an explicit path.
pub fn monospace_font_available() -> bool {
    resolve_font_file(None).is_ok()
}
