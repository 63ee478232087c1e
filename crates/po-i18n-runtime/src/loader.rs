use std::fs;
use std::path::{Path, PathBuf};

use po_i18n_core::{Catalog, LocaleCode, decode_mo, parse_po};
use tracing::debug;

use crate::error::RuntimeResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Po,
    Mo,
}

impl CatalogFormat {
    pub fn extension(self) -> &'static str {
        match self {
            CatalogFormat::Po => "po",
            CatalogFormat::Mo => "mo",
        }
    }

    // Anything not ending in .mo is read as PO text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("mo") => CatalogFormat::Mo,
            _ => CatalogFormat::Po,
        }
    }
}

pub fn read_catalog(path: &Path) -> RuntimeResult<Catalog> {
    let bytes = fs::read(path)?;
    let parsed = match CatalogFormat::from_path(path) {
        CatalogFormat::Mo => decode_mo(&bytes)?,
        CatalogFormat::Po => parse_po(&String::from_utf8_lossy(&bytes)),
    };
    debug!(
        path = %path.display(),
        entries = parsed.entries.len(),
        skipped = parsed.skipped,
        "catalog file read"
    );
    Ok(Catalog::from_parsed(parsed))
}

// PO before MO, the full locale directory before the primary language one.
pub fn catalog_candidates(library: &Path, language: &str, domain: &str) -> Vec<PathBuf> {
    let dirs: Vec<String> = match LocaleCode::parse(language) {
        Ok(code) => code
            .lookup_candidates()
            .into_iter()
            .map(str::to_string)
            .collect(),
        Err(_) => vec![language.to_string()],
    };
    let mut candidates = Vec::with_capacity(dirs.len() * 2);
    for format in [CatalogFormat::Po, CatalogFormat::Mo] {
        for dir in &dirs {
            candidates.push(
                library
                    .join(dir)
                    .join(format!("{domain}.{}", format.extension())),
            );
        }
    }
    candidates
}

pub fn find_catalog(library: &Path, language: &str, domain: &str) -> Option<PathBuf> {
    catalog_candidates(library, language, domain)
        .into_iter()
        .find(|path| path.is_file())
}
