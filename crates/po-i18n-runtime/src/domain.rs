use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use po_i18n_core::{Catalog, ParsedCatalog, TranslationEntry, decode_mo, parse_po};
use tracing::{debug, warn};

use crate::error::RuntimeResult;
use crate::loader::read_catalog;
use crate::snapshot::CatalogSnapshot;

// Reloads build a complete catalog and publish it with a single swap.
#[derive(Debug)]
pub struct Domain {
    name: String,
    catalog: RwLock<Arc<Catalog>>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_catalog(name, Catalog::new())
    }

    pub fn from_catalog(name: impl Into<String>, catalog: Catalog) -> Self {
        let domain = Self {
            name: name.into(),
            catalog: RwLock::new(Arc::new(Catalog::new())),
        };
        domain.replace(catalog);
        domain
    }

    pub fn from_po(name: impl Into<String>, text: &str) -> Self {
        let domain = Self::new(name);
        domain.parse_po(text);
        domain
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace(&self, catalog: Catalog) {
        if let Some(error) = catalog.plural_error() {
            warn!(
                domain = %self.name,
                plural_forms = catalog.plural_forms_header().unwrap_or_default(),
                %error,
                "invalid plural forms expression, using the n != 1 rule"
            );
        }
        debug!(
            domain = %self.name,
            messages = catalog.translations().len(),
            contexts = catalog.contexts().len(),
            "catalog published"
        );
        let catalog = Arc::new(catalog);
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = catalog;
    }

    pub fn parse_po(&self, text: &str) {
        self.replace_parsed(parse_po(text));
    }

    pub fn parse_mo(&self, bytes: &[u8]) -> RuntimeResult<()> {
        self.replace_parsed(decode_mo(bytes)?);
        Ok(())
    }

    pub fn parse_file(&self, path: &Path) -> RuntimeResult<()> {
        let catalog = read_catalog(path)?;
        self.replace(catalog);
        Ok(())
    }

    fn replace_parsed(&self, parsed: ParsedCatalog) {
        if parsed.skipped > 0 {
            debug!(domain = %self.name, skipped = parsed.skipped, "skipped malformed catalog lines");
        }
        self.replace(Catalog::from_parsed(parsed));
    }

    pub fn to_json(&self) -> RuntimeResult<String> {
        let snapshot = CatalogSnapshot::capture(&self.snapshot());
        Ok(serde_json::to_string(&snapshot)?)
    }

    pub fn from_json(name: impl Into<String>, json: &str) -> RuntimeResult<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_catalog(name, snapshot.into_catalog()))
    }

    pub fn language(&self) -> Option<String> {
        self.snapshot().language().map(str::to_string)
    }

    pub fn plural_forms_header(&self) -> Option<String> {
        self.snapshot().plural_forms_header().map(str::to_string)
    }

    pub fn nplurals(&self) -> Option<usize> {
        self.snapshot().nplurals()
    }

    pub fn plural_index(&self, count: u64) -> usize {
        self.snapshot().plural_index(count)
    }

    pub fn translations(&self) -> BTreeMap<String, TranslationEntry> {
        self.snapshot().translations().clone()
    }

    pub fn get(&self, msgid: &str) -> String {
        self.snapshot().get(msgid).to_string()
    }

    pub fn get_n(&self, msgid: &str, plural: &str, count: u64) -> String {
        self.snapshot().get_n(msgid, plural, count).to_string()
    }

    pub fn get_c(&self, msgid: &str, context: &str) -> String {
        self.snapshot().get_c(msgid, context).to_string()
    }

    pub fn get_nc(&self, msgid: &str, plural: &str, count: u64, context: &str) -> String {
        self.snapshot()
            .get_nc(msgid, plural, count, context)
            .to_string()
    }

    pub fn is_translated(&self, msgid: &str) -> bool {
        self.snapshot().is_translated(msgid)
    }

    pub fn is_translated_n(&self, msgid: &str, count: u64) -> bool {
        self.snapshot().is_translated_n(msgid, count)
    }

    pub fn is_translated_c(&self, msgid: &str, context: &str) -> bool {
        self.snapshot().is_translated_c(msgid, context)
    }

    pub fn is_translated_nc(&self, msgid: &str, count: u64, context: &str) -> bool {
        self.snapshot().is_translated_nc(msgid, count, context)
    }

    pub fn set(&self, msgid: &str, text: &str) {
        self.edit(|catalog| catalog.set(msgid, text));
    }

    pub fn set_n(&self, msgid: &str, plural: &str, index: usize, text: &str) {
        self.edit(|catalog| catalog.set_n(msgid, plural, index, text));
    }

    pub fn set_c(&self, msgid: &str, context: &str, text: &str) {
        self.edit(|catalog| catalog.set_c(msgid, context, text));
    }

    pub fn set_nc(&self, msgid: &str, plural: &str, index: usize, context: &str, text: &str) {
        self.edit(|catalog| catalog.set_nc(msgid, plural, index, context, text));
    }

    pub fn drop_stale_translations(&self) {
        self.edit(Catalog::drop_stale_translations);
    }

    pub fn drop_untranslated(&self) {
        self.edit(Catalog::drop_untranslated);
    }

    pub fn to_po(&self) -> String {
        self.snapshot().to_po()
    }

    pub fn write_po(&self, path: &Path) -> RuntimeResult<()> {
        fs::write(path, self.to_po())?;
        debug!(domain = %self.name, path = %path.display(), "wrote catalog");
        Ok(())
    }

    // Copy-on-write: snapshots held by readers keep the previous content.
    fn edit(&self, apply: impl FnOnce(&mut Catalog)) {
        let mut guard = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        apply(Arc::make_mut(&mut guard));
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Domain;

    const PO: &str = r#"
msgid ""
msgstr ""
"Language: en\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

msgid "My text"
msgstr "Translated text"

msgid "One with var: %s"
msgid_plural "Several with vars: %s"
msgstr[0] "This one is the singular: %s"
msgstr[1] "This one is the plural: %s"

msgctxt "Ctx"
msgid "Some random in a context"
msgstr "Some random translation in a context"

msgid "Empty translation"
msgstr ""
"#;

    #[test]
    fn parses_and_looks_up() {
        let domain = Domain::from_po("default", PO);
        assert_eq!(domain.name(), "default");
        assert_eq!(domain.language().as_deref(), Some("en"));
        assert_eq!(domain.nplurals(), Some(2));
        assert_eq!(domain.get("My text"), "Translated text");
        assert_eq!(
            domain.get_n("One with var: %s", "Several with vars: %s", 5),
            "This one is the plural: %s"
        );
        assert_eq!(
            domain.get_c("Some random in a context", "Ctx"),
            "Some random translation in a context"
        );
        assert_eq!(domain.get("Empty translation"), "Empty translation");
        assert!(!domain.is_translated("Empty translation"));
        assert!(domain.is_translated_c("Some random in a context", "Ctx"));
    }

    #[test]
    fn reparse_discards_previous_content() {
        let domain = Domain::from_po("default", PO);
        domain.parse_po("msgid \"Other\"\nmsgstr \"Autre\"\n");
        assert_eq!(domain.get("My text"), "My text");
        assert_eq!(domain.get("Other"), "Autre");
        assert_eq!(domain.nplurals(), None);
    }

    #[test]
    fn held_snapshot_survives_reload() {
        let domain = Domain::from_po("default", PO);
        let before = domain.snapshot();
        domain.parse_po("");
        assert_eq!(before.get("My text"), "Translated text");
        assert_eq!(domain.get("My text"), "My text");
    }

    #[test]
    fn edits_are_copy_on_write() {
        let domain = Domain::from_po("default", PO);
        let before = domain.snapshot();
        domain.set("My text", "Edited text");
        domain.set_n("file", "files", 1, "fichiers");
        domain.set_nc("file", "files", 0, "Ctx", "fichier");
        assert_eq!(before.get("My text"), "Translated text");
        assert_eq!(domain.get("My text"), "Edited text");
        assert_eq!(domain.get_n("file", "files", 3), "fichiers");
        assert_eq!(domain.get_n("file", "files", 1), "file");
        assert_eq!(domain.get_nc("file", "files", 1, "Ctx"), "fichier");
    }

    #[test]
    fn invalid_plural_header_falls_back() {
        let domain = Domain::from_po(
            "default",
            "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=2; plural=n ? : 1;\\n\"\n",
        );
        assert_eq!(domain.plural_index(1), 0);
        assert_eq!(domain.plural_index(2), 1);
        assert_eq!(domain.get_n("cat", "cats", 2), "cats");
    }

    #[test]
    fn rejects_invalid_mo_bytes() {
        let domain = Domain::from_po("default", PO);
        let err = domain.parse_mo(b"not a catalog").expect_err("invalid mo");
        assert_eq!(err.to_string(), "malformed mo catalog: header truncated");
        assert_eq!(domain.get("My text"), "Translated text");
    }

    #[test]
    fn json_round_trip_recompiles_plural_rule() {
        let domain = Domain::from_po(
            "default",
            "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=3; plural=n==1 ? 0 : n==2 ? 1 : 2;\\n\"\n\nmsgid \"day\"\nmsgid_plural \"days\"\nmsgstr[0] \"a\"\nmsgstr[1] \"b\"\nmsgstr[2] \"c\"\n",
        );
        let json = domain.to_json().expect("json");
        let restored = Domain::from_json("copy", &json).expect("restore");
        assert_eq!(restored.get_n("day", "days", 1), "a");
        assert_eq!(restored.get_n("day", "days", 2), "b");
        assert_eq!(restored.get_n("day", "days", 7), "c");
        assert_eq!(restored.translations(), domain.translations());
    }

    #[test]
    fn written_file_loads_back() {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("po_i18n_domain_{nanos}.po"));

        let domain = Domain::from_po("default", PO);
        domain.set("Added", "Ajouté");
        domain.write_po(&path).expect("write");
        let loaded = Domain::new("default");
        loaded.parse_file(&path).expect("parse");
        assert_eq!(loaded.translations(), domain.translations());
        assert_eq!(loaded.get("Added"), "Ajouté");
        assert_eq!(
            loaded.get_n("One with var: %s", "Several with vars: %s", 2),
            "This one is the plural: %s"
        );
        assert_eq!(loaded.language().as_deref(), Some("en"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn pruning_keeps_only_refreshed_entries() {
        let domain = Domain::from_po("default", PO);
        let before = domain.snapshot();
        domain.set("Fresh", "Nouveau");
        domain.drop_stale_translations();
        assert_eq!(domain.get("Fresh"), "Nouveau");
        assert_eq!(domain.get("My text"), "My text");
        assert_eq!(domain.nplurals(), Some(2));
        assert_eq!(before.get("My text"), "Translated text");

        domain.set("Blank", "");
        domain.drop_untranslated();
        assert!(!domain.translations().contains_key("Blank"));
        assert!(domain.translations().contains_key("Fresh"));
    }

    #[test]
    fn concurrent_readers_see_whole_catalogs() {
        let domain = Arc::new(Domain::from_po("default", PO));
        let other = "msgid \"My text\"\nmsgstr \"Other text\"\n";
        let mut handles = Vec::new();
        for worker in 0..4 {
            let domain = Arc::clone(&domain);
            handles.push(thread::spawn(move || {
                for round in 0..200 {
                    if worker == 0 && round % 10 == 0 {
                        domain.parse_po(if round % 20 == 0 { other } else { PO });
                    }
                    let text = domain.get("My text");
                    assert!(text == "Translated text" || text == "Other text");
                }
            }));
        }
        for handle in handles {
            handle.join().expect("reader thread");
        }
    }
}
