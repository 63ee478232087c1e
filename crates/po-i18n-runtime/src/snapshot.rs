use std::collections::BTreeMap;

use po_i18n_core::{Catalog, TranslationEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EntrySnapshot {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plural_id: String,
    #[serde(default)]
    pub forms: BTreeMap<usize, String>,
}

impl EntrySnapshot {
    fn capture(entry: &TranslationEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            plural_id: entry.plural_id().to_string(),
            forms: entry.forms().clone(),
        }
    }

    fn into_entry(self) -> TranslationEntry {
        let mut entry = TranslationEntry::with_plural(self.id, self.plural_id);
        for (index, text) in self.forms {
            entry.set_n(index, text);
        }
        entry
    }
}

// Restoring rebuilds the header fields and plural rule from the msgid "" entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub plural_forms: Option<String>,
    #[serde(default)]
    pub nplurals: Option<usize>,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default)]
    pub translations: BTreeMap<String, EntrySnapshot>,
    #[serde(default)]
    pub contexts: BTreeMap<String, BTreeMap<String, EntrySnapshot>>,
}

impl CatalogSnapshot {
    pub fn capture(catalog: &Catalog) -> Self {
        Self {
            headers: catalog
                .headers()
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            language: catalog.language().map(str::to_string),
            plural_forms: catalog.plural_forms_header().map(str::to_string),
            nplurals: catalog.nplurals(),
            plural: catalog
                .plural_rule()
                .expression()
                .map(|expr| expr.source().to_string()),
            translations: catalog
                .translations()
                .iter()
                .map(|(id, entry)| (id.clone(), EntrySnapshot::capture(entry)))
                .collect(),
            contexts: catalog
                .contexts()
                .iter()
                .map(|(context, entries)| {
                    let entries = entries
                        .iter()
                        .map(|(id, entry)| (id.clone(), EntrySnapshot::capture(entry)))
                        .collect();
                    (context.clone(), entries)
                })
                .collect(),
        }
    }

    pub fn into_catalog(self) -> Catalog {
        let mut catalog = Catalog::new();
        for (_, entry) in self.translations {
            catalog.insert(None, entry.into_entry());
        }
        for (context, entries) in self.contexts {
            for (_, entry) in entries {
                catalog.insert(Some(context.clone()), entry.into_entry());
            }
        }
        catalog.load_headers();
        catalog
    }
}
