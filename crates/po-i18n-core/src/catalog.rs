use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;

use crate::header::{Headers, PluralForms};
use crate::plural::PluralRule;
use crate::plural_lexer::PluralError;
use crate::po_parse::ParsedCatalog;
use crate::po_write::write_po;
use crate::translation::TranslationEntry;

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    translations: BTreeMap<String, TranslationEntry>,
    contexts: BTreeMap<String, BTreeMap<String, TranslationEntry>>,
    headers: Headers,
    nplurals: Option<usize>,
    rule: PluralRule,
    plural_error: Option<PluralError>,
    refreshed: BTreeSet<(Option<String>, String)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parsed(parsed: ParsedCatalog) -> Self {
        let mut catalog = Self::new();
        for parsed_entry in parsed.entries {
            catalog.store(parsed_entry.context, parsed_entry.entry);
        }
        catalog.load_headers();
        catalog
    }

    pub fn insert(&mut self, context: Option<String>, entry: TranslationEntry) {
        let is_header = context.is_none() && entry.id().is_empty();
        self.store(context, entry);
        if is_header {
            self.load_headers();
        }
    }

    fn store(&mut self, context: Option<String>, entry: TranslationEntry) {
        let id = String::from(entry.id());
        match context {
            Some(context) => {
                self.contexts.entry(context).or_default().insert(id, entry);
            }
            None => {
                self.translations.insert(id, entry);
            }
        }
    }

    pub fn load_headers(&mut self) {
        let raw = self
            .translations
            .get("")
            .map(|entry| entry.get())
            .unwrap_or_default();
        self.headers = Headers::parse(raw);
        let forms = self
            .headers
            .plural_forms()
            .map(PluralForms::parse)
            .unwrap_or_default();
        let (rule, error) = PluralRule::from_formula(forms.plural.as_deref());
        self.nplurals = forms.nplurals;
        self.rule = rule;
        self.plural_error = error;
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn language(&self) -> Option<&str> {
        self.headers.language()
    }

    pub fn plural_forms_header(&self) -> Option<&str> {
        self.headers.plural_forms()
    }

    pub fn nplurals(&self) -> Option<usize> {
        self.nplurals
    }

    pub fn plural_rule(&self) -> &PluralRule {
        &self.rule
    }

    pub fn plural_error(&self) -> Option<&PluralError> {
        self.plural_error.as_ref()
    }

    pub fn plural_index(&self, count: u64) -> usize {
        self.rule.index(count)
    }

    pub fn translations(&self) -> &BTreeMap<String, TranslationEntry> {
        &self.translations
    }

    pub fn contexts(&self) -> &BTreeMap<String, BTreeMap<String, TranslationEntry>> {
        &self.contexts
    }

    pub fn get<'a>(&'a self, msgid: &'a str) -> &'a str {
        match self.translations.get(msgid) {
            Some(entry) => entry.get(),
            None => msgid,
        }
    }

    pub fn get_n<'a>(&'a self, msgid: &'a str, plural: &'a str, count: u64) -> &'a str {
        self.lookup_n(self.translations.get(msgid), msgid, plural, count)
    }

    pub fn get_c<'a>(&'a self, msgid: &'a str, context: &str) -> &'a str {
        match self.context_entry(msgid, context) {
            Some(entry) => entry.get(),
            None => msgid,
        }
    }

    pub fn get_nc<'a>(
        &'a self,
        msgid: &'a str,
        plural: &'a str,
        count: u64,
        context: &str,
    ) -> &'a str {
        self.lookup_n(self.context_entry(msgid, context), msgid, plural, count)
    }

    pub fn is_translated(&self, msgid: &str) -> bool {
        self.is_translated_n(msgid, 1)
    }

    pub fn is_translated_n(&self, msgid: &str, count: u64) -> bool {
        self.translations
            .get(msgid)
            .is_some_and(|entry| entry.is_translated_n(self.plural_index(count)))
    }

    pub fn is_translated_c(&self, msgid: &str, context: &str) -> bool {
        self.is_translated_nc(msgid, 1, context)
    }

    pub fn is_translated_nc(&self, msgid: &str, count: u64, context: &str) -> bool {
        self.context_entry(msgid, context)
            .is_some_and(|entry| entry.is_translated_n(self.plural_index(count)))
    }

    pub fn set(&mut self, msgid: &str, text: impl Into<String>) {
        self.translations
            .entry(String::from(msgid))
            .or_insert_with(|| TranslationEntry::new(msgid))
            .set(text);
        self.refresh(None, msgid);
    }

    pub fn set_n(&mut self, msgid: &str, plural: &str, index: usize, text: impl Into<String>) {
        let entry = self
            .translations
            .entry(String::from(msgid))
            .or_insert_with(|| TranslationEntry::new(msgid));
        set_plural_form(entry, plural, index, text.into());
        self.refresh(None, msgid);
    }

    pub fn set_c(&mut self, msgid: &str, context: &str, text: impl Into<String>) {
        self.contexts
            .entry(String::from(context))
            .or_default()
            .entry(String::from(msgid))
            .or_insert_with(|| TranslationEntry::new(msgid))
            .set(text);
        self.refresh(Some(context), msgid);
    }

    pub fn set_nc(
        &mut self,
        msgid: &str,
        plural: &str,
        index: usize,
        context: &str,
        text: impl Into<String>,
    ) {
        let entry = self
            .contexts
            .entry(String::from(context))
            .or_default()
            .entry(String::from(msgid))
            .or_insert_with(|| TranslationEntry::new(msgid));
        set_plural_form(entry, plural, index, text.into());
        self.refresh(Some(context), msgid);
    }

    // Marks a message as current for `drop_stale_translations`; editing the
    // header entry recompiles the plural rule.
    fn refresh(&mut self, context: Option<&str>, msgid: &str) {
        self.refreshed
            .insert((context.map(String::from), String::from(msgid)));
        if context.is_none() && msgid.is_empty() {
            self.load_headers();
        }
    }

    // Keeps the header and every message written through set* since construction.
    pub fn drop_stale_translations(&mut self) {
        let refreshed = &self.refreshed;
        self.translations
            .retain(|id, _| id.is_empty() || refreshed.contains(&(None, id.clone())));
        for (context, entries) in self.contexts.iter_mut() {
            entries.retain(|id, _| refreshed.contains(&(Some(context.clone()), id.clone())));
        }
        self.contexts.retain(|_, entries| !entries.is_empty());
    }

    pub fn drop_untranslated(&mut self) {
        self.translations
            .retain(|id, entry| id.is_empty() || is_translated_entry(entry));
        for entries in self.contexts.values_mut() {
            entries.retain(|_, entry| is_translated_entry(entry));
        }
        self.contexts.retain(|_, entries| !entries.is_empty());
    }

    pub fn to_po(&self) -> String {
        write_po(self)
    }

    fn context_entry(&self, msgid: &str, context: &str) -> Option<&TranslationEntry> {
        self.contexts.get(context)?.get(msgid)
    }

    fn lookup_n<'a>(
        &'a self,
        entry: Option<&'a TranslationEntry>,
        msgid: &'a str,
        plural: &'a str,
        count: u64,
    ) -> &'a str {
        let index = self.plural_index(count);
        match entry {
            Some(entry) => entry.get_n(index),
            None if index == 0 => msgid,
            None => plural,
        }
    }
}

fn is_translated_entry(entry: &TranslationEntry) -> bool {
    entry.forms().values().any(|text| !text.is_empty())
}

fn set_plural_form(entry: &mut TranslationEntry, plural: &str, index: usize, text: String) {
    if !plural.is_empty() {
        *entry.plural_id_mut() = String::from(plural);
    }
    entry.set_n(index, text);
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Catalog;
    use crate::po_parse::parse_po;
    use crate::translation::TranslationEntry;

    const ARABIC: &str = "n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5";

    fn english() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.set("", "Plural-Forms: nplurals=2; plural=n != 1;\n");
        let mut entry = TranslationEntry::with_plural("apple", "apples");
        entry.set_n(0, "S");
        entry.set_n(1, "P");
        catalog.insert(None, entry);
        catalog
    }

    #[test]
    fn two_form_round_trip() {
        let catalog = english();
        assert_eq!(catalog.get_n("apple", "apples", 1), "S");
        assert_eq!(catalog.get_n("apple", "apples", 0), "P");
        assert_eq!(catalog.get_n("apple", "apples", 2), "P");
        assert_eq!(catalog.nplurals(), Some(2));
    }

    #[test]
    fn untranslated_follows_plural_rule() {
        let mut catalog = Catalog::new();
        catalog.set("", alloc::format!("Plural-Forms: nplurals=6; plural={ARABIC};\n"));
        for n in 0..300u64 {
            let expected = if catalog.plural_index(n) == 0 { "one" } else { "many" };
            assert_eq!(catalog.get_n("one", "many", n), expected, "n = {n}");
            assert_eq!(catalog.get_nc("one", "many", n, "ctx"), expected, "n = {n}");
        }
        assert_eq!(catalog.get_n("one", "many", 1), "many");
    }

    #[test]
    fn context_is_isolated() {
        let mut catalog = Catalog::new();
        catalog.set_c("Open", "Menu", "Ouvrir");
        assert_eq!(catalog.get("Open"), "Open");
        assert_eq!(catalog.get_c("Open", "Menu"), "Ouvrir");
        assert_eq!(catalog.get_c("Open", "Door"), "Open");
        assert!(!catalog.is_translated("Open"));
        assert!(catalog.is_translated_c("Open", "Menu"));
    }

    #[test]
    fn missing_plural_forms_return_plural_id() {
        let mut catalog = Catalog::new();
        catalog.set("", alloc::format!("Plural-Forms: nplurals=6; plural={ARABIC};\n"));
        catalog.insert(None, TranslationEntry::with_plural("%d selected", "%d chosen"));
        for n in [2u64, 6, 10, 11, 100] {
            assert_eq!(catalog.get_n("%d selected", "%d chosen", n), "%d chosen");
        }
        assert!(!catalog.is_translated_n("%d selected", 10));
    }

    #[test]
    fn is_translated_checks_evaluated_slot() {
        let mut catalog = english();
        catalog.set_n("pear", "pears", 0, "poire");
        assert!(catalog.is_translated("pear"));
        assert!(!catalog.is_translated_n("pear", 2));
        assert!(catalog.is_translated_n("apple", 5));
        assert!(!catalog.is_translated("banana"));
    }

    #[test]
    fn invalid_formula_keeps_error_and_falls_back() {
        let mut catalog = Catalog::new();
        catalog.set("", "Plural-Forms: nplurals=2; plural=n ==;\n");
        assert!(catalog.plural_error().is_some());
        assert_eq!(catalog.plural_index(1), 0);
        assert_eq!(catalog.plural_index(3), 1);
        assert_eq!(catalog.get_n("cat", "cats", 3), "cats");
    }

    #[test]
    fn deeply_nested_formula_falls_back() {
        let formula = alloc::format!("{}n{}", "(".repeat(200_000), ")".repeat(200_000));
        let po = alloc::format!(
            "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=2; plural={formula};\\n\"\n"
        );
        let catalog = Catalog::from_parsed(parse_po(&po));
        assert!(catalog.plural_error().is_some());
        assert_eq!(catalog.plural_index(1), 0);
        assert_eq!(catalog.plural_index(7), 1);
    }

    #[test]
    fn header_edits_recompile_rule() {
        let mut catalog = Catalog::new();
        let mut header = TranslationEntry::new("");
        header.set("Plural-Forms: nplurals=1; plural=0;\n");
        catalog.insert(None, header);
        assert_eq!(catalog.plural_index(5), 0);
        assert_eq!(catalog.nplurals(), Some(1));

        catalog.set_n("", "", 0, "Plural-Forms: nplurals=2; plural=n>1;\n");
        assert_eq!(catalog.plural_index(1), 0);
        assert_eq!(catalog.plural_index(5), 1);
        assert_eq!(catalog.nplurals(), Some(2));
    }

    #[test]
    fn builds_from_parsed_po() {
        let parsed = parse_po(
            "msgid \"\"\nmsgstr \"\"\n\"Language: fr\\n\"\n\"Plural-Forms: nplurals=2; plural=n>1;\\n\"\n\nmsgctxt \"verb\"\nmsgid \"Save\"\nmsgstr \"Enregistrer\"\n\nmsgid \"day\"\nmsgid_plural \"days\"\nmsgstr[0] \"jour\"\nmsgstr[1] \"jours\"\n",
        );
        let catalog = Catalog::from_parsed(parsed);
        assert_eq!(catalog.language(), Some("fr"));
        assert_eq!(catalog.get_n("day", "days", 0), "jour");
        assert_eq!(catalog.get_n("day", "days", 2), "jours");
        assert_eq!(catalog.get_c("Save", "verb"), "Enregistrer");
        assert_eq!(catalog.get("Save"), "Save");
        let keys: alloc::vec::Vec<&String> = catalog.translations().keys().collect();
        assert_eq!(keys, [&String::new(), &String::from("day")]);
    }
}
