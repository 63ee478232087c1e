use alloc::collections::BTreeMap;
use alloc::string::String;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslationEntry {
    id: String,
    plural_id: String,
    forms: BTreeMap<usize, String>,
}

impl TranslationEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plural_id: String::new(),
            forms: BTreeMap::new(),
        }
    }

    pub fn with_plural(id: impl Into<String>, plural_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plural_id: plural_id.into(),
            forms: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn plural_id(&self) -> &str {
        &self.plural_id
    }

    pub fn forms(&self) -> &BTreeMap<usize, String> {
        &self.forms
    }

    pub fn form(&self, index: usize) -> Option<&str> {
        self.forms
            .get(&index)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    pub fn get(&self) -> &str {
        self.form(0).unwrap_or(&self.id)
    }

    pub fn get_n(&self, index: usize) -> &str {
        if let Some(text) = self.form(index) {
            return text;
        }
        if index == 0 { &self.id } else { &self.plural_id }
    }

    pub fn is_translated_n(&self, index: usize) -> bool {
        self.form(index).is_some()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.set_n(0, text);
    }

    pub fn set_n(&mut self, index: usize, text: impl Into<String>) {
        self.forms.insert(index, text.into());
    }

    pub(crate) fn form_mut(&mut self, index: usize) -> &mut String {
        self.forms.entry(index).or_default()
    }

    pub(crate) fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }

    pub(crate) fn plural_id_mut(&mut self) -> &mut String {
        &mut self.plural_id
    }
}
