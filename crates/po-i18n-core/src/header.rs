use alloc::string::String;
use alloc::vec::Vec;

pub const LANGUAGE: &str = "Language";
pub const PLURAL_FORMS: &str = "Plural-Forms";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    // Keys compare case-insensitively. Indented lines continue the previous value.
    pub fn parse(raw: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with([' ', '\t']) {
                if let Some((_, value)) = entries.last_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entries.push((String::from(key), String::from(value.trim())));
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn language(&self) -> Option<&str> {
        self.get(LANGUAGE).filter(|value| !value.is_empty())
    }

    pub fn plural_forms(&self) -> Option<&str> {
        self.get(PLURAL_FORMS).filter(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PluralForms {
    pub nplurals: Option<usize>,
    pub plural: Option<String>,
}

impl PluralForms {
    pub fn parse(value: &str) -> Self {
        let mut forms = PluralForms::default();
        for part in value.split(';') {
            let Some((key, raw)) = part.split_once('=') else {
                continue;
            };
            match key.trim() {
                "nplurals" => forms.nplurals = raw.trim().parse().ok(),
                "plural" => {
                    let raw = raw.trim();
                    if !raw.is_empty() {
                        forms.plural = Some(String::from(raw));
                    }
                }
                _ => {}
            }
        }
        forms
    }
}
