use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::config::GettextConfig;
use crate::error::RuntimeResult;
use crate::gettext::Gettext;
use crate::locale::Locale;

static GLOBAL: OnceLock<Gettext> = OnceLock::new();

pub fn gettext() -> &'static Gettext {
    GLOBAL.get_or_init(|| Gettext::new(GettextConfig::default()))
}

pub fn configure(library: impl Into<PathBuf>, language: &str, domain: &str) -> RuntimeResult<()> {
    gettext().configure(library, language, domain)
}

pub fn set_library(library: impl Into<PathBuf>) -> RuntimeResult<()> {
    gettext().set_library(library)
}

pub fn set_language(language: &str) -> RuntimeResult<()> {
    gettext().set_language(language)
}

pub fn set_domain(domain: &str) -> RuntimeResult<()> {
    gettext().set_domain(domain)
}

pub fn library() -> PathBuf {
    gettext().library()
}

pub fn language() -> String {
    gettext().language()
}

pub fn domain() -> String {
    gettext().domain()
}

pub fn locale() -> Arc<Locale> {
    gettext().locale()
}

pub fn set_locale(locale: Locale) {
    gettext().set_locale(locale);
}

pub fn get(msgid: &str) -> String {
    gettext().get(msgid)
}

pub fn get_n(msgid: &str, plural: &str, count: u64) -> String {
    gettext().get_n(msgid, plural, count)
}

pub fn get_d(domain: &str, msgid: &str) -> String {
    gettext().get_d(domain, msgid)
}

pub fn get_nd(domain: &str, msgid: &str, plural: &str, count: u64) -> String {
    gettext().get_nd(domain, msgid, plural, count)
}

pub fn get_c(msgid: &str, context: &str) -> String {
    gettext().get_c(msgid, context)
}

pub fn get_nc(msgid: &str, plural: &str, count: u64, context: &str) -> String {
    gettext().get_nc(msgid, plural, count, context)
}

pub fn get_dc(domain: &str, msgid: &str, context: &str) -> String {
    gettext().get_dc(domain, msgid, context)
}

pub fn get_ndc(domain: &str, msgid: &str, plural: &str, count: u64, context: &str) -> String {
    gettext().get_ndc(domain, msgid, plural, count, context)
}

pub fn is_translated(msgid: &str) -> bool {
    gettext().is_translated(msgid)
}

pub fn is_translated_n(msgid: &str, count: u64) -> bool {
    gettext().is_translated_n(msgid, count)
}

pub fn is_translated_d(domain: &str, msgid: &str) -> bool {
    gettext().is_translated_d(domain, msgid)
}

pub fn is_translated_nd(domain: &str, msgid: &str, count: u64) -> bool {
    gettext().is_translated_nd(domain, msgid, count)
}

pub fn is_translated_c(msgid: &str, context: &str) -> bool {
    gettext().is_translated_c(msgid, context)
}

pub fn is_translated_nc(msgid: &str, count: u64, context: &str) -> bool {
    gettext().is_translated_nc(msgid, count, context)
}

pub fn is_translated_dc(domain: &str, msgid: &str, context: &str) -> bool {
    gettext().is_translated_dc(domain, msgid, context)
}

pub fn is_translated_ndc(domain: &str, msgid: &str, count: u64, context: &str) -> bool {
    gettext().is_translated_ndc(domain, msgid, count, context)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("po_i18n_global_{nanos}"));
        fs::create_dir_all(&path).expect("dir");
        path
    }

    // Single test: the instance is shared by every test in this binary.
    #[test]
    fn configures_and_translates() {
        let root = temp_dir();
        let dir = root.join("es");
        fs::create_dir_all(&dir).expect("dir");
        fs::write(
            dir.join("app.po"),
            "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=2; plural=n != 1;\\n\"\n\nmsgid \"Hello\"\nmsgstr \"Hola\"\n\nmsgctxt \"greeting\"\nmsgid \"Bye\"\nmsgstr \"Adiós\"\n",
        )
        .expect("write");

        super::configure(&root, "es_ES.UTF-8", "app").expect("configure");
        assert_eq!(super::language(), "es_ES");
        assert_eq!(super::domain(), "app");
        assert_eq!(super::library(), root);
        assert_eq!(super::get("Hello"), "Hola");
        assert_eq!(super::get_c("Bye", "greeting"), "Adiós");
        assert_eq!(super::get_n("cat", "cats", 3), "cats");
        assert!(super::is_translated("Hello"));
        assert!(!super::is_translated_d("other", "Hello"));
        assert!(super::locale().has_domain("other"));

        fs::remove_dir_all(&root).ok();
    }
}
