use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use po_i18n_core::{Catalog, TranslationEntry, simplified_locale};
use tracing::{debug, warn};

use crate::domain::Domain;
use crate::error::RuntimeResult;
use crate::loader::{find_catalog, read_catalog};

pub const DEFAULT_DOMAIN: &str = "default";

// Domains that were never added behave like empty catalogs.
#[derive(Debug)]
pub struct Locale {
    path: PathBuf,
    language: String,
    default_domain: RwLock<String>,
    domains: RwLock<BTreeMap<String, Arc<Domain>>>,
    empty: Arc<Catalog>,
}

impl Locale {
    pub fn new(path: impl Into<PathBuf>, language: &str) -> Self {
        Self {
            path: path.into(),
            language: simplified_locale(language),
            default_domain: RwLock::new(DEFAULT_DOMAIN.to_string()),
            domains: RwLock::new(BTreeMap::new()),
            empty: Arc::new(Catalog::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    // A missing file registers an empty domain. A file that fails to load
    // still leaves the name registered (the previous domain, or an empty one)
    // so lookups do not retry it.
    pub fn add_domain(&self, name: &str) -> RuntimeResult<()> {
        let loaded = match find_catalog(&self.path, &self.language, name) {
            Some(path) => {
                debug!(domain = name, path = %path.display(), "loading domain");
                read_catalog(&path)
            }
            None => {
                warn!(
                    domain = name,
                    language = %self.language,
                    path = %self.path.display(),
                    "no catalog file found, registering an empty domain"
                );
                Ok(Catalog::new())
            }
        };
        let mut domains = self.domains.write().unwrap_or_else(PoisonError::into_inner);
        match (loaded, domains.get(name)) {
            (Ok(catalog), Some(domain)) => domain.replace(catalog),
            (Ok(catalog), None) => {
                domains.insert(name.to_string(), Arc::new(Domain::from_catalog(name, catalog)));
            }
            (Err(error), existing) => {
                if existing.is_none() {
                    domains.insert(name.to_string(), Arc::new(Domain::new(name)));
                }
                return Err(error);
            }
        }
        Ok(())
    }

    pub fn add_translator(&self, name: &str, domain: impl Into<Arc<Domain>>) {
        self.domains
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), domain.into());
    }

    pub fn domain(&self, name: &str) -> Option<Arc<Domain>> {
        self.domains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn has_domain(&self, name: &str) -> bool {
        self.domains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn domain_names(&self) -> Vec<String> {
        self.domains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn set_default_domain(&self, name: &str) {
        *self
            .default_domain
            .write()
            .unwrap_or_else(PoisonError::into_inner) = name.to_string();
    }

    pub fn default_domain(&self) -> String {
        self.default_domain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // Messages of the default domain, keyed by msgid.
    pub fn translations(&self) -> BTreeMap<String, TranslationEntry> {
        self.catalog(&self.default_domain()).translations().clone()
    }

    fn catalog(&self, domain: &str) -> Arc<Catalog> {
        match self.domain(domain) {
            Some(domain) => domain.snapshot(),
            None => Arc::clone(&self.empty),
        }
    }

    pub fn get(&self, msgid: &str) -> String {
        self.get_d(&self.default_domain(), msgid)
    }

    pub fn get_n(&self, msgid: &str, plural: &str, count: u64) -> String {
        self.get_nd(&self.default_domain(), msgid, plural, count)
    }

    pub fn get_d(&self, domain: &str, msgid: &str) -> String {
        self.catalog(domain).get(msgid).to_string()
    }

    pub fn get_nd(&self, domain: &str, msgid: &str, plural: &str, count: u64) -> String {
        self.catalog(domain).get_n(msgid, plural, count).to_string()
    }

    pub fn get_c(&self, msgid: &str, context: &str) -> String {
        self.get_dc(&self.default_domain(), msgid, context)
    }

    pub fn get_nc(&self, msgid: &str, plural: &str, count: u64, context: &str) -> String {
        self.get_ndc(&self.default_domain(), msgid, plural, count, context)
    }

    pub fn get_dc(&self, domain: &str, msgid: &str, context: &str) -> String {
        self.catalog(domain).get_c(msgid, context).to_string()
    }

    pub fn get_ndc(
        &self,
        domain: &str,
        msgid: &str,
        plural: &str,
        count: u64,
        context: &str,
    ) -> String {
        self.catalog(domain)
            .get_nc(msgid, plural, count, context)
            .to_string()
    }

    pub fn is_translated(&self, msgid: &str) -> bool {
        self.is_translated_d(&self.default_domain(), msgid)
    }

    pub fn is_translated_n(&self, msgid: &str, count: u64) -> bool {
        self.is_translated_nd(&self.default_domain(), msgid, count)
    }

    pub fn is_translated_d(&self, domain: &str, msgid: &str) -> bool {
        self.catalog(domain).is_translated(msgid)
    }

    pub fn is_translated_nd(&self, domain: &str, msgid: &str, count: u64) -> bool {
        self.catalog(domain).is_translated_n(msgid, count)
    }

    pub fn is_translated_c(&self, msgid: &str, context: &str) -> bool {
        self.is_translated_dc(&self.default_domain(), msgid, context)
    }

    pub fn is_translated_nc(&self, msgid: &str, count: u64, context: &str) -> bool {
        self.is_translated_ndc(&self.default_domain(), msgid, count, context)
    }

    pub fn is_translated_dc(&self, domain: &str, msgid: &str, context: &str) -> bool {
        self.catalog(domain).is_translated_c(msgid, context)
    }

    pub fn is_translated_ndc(&self, domain: &str, msgid: &str, count: u64, context: &str) -> bool {
        self.catalog(domain).is_translated_nc(msgid, count, context)
    }

    // C gettext argument order: domain, context, then the message.

    pub fn gettext(&self, msgid: &str) -> String {
        self.get(msgid)
    }

    pub fn dgettext(&self, domain: &str, msgid: &str) -> String {
        self.get_d(domain, msgid)
    }

    pub fn ngettext(&self, msgid: &str, plural: &str, count: u64) -> String {
        self.get_n(msgid, plural, count)
    }

    pub fn dngettext(&self, domain: &str, msgid: &str, plural: &str, count: u64) -> String {
        self.get_nd(domain, msgid, plural, count)
    }

    pub fn pgettext(&self, context: &str, msgid: &str) -> String {
        self.get_c(msgid, context)
    }

    pub fn dpgettext(&self, domain: &str, context: &str, msgid: &str) -> String {
        self.get_dc(domain, msgid, context)
    }

    pub fn npgettext(&self, context: &str, msgid: &str, plural: &str, count: u64) -> String {
        self.get_nc(msgid, plural, count, context)
    }

    pub fn dnpgettext(
        &self,
        domain: &str,
        context: &str,
        msgid: &str,
        plural: &str,
        count: u64,
    ) -> String {
        self.get_ndc(domain, msgid, plural, count, context)
    }
}
