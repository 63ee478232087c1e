use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

use crate::config::GettextConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::locale::Locale;

#[derive(Debug)]
struct State {
    config: GettextConfig,
    locale: Option<Arc<Locale>>,
}

#[derive(Debug)]
pub struct Gettext {
    state: RwLock<State>,
}

impl Default for Gettext {
    fn default() -> Self {
        Self::new(GettextConfig::default())
    }
}

impl Gettext {
    pub fn new(config: GettextConfig) -> Self {
        Self {
            state: RwLock::new(State {
                config,
                locale: None,
            }),
        }
    }

    pub fn from_locale(locale: Locale) -> Self {
        let gettext = Self::default();
        gettext.set_locale(locale);
        gettext
    }

    pub fn config(&self) -> GettextConfig {
        self.read_state().config.clone()
    }

    pub fn configure(
        &self,
        library: impl Into<PathBuf>,
        language: &str,
        domain: &str,
    ) -> RuntimeResult<()> {
        self.reconfigure(GettextConfig::new(library, language, domain))
    }

    pub fn set_library(&self, library: impl Into<PathBuf>) -> RuntimeResult<()> {
        let config = self.config();
        self.reconfigure(GettextConfig {
            library: library.into(),
            ..config
        })
    }

    pub fn set_language(&self, language: &str) -> RuntimeResult<()> {
        let config = self.config();
        self.reconfigure(GettextConfig::new(config.library, language, &config.domain))
    }

    pub fn set_domain(&self, domain: &str) -> RuntimeResult<()> {
        let config = self.config();
        self.reconfigure(GettextConfig {
            domain: domain.to_string(),
            ..config
        })
    }

    pub fn library(&self) -> PathBuf {
        self.read_state().config.library.clone()
    }

    pub fn language(&self) -> String {
        self.read_state().config.language.clone()
    }

    pub fn domain(&self) -> String {
        self.read_state().config.domain.clone()
    }

    pub fn set_locale(&self, locale: Locale) {
        let mut state = self.write_state();
        state.config = GettextConfig {
            library: locale.path().to_path_buf(),
            language: locale.language().to_string(),
            domain: locale.default_domain(),
        };
        state.locale = Some(Arc::new(locale));
    }

    pub fn locale(&self) -> Arc<Locale> {
        if let Some(locale) = &self.read_state().locale {
            return Arc::clone(locale);
        }
        let mut state = self.write_state();
        if let Some(locale) = &state.locale {
            return Arc::clone(locale);
        }
        let locale = Arc::new(build_locale(&state.config).unwrap_or_else(|(locale, error)| {
            warn!(domain = %state.config.domain, %error, "failed to load default domain");
            locale
        }));
        state.locale = Some(Arc::clone(&locale));
        locale
    }

    fn reconfigure(&self, config: GettextConfig) -> RuntimeResult<()> {
        config.validate()?;
        let mut state = self.write_state();
        let result = match build_locale(&config) {
            Ok(locale) => {
                state.locale = Some(Arc::new(locale));
                Ok(())
            }
            Err((locale, error)) => {
                state.locale = Some(Arc::new(locale));
                Err(error)
            }
        };
        state.config = config;
        result
    }

    fn locale_for(&self, domain: &str) -> Arc<Locale> {
        let locale = self.locale();
        if !locale.has_domain(domain)
            && let Err(error) = locale.add_domain(domain)
        {
            warn!(domain, %error, "failed to load domain");
        }
        locale
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, msgid: &str) -> String {
        self.get_d(&self.domain(), msgid)
    }

    pub fn get_n(&self, msgid: &str, plural: &str, count: u64) -> String {
        self.get_nd(&self.domain(), msgid, plural, count)
    }

    pub fn get_d(&self, domain: &str, msgid: &str) -> String {
        self.locale_for(domain).get_d(domain, msgid)
    }

    pub fn get_nd(&self, domain: &str, msgid: &str, plural: &str, count: u64) -> String {
        self.locale_for(domain).get_nd(domain, msgid, plural, count)
    }

    pub fn get_c(&self, msgid: &str, context: &str) -> String {
        self.get_dc(&self.domain(), msgid, context)
    }

    pub fn get_nc(&self, msgid: &str, plural: &str, count: u64, context: &str) -> String {
        self.get_ndc(&self.domain(), msgid, plural, count, context)
    }

    pub fn get_dc(&self, domain: &str, msgid: &str, context: &str) -> String {
        self.locale_for(domain).get_dc(domain, msgid, context)
    }

    pub fn get_ndc(
        &self,
        domain: &str,
        msgid: &str,
        plural: &str,
        count: u64,
        context: &str,
    ) -> String {
        self.locale_for(domain).get_ndc(domain, msgid, plural, count, context)
    }

    pub fn is_translated(&self, msgid: &str) -> bool {
        self.is_translated_d(&self.domain(), msgid)
    }

    pub fn is_translated_n(&self, msgid: &str, count: u64) -> bool {
        self.is_translated_nd(&self.domain(), msgid, count)
    }

    pub fn is_translated_d(&self, domain: &str, msgid: &str) -> bool {
        self.locale_for(domain).is_translated_d(domain, msgid)
    }

    pub fn is_translated_nd(&self, domain: &str, msgid: &str, count: u64) -> bool {
        self.locale_for(domain).is_translated_nd(domain, msgid, count)
    }

    pub fn is_translated_c(&self, msgid: &str, context: &str) -> bool {
        self.is_translated_dc(&self.domain(), msgid, context)
    }

    pub fn is_translated_nc(&self, msgid: &str, count: u64, context: &str) -> bool {
        self.is_translated_ndc(&self.domain(), msgid, count, context)
    }

    pub fn is_translated_dc(&self, domain: &str, msgid: &str, context: &str) -> bool {
        self.locale_for(domain).is_translated_dc(domain, msgid, context)
    }

    pub fn is_translated_ndc(&self, domain: &str, msgid: &str, count: u64, context: &str) -> bool {
        self.locale_for(domain).is_translated_ndc(domain, msgid, count, context)
    }
}

// On a load error the locale is still returned, without that domain.
fn build_locale(config: &GettextConfig) -> Result<Locale, (Locale, RuntimeError)> {
    let locale = Locale::new(&config.library, &config.language);
    locale.set_default_domain(&config.domain);
    match locale.add_domain(&config.domain) {
        Ok(()) => Ok(locale),
        Err(error) => Err((locale, error)),
    }
}
