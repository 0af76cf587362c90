//! Translation hook. The engine and ledger only ever hand over keys such
//! as `achievements.golden_3`; turning them into text is up to the host.

/// Resolves a message key with `{name}` style parameters.
pub trait Translator {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// Returns the key itself, the result of a missing translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTranslator;

impl Translator for KeyTranslator {
    fn translate(&self, key: &str, _params: &[(&str, &str)]) -> String {
        key.to_string()
    }
}

impl<F> Translator for F
where
    F: Fn(&str, &[(&str, &str)]) -> String,
{
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        self(key, params)
    }
}
