//! Language variant selection used by the generated `App` component.
//!
//! The generated `intl` helper applies the same rules at runtime; these
//! functions mirror it for library users and for checking emitted bindings.

/// Picks the translation for `lang`: exact tag first, then its primary
/// subtag (`fr` for `fr-CA`), then the untranslated default.
pub fn select_translation<'a, T>(default: &'a T, translations: &'a [(String, T)], lang: &str) -> &'a T {
    let lookup = |tag: &str| {
        translations
            .iter()
            .find(|(candidate, _)| candidate == tag)
            .map(|(_, value)| value)
    };
    if let Some(exact) = lookup(lang) {
        return exact;
    }
    let prefix = lang.split('-').next().unwrap_or(lang);
    lookup(prefix).unwrap_or(default)
}

/// Index into a route's language list (0 being the sentinel) for `lang`.
pub fn select_variant(languages: &[String], lang: &str) -> usize {
    let translations: Vec<(String, usize)> = languages
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, tag)| (tag.clone(), index))
        .collect();
    *select_translation(&0, &translations, lang)
}
