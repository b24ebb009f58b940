//! Localized router: compilation, matching and URL construction
//!
//! A route table compiles once per shop into an ordered list of
//! [`CompiledRoute`]s. Matching walks that list in declaration order and
//! the first structural + constraint match wins; there is no specificity
//! ranking, so table authors must order specific patterns before general
//! ones. Construction walks the same list and is the left inverse of
//! matching for handler, action and language.
//!
//! Two built-in fallback routes are appended after all custom routes, in
//! this fixed order: the generic `<handler>/<action>[/<id \d+>]` dispatch
//! route and the root route. Both default to handler "home" and action
//! "default", so every shop has a reachable homepage even with an empty
//! route table.

use std::collections::HashMap;
use tracing::{debug, warn};

use shoproute_core::{Result, SupportedLanguages};

use crate::definition::RouteDefinition;
use crate::pattern::CompiledPattern;

/// Name of the implicit language capture added to language-agnostic
/// patterns.
const LANG_CAPTURE: &str = "lang";

/// Fallback destination used by the built-in routes.
const FALLBACK_HANDLER: &str = "home";
const FALLBACK_ACTION: &str = "default";

/// Result of matching a path: the logical destination plus parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub handler: String,
    pub action: String,
    pub language: String,
    /// Named captures merged over the route's static parameters
    /// (captures win).
    pub params: HashMap<String, String>,
}

/// How a compiled branch determines the request language.
#[derive(Debug, Clone)]
enum LanguageBinding {
    /// Branch compiled from a per-language pattern; the language is fixed.
    Fixed(String),
    /// Branch with an optional `lang` capture; absence means the default
    /// language.
    Captured,
}

/// How a compiled branch determines handler or action.
#[derive(Debug, Clone)]
enum Target {
    Fixed(String),
    /// Taken from a named capture, with a default when the capture is
    /// absent (built-in fallback routes).
    Captured { capture: String, default: String },
}

impl Target {
    fn resolve(&self, captures: &mut HashMap<String, String>) -> String {
        match self {
            Target::Fixed(name) => name.clone(),
            Target::Captured { capture, default } => captures
                .remove(capture)
                .unwrap_or_else(|| default.clone()),
        }
    }

    /// Whether this branch can produce the requested name, binding the
    /// capture value when it is capture-driven.
    fn bind(
        &self,
        requested: &str,
        values: &mut HashMap<String, String>,
        defaults: &mut HashMap<String, String>,
    ) -> bool {
        match self {
            Target::Fixed(name) => name == requested,
            Target::Captured { capture, default } => {
                values.insert(capture.clone(), requested.to_string());
                defaults.insert(capture.clone(), default.clone());
                true
            }
        }
    }
}

/// One compiled branch of a route definition.
#[derive(Debug, Clone)]
struct CompiledRoute {
    /// Index of the originating definition; branches of one definition
    /// share it so construction can pick a language branch per definition.
    def_index: usize,
    pattern: CompiledPattern,
    handler: Target,
    action: Target,
    language: LanguageBinding,
    params: HashMap<String, String>,
}

/// Bidirectional, language-aware router for one shop.
///
/// Immutable after compilation; share it as `Arc<LocalizedRouter>` across
/// concurrently served requests.
#[derive(Debug, Clone)]
pub struct LocalizedRouter {
    routes: Vec<CompiledRoute>,
    languages: SupportedLanguages,
}

impl LocalizedRouter {
    /// Compile a route table.
    ///
    /// Per-language patterns referencing an unsupported language are
    /// skipped with a warning; everything else that fails to compile is a
    /// hard error so broken tables surface at load time, not per request.
    pub fn compile(definitions: &[RouteDefinition], languages: SupportedLanguages) -> Result<Self> {
        let mut routes = Vec::new();

        for (def_index, definition) in definitions.iter().enumerate() {
            definition.validate()?;

            if let Some(patterns) = &definition.patterns {
                for (lang, pattern) in patterns {
                    if !languages.is_supported(lang) {
                        warn!(
                            language = %lang,
                            handler = %definition.handler,
                            action = %definition.action,
                            "skipping route pattern for unsupported language"
                        );
                        continue;
                    }
                    let source = if lang == languages.default_language() {
                        pattern.clone()
                    } else {
                        format!("{}/{}", lang, pattern)
                    };
                    routes.push(CompiledRoute {
                        def_index,
                        pattern: CompiledPattern::compile(&source)?,
                        handler: Target::Fixed(definition.handler.clone()),
                        action: Target::Fixed(definition.action.clone()),
                        language: LanguageBinding::Fixed(lang.clone()),
                        params: definition.params.clone(),
                    });
                }
            } else if let Some(pattern) = &definition.pattern {
                let source = wrap_language_prefix(pattern, &languages);
                routes.push(CompiledRoute {
                    def_index,
                    pattern: CompiledPattern::compile(&source)?,
                    handler: Target::Fixed(definition.handler.clone()),
                    action: Target::Fixed(definition.action.clone()),
                    language: LanguageBinding::Captured,
                    params: definition.params.clone(),
                });
            }
        }

        // Built-in fallbacks, fixed order: generic dispatch, then root.
        let generic = wrap_language_prefix(r"<handler>/<action>[/<id \d+>]", &languages);
        routes.push(CompiledRoute {
            def_index: definitions.len(),
            pattern: CompiledPattern::compile(&generic)?,
            handler: Target::Captured {
                capture: "handler".to_string(),
                default: FALLBACK_HANDLER.to_string(),
            },
            action: Target::Captured {
                capture: "action".to_string(),
                default: FALLBACK_ACTION.to_string(),
            },
            language: LanguageBinding::Captured,
            params: HashMap::new(),
        });

        let root = wrap_language_prefix("", &languages);
        routes.push(CompiledRoute {
            def_index: definitions.len() + 1,
            pattern: CompiledPattern::compile(&root)?,
            handler: Target::Captured {
                capture: "handler".to_string(),
                default: FALLBACK_HANDLER.to_string(),
            },
            action: Target::Captured {
                capture: "action".to_string(),
                default: FALLBACK_ACTION.to_string(),
            },
            language: LanguageBinding::Captured,
            params: HashMap::new(),
        });

        Ok(Self { routes, languages })
    }

    /// Match a request path; `None` is the first-class "no route matched"
    /// outcome (callers map it to 404).
    pub fn match_path(&self, path: &str) -> Option<MatchResult> {
        for route in &self.routes {
            let Some(mut captures) = route.pattern.match_path(path) else {
                continue;
            };

            let language = match &route.language {
                LanguageBinding::Fixed(lang) => lang.clone(),
                LanguageBinding::Captured => captures
                    .remove(LANG_CAPTURE)
                    .unwrap_or_else(|| self.languages.default_language().to_string()),
            };
            // A compiled alternation may still accept a since-removed code
            let language = self.languages.sanitize(&language).to_string();

            let handler = route.handler.resolve(&mut captures);
            let action = route.action.resolve(&mut captures);

            let mut params = route.params.clone();
            params.extend(captures);

            debug!(
                path,
                handler = %handler,
                action = %action,
                language = %language,
                pattern = route.pattern.source(),
                "route matched"
            );

            return Some(MatchResult {
                handler,
                action,
                language,
                params,
            });
        }

        debug!(path, "no route matched");
        None
    }

    /// Construct the canonical URL path for a destination.
    ///
    /// Returns a leading-slash path; `None` is the first-class
    /// "unconstructable" outcome (callers render a neutral fallback such
    /// as `#` instead of failing the page).
    ///
    /// Route selection follows declaration order. For a per-language
    /// definition the branch for the requested language is preferred,
    /// falling back to the default-language branch when the requested
    /// language has no pattern there.
    pub fn construct(
        &self,
        handler: &str,
        action: &str,
        language: &str,
        params: &HashMap<String, String>,
    ) -> Option<String> {
        let language = self.languages.sanitize(language);

        let mut index = 0;
        while index < self.routes.len() {
            let def_index = self.routes[index].def_index;
            let mut exact: Option<&CompiledRoute> = None;
            let mut default_branch: Option<&CompiledRoute> = None;

            while index < self.routes.len() && self.routes[index].def_index == def_index {
                let route = &self.routes[index];
                match &route.language {
                    LanguageBinding::Captured => exact = exact.or(Some(route)),
                    LanguageBinding::Fixed(lang) if lang == language => {
                        exact = exact.or(Some(route));
                    }
                    LanguageBinding::Fixed(lang) if lang == self.languages.default_language() => {
                        default_branch = default_branch.or(Some(route));
                    }
                    LanguageBinding::Fixed(_) => {}
                }
                index += 1;
            }

            let Some(route) = exact.or(default_branch) else {
                continue;
            };
            if let Some(path) = self.try_construct(route, handler, action, language, params) {
                return Some(path);
            }
        }

        debug!(handler, action, language, "destination not constructable");
        None
    }

    fn try_construct(
        &self,
        route: &CompiledRoute,
        handler: &str,
        action: &str,
        language: &str,
        params: &HashMap<String, String>,
    ) -> Option<String> {
        let mut values = params.clone();
        let mut defaults = HashMap::new();

        if !route.handler.bind(handler, &mut values, &mut defaults) {
            return None;
        }
        if !route.action.bind(action, &mut values, &mut defaults) {
            return None;
        }

        if let LanguageBinding::Captured = route.language {
            values.insert(LANG_CAPTURE.to_string(), language.to_string());
            defaults.insert(
                LANG_CAPTURE.to_string(),
                self.languages.default_language().to_string(),
            );
        }

        let path = route.pattern.construct(&values, &defaults)?;
        Some(format!("/{}", path))
    }

    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.languages.is_supported(lang)
    }

    pub fn default_language(&self) -> &str {
        self.languages.default_language()
    }

    pub fn supported_languages(&self) -> &[String] {
        self.languages.supported()
    }

    pub fn languages(&self) -> &SupportedLanguages {
        &self.languages
    }
}

/// Wrap a language-agnostic pattern with an optional prefix matching any
/// supported non-default language. With a single-language set the pattern
/// is compiled as-is.
fn wrap_language_prefix(pattern: &str, languages: &SupportedLanguages) -> String {
    let alternation: Vec<&str> = languages.non_default().collect();
    if alternation.is_empty() {
        pattern.to_string()
    } else {
        format!("[<{} {}>/]{}", LANG_CAPTURE, alternation.join("|"), pattern)
    }
}
