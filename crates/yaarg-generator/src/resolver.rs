//! Generator resolution.
//!
//! Picks the generator for a file and merges its options. Resolution order:
//!
//! 1. An explicitly requested generator is used as-is; no rule is consulted.
//! 2. Otherwise the first rule whose glob matches the path wins.
//! 3. No match and no explicit generator is a [`ResolveError::NoMatchingEngine`].
//!
//! Options start from the per-call map; a matched rule's defaults are laid
//! on top of it, so **rule-level defaults override per-call values** for the
//! same key. The merged map is then validated by the selected generator.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use yaarg_config::{Config, Options, RuleConfig};

use crate::{Generator, GeneratorRegistry, PathPattern, ResolveError};

/// A compiled resolver rule.
#[derive(Debug, Clone)]
pub struct ResolverRule {
    pattern: PathPattern,
    generator: String,
    options: Options,
}

impl ResolverRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidGlob`] if the glob cannot be compiled.
    pub fn new(
        glob: &str,
        generator: impl Into<String>,
        options: Options,
    ) -> Result<Self, ResolveError> {
        let pattern = PathPattern::new(glob).map_err(|source| ResolveError::InvalidGlob {
            pattern: glob.to_owned(),
            source,
        })?;
        Ok(Self {
            pattern,
            generator: generator.into(),
            options,
        })
    }

    /// Compile a rule from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidGlob`] if the glob cannot be compiled.
    pub fn from_config(rule: &RuleConfig) -> Result<Self, ResolveError> {
        Self::new(&rule.glob, rule.generator.clone(), rule.options.clone())
    }

    /// Registry key of the generator this rule selects.
    #[must_use]
    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Whether the rule applies to `path`.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        self.pattern.matches(path)
    }
}

/// Outcome of [`Resolver::resolve`].
pub struct Resolved {
    /// Shared generator instance.
    pub generator: Rc<dyn Generator>,
    /// Merged and validated options.
    pub options: Options,
}

/// Selects generators for files and caches one instance per generator key.
///
/// The cache is append-only and lives as long as the resolver. It is not
/// synchronized: concurrent builds must each own a resolver.
pub struct Resolver {
    rules: Vec<ResolverRule>,
    registry: GeneratorRegistry,
    base_dir: PathBuf,
    cache: HashMap<String, Rc<dyn Generator>>,
}

impl Resolver {
    /// Create a resolver.
    ///
    /// Every rule's generator must be registered; unknown keys are reported
    /// here rather than on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::EngineLoad`] for a rule naming an unregistered generator.
    pub fn new(
        rules: Vec<ResolverRule>,
        registry: GeneratorRegistry,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Self, ResolveError> {
        if let Some(rule) = rules.iter().find(|rule| !registry.contains(&rule.generator)) {
            return Err(ResolveError::EngineLoad {
                name: rule.generator.clone(),
                reason: "not registered".to_owned(),
            });
        }

        Ok(Self {
            rules,
            registry,
            base_dir: base_dir.into(),
            cache: HashMap::new(),
        })
    }

    /// Create a resolver from loaded configuration (declared plus built-in rules).
    ///
    /// # Errors
    ///
    /// Returns an error if a glob is invalid or a generator is not registered.
    pub fn from_config(config: &Config, registry: GeneratorRegistry) -> Result<Self, ResolveError> {
        let rules = config
            .rules()
            .iter()
            .map(ResolverRule::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules, registry, config.base_dir.clone())
    }

    /// Project root handed to generator factories.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Number of generator instances created so far.
    #[must_use]
    pub fn cached_generators(&self) -> usize {
        self.cache.len()
    }

    /// Select a generator for `file_path` and validate the merged options.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoMatchingEngine`] if no rule matches and `generator` is `None`
    /// - [`ResolveError::EngineLoad`] if the generator cannot be instantiated
    /// - [`ResolveError::InvalidOptions`] if the merged options fail validation
    pub fn resolve(
        &mut self,
        file_path: &Path,
        generator: Option<&str>,
        options: Option<&Options>,
    ) -> Result<Resolved, ResolveError> {
        let mut merged = options.cloned().unwrap_or_default();

        let name = if let Some(name) = generator {
            name.to_owned()
        } else {
            let rule = self
                .rules
                .iter()
                .find(|rule| rule.matches(file_path))
                .ok_or_else(|| ResolveError::NoMatchingEngine(file_path.to_path_buf()))?;

            tracing::debug!(
                path = %file_path.display(),
                glob = rule.pattern.as_str(),
                generator = %rule.generator,
                "Matched resolver rule"
            );

            merged.overlay(&rule.options);
            rule.generator.clone()
        };

        let generator = self.instance(&name)?;
        let options = generator.validate_options(merged)?;

        Ok(Resolved { generator, options })
    }

    fn instance(&mut self, name: &str) -> Result<Rc<dyn Generator>, ResolveError> {
        if let Some(generator) = self.cache.get(name) {
            return Ok(Rc::clone(generator));
        }

        let generator: Rc<dyn Generator> =
            Rc::from(self.registry.instantiate(name, &self.base_dir)?);
        tracing::debug!(generator = name, "Instantiated generator");

        self.cache.insert(name.to_owned(), Rc::clone(&generator));
        Ok(generator)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;
    use yaarg_config::OptionValue;

    use super::*;
    use crate::{Blocks, GenerateError, LoadError, OptionKind, OptionSchema, OptionsError};

    thread_local! {
        static INSTANCES: Cell<usize> = const { Cell::new(0) };
    }

    struct DepthGenerator {
        label: &'static str,
    }

    impl Generator for DepthGenerator {
        fn name(&self) -> &str {
            self.label
        }

        fn validate_options(&self, options: Options) -> Result<Options, OptionsError> {
            OptionSchema::new()
                .with_default("depth", OptionKind::Integer, 2)
                .optional("label", OptionKind::String)
                .validate(options)
        }

        fn generate(
            &self,
            _file_path: &Path,
            _symbol: Option<&str>,
            _options: &Options,
        ) -> Result<Blocks, GenerateError> {
            Ok(Box::new(std::iter::empty()))
        }
    }

    fn load_primary(_base_dir: &Path) -> Result<Box<dyn Generator>, LoadError> {
        INSTANCES.with(|count| count.set(count.get() + 1));
        Ok(Box::new(DepthGenerator { label: "primary" }))
    }

    fn load_secondary(_base_dir: &Path) -> Result<Box<dyn Generator>, LoadError> {
        Ok(Box::new(DepthGenerator { label: "secondary" }))
    }

    fn load_broken(_base_dir: &Path) -> Result<Box<dyn Generator>, LoadError> {
        Err(LoadError("grammar unavailable".to_owned()))
    }

    fn registry() -> GeneratorRegistry {
        GeneratorRegistry::new()
            .with("primary", load_primary)
            .with("secondary", load_secondary)
            .with("broken", load_broken)
    }

    fn rule(glob: &str, generator: &str, options: Options) -> ResolverRule {
        ResolverRule::new(glob, generator, options).unwrap()
    }

    fn depth(options: &Options) -> Option<&OptionValue> {
        options.get("depth")
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            rule("special/*.py", "secondary", Options::new()),
            rule("*.py", "primary", Options::new()),
        ];
        let mut resolver = Resolver::new(rules, registry(), "/project").unwrap();

        let resolved = resolver
            .resolve(Path::new("special/mod.py"), None, None)
            .unwrap();
        assert_eq!(resolved.generator.name(), "secondary");

        let resolved = resolver.resolve(Path::new("pkg/mod.py"), None, None).unwrap();
        assert_eq!(resolved.generator.name(), "primary");
    }

    #[test]
    fn test_rule_defaults_override_request_options() {
        let rule_options: Options = [("depth", 5)].into_iter().collect();
        let mut resolver = Resolver::new(
            vec![rule("*.py", "primary", rule_options)],
            registry(),
            "/project",
        )
        .unwrap();

        let request: Options = [("depth", 3)].into_iter().collect();
        let resolved = resolver
            .resolve(Path::new("pkg/mod.py"), None, Some(&request))
            .unwrap();

        assert_eq!(depth(&resolved.options), Some(&OptionValue::Integer(5)));
    }

    #[test]
    fn test_request_options_kept_when_rule_is_silent() {
        let rule_options: Options = [("label", "api")].into_iter().collect();
        let mut resolver = Resolver::new(
            vec![rule("*.py", "primary", rule_options)],
            registry(),
            "/project",
        )
        .unwrap();

        let request: Options = [("depth", 3)].into_iter().collect();
        let resolved = resolver
            .resolve(Path::new("mod.py"), None, Some(&request))
            .unwrap();

        assert_eq!(depth(&resolved.options), Some(&OptionValue::Integer(3)));
        assert_eq!(
            resolved.options.get("label"),
            Some(&OptionValue::from("api"))
        );
    }

    #[test]
    fn test_explicit_generator_skips_rules() {
        let rule_options: Options = [("depth", 5)].into_iter().collect();
        let mut resolver = Resolver::new(
            vec![rule("*.py", "primary", rule_options)],
            registry(),
            "/project",
        )
        .unwrap();

        let request: Options = [("depth", 3)].into_iter().collect();
        let resolved = resolver
            .resolve(Path::new("mod.py"), Some("secondary"), Some(&request))
            .unwrap();

        assert_eq!(resolved.generator.name(), "secondary");
        assert_eq!(depth(&resolved.options), Some(&OptionValue::Integer(3)));
    }

    #[test]
    fn test_explicit_generator_for_unmatched_path() {
        let mut resolver = Resolver::new(Vec::new(), registry(), "/project").unwrap();
        let resolved = resolver
            .resolve(Path::new("notes.txt"), Some("primary"), None)
            .unwrap();
        assert_eq!(resolved.generator.name(), "primary");
    }

    #[test]
    fn test_defaults_filled_by_validation() {
        let mut resolver = Resolver::new(
            vec![rule("*.py", "primary", Options::new())],
            registry(),
            "/project",
        )
        .unwrap();

        let resolved = resolver.resolve(Path::new("mod.py"), None, None).unwrap();
        assert_eq!(depth(&resolved.options), Some(&OptionValue::Integer(2)));
    }

    #[test]
    fn test_no_matching_engine() {
        let mut resolver = Resolver::new(
            vec![rule("*.py", "primary", Options::new())],
            registry(),
            "/project",
        )
        .unwrap();

        let result = resolver.resolve(Path::new("app.js"), None, None);
        assert!(
            matches!(&result, Err(ResolveError::NoMatchingEngine(path)) if path == Path::new("app.js"))
        );
    }

    #[test]
    fn test_unregistered_explicit_generator() {
        let mut resolver = Resolver::new(Vec::new(), registry(), "/project").unwrap();
        let result = resolver.resolve(Path::new("mod.py"), Some("missing"), None);
        assert!(matches!(result, Err(ResolveError::EngineLoad { name, .. }) if name == "missing"));
    }

    #[test]
    fn test_unregistered_rule_generator_rejected_at_setup() {
        let result = Resolver::new(
            vec![rule("*.py", "missing", Options::new())],
            registry(),
            "/project",
        );
        assert!(matches!(result, Err(ResolveError::EngineLoad { name, .. }) if name == "missing"));
    }

    #[test]
    fn test_factory_failure_is_engine_load() {
        let mut resolver = Resolver::new(Vec::new(), registry(), "/project").unwrap();
        let err = resolver
            .resolve(Path::new("mod.py"), Some("broken"), None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("grammar unavailable"));
    }

    #[test]
    fn test_invalid_options_propagate() {
        let mut resolver = Resolver::new(
            vec![rule("*.py", "primary", Options::new())],
            registry(),
            "/project",
        )
        .unwrap();

        let request: Options = [("depth", "deep")].into_iter().collect();
        let result = resolver.resolve(Path::new("mod.py"), None, Some(&request));
        assert!(matches!(
            result,
            Err(ResolveError::InvalidOptions(OptionsError::WrongType { .. }))
        ));
    }

    #[test]
    fn test_invalid_glob() {
        let result = ResolverRule::new("[a-", "primary", Options::new());
        assert!(matches!(result, Err(ResolveError::InvalidGlob { .. })));
    }

    #[test]
    fn test_generator_instantiated_once() {
        INSTANCES.with(|count| count.set(0));
        let mut resolver = Resolver::new(
            vec![rule("*.py", "primary", Options::new())],
            registry(),
            "/project",
        )
        .unwrap();

        let first = resolver.resolve(Path::new("a.py"), None, None).unwrap();
        let second = resolver.resolve(Path::new("b.py"), None, None).unwrap();
        let third = resolver
            .resolve(Path::new("c.txt"), Some("primary"), None)
            .unwrap();

        assert_eq!(INSTANCES.with(Cell::get), 1);
        assert_eq!(resolver.cached_generators(), 1);
        assert!(Rc::ptr_eq(&first.generator, &second.generator));
        assert!(Rc::ptr_eq(&first.generator, &third.generator));
    }

    #[test]
    fn test_from_config_appends_builtin_rules() {
        let config: Config = toml::from_str(
            r#"
[[resolver]]
glob = "*.py"
generator = "primary"
"#,
        )
        .unwrap();

        let result = Resolver::from_config(&config, registry());
        assert!(
            matches!(result, Err(ResolveError::EngineLoad { name, .. }) if name == "python"),
            "built-in python rule requires the python generator"
        );
    }
}
