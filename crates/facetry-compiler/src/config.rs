//! Compiled facet configuration.
//!
//! `FacetConfig` owns one resource's aliases and the state compiled from
//! them. The lifecycle is an explicit state machine:
//!
//! 1. register aliases (marks the state stale)
//! 2. `compile` (rebuilds every entry and the `all` aggregate)
//! 3. `iterate` / `resolve` any number of times, from any thread
//!
//! Resolution refuses to run against stale state. Expressions that are not
//! registered aliases are compiled on first use and cached in a concurrent
//! map, so resolution only needs `&self`. That cache lives until the next
//! `compile` or an explicit [`FacetConfig::clear_cache`].

use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use indexmap::map::Entry;

use facetry_core::name::ALL;
use facetry_core::{FacetExpr, FacetTree, Name};

use crate::alias_table::AliasTable;
use crate::classify::{AssociationSet, Classifier};
use crate::dealias::{DEFAULT_RECURSION_LIMIT, Dealiaser};
use crate::error::ConfigError;
use crate::inject::{DefaultFacets, inject_default};
use crate::normalize::normalize;
use crate::Result;

/// A compiled facet: every selected field, and the attribute-only view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedFacet {
    pub fields: FacetTree,
    /// `fields` without top-level associations.
    pub attributes: FacetTree,
}

impl NormalizedFacet {
    fn derive(fields: FacetTree, classifier: &dyn Classifier) -> Self {
        let attributes = fields.without_associations(|field| classifier.is_association(field));
        Self { fields, attributes }
    }
}

/// Alias registry plus compiled state for one resource.
#[derive(Clone)]
pub struct FacetConfig {
    aliases: AliasTable,
    defaults: DefaultFacets,
    recursion_limit: u32,
    compiled: bool,
    /// Entries built by `compile`: `all` first, then one per alias.
    normalized: IndexMap<String, Arc<NormalizedFacet>>,
    /// Entries built on demand for expressions that are not aliases.
    adhoc: DashMap<String, Arc<NormalizedFacet>>,
    classifier: Arc<dyn Classifier>,
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self {
            aliases: AliasTable::new(),
            defaults: DefaultFacets::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            compiled: false,
            normalized: IndexMap::new(),
            adhoc: DashMap::new(),
            classifier: Arc::new(AssociationSet::new()),
        }
    }
}

impl std::fmt::Debug for FacetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetConfig")
            .field("aliases", &self.aliases)
            .field("defaults", &self.defaults)
            .field("recursion_limit", &self.recursion_limit)
            .field("compiled", &self.compiled)
            .field("normalized", &self.normalized.keys().collect::<Vec<_>>())
            .field("adhoc", &self.adhoc.len())
            .finish_non_exhaustive()
    }
}

/// Builder for `FacetConfig`.
#[derive(Debug)]
pub struct FacetConfigBuilder {
    aliases: AliasTable,
    defaults: DefaultFacets,
    recursion_limit: u32,
}

impl Default for FacetConfigBuilder {
    fn default() -> Self {
        Self {
            aliases: AliasTable::new(),
            defaults: DefaultFacets::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl FacetConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum alias expansion depth (default: 256).
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Set the default and minimal facet names.
    pub fn default_facets(mut self, defaults: DefaultFacets) -> Self {
        self.defaults = defaults;
        self
    }

    /// Start from a prebuilt alias table.
    pub fn aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Build the configuration, rejecting reserved alias names.
    pub fn build(self) -> Result<FacetConfig> {
        let mut config = FacetConfig {
            defaults: self.defaults,
            recursion_limit: self.recursion_limit,
            ..FacetConfig::default()
        };
        for (name, expr) in self.aliases.iter() {
            config.register_alias(name, expr.clone())?;
        }
        Ok(config)
    }
}

impl FacetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for FacetConfig.
    pub fn builder() -> FacetConfigBuilder {
        FacetConfigBuilder::new()
    }

    /// Register `name` as shorthand for `expr`.
    ///
    /// Marks the configuration stale until the next `compile`.
    pub fn register_alias(
        &mut self,
        name: impl Into<Name>,
        expr: impl Into<FacetExpr>,
    ) -> Result<()> {
        let name = name.into();
        if name.is_reserved() {
            return Err(ConfigError::ReservedAlias(name));
        }
        self.compiled = false;
        self.aliases.insert(name, expr.into());
        Ok(())
    }

    /// Register an alias whose definition is given as JSON.
    pub fn register_alias_json(&mut self, name: impl Into<Name>, json: &str) -> Result<()> {
        let expr = FacetExpr::from_json_str(json)?;
        self.register_alias(name, expr)
    }

    /// Declare `name` as a plain field (the identity alias `name -> name`).
    pub fn expose(&mut self, name: impl Into<Name>) -> Result<()> {
        let name = name.into();
        self.register_alias(name.clone(), FacetExpr::Name(name))
    }

    /// Take over every alias of `parent`; the parent's definitions win.
    pub fn inherit(&mut self, parent: &FacetConfig) {
        self.compiled = false;
        self.aliases.extend_from(&parent.aliases);
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn default_facets(&self) -> &DefaultFacets {
        &self.defaults
    }

    pub fn recursion_limit(&self) -> u32 {
        self.recursion_limit
    }

    /// Whether the compiled state reflects every registered alias.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Compile every alias and the `all` aggregate.
    ///
    /// `classifier` splits each compiled tree into fields and attributes and
    /// is kept for expressions compiled later on demand. Aliases that read
    /// `all` or `all_attributes` are expanded a second time once the
    /// aggregate exists. On error the configuration stays uncompiled.
    pub fn compile(&mut self, classifier: impl Classifier + 'static) -> Result<&mut Self> {
        self.compiled = false;
        self.normalized.clear();
        self.adhoc.clear();

        tracing::debug!(aliases = self.aliases.len(), "compiling facet configuration");

        let classifier: Arc<dyn Classifier> = Arc::new(classifier);
        let mut ctx = CompileCtx {
            aliases: &self.aliases,
            aggregate: None,
            recursion_limit: self.recursion_limit,
            memo: IndexMap::new(),
            deferred: Vec::new(),
        };
        let mut fields = FacetTree::new();
        for name in self.aliases.names() {
            fields.merge(ctx.dealias_and_cache(name)?.clone());
        }
        let all = NormalizedFacet::derive(fields, classifier.as_ref());

        // Aliases reading `all` saw an empty aggregate on the first pass.
        let deferred = std::mem::take(&mut ctx.deferred);
        ctx.aggregate = Some(&all);
        for name in &deferred {
            ctx.recompile(name)?;
        }
        let memo = ctx.memo;

        self.normalized.insert(ALL.to_string(), Arc::new(all));
        for (key, fields) in memo {
            self.normalized
                .insert(key, Arc::new(NormalizedFacet::derive(fields, classifier.as_ref())));
        }
        self.classifier = classifier;
        self.compiled = true;

        tracing::debug!(
            entries = self.normalized.len(),
            fields = self.normalized.get(ALL).map_or(0, |all| all.fields.len()),
            "compiled facet configuration"
        );
        Ok(self)
    }

    /// Fully resolve a requested expression.
    ///
    /// Injects the default facet, expands aliases and normalizes. Results are
    /// memoized per expression. Requests that are not a registered alias add
    /// one cache entry per distinct expression; see [`clear_cache`](Self::clear_cache).
    pub fn resolve(&self, expr: &FacetExpr) -> Result<Arc<NormalizedFacet>> {
        if !self.compiled {
            return Err(ConfigError::NotCompiled);
        }

        let expr = inject_default(expr, &self.defaults);
        let key = expr.memo_key();
        if let Some(entry) = self.normalized.get(&key) {
            return Ok(Arc::clone(entry));
        }
        if let Some(entry) = self.adhoc.get(&key) {
            return Ok(Arc::clone(entry.value()));
        }

        let aggregate = self.normalized.get(ALL).map(Arc::as_ref);
        let dealiased =
            Dealiaser::new(&self.aliases, aggregate, self.recursion_limit).dealias(&expr)?;
        let entry = Arc::new(NormalizedFacet::derive(
            normalize(&dealiased),
            self.classifier.as_ref(),
        ));

        tracing::trace!(facet = %key, fields = entry.fields.len(), "cached facet");
        Ok(Arc::clone(self.adhoc.entry(key).or_insert(entry).value()))
    }

    /// Drop every cached ad-hoc request.
    ///
    /// Alias entries built by `compile` are kept. Hosts resolving many
    /// distinct caller-supplied expressions can call this to bound memory.
    pub fn clear_cache(&self) {
        tracing::debug!(entries = self.adhoc.len(), "clearing facet cache");
        self.adhoc.clear();
    }

    /// Number of cached ad-hoc requests.
    pub fn cached_len(&self) -> usize {
        self.adhoc.len()
    }

    /// Invoke `visit` once per top-level field of the resolved `expr`.
    ///
    /// Associations are not followed: `visit` receives each field's nested
    /// selection and decides what to do with it.
    pub fn iterate<F>(&self, expr: &FacetExpr, mut visit: F) -> Result<()>
    where
        F: FnMut(&Name, &FacetTree),
    {
        let facet = self.resolve(expr)?;
        for (field, nested) in &facet.fields {
            visit(field, nested);
        }
        Ok(())
    }

    /// Like [`iterate`](Self::iterate), stopping at the first visitor error.
    pub fn try_iterate<E, F>(&self, expr: &FacetExpr, mut visit: F) -> std::result::Result<(), E>
    where
        E: From<ConfigError>,
        F: FnMut(&Name, &FacetTree) -> std::result::Result<(), E>,
    {
        let facet = self.resolve(expr)?;
        for (field, nested) in &facet.fields {
            visit(field, nested)?;
        }
        Ok(())
    }

    /// Compiled entry for a registered alias, or `all`.
    ///
    /// `None` for names that were never registered.
    pub fn normalized(&self, alias: &str) -> Result<Option<&NormalizedFacet>> {
        if !self.compiled {
            return Err(ConfigError::NotCompiled);
        }
        Ok(self.normalized.get(alias).map(Arc::as_ref))
    }

    fn aggregate(&self) -> Result<&NormalizedFacet> {
        self.normalized(ALL)?.ok_or(ConfigError::NotCompiled)
    }

    /// Union of every alias's fields.
    pub fn all_fields(&self) -> Result<&FacetTree> {
        self.aggregate().map(|all| &all.fields)
    }

    /// Union of every alias's fields, associations excluded.
    pub fn all_attributes(&self) -> Result<&FacetTree> {
        self.aggregate().map(|all| &all.attributes)
    }

    /// Every field this resource can expose, flattened.
    pub fn exposed_fields(&self) -> Result<Vec<Name>> {
        self.all_fields().map(FacetTree::field_names)
    }
}

/// Per-compile expansion state.
struct CompileCtx<'a> {
    aliases: &'a AliasTable,
    /// The `all` entry, once the first pass has built it.
    aggregate: Option<&'a NormalizedFacet>,
    recursion_limit: u32,
    memo: IndexMap<String, FacetTree>,
    /// Aliases whose expansion read `all` before it existed.
    deferred: Vec<Name>,
}

impl CompileCtx<'_> {
    /// Dealias and normalize `alias`, memoized under its name.
    fn dealias_and_cache(&mut self, alias: &Name) -> Result<&FacetTree> {
        match self.memo.entry(alias.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let mut dealiaser =
                    Dealiaser::new(self.aliases, self.aggregate, self.recursion_limit);
                let dealiased = dealiaser.dealias(&FacetExpr::Name(alias.clone()))?;
                if dealiaser.needs_aggregate() {
                    self.deferred.push(alias.clone());
                }
                Ok(e.insert(normalize(&dealiased)))
            }
        }
    }

    /// Rebuild the memo entry for `alias` against the current aggregate.
    fn recompile(&mut self, alias: &Name) -> Result<()> {
        let dealiased = Dealiaser::new(self.aliases, self.aggregate, self.recursion_limit)
            .dealias(&FacetExpr::Name(alias.clone()))?;
        tracing::trace!(alias = %alias, "recompiled facet against aggregate");
        self.memo.insert(alias.to_string(), normalize(&dealiased));
        Ok(())
    }
}
