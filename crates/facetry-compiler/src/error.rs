use facetry_core::{ExprError, Name};

/// Errors raised while configuring or compiling facets.
///
/// All of these are configuration defects. None is recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidFacet(#[from] ExprError),

    /// Iteration attempted before `compile`, or after a registration made
    /// the compiled state stale.
    #[error("facet configuration not compiled")]
    NotCompiled,

    /// An alias expands, directly or indirectly, to itself.
    #[error("self referencing facet declaration: {}", format_chain(.chain))]
    AliasCycle { chain: Vec<Name> },

    /// Alias expansion nested deeper than the configured limit.
    #[error("self referencing facet declaration: expansion exceeded depth {limit}")]
    RecursionLimitExceeded { limit: u32 },

    /// `all` and `all_attributes` cannot be registered as aliases.
    #[error("expose facet (:{0}) reserved")]
    ReservedAlias(Name),
}

fn format_chain(chain: &[Name]) -> String {
    chain
        .iter()
        .map(Name::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
