#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid content kind: '{0}' is neither a post nor a comment")]
    InvalidContentKind(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure reported by a [`TaxonomyLookup`](crate::collaborators::TaxonomyLookup).
///
/// Never propagated past the target resolver; a failed lookup degrades to an
/// empty target list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Unknown taxonomy: {0}")]
    UnknownTaxonomy(String),

    #[error("Taxonomy backend unavailable: {0}")]
    Unavailable(String),
}
