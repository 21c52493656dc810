//! Error types for session aggregation and run validation.

/// Errors raised while feeding a session.
///
/// Every variant is local and recoverable: the offending input is dropped
/// and the session carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A year sample arrived at or before the last accepted year.
    #[error("year {year} is not after the last ingested year {last_year}; sample dropped")]
    OutOfOrder {
        /// Year carried by the rejected sample.
        year: i32,
        /// Year of the last sample in the sequence.
        last_year: i32,
    },
}

/// Reasons a run may not start.
///
/// Checked by the caller before `reset`. Display strings are shown to the
/// operator verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The species set is empty.
    #[error("At least one species must be tracked")]
    NoSpecies,

    /// Two species share a key.
    #[error("Species key {key:?} is configured more than once")]
    DuplicateSpecies {
        /// The repeated key.
        key: String,
    },

    /// `end_year` is not after `start_year`.
    #[error("End year must be greater than start year")]
    EndBeforeStart,

    /// A tracked species has no positive initial population.
    #[error("Initial populations must be greater than zero")]
    NonPositivePopulation {
        /// The first offending species key.
        species: String,
    },

    /// One of alpha, beta, gamma, delta is zero, negative or NaN.
    #[error("All rate parameters must be greater than zero")]
    NonPositiveRate,
}
