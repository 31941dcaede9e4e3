use thiserror::Error;

/// Errors raised by graph construction and path search.
///
/// None of these are retried internally; they surface to the caller at the
/// point they occur.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `add_edge` was given an endpoint that is not in the vertex list.
    #[error("invalid edge {from} -> {to}: vertex '{missing}' is not in the graph")]
    InvalidEdge {
        from: String,
        to: String,
        missing: String,
    },

    /// A relaxation step asked for the weight of an edge that was never captured.
    #[error("no edge between '{from}' and '{to}' to evaluate the distance")]
    DistanceLookup { from: String, to: String },

    /// No predecessor chain leads from the source to the target.
    #[error("no path found from '{from}' to '{to}'")]
    NoPathFound { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, Error>;
