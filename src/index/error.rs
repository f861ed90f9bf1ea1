/// Errors that can occur while building the cross-reference indices
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// A response hit set key has no spectrum under the same key in the
    /// aligned request
    #[error("Misaligned index: response {response} has hit set {key} but request {response} has no spectrum {key}")]
    MisalignedIndex {
        /// Position of the response (and of the request it should align with)
        response: usize,
        /// Hit set key without a matching spectrum key
        key: usize,
    },

    /// A response entry has no request entry at the same list position
    #[error("Misaligned index: response {response} has no request at the same position")]
    MissingRequest {
        /// Position of the response
        response: usize,
    },
}
