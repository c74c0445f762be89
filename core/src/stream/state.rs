/// Lifecycle of a stream.
///
/// ```text
/// AwaitingHeader -> Body -> (VerifyingTrailer) -> Finalized
///        \            \            \
///         +------------+------------+--> Failed
/// ```
///
/// `Finalized` and `Failed` are terminal. Once `Failed`, no further output is
/// produced and the key material has been purged.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamState {
    AwaitingHeader,
    Body,
    VerifyingTrailer,
    Finalized,
    Failed,
}

impl StreamState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamState::Finalized | StreamState::Failed)
    }
}
