#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A session field that identifies an already-funded role is absent; the
    /// address cannot be reconstructed, so this is fatal.
    #[error("missing session value: {field} (run the earlier pipeline first)")]
    MissingSessionField { field: &'static str },

    #[error("session error")]
    Session(#[from] session::Error),

    #[error("contracts error")]
    Contracts(#[from] contracts::Error),

    #[error("pxe error")]
    Pxe(#[from] pxe::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unwrap a session field that an earlier pipeline must have produced
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(Error::MissingSessionField { field })
}
