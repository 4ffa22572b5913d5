use thiserror::Error;

/// Failure raised while a saver runs against a live component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaverError {
    /// The instance identifies itself by tag but has none.
    #[error(
        "identificationStrategy for {component} is TAG but the component's tag field is null"
    )]
    MissingTag { component: String },

    /// A non-`lateinit` property was read before it was assigned.
    #[error("property {field} of {component} has not been initialized")]
    Uninitialized { component: String, field: String },

    #[error("{component} has no property named {field}")]
    UnknownField { component: String, field: String },
}

pub type Result<T> = std::result::Result<T, SaverError>;
