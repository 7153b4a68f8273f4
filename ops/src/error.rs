//! Error types for operator identities and decomposition calls.

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Operator name is not of the form `namespace::op`.
    #[snafu(display("invalid operator name '{name}': {reason}"))]
    InvalidOperatorName { name: String, reason: String },

    /// Schema string could not be parsed.
    #[snafu(display("malformed schema '{schema}' at byte {position}: {reason}"))]
    MalformedSchema { schema: String, position: usize, reason: String },

    /// The catalog already holds an overload with this qualified name.
    #[snafu(display("operator {name} is already defined"))]
    DuplicateOverload { name: String },

    /// An adapted out wrapper received only some of its output slots.
    #[snafu(display(
        "output slots of {structure} must be all set or all unset: got {provided:?}, missing {missing:?}"
    ))]
    MalformedOutputAdaptation { structure: String, provided: Vec<String>, missing: Vec<String> },

    /// A decomposition body looked for an argument that was not passed.
    #[snafu(display("missing argument '{name}'"))]
    MissingArgument { name: String },
}
