use thiserror::Error;

use crate::metadata::typesystem::LoadPhase;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Lookup Errors
/// - [`Error::TypeNotFound`] - A class name has no definition available from the provider
///
/// ## Metadata Errors
/// - [`Error::SignatureParse`] - A generic signature or descriptor violates the grammar
/// - [`Error::UnboundTypeVariable`] - A type variable is not declared in any active scope
/// - [`Error::GenericArity`] - A generic type was instantiated with the wrong argument count
/// - [`Error::Malformed`] - The decoded class outline is inconsistent
///
/// ## Resolution Errors
/// - [`Error::Resolution`] - A lazy phase failed; carries class, member and phase context
/// - [`Error::CyclicResolution`] - A lazy phase re-entered itself
/// - [`Error::RecursionLimit`] - Signature nesting exceeded the configured depth
///
/// # Examples
///
/// ```rust
/// use classscope::{Error, Library, MemoryProvider};
///
/// let library = Library::new(MemoryProvider::with_core_classes());
/// match library.get_type("com/example/Missing") {
///     Ok(_) => println!("found"),
///     Err(Error::TypeNotFound(name)) => println!("no class named {}", name),
///     Err(e) => println!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The decoded metadata is damaged and could not be interpreted.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to find a class definition for the requested name.
    ///
    /// Lookups never substitute a placeholder type; the caller must not request a type
    /// before its defining class file is available to the provider.
    #[error("Failed to find type in Library - {0}")]
    TypeNotFound(String),

    /// A signature or descriptor string does not follow the grammar.
    ///
    /// Signatures come from already-compiled metadata, so there is no recovery mode.
    #[error("Invalid signature '{signature}' at position {position}: {message}")]
    SignatureParse {
        /// The complete signature text that failed to parse
        signature: String,
        /// Byte offset at which parsing stopped
        position: usize,
        /// What the parser expected
        message: String,
    },

    /// A type variable reference has no matching declared parameter in any active scope.
    #[error("Type variable '{name}' is not declared in any enclosing scope")]
    UnboundTypeVariable {
        /// Name of the unresolved type variable
        name: String,
    },

    /// A generic type was constructed with a type argument count that does not match
    /// its formal parameter list.
    #[error("Generic type '{type_name}' expects {expected} type argument(s), got {actual}")]
    GenericArity {
        /// Name of the generic type definition
        type_name: String,
        /// Formal parameter count of the definition
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },

    /// A lazy resolution phase of a class failed.
    ///
    /// The node stays in its previous phase; nothing partial is memoized.
    #[error("Failed to resolve {phase} of '{type_name}'{member}: {source}", member = member_suffix(.member))]
    Resolution {
        /// The class whose phase failed
        type_name: String,
        /// The member being resolved, if the failure is member specific
        member: Option<String>,
        /// The phase that was running
        phase: LoadPhase,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A lazy phase was requested again while it was already running on the same thread.
    ///
    /// This happens for cyclic metadata, e.g. two classes naming each other as their
    /// enclosing class.
    #[error("Cyclic resolution of '{type_name}' while resolving {phase}")]
    CyclicResolution {
        /// The class whose phase re-entered itself
        type_name: String,
        /// The phase that was already in progress
        phase: LoadPhase,
    },

    /// Recursion limit reached.
    ///
    /// To prevent stack overflow on hostile input, signature nesting is bounded.
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// General error during type system usage.
    #[error("{0}")]
    TypeError(String),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}

fn member_suffix(member: &Option<String>) -> String {
    match member {
        Some(name) => format!(" (member '{name}')"),
        None => String::new(),
    }
}

impl Error {
    /// Returns the innermost error of a chain of [`Error::Resolution`] wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Resolution { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
