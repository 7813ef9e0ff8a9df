//! Operation identity used to label notifications.

use std::fmt;

/// A descriptive label for the operation a retry loop is running.
///
/// Used only to name the operation in notifications; it never affects
/// retry decisions. Either introspected from the operation's type with
/// [`OperationName::of`] or supplied by the caller with [`OperationName::new`].
///
/// # Examples
///
/// ```rust
/// use retrykit_core::notify::OperationName;
///
/// fn submit_order() -> Result<(), std::io::Error> {
///     Ok(())
/// }
///
/// let name = OperationName::of(&submit_order);
/// assert_eq!(name.member(), Some("submit_order"));
///
/// let named = OperationName::new("orders.submit");
/// assert_eq!(named.to_string(), "orders.submit");
/// assert_eq!(named.member(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationName {
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    /// Enclosing path segment plus the function name.
    Structured { scope: String, member: String },
    /// Caller-supplied label, or a type name that could not be split.
    Described(String),
}

impl OperationName {
    /// An explicit, caller-supplied label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            repr: Repr::Described(label.into()),
        }
    }

    /// Introspect a name from the type of a function or closure.
    ///
    /// Function items resolve to `module::function`; closures resolve to
    /// the function they were written in. Falls back to the raw type name
    /// when it has no usable path.
    pub fn of<F: ?Sized>(_operation: &F) -> Self {
        Self::from_type_name(std::any::type_name::<F>())
    }

    /// Build a name from a `std::any::type_name` string.
    pub fn from_type_name(type_name: &str) -> Self {
        let stripped = strip_generics(type_name);
        let path: Vec<&str> = stripped
            .split("::")
            .map(|segment| segment.trim_start_matches('&').trim())
            .filter(|segment| is_identifier(segment))
            .collect();

        match path.as_slice() {
            [.., scope, member] => Self {
                repr: Repr::Structured {
                    scope: (*scope).to_string(),
                    member: (*member).to_string(),
                },
            },
            _ => Self::new(type_name),
        }
    }

    /// The enclosing scope, when the name was introspected structurally.
    pub fn scope(&self) -> Option<&str> {
        match &self.repr {
            Repr::Structured { scope, .. } => Some(scope),
            Repr::Described(_) => None,
        }
    }

    /// The function name, when the name was introspected structurally.
    pub fn member(&self) -> Option<&str> {
        match &self.repr {
            Repr::Structured { member, .. } => Some(member),
            Repr::Described(_) => None,
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Structured { scope, member } => write!(f, "{}::{}", scope, member),
            Repr::Described(label) => f.write_str(label),
        }
    }
}

impl From<&str> for OperationName {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for OperationName {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

/// Drop everything between matching angle brackets.
fn strip_generics(type_name: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(type_name.len());
    for ch in type_name.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Path segments such as `{{closure}}` or `{{constant}}` are not names.
fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|ch| ch == '_' || ch.is_alphanumeric())
}
