use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

// ASCII digits only: `\d` would also accept other Unicode decimal digits.
static BRACKETED_INDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9]+)\]").expect("bracketed index pattern is valid")
});

/// A field `name` split around its first bracketed index,
/// e.g. `items[2].price` → `items`, `2`, `.price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath<'a> {
    pub prefix: &'a str,
    /// Digits between the brackets, as written.
    pub digits: &'a str,
    pub suffix: &'a str,
}

impl<'a> FieldPath<'a> {
    /// `None` when the name has no bracketed digit run.
    pub fn parse(name: &'a str) -> Option<Self> {
        let caps = BRACKETED_INDEX.captures(name)?;
        let whole = caps.get(0)?;
        let digits = caps.get(1)?;
        Some(Self {
            prefix: &name[..whole.start()],
            digits: digits.as_str(),
            suffix: &name[whole.end()..],
        })
    }

    /// Numeric index, `None` if the digit run overflows `usize`.
    pub fn index(&self) -> Option<usize> {
        self.digits.parse().ok()
    }

    pub fn with_index(&self, index: usize) -> String {
        format!("{}[{}]{}", self.prefix, index, self.suffix)
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{}", self.prefix, self.digits, self.suffix)
    }
}

/// Rewrite the first bracketed index of `name`. Names without one are
/// returned unchanged.
pub fn reindex(name: &str, index: usize) -> Cow<'_, str> {
    match FieldPath::parse(name) {
        Some(path) => Cow::Owned(path.with_index(index)),
        None => Cow::Borrowed(name),
    }
}
