use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wrapper for contact details (emails, phone numbers) that must not show up
/// verbatim in log lines. Debug and Display keep only the first character and,
/// for emails, the domain. Serialization is untouched so API payloads carry the
/// real value.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    fn redacted(&self) -> String {
        let raw = self.0.as_ref();
        let first = raw.chars().next().map(String::from).unwrap_or_default();
        match raw.split_once('@') {
            Some((_, domain)) => format!("{}***@{}", first, domain),
            None => format!("{}***", first),
        }
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Masked({})", self.redacted())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}
