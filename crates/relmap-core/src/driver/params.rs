use crate::stmt::Value;

/// Parameters passed to the execution facility alongside SQL text.
///
/// relmap never parses caller-supplied WHERE/ORDER BY fragments, so the
/// parameters that accompany them stay equally opaque: either a positional
/// list matching `?` placeholders or name/value pairs for named binding.
#[derive(Debug, Clone, Default)]
pub enum Params {
    /// The statement takes no parameters.
    #[default]
    None,

    /// Values bound in order to `?` placeholders.
    Positional(Vec<Value>),

    /// Values bound by name.
    Named(Vec<(String, Value)>),
}

impl Params {
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Named(
            values
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Positional(values) => values.is_empty(),
            Self::Named(values) => values.is_empty(),
        }
    }
}
