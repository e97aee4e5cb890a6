use std::fmt;

/// The declared type of a mapped property or introspected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean
    Bool,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// 64-bit floating point
    F64,

    /// String
    String,

    /// Binary data
    Bytes,

    /// Date-time without a timezone
    Timestamp,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Bool => "Bool",
            Type::I32 => "I32",
            Type::I64 => "I64",
            Type::F64 => "F64",
            Type::String => "String",
            Type::Bytes => "Bytes",
            Type::Timestamp => "Timestamp",
        };
        f.write_str(name)
    }
}
