/// Returns early with an ad-hoc [`Error`](crate::Error) built from a format
/// string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::adhoc(format!($($arg)*)))
    };
}

/// Creates an ad-hoc [`Error`](crate::Error) from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::adhoc(format!($($arg)*))
    };
}
