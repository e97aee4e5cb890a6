/// Returns a double-quoted identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::new();
    push_ident(&mut out, name);
    out
}

/// Appends a double-quoted identifier, escaping embedded quotes.
pub(crate) fn push_ident(dst: &mut String, name: &str) {
    dst.push('"');
    for ch in name.chars() {
        if ch == '"' {
            dst.push('"');
        }
        dst.push(ch);
    }
    dst.push('"');
}

/// Appends a possibly schema-qualified table reference, quoting each part.
pub(crate) fn push_qualified(dst: &mut String, schema: Option<&str>, table: &str) {
    if let Some(schema) = schema {
        push_ident(dst, schema);
        dst.push('.');
    }
    match table.split_once('.') {
        Some((qualifier, bare)) => {
            push_ident(dst, qualifier);
            dst.push('.');
            push_ident(dst, bare);
        }
        None => push_ident(dst, table),
    }
}
