//! Name transformation helpers used to generate idiomatic Rust code.
//==================================================================================NAME_HELPERS
/// Convert `snake_case` into `PascalCase`. Digits close a word, so
/// `tire_2_status` becomes `Tire2Status`.
pub(crate) fn to_pascal_case(name: &str) -> String {
    let mut buffer = String::new();
    let mut capitalize_next = true;

    for c in name.chars() {
        match c {
            ' ' | '_' | '-' | '.' | '/' => capitalize_next = true,
            _ if capitalize_next && c.is_alphanumeric() => {
                buffer.push(c.to_ascii_uppercase());
                capitalize_next = c.is_ascii_digit();
            }
            _ if c.is_ascii_digit() => {
                buffer.push(c);
                capitalize_next = true;
            }
            _ if c.is_alphanumeric() => buffer.push(c),
            _ => {}
        }
    }
    buffer
}

/// Convert `snake_case` or `camelCase` into `SCREAMING_SNAKE_CASE`.
pub(crate) fn to_screaming_snake_case(name: &str) -> String {
    let mut buffer = String::new();
    for c in name.chars() {
        match c {
            ' ' | '-' | '.' | '/' | '_' => {
                if !buffer.is_empty() && !buffer.ends_with('_') {
                    buffer.push('_');
                }
            }
            _ if c.is_uppercase() && !buffer.is_empty() && !buffer.ends_with('_') => {
                buffer.push('_');
                buffer.push(c);
            }
            _ if c.is_alphanumeric() => buffer.push(c.to_ascii_uppercase()),
            _ => {}
        }
    }
    buffer
}

/// Field name usable as a method identifier. A keyword gets `suffix` appended
/// (suffix "value" turns `type` into `type_value`).
pub(crate) fn to_field_ident(field: &str, suffix: &'static str) -> String {
    let lowered = field.to_ascii_lowercase();
    if RUST_KEYWORDS.contains(&lowered.as_str()) {
        format!("{lowered}_{suffix}")
    } else {
        lowered
    }
}

/// Reserved Rust keywords we must avoid when generating identifiers.
pub const RUST_KEYWORDS: &[&str] = &[
    // --- Strict Keywords ---
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
    "while", "async", "await", "dyn",
    // --- Reserved Keywords ---
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "typeof", "unsized",
    "virtual", "yield", "try", "gen", "union",
];
