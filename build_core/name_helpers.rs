//! Name transformation helpers used to generate idiomatic Rust code.
//==================================================================================NAME_HELPERS
/// Convert `camelCase` or `PascalCase` into `snake_case`. The suffix is
/// appended when a keyword collision occurs (e.g. suffix "field" turns
/// `type` into `type_field`).
pub(crate) fn to_snake_case(field: &str, suffix: &'static str) -> String {
    let mut buffer = String::new();

    let temp_field = if RUST_KEYWORDS.contains(&field) {
        format!("{field}_{suffix}")
    } else {
        field.to_string()
    };

    temp_field.chars().for_each(|c| {
        if c.is_uppercase() && !buffer.is_empty() {
            buffer.push('_');
        }
        buffer.push(c.to_ascii_lowercase());
    });
    buffer
}

/// Reserved Rust keywords we must avoid when generating identifiers.
pub(crate) const RUST_KEYWORDS: &[&str] = &[
    // --- Strict Keywords ---
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn",
    // --- Reserved Keywords ---
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "typeof", "unsized",
    "virtual", "yield", "try", "gen", "union", "macro_rules", "raw", "safe", "keyword",
];
