use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// Field names that collide with Java keywords and their replacements.
const RENAMED_KEYWORDS: &[(&str, &str)] = &[("class", "clazz")];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null", "var", "record", "yield",
];

/// Convert a table name to a Java class name.
/// e.g. "color_info" -> "ColorInfo"
pub fn table_to_class_name(table: &str) -> String {
    table.to_upper_camel_case()
}

/// Convert a column name to a Java field name, steering clear of keywords.
/// e.g. "user_id_" -> "userId", "class_" -> "clazz"
pub fn column_to_field_name(column: &str) -> String {
    let name = column.to_lower_camel_case();
    if let Some((_, renamed)) = RENAMED_KEYWORDS.iter().find(|(kw, _)| *kw == name) {
        return (*renamed).to_string();
    }
    if is_java_keyword(&name) {
        return format!("{name}Value");
    }
    name
}

pub fn is_java_keyword(word: &str) -> bool {
    JAVA_KEYWORDS.contains(&word)
}
