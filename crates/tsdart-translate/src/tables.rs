//! Fixed TypeScript-to-Dart spellings.

use tsdart_syntax::{HeritageToken, TypeKeyword};

pub fn type_keyword(keyword: TypeKeyword) -> &'static str {
    match keyword {
        TypeKeyword::Number => "num",
        TypeKeyword::String => "String",
        TypeKeyword::Boolean => "bool",
        TypeKeyword::Void => "void",
        TypeKeyword::Any => "dynamic",
    }
}

pub fn heritage_keyword(token: HeritageToken) -> &'static str {
    match token {
        HeritageToken::Extends => "extends",
        HeritageToken::Implements => "implements",
    }
}

/// Quote a decoded string value as a Dart string literal.
///
/// Uses JSON escaping, plus `\$` since `$` starts interpolation in Dart.
pub fn dart_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned())
        .to_string()
        .replace('$', "\\$")
}
