//! Column type rendering.

/// Render a catalog type as DDL type syntax.
///
/// `max_length` is the catalog byte length; `-1` means `max`. The
/// `nchar`/`nvarchar` byte length is halved to get the character length.
pub fn type_spec(type_name: &str, max_length: i64, precision: i64, scale: i64) -> String {
    match type_name {
        "varchar" | "char" | "nvarchar" | "nchar" => {
            let len = if max_length == -1 {
                "max".to_string()
            } else if type_name.starts_with('n') {
                (max_length / 2).to_string()
            } else {
                max_length.to_string()
            };
            format!("{}({})", type_name, len)
        }
        "decimal" | "numeric" => format!("{}({},{})", type_name, precision, scale),
        _ => type_name.to_string(),
    }
}
