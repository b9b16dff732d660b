//! Type mapping from column type categories to Go types.

use ddlgen_schema::{Column, TypeCategory};

/// The Go type for a category, as used by required columns.
pub fn category_to_go_type(category: TypeCategory) -> &'static str {
    match category {
        TypeCategory::Bool => "bool",
        TypeCategory::Int32 => "int32",
        TypeCategory::Int64 => "int64",
        TypeCategory::Float => "float64",
        TypeCategory::Text => "string",
        TypeCategory::Temporal => "time.Time",
        TypeCategory::Opaque => "interface{}",
    }
}

/// Whether a column is generated as a pointer field.
///
/// Nullable columns are pointers so that "not supplied" can be told apart
/// from the zero value. Opaque columns are interfaces and nil already.
pub fn is_pointer(column: &Column) -> bool {
    !column.is_required() && column.category() != TypeCategory::Opaque
}

/// The Go type of a column's field.
pub fn column_to_go_type(column: &Column) -> String {
    apply_nullability(category_to_go_type(column.category()), is_pointer(column))
}

/// Wrap a base type in a pointer when the field is nullable.
pub fn apply_nullability(base_type: &str, pointer: bool) -> String {
    if pointer {
        format!("*{base_type}")
    } else {
        base_type.to_string()
    }
}

/// Expression that is true when `expr` holds a value the caller supplied.
///
/// This is the test deciding whether a field takes part in a dynamically
/// built `SET` or `WHERE` clause.
pub fn supplied_test(column: &Column, expr: &str) -> String {
    if is_pointer(column) {
        return format!("{expr} != nil");
    }
    match column.category() {
        TypeCategory::Bool => expr.to_string(),
        TypeCategory::Int32 | TypeCategory::Int64 | TypeCategory::Float => {
            format!("{expr} != 0")
        }
        TypeCategory::Text => format!("{expr} != \"\""),
        TypeCategory::Temporal => format!("!{expr}.IsZero()"),
        TypeCategory::Opaque => format!("{expr} != nil"),
    }
}

/// The `fmt` verb used to print a field in `String()`.
pub fn format_verb(column: &Column) -> &'static str {
    if is_pointer(column) {
        return "%v";
    }
    match column.category() {
        TypeCategory::Bool => "%t",
        TypeCategory::Int32 | TypeCategory::Int64 => "%d",
        TypeCategory::Text => "%q",
        TypeCategory::Float | TypeCategory::Temporal | TypeCategory::Opaque => "%v",
    }
}

/// The argument printed for a field in `String()`.
pub fn format_arg(column: &Column, expr: &str) -> String {
    if is_pointer(column) {
        format!("deref({expr})")
    } else {
        expr.to_string()
    }
}

/// Whether any column needs the `time` package.
pub fn uses_time(columns: &[Column]) -> bool {
    columns
        .iter()
        .any(|c| c.category() == TypeCategory::Temporal)
}

/// Render `text` as an interpreted Go string literal.
pub fn go_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x80 && c.is_control() => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control()
                || matches!(c, '\u{200b}'..='\u{200f}' | '\u{2028}' | '\u{2029}' | '\u{feff}') =>
            {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
