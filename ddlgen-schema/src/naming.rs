//! Identifier case conversions.
//!
//! These transforms are lossy: `to_snake(to_upper_camel(s))` only gives back
//! `s` when `s` was already canonical snake case.

/// Convert `snake_case` to `UpperCamelCase`.
///
/// Every token between separators keeps its own casing and gets its first
/// letter upper-cased, so `DePt_Name` becomes `DePtName`.
pub fn to_upper_camel(ident: &str) -> String {
    ident
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect()
}

/// Convert `camelCase` or `UpperCamelCase` to `snake_case`.
pub fn to_snake(ident: &str) -> String {
    separate(ident, '_')
}

/// Convert an identifier to `kebab-case`.
///
/// The identifier goes through [`to_upper_camel`] first so that snake case
/// input is handled too: `tb_dept` becomes `tb-dept`.
pub fn to_kebab(ident: &str) -> String {
    separate(&to_upper_camel(ident), '-')
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn separate(ident: &str, separator: char) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for c in ident.chars() {
        if c.is_uppercase() {
            out.push(separator);
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out.trim_start_matches(separator).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_upper_camel() {
        assert_eq!(to_upper_camel("tb_dept"), "TbDept");
        assert_eq!(to_upper_camel("id"), "Id");
        assert_eq!(to_upper_camel("DePt_Name"), "DePtName");
        assert_eq!(to_upper_camel("created__at_"), "CreatedAt");
    }

    #[test]
    fn test_to_upper_camel_is_idempotent() {
        for input in ["tb_dept", "DePt_Name", "userId", "a_b_c", "HTTP_status"] {
            let once = to_upper_camel(input);
            assert_eq!(to_upper_camel(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_to_snake() {
        assert_eq!(to_snake("TbDept"), "tb_dept");
        assert_eq!(to_snake("deptName"), "dept_name");
        assert_eq!(to_snake("already_snake"), "already_snake");
    }

    #[test]
    fn test_to_snake_is_lossy_for_acronyms() {
        assert_eq!(to_snake(&to_upper_camel("user_ID")), "user_i_d");
    }

    #[test]
    fn test_to_kebab() {
        assert_eq!(to_kebab("tb_dept"), "tb-dept");
        assert_eq!(to_kebab("UserRole"), "user-role");
        assert_eq!(to_kebab("order"), "order");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_upper_camel(""), "");
        assert_eq!(to_snake(""), "");
        assert_eq!(to_kebab(""), "");
    }
}
