//! Simple type names for declared handler inputs and outputs.
//!
//! `std::any::type_name` yields fully qualified paths such as
//! `alloc::vec::Vec<alloc::string::String>`. Tool metadata only carries the
//! last path segment of every type in the expression (`Vec<String>`).

/// Simple name of `T`, with module paths stripped from every segment.
pub fn simple_type_name<T: ?Sized>() -> String {
    simplify(std::any::type_name::<T>())
}

/// Strip module paths from a fully qualified type expression.
pub fn simplify(qualified: &str) -> String {
    let mut out = String::with_capacity(qualified.len());
    let mut segment = String::new();

    for ch in qualified.chars() {
        match ch {
            '<' | '>' | ',' | '(' | ')' | '[' | ']' | ';' | '&' | '*' | ' ' => {
                out.push_str(last_segment(&segment));
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(last_segment(&segment));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Account;

    #[test]
    fn test_primitives_are_unchanged() {
        assert_eq!(simple_type_name::<i64>(), "i64");
        assert_eq!(simple_type_name::<bool>(), "bool");
    }

    #[test]
    fn test_paths_are_stripped() {
        assert_eq!(simple_type_name::<String>(), "String");
        assert_eq!(simple_type_name::<Account>(), "Account");
    }

    #[test]
    fn test_generic_arguments_are_stripped() {
        assert_eq!(simple_type_name::<Vec<String>>(), "Vec<String>");
        assert_eq!(simple_type_name::<Option<Account>>(), "Option<Account>");
        assert_eq!(
            simple_type_name::<HashMap<String, i32>>(),
            "HashMap<String, i32>"
        );
    }

    #[test]
    fn test_references_and_slices() {
        assert_eq!(simplify("&[alloc::string::String]"), "&[String]");
        assert_eq!(simplify("(i32, my_app::Account)"), "(i32, Account)");
    }
}
