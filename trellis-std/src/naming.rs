//! Handler naming helpers.

/// Placeholder replaced by the handler name in a path template.
pub const NAME_PLACEHOLDER: &str = "%v";

/// Last path component of a type name, without generic arguments.
///
/// `my_app::rpc::Player<u8>` becomes `Player`.
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Substitute `name` (lowercased) into `template`.
///
/// Without a template the name itself is the path.
pub fn format_name(template: Option<&str>, name: &str) -> String {
    match template {
        Some(template) => template.replace(NAME_PLACEHOLDER, &name.to_lowercase()),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Player;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::Player"), "Player");
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(short_type_name(std::any::type_name::<Player>()), "Player");
    }

    #[test]
    fn test_format_name() {
        assert_eq!(format_name(None, "Login"), "Login");
        assert_eq!(format_name(Some("/v1/%v/:id"), "Login"), "/v1/login/:id");
        assert_eq!(format_name(Some("static"), "Login"), "static");
    }
}
