use lazy_regex::{regex, Captures};
use std::borrow::Cow;
use std::collections::HashMap;

/// Substitutes `[%s:key]` placeholders; unknown keys render as `<key>`.
pub(crate) fn interpolate(s: &str, subst: &HashMap<&str, String>) -> String {
    let re = regex!(r#"\[%s:([a-zA-Z]+)]"#);
    re.replace_all(s, |caps: &Captures| {
        let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        subst
            .get(key)
            .map(|s| Cow::Borrowed(s.as_str()))
            .unwrap_or_else(|| Cow::Owned(format!("<{}>", key)))
    })
    .to_string()
}

#[test]
fn test_interpolate() {
    let subst = HashMap::from([("foo", "bar".to_string()), ("fee", "baz".to_string())]);
    assert_eq!(&interpolate("", &subst), "");
    assert_eq!(&interpolate("[%s:foo]", &subst), "bar");
    assert_eq!(&interpolate("[%s:foo] bar", &subst), "bar bar");
    assert_eq!(&interpolate("[%s:foo] [%s:fee]", &subst), "bar baz");
    assert_eq!(&interpolate("[%s:foo] [%s:foo]", &subst), "bar bar");
    assert_eq!(
        &interpolate("[%s:foo] [%s:fee] [%s:foo]", &subst),
        "bar baz bar"
    );
    assert_eq!(&interpolate("[%s:unknown]", &subst), "<unknown>");
    assert_eq!(&interpolate("[%s:foo]м назад", &subst), "barм назад");
}

#[test]
fn test_interpolate_counts() {
    let subst = HashMap::from([("h", 3.to_string()), ("m", 15.to_string())]);
    assert_eq!(&interpolate("[%s:h]h [%s:m]m ago", &subst), "3h 15m ago");
    assert_eq!(
        &interpolate("[%s:h] ч [%s:m] мин назад", &subst),
        "3 ч 15 мин назад"
    );
    assert_eq!(&interpolate("[%s:h][%s:m]", &subst), "315");
    // Only letters form a key, anything else stays verbatim
    assert_eq!(&interpolate("[%s:] [%s:m1] [%s:h", &subst), "[%s:] [%s:m1] [%s:h");
    assert_eq!(&interpolate("[%s:d]d ago", &subst), "<d>d ago");
    assert_eq!(&interpolate("[%s:h]h ago", &HashMap::new()), "<h>h ago");
}
