//! Selection helpers over `scraper` element trees.
//!
//! `ElementRef::select` matches the scope element itself as well as its
//! descendants. The widget markup reuses class names at several nesting
//! levels, so every lookup here goes through [`find_all`], which only yields
//! strict descendants.

use scraper::{ElementRef, Selector};

/// Class of the quoted-message block, which reuses the post's own classes.
pub const REPLY_CLASS: &str = "tgme_widget_message_reply";

/// Compile a selector that is known to be valid at build time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid selector")
}

/// Strict descendants of `scope` matching `selector`, in document order.
pub(crate) fn find_all<'a, 'b>(
    scope: ElementRef<'a>,
    selector: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'b
where
    'a: 'b,
{
    let scope_id = scope.id();
    scope
        .select(selector)
        .filter(move |element| element.id() != scope_id)
}

/// First strict descendant of `scope` matching `selector`.
pub(crate) fn find_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    find_all(scope, selector).next()
}

/// Whether any strict descendant matches.
pub(crate) fn exists(scope: ElementRef<'_>, selector: &Selector) -> bool {
    find_first(scope, selector).is_some()
}

/// Concatenated text of an element, like the DOM `textContent`.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of the first matching descendant, `None` when missing or empty.
pub(crate) fn find_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    find_first(scope, selector)
        .map(text_of)
        .filter(|text| !text.is_empty())
}

/// Attribute value of the first matching descendant.
pub(crate) fn find_attr<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    attr: &str,
) -> Option<&'a str> {
    find_first(scope, selector).and_then(|element| element.value().attr(attr))
}

pub(crate) fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Whether `element` sits inside an ancestor carrying `class`, looking no
/// further up than `scope`.
pub(crate) fn is_within_class(element: ElementRef<'_>, scope: ElementRef<'_>, class: &str) -> bool {
    for ancestor in element.ancestors() {
        if ancestor.id() == scope.id() {
            return false;
        }
        if let Some(ancestor) = ElementRef::wrap(ancestor) {
            if has_class(ancestor, class) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn root_div(document: &Html) -> ElementRef<'_> {
        document
            .select(&selector("div.root"))
            .next()
            .expect("fixture has a root div")
    }

    #[test]
    fn test_find_all_excludes_scope() {
        let document = Html::parse_fragment(
            r#"<div class="root box"><div class="box">inner</div></div>"#,
        );
        let root = root_div(&document);
        let boxes: Vec<_> = find_all(root, &selector(".box")).collect();
        assert_eq!(boxes.len(), 1);
        assert_eq!(text_of(boxes[0]), "inner");
    }

    #[test]
    fn test_find_text_and_attr() {
        let document = Html::parse_fragment(
            r#"<div class="root"><span class="name"></span><a class="go" href="/x">go</a></div>"#,
        );
        let root = root_div(&document);
        assert_eq!(find_text(root, &selector(".name")), None);
        assert_eq!(find_text(root, &selector(".go")).as_deref(), Some("go"));
        assert_eq!(find_attr(root, &selector(".go"), "href"), Some("/x"));
        assert_eq!(find_attr(root, &selector(".go"), "title"), None);
        assert!(exists(root, &selector("a")));
        assert!(!exists(root, &selector("img")));
    }

    #[test]
    fn test_is_within_class() {
        let document = Html::parse_fragment(
            r#"<div class="root"><div class="quote"><p class="t">a</p></div><p class="t">b</p></div>"#,
        );
        let root = root_div(&document);
        let paragraphs: Vec<_> = find_all(root, &selector(".t")).collect();
        assert!(is_within_class(paragraphs[0], root, "quote"));
        assert!(!is_within_class(paragraphs[1], root, "quote"));
    }
}
