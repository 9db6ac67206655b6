//! Forward walk over the button groups that follow a primary download button.

use scraper::ElementRef;

use super::selectors::BUTTON_GROUP_CLASS;

/// Iterator over the button-group siblings following `start`.
///
/// Empty `<p>` elements between groups are skipped; text and comment nodes
/// are ignored. The walk ends at the first other element or when siblings
/// run out, so it never yields more items than `start` has siblings.
pub struct ButtonSiblings<'a> {
    cursor: Option<ElementRef<'a>>,
}

impl<'a> ButtonSiblings<'a> {
    /// Starts a walk after `start`; `start` itself is never yielded.
    #[must_use]
    pub fn after(start: ElementRef<'a>) -> Self {
        Self {
            cursor: Some(start),
        }
    }
}

impl<'a> Iterator for ButtonSiblings<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.cursor.take()?;
            let candidate = next_element(current)?;
            if is_empty_paragraph(candidate) {
                self.cursor = Some(candidate);
                continue;
            }
            if is_button_group(candidate) {
                self.cursor = Some(candidate);
                return Some(candidate);
            }
            return None;
        }
    }
}

/// Returns true when `element` carries the button-group class.
pub(crate) fn is_button_group(element: ElementRef<'_>) -> bool {
    element.value().classes().any(|class| class == BUTTON_GROUP_CLASS)
}

/// A `<p>` with no child elements and only whitespace text.
pub(crate) fn is_empty_paragraph(element: ElementRef<'_>) -> bool {
    element.value().name() == "p"
        && !element.children().any(|child| child.value().is_element())
        && element.text().all(|text| text.trim().is_empty())
}

/// Next sibling that is an element.
pub(crate) fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Previous sibling element, skipping empty paragraphs.
pub(crate) fn previous_meaningful_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|candidate| !is_empty_paragraph(*candidate))
}
