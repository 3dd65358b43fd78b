//! Miniature selector engine for precrawl
//!
//! The webring index page is scraped with a configurable selector such as
//! `li > a[href]:first-of-type`. Only a small slice of CSS is needed:
//!
//! - tag names (`li`, `a`)
//! - attribute presence `[href]` — when it ends the selector, the attribute
//!   *value* is extracted instead of text
//! - descendant combinator (whitespace) and child combinator (`>`)
//! - `:first-of-type` on the final element
//!
//! Implemented as a recursive descent over whitespace-separated parts.

use scraper::{ElementRef, Html};

/// How a step relates to the elements matched by the previous step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One element test in the selector chain
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    combinator: Combinator,
    tag: Option<String>,
    attr: Option<String>,
    first_of_type: bool,
}

/// A parsed precrawl selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TinySelector {
    steps: Vec<Step>,
}

impl TinySelector {
    /// Parses a selector string; None for selectors this engine can't express
    pub fn parse(input: &str) -> Option<Self> {
        let mut steps = Vec::new();
        let mut combinator = Combinator::Descendant;

        for part in input.split_whitespace() {
            if part == ">" {
                // `>` binds the *next* part to its parent
                if steps.is_empty() {
                    return None;
                }
                combinator = Combinator::Child;
                continue;
            }

            let (part, first_of_type) = match part.strip_suffix(":first-of-type") {
                Some(rest) => (rest, true),
                None => (part, false),
            };

            let (tag, attr) = match part.split_once('[') {
                Some((tag, rest)) => {
                    let attr = rest.strip_suffix(']')?;
                    if attr.is_empty() {
                        return None;
                    }
                    let tag = if tag.is_empty() { None } else { Some(tag.to_string()) };
                    (tag, Some(attr.to_string()))
                }
                None => {
                    if part.is_empty() {
                        return None;
                    }
                    (Some(part.to_string()), None)
                }
            };

            steps.push(Step {
                combinator,
                tag,
                attr,
                first_of_type,
            });
            combinator = Combinator::Descendant;
        }

        if steps.is_empty() {
            None
        } else {
            Some(Self { steps })
        }
    }

    /// Runs the selector over a document, returning attribute values when
    /// the final step names an attribute, element text otherwise
    pub fn select(&self, document: &Html) -> Vec<String> {
        let root = document.root_element();
        let mut current = vec![root];

        for step in &self.steps {
            let mut next = Vec::new();
            for element in &current {
                let candidates: Vec<ElementRef> = match step.combinator {
                    Combinator::Child => element
                        .children()
                        .filter_map(ElementRef::wrap)
                        .collect(),
                    Combinator::Descendant => element
                        .descendants()
                        .skip(1)
                        .filter_map(ElementRef::wrap)
                        .collect(),
                };
                for candidate in candidates {
                    if step_matches(step, &candidate) {
                        next.push(candidate);
                    }
                }
            }
            current = next;
        }

        let terminal_attr = self.steps.last().and_then(|step| step.attr.as_deref());
        current
            .iter()
            .filter_map(|element| match terminal_attr {
                Some(attr) => element.value().attr(attr).map(|v| v.to_string()),
                None => {
                    let text = element.text().collect::<String>().trim().to_string();
                    if text.is_empty() {
                        None
                    } else {
                        Some(text)
                    }
                }
            })
            .collect()
    }
}

fn step_matches(step: &Step, element: &ElementRef) -> bool {
    if let Some(tag) = &step.tag {
        if element.value().name() != tag {
            return false;
        }
    }
    if let Some(attr) = &step.attr {
        if element.value().attr(attr).is_none() {
            return false;
        }
    }
    if step.first_of_type && !is_first_of_type(element) {
        return false;
    }
    true
}

/// Whether no earlier sibling shares this element's tag
fn is_first_of_type(element: &ElementRef) -> bool {
    let name = element.value().name();
    !element
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .any(|sibling| sibling.value().name() == name)
}
