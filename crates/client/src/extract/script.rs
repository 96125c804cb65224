//! Script literal location.

use regex::Regex;
use scraper::Html;

use classgeo_core::Error;

/// Parse a page body into a document tree.
///
/// The HTML parser itself recovers from any malformed markup, so the only
/// failure is a body that is not UTF-8.
pub fn parse_document(body: &[u8]) -> Result<Html, Error> {
    let html = std::str::from_utf8(body).map_err(|e| Error::Parse(format!("class page is not valid UTF-8: {e}")))?;
    Ok(Html::parse_document(html))
}

/// Text of every `<script>` element, in document order.
///
/// Only the first child text node of each script is taken. The walk is
/// depth-first over an explicit stack, so deeply nested documents cannot
/// exhaust the call stack.
pub fn script_bodies(document: &Html) -> Vec<String> {
    let mut scripts = Vec::new();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        if let Some(element) = node.value().as_element()
            && element.name() == "script"
            && let Some(text) = node.first_child().and_then(|child| child.value().as_text())
        {
            scripts.push(String::from(&**text));
        }
        stack.extend(node.children().rev());
    }

    scripts
}

/// First capture group of `pattern` in the first script body it matches.
///
/// # Errors
///
/// Returns `Error::NotFound` when no script matches, which means the page
/// layout has changed.
pub fn locate_literal(document: &Html, pattern: &Regex) -> Result<String, Error> {
    let scripts = script_bodies(document);

    for script in &scripts {
        if let Some(literal) = pattern.captures(script).and_then(|caps| caps.get(1)) {
            return Ok(literal.as_str().to_string());
        }
    }

    Err(Error::NotFound(format!("failed to find location markers from {} scripts", scripts.len())))
}
