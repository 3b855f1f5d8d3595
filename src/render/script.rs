//! Scripts evaluated inside the page
//!
//! Each step is a separate script so style changes are complete before
//! anything is measured. Selectors are embedded as JSON string literals.

use crate::estimate::SectionRef;

/// Resolves once web fonts have loaded
pub const WAIT_FOR_FONTS: &str = "document.fonts.ready.then(() => true)";

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

// Shared by every script: the sections of one group are its direct DIV
// children that carry visible text.
fn sections_fn() -> &'static str {
    "const sectionsOf = frame => Array.from(frame.children)\
     .filter(child => child.tagName === 'DIV' && child.textContent.trim().length > 0);"
}

/// Remove dividers and normalize group and section styling
pub fn normalize(group_selector: &str, divider_selector: &str) -> String {
    format!(
        "(() => {{ {sections} \
         document.querySelectorAll({divider}).forEach(div => div.remove()); \
         document.querySelectorAll({group}).forEach(frame => {{ \
           frame.style.backgroundColor = 'transparent'; \
           sectionsOf(frame).forEach(section => {{ \
             section.style.padding = '10px 10px 30px 10px'; \
             section.style.backgroundColor = 'white'; \
           }}); \
         }}); \
         return true; }})()",
        sections = sections_fn(),
        divider = js_string(divider_selector),
        group = js_string(group_selector),
    )
}

/// Report section heights as a JSON string: one array per group
pub fn measure(group_selector: &str) -> String {
    format!(
        "(() => {{ {sections} \
         return JSON.stringify(Array.from(document.querySelectorAll({group})) \
           .map(frame => sectionsOf(frame).map(s => s.getBoundingClientRect().height))); \
         }})()",
        sections = sections_fn(),
        group = js_string(group_selector),
    )
}

/// Force a page break before each listed section
pub fn apply_page_breaks(group_selector: &str, breaks: &[SectionRef]) -> String {
    let pairs: Vec<String> = breaks
        .iter()
        .map(|at| format!("[{},{}]", at.group, at.section))
        .collect();

    format!(
        "(() => {{ {sections} \
         const frames = Array.from(document.querySelectorAll({group})); \
         let applied = 0; \
         [{pairs}].forEach(([g, s]) => {{ \
           const frame = frames[g]; \
           if (!frame) return; \
           const section = sectionsOf(frame)[s]; \
           if (!section) return; \
           section.style.pageBreakBefore = 'always'; \
           applied += 1; \
         }}); \
         return applied; }})()",
        sections = sections_fn(),
        group = js_string(group_selector),
        pairs = pairs.join(","),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_are_quoted() {
        let script = normalize(".frame-19", "div[data-x=\"y\"]");

        assert!(script.contains("querySelectorAll(\".frame-19\")"));
        assert!(script.contains("querySelectorAll(\"div[data-x=\\\"y\\\"]\")"));
    }

    #[test]
    fn test_measure_returns_json_string() {
        let script = measure(".frame-19");

        assert!(script.contains("JSON.stringify"));
        assert!(script.contains("getBoundingClientRect().height"));
    }

    #[test]
    fn test_page_break_list() {
        let breaks = [
            SectionRef { group: 0, section: 2 },
            SectionRef { group: 1, section: 0 },
        ];
        let script = apply_page_breaks(".frame-19", &breaks);

        assert!(script.contains("[[0,2],[1,0]]"));
        assert!(script.contains("pageBreakBefore = 'always'"));
    }

    #[test]
    fn test_page_break_list_empty() {
        assert!(apply_page_breaks(".frame-19", &[]).contains("[].forEach"));
    }
}
