use std::collections::BTreeMap;
use std::fmt::Write;

/// A detached HTML element: enough of the DOM to describe a rendered tree
/// and serialise it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    dataset: BTreeMap<String, String>,
    inner_html: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Set a style property. Setting an existing property replaces its value
    /// in place, so declaration order stays stable.
    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.styles.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => *v = value,
            None => self.styles.push((property.to_owned(), value)),
        }
    }

    pub fn with_style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// `data-*` attribute, without the `data-` prefix.
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.dataset.insert(key.into(), value.into());
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = Some(html.into());
    }

    pub fn inner_html(&self) -> Option<&str> {
        self.inner_html.as_deref()
    }

    pub fn append(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Every descendant (depth first, self excluded) carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        for child in &self.children {
            if child.has_class(class) {
                found.push(child);
            }
            found.extend(child.find_by_class(class));
        }
        found
    }

    /// Serialise to HTML. Inner HTML is emitted verbatim before children.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_attr(&self.classes.join(" ")));
        }
        if !self.styles.is_empty() {
            let style = self
                .styles
                .iter()
                .map(|(p, v)| format!("{p}: {v};"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(out, " style=\"{}\"", escape_attr(&style));
        }
        for (key, value) in &self.dataset {
            let _ = write!(out, " data-{key}=\"{}\"", escape_attr(value));
        }
        out.push('>');
        if let Some(html) = &self.inner_html {
            out.push_str(html);
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_attributes_in_order() {
        let mut el = Element::div().with_class("item").with_class("cube");
        el.set_style("width", "10px");
        el.set_style("height", "5px");
        el.set_style("width", "20px");
        el.set_data("name", "a\"b");
        assert_eq!(
            el.to_html(),
            r#"<div class="item cube" style="width: 20px; height: 5px;" data-name="a&quot;b"></div>"#
        );
    }

    #[test]
    fn inner_html_is_verbatim_and_precedes_children() {
        let mut el = Element::new("td");
        el.set_inner_html("<b>1-2</b>");
        el.append(Element::new("span"));
        assert_eq!(el.to_html(), "<td><b>1-2</b><span></span></td>");
    }

    #[test]
    fn find_by_class_walks_descendants() {
        let mut root = Element::div();
        let child = root.append(Element::div().with_class("side"));
        child.append(Element::div().with_class("side"));
        root.append(Element::div());
        assert_eq!(root.find_by_class("side").len(), 2);
        assert!(root.find_by_class("missing").is_empty());
    }

    #[test]
    fn duplicate_classes_are_ignored() {
        let el = Element::div().with_class("a").with_class("a");
        assert_eq!(el.classes().len(), 1);
        assert_eq!(el.style("width"), None);
    }
}
