use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};
use markup5ever::QualName;

use super::{Attribute, Attributes};

/// A single `name: value` declaration taken from an element's `style` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    /// Lowercased property name
    pub name: String,
    /// Trimmed value with any `!important` marker removed
    pub value: String,
    pub important: bool,
}

#[derive(Debug, Clone)]
pub struct ElementData {
    /// The elements tag name, namespace and prefix
    pub name: QualName,

    /// The elements id attribute (if it has one)
    pub id: Option<String>,

    /// The element's attributes
    pub attrs: Attributes,

    /// The element's parsed style attribute
    pub style_attribute: Vec<StyleDeclaration>,
}

impl ElementData {
    pub fn new(name: QualName, attrs: Vec<Attribute>) -> Self {
        Self::from_attributes(name, Attributes::new(attrs))
    }

    pub(crate) fn from_attributes(name: QualName, attrs: Attributes) -> Self {
        let mut data = ElementData {
            name,
            id: None,
            attrs,
            style_attribute: Vec::new(),
        };
        data.flush_id_attribute();
        data.flush_style_attribute();
        data
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// The uppercase tag name, e.g. `DIV`
    pub fn tag_name(&self) -> String {
        (*self.name.local).to_ascii_uppercase()
    }

    /// Whether the local name matches `tag` (case-insensitive)
    pub fn is_tag(&self, tag: &str) -> bool {
        (*self.name.local).eq_ignore_ascii_case(tag)
    }

    /// The value of a property declared in the inline `style` attribute.
    /// Later declarations win over earlier ones, `!important` ones win over the rest.
    pub fn style_property(&self, name: &str) -> Option<&str> {
        let mut found: Option<&StyleDeclaration> = None;
        for decl in self
            .style_attribute
            .iter()
            .filter(|decl| decl.name.eq_ignore_ascii_case(name))
        {
            if found.is_none_or(|prev| decl.important || !prev.important) {
                found = Some(decl);
            }
        }
        found.map(|decl| decl.value.as_str())
    }

    pub(crate) fn flush_id_attribute(&mut self) {
        self.id = self.attrs.get("id").map(str::to_string);
    }

    /// Re-parse the `style` attribute. Must be called whenever it changes.
    pub fn flush_style_attribute(&mut self) {
        self.style_attribute = self
            .attrs
            .get("style")
            .map(parse_style_attribute)
            .unwrap_or_default();
    }
}

/// Tokenize the body of a `style` attribute into declarations.
///
/// Malformed declarations are skipped, as a browser would.
pub fn parse_style_attribute(css: &str) -> Vec<StyleDeclaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();

    loop {
        let name = match parser.next() {
            Ok(Token::Ident(name)) => Some(name.to_ascii_lowercase()),
            Ok(Token::Semicolon) => continue,
            Ok(_) => None,
            Err(_) => break,
        };

        // Check the colon by hand: on a malformed declaration the next token may already be
        // the `;` which ends it
        let has_colon = match (&name, parser.next()) {
            (Some(_), Ok(Token::Colon)) => true,
            (_, Ok(Token::Semicolon)) => continue,
            (_, Err(_)) => break,
            _ => false,
        };
        let Some(name) = name.filter(|_| has_colon) else {
            let _ = parser.parse_until_after(Delimiter::Semicolon, consume_remaining);
            continue;
        };

        let Ok(raw_value) = parser.parse_until_before(Delimiter::Semicolon, consume_remaining)
        else {
            continue;
        };

        let (value, important) = match raw_value.strip_suffix("!important") {
            Some(value) => (value.trim_end().to_string(), true),
            None => (raw_value, false),
        };
        if !value.is_empty() {
            declarations.push(StyleDeclaration {
                name,
                value,
                important,
            });
        }
    }

    declarations
}

fn consume_remaining<'i, 't>(parser: &mut Parser<'i, 't>) -> Result<String, ParseError<'i, ()>> {
    let start = parser.position();
    while parser.next().is_ok() {}
    Ok(parser.slice_from(start).trim().to_string())
}
