//! Ordered XML tree used for addon manifests
//!
//! A deliberately small document model: elements keep their attribute order
//! and every child node (elements, text, CDATA, comments) in document order,
//! so unknown content written by addon authors survives a rewrite. The
//! serializer owns all inter-element whitespace; whitespace-only text nodes
//! are dropped on parse and the body is re-indented on write.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

/// Declaration line emitted at the top of every serialized document
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const INDENT: usize = 2;

/// A single node in the document tree
#[derive(Debug, Clone)]
pub enum XmlNode {
  Element(XmlElement),
  Text(String),
  CData(String),
  Comment(String),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone)]
pub struct XmlElement {
  pub name: String,
  attributes: Vec<(String, String)>,
  pub children: Vec<XmlNode>,
}

impl XmlElement {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      attributes: Vec::new(),
      children: Vec::new(),
    }
  }

  /// Look up an attribute value by name
  pub fn attribute(&self, name: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  /// Overwrite an attribute, appending it if not yet present
  ///
  /// Existing attributes keep their position so a rewrite stays diffable.
  pub fn set_attribute(&mut self, name: &str, value: &str) {
    match self.attributes.iter_mut().find(|(key, _)| key == name) {
      Some(slot) => slot.1 = value.to_string(),
      None => self.attributes.push((name.to_string(), value.to_string())),
    }
  }

  pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
    self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// First child element with the given name
  pub fn child_element(&self, name: &str) -> Option<&XmlElement> {
    self.child_elements().find(|el| el.name == name)
  }

  /// Mutable variant of [`child_element`](Self::child_element)
  pub fn child_element_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
    self.children.iter_mut().find_map(|node| match node {
      XmlNode::Element(el) if el.name == name => Some(el),
      _ => None,
    })
  }

  pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
    self.children.iter().filter_map(|node| match node {
      XmlNode::Element(el) => Some(el),
      _ => None,
    })
  }

  /// Explicitly append a child node at the end
  pub fn append_child(&mut self, node: XmlNode) {
    self.children.push(node);
  }

  /// Concatenated text and CDATA content of direct children
  pub fn text(&self) -> String {
    let mut out = String::new();
    for node in &self.children {
      match node {
        XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
        _ => {}
      }
    }
    out
  }

  /// Replace the element's text content with a single text node
  pub fn set_text(&mut self, value: &str) {
    self
      .children
      .retain(|node| !matches!(node, XmlNode::Text(_) | XmlNode::CData(_)));
    self.children.insert(0, XmlNode::Text(value.to_string()));
  }
}

/// Parse a document into its root element
///
/// Returns the failure reason on malformed input; the caller attaches the
/// file path.
pub fn parse_document(input: &str) -> Result<XmlElement, String> {
  let mut reader = Reader::from_str(input);
  let mut stack: Vec<XmlElement> = Vec::new();
  let mut root: Option<XmlElement> = None;

  loop {
    match reader.read_event() {
      Ok(Event::Start(e)) => {
        stack.push(element_from_start(&e)?);
      }
      Ok(Event::Empty(e)) => {
        let el = element_from_start(&e)?;
        attach(XmlNode::Element(el), &mut stack, &mut root)?;
      }
      Ok(Event::End(_)) => {
        let el = stack.pop().ok_or_else(|| "unexpected closing tag".to_string())?;
        attach(XmlNode::Element(el), &mut stack, &mut root)?;
      }
      Ok(Event::Text(t)) => {
        let decoded = t.decode().map_err(|e| e.to_string())?;
        let text = quick_xml::escape::unescape(&decoded)
          .map_err(|e| e.to_string())?
          .into_owned();
        if !text.trim().is_empty() {
          if let Some(parent) = stack.last_mut() {
            parent.children.push(XmlNode::Text(text.replace("\r\n", "\n")));
          }
        }
      }
      Ok(Event::CData(t)) => {
        let text = String::from_utf8_lossy(&t).into_owned();
        if let Some(parent) = stack.last_mut() {
          parent.children.push(XmlNode::CData(text));
        }
      }
      Ok(Event::Comment(t)) => {
        let text = String::from_utf8_lossy(&t).into_owned();
        if let Some(parent) = stack.last_mut() {
          parent.children.push(XmlNode::Comment(text));
        }
      }
      Ok(Event::Eof) => break,
      // Declarations, doctypes and processing instructions carry nothing an
      // addon manifest needs; the serializer emits its own declaration.
      Ok(_) => {}
      Err(e) => return Err(e.to_string()),
    }
  }

  if !stack.is_empty() {
    return Err("unclosed element".to_string());
  }

  root.ok_or_else(|| "no root element".to_string())
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement, String> {
  let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
  let mut el = XmlElement::new(name);

  for attr in e.attributes() {
    let attr = attr.map_err(|e| e.to_string())?;
    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
    let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
    el.set_attribute(&key, &value);
  }

  Ok(el)
}

fn attach(node: XmlNode, stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>) -> Result<(), String> {
  if let Some(parent) = stack.last_mut() {
    parent.children.push(node);
    return Ok(());
  }

  if let XmlNode::Element(el) = node {
    if root.is_some() {
      return Err("multiple root elements".to_string());
    }
    *root = Some(el);
  }

  Ok(())
}

/// Serialize a document to its stable on-disk form
///
/// Exact declaration line, 2-space indented body, CRLF line endings and a
/// trailing newline. The declaration is prepended here, never by the
/// pretty-printer.
pub fn serialize_document(root: &XmlElement) -> Result<Vec<u8>, String> {
  let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
  write_element(&mut writer, root)?;

  let body = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;
  let text = format!("{}\n{}\n", XML_DECLARATION, body);

  // Normalize before converting so re-serialized CRLF content stays stable
  Ok(text.replace("\r\n", "\n").replace('\n', "\r\n").into_bytes())
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &XmlElement) -> Result<(), String> {
  let mut start = BytesStart::new(el.name.as_str());
  for (key, value) in el.attributes() {
    start.push_attribute((key, value));
  }

  if el.children.is_empty() {
    return writer.write_event(Event::Empty(start)).map_err(|e| e.to_string());
  }

  writer.write_event(Event::Start(start)).map_err(|e| e.to_string())?;

  for child in &el.children {
    match child {
      XmlNode::Element(inner) => write_element(writer, inner)?,
      XmlNode::Text(t) => writer
        .write_event(Event::Text(BytesText::new(t)))
        .map_err(|e| e.to_string())?,
      XmlNode::CData(t) => writer
        .write_event(Event::CData(BytesCData::new(t.as_str())))
        .map_err(|e| e.to_string())?,
      XmlNode::Comment(t) => writer
        .write_event(Event::Comment(BytesText::from_escaped(t.as_str())))
        .map_err(|e| e.to_string())?,
    }
  }

  writer
    .write_event(Event::End(BytesEnd::new(el.name.as_str())))
    .map_err(|e| e.to_string())
}
