//! XML rendering of API replies.
//!
//! Any JSON-shaped value maps onto a `<response>` document: object keys
//! become child elements, list entries become `<item>` elements, `null`
//! becomes an empty element and scalars become text.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde_json::Value;

use crate::error::ApiError;

pub const ROOT: &str = "response";
pub const LIST_ITEM: &str = "item";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Render `value` as a complete XML document.
pub fn to_document(value: &Value) -> Result<Vec<u8>, ApiError> {
  let mut w = Writer::new(Cursor::new(Vec::new()));
  emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
  write_value(&mut w, ROOT, value)?;
  Ok(w.into_inner().into_inner())
}

fn write_value(w: &mut XmlWriter, tag: &str, value: &Value) -> Result<(), ApiError> {
  match value {
    Value::Null => emit(w, Event::Empty(BytesStart::new(tag))),
    Value::Object(map) => {
      emit(w, Event::Start(BytesStart::new(tag)))?;
      for (key, child) in map {
        write_value(w, key, child)?;
      }
      emit(w, Event::End(BytesEnd::new(tag)))
    }
    Value::Array(items) => {
      emit(w, Event::Start(BytesStart::new(tag)))?;
      for item in items {
        write_value(w, LIST_ITEM, item)?;
      }
      emit(w, Event::End(BytesEnd::new(tag)))
    }
    Value::String(s) => write_text_elem(w, tag, s),
    Value::Number(n) => write_text_elem(w, tag, &n.to_string()),
    Value::Bool(b) => write_text_elem(w, tag, if *b { "true" } else { "false" }),
  }
}

fn write_text_elem(w: &mut XmlWriter, tag: &str, text: &str) -> Result<(), ApiError> {
  emit(w, Event::Start(BytesStart::new(tag)))?;
  emit(w, Event::Text(BytesText::new(text)))?;
  emit(w, Event::End(BytesEnd::new(tag)))
}

fn emit(w: &mut XmlWriter, event: Event<'_>) -> Result<(), ApiError> {
  w.write_event(event).map_err(|e| ApiError::Render(e.to_string()))
}
