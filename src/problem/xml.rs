// Start of file: /src/problem/xml.rs

/*
    * XML rendering of problem payloads.
    *
    * The payload is rendered from its plain JSON value. Every member name is
    * first rewritten into a valid XML element name (see `sanitize_key`). That
    * step is lossy: two different keys can collapse onto the same element name.
*/

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{Map, Value};

/// Root element of every problem document.
pub const ROOT_ELEMENT: &str = "problem";
/// Namespace declared on the root element.
pub const PROBLEM_NAMESPACE: &str = "urn:ietf:rfc:7807";

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-'
            | '.'
            | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Rewrites `key` into a valid XML element name.
///
/// Each character that cannot appear in a name becomes `_`, then a first
/// character that cannot start a name is replaced by `_`. An empty key becomes
/// `_`.
pub fn sanitize_key(key: &str) -> String {
    let mut chars = key.chars().map(|c| if is_name_char(c) { c } else { '_' });

    match chars.next() {
        None => "_".to_owned(),
        Some(first) => {
            let first: char = if is_name_start_char(first) { first } else { '_' };
            std::iter::once(first).chain(chars).collect()
        }
    }
}

/// Sanitizes every object key at every depth, including objects nested in
/// arrays.
pub fn sanitize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (sanitize_key(&key), sanitize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_keys).collect()),
        other => other,
    }
}

/// Renders `payload` (an object) as a `<problem xmlns="urn:ietf:rfc:7807">`
/// document. Keys are sanitized here.
pub fn to_xml_string(payload: &Value) -> Result<String, quick_xml::Error> {
    let payload: Value = sanitize_keys(payload.clone());
    let mut writer: XmlWriter = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new(ROOT_ELEMENT).with_attributes([("xmlns", PROBLEM_NAMESPACE)]),
    ))?;

    match &payload {
        Value::Object(members) => write_members(&mut writer, members)?,
        other => write_text(&mut writer, other)?,
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let bytes: Vec<u8> = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn write_members(
    writer: &mut XmlWriter,
    members: &Map<String, Value>,
) -> Result<(), quick_xml::Error> {
    for (name, value) in members {
        write_element(writer, name, value)?;
    }
    Ok(())
}

// Sequences repeat the element once per item; an empty one leaves a single
// empty element behind.
fn write_element(
    writer: &mut XmlWriter,
    name: &str,
    value: &Value,
) -> Result<(), quick_xml::Error> {
    match value {
        Value::Array(items) if items.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
        }
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::Object(members) if members.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::Object(members) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            write_members(writer, members)?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        scalar => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            write_text(writer, scalar)?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

fn write_text(writer: &mut XmlWriter, value: &Value) -> Result<(), quick_xml::Error> {
    let text: String = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    Ok(())
}


// End of file: /src/problem/xml.rs
