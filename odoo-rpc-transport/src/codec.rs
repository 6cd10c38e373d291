//! XML-RPC wire codec
//!
//! Requests are rendered straight into a `String`. Responses are first read into a small element
//! tree with `quick-xml` and then interpreted, which keeps the event handling in one place and
//! lets the interpreter look at a node's children in any order.

use crate::error::{Error, Fault, Result};
use crate::value::Value;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

/// Deepest element nesting accepted in a response
const MAX_DEPTH: usize = 256;

/// Render a `<methodCall>` document
///
/// # Errors
///
/// Returns [`Error::Parse`] for a NaN or infinite double, which XML-RPC cannot represent
///
/// # Example
///
/// ```rust
/// use odoo_rpc_transport::{encode_request, Value};
///
/// let xml = encode_request("version", &[]).unwrap();
/// assert!(xml.contains("<methodName>version</methodName>"));
/// ```
pub fn encode_request(method: &str, params: &[Value]) -> Result<String> {
    let mut out = String::with_capacity(256);
    out.push_str("<?xml version=\"1.0\"?><methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        encode_value(param, &mut out)?;
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    Ok(out)
}

fn encode_value(value: &Value, out: &mut String) -> Result<()> {
    out.push_str("<value>");
    match value {
        Value::Int(i) if i32::try_from(*i).is_ok() => {
            out.push_str("<int>");
            out.push_str(&i.to_string());
            out.push_str("</int>");
        }
        Value::Int(i) => {
            out.push_str("<i8>");
            out.push_str(&i.to_string());
            out.push_str("</i8>");
        }
        Value::Bool(b) => {
            out.push_str(if *b {
                "<boolean>1</boolean>"
            } else {
                "<boolean>0</boolean>"
            });
        }
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Double(d) if !d.is_finite() => {
            return Err(Error::Parse(format!("cannot encode non-finite double {}", d)));
        }
        Value::Double(d) => {
            out.push_str("<double>");
            out.push_str(&d.to_string());
            out.push_str("</double>");
        }
        Value::DateTime(s) => {
            out.push_str("<dateTime.iso8601>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</dateTime.iso8601>");
        }
        Value::Base64(bytes) => {
            out.push_str("<base64>");
            out.push_str(&STANDARD.encode(bytes));
            out.push_str("</base64>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(item, out)?;
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                encode_value(member, out)?;
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
    Ok(())
}

/// Decode a `<methodResponse>` document
///
/// Returns the single response value, or [`Error::Fault`] when the server answered with a fault.
pub fn decode_response(body: &str) -> Result<Value> {
    let root = parse_tree(body)?;
    if root.name != "methodResponse" {
        return Err(Error::Parse(format!(
            "expected <methodResponse>, found <{}>",
            root.name
        )));
    }

    let outcome = root
        .children
        .first()
        .ok_or_else(|| Error::Parse("empty <methodResponse>".to_string()))?;

    match outcome.name.as_str() {
        "params" => {
            let value = outcome.child("param")?.child("value")?;
            decode_value(value)
        }
        "fault" => {
            let detail = decode_value(outcome.child("value")?)?;
            Err(Error::Fault(fault_from_value(&detail)?))
        }
        other => Err(Error::Parse(format!("unexpected <{}> in response", other))),
    }
}

fn fault_from_value(detail: &Value) -> Result<Fault> {
    let (code, code_text) = match detail.get("faultCode") {
        Some(Value::Int(code)) => (*code, None),
        // Older servers put the error text in faultCode and a traceback in faultString
        Some(Value::String(text)) => (text.trim().parse::<i64>().unwrap_or_default(), Some(text.clone())),
        _ => return Err(Error::Parse("fault without faultCode".to_string())),
    };
    let message = match (detail.get("faultString"), &code_text) {
        (Some(Value::String(message)), _) => message.clone(),
        (_, Some(text)) => text.clone(),
        _ => String::new(),
    };
    Ok(Fault {
        code,
        code_text,
        message,
    })
}

fn decode_value(node: &Node) -> Result<Value> {
    let Some(typed) = node.children.first() else {
        // An untyped <value> is a string
        return Ok(Value::String(node.text.clone()));
    };

    let text = typed.text.as_str();
    match typed.name.as_str() {
        "int" | "i4" | "i8" => text
            .trim()
            .parse()
            .map(Value::Int)
            .map_err(|e| Error::Parse(format!("invalid integer {:?}: {}", text, e))),
        "boolean" => match text.trim() {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            other => Err(Error::Parse(format!("invalid boolean {:?}", other))),
        },
        "string" => Ok(Value::String(text.to_string())),
        "double" => match text.trim().parse::<f64>() {
            Ok(d) if d.is_finite() => Ok(Value::Double(d)),
            Ok(_) => Err(Error::Parse(format!("non-finite double {:?}", text))),
            Err(e) => Err(Error::Parse(format!("invalid double {:?}: {}", text, e))),
        },
        "dateTime.iso8601" => Ok(Value::DateTime(text.trim().to_string())),
        "base64" => {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            STANDARD
                .decode(compact)
                .map(Value::Base64)
                .map_err(|e| Error::Parse(format!("invalid base64: {}", e)))
        }
        "nil" => Ok(Value::Nil),
        "array" => typed
            .child("data")?
            .children
            .iter()
            .filter(|n| n.name == "value")
            .map(decode_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children.iter().filter(|n| n.name == "member") {
                let name = member.child("name")?.text.clone();
                let value = decode_value(member.child("value")?)?;
                members.insert(name, value);
            }
            Ok(Value::Struct(members))
        }
        other => Err(Error::Parse(format!("unknown value type <{}>", other))),
    }
}

/// Element tree node: name, concatenated direct text and child elements
#[derive(Debug, Default)]
struct Node {
    name: String,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn named(raw: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(raw).into_owned(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Result<&Node> {
        self.children
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| Error::Parse(format!("<{}> is missing <{}>", self.name, name)))
    }
}

fn parse_tree(body: &str) -> Result<Node> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::Parse("response nested too deeply".to_string()));
                }
                stack.push(Node::named(e.name().as_ref()));
            }
            Event::Empty(e) => {
                let node = Node::named(e.name().as_ref());
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::Parse("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| Error::Parse("empty document".to_string()))
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(Error::Parse("multiple root elements".to_string())),
    }
    Ok(())
}
