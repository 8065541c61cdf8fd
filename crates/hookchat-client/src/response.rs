use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Shown when the webhook declares JSON but the body does not parse.
pub const INVALID_FORMAT_FALLBACK: &str = "Sorry, I received an invalid response format.";
/// Shown when an HTML response has no `srcdoc` attribute.
pub const UNPARSEABLE_HTML_FALLBACK: &str =
    "I received your message but couldn't parse the response.";
/// Shown when the extracted reply is empty.
pub const EMPTY_REPLY_FALLBACK: &str =
    "I received your message, but I'm not sure how to respond right now.";

/// Object keys searched for the reply, in priority order.
const REPLY_KEYS: [&str; 3] = ["output", "response", "message"];

/// A webhook response body, classified by its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `application/json` that parsed.
    Json(Value),
    /// `application/json` that did not parse; holds the raw body.
    MalformedJson(String),
    /// `text/html`, typically an iframe wrapping the real reply.
    Html(String),
    /// Anything else, used verbatim.
    Text(String),
}

/// Display text pulled out of a [`ResponseBody`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    /// `false` when `text` is one of the fallback strings.
    pub usable: bool,
}

impl Extraction {
    fn reply(text: String) -> Self {
        Self { text, usable: true }
    }

    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            usable: false,
        }
    }
}

impl ResponseBody {
    /// Classifies `body` by the `Content-Type` header value.
    pub fn classify(content_type: &str, body: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("application/json") {
            match serde_json::from_str(body) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    tracing::error!(error = %e, "Webhook returned malformed JSON");
                    ResponseBody::MalformedJson(body.to_string())
                }
            }
        } else if content_type.contains("text/html") {
            ResponseBody::Html(body.to_string())
        } else {
            ResponseBody::Text(body.to_string())
        }
    }

    /// Extracts the reply. Never returns empty text.
    pub fn extract(&self) -> Extraction {
        let text = match self {
            ResponseBody::Json(value) => extract_json(value),
            ResponseBody::MalformedJson(_) => return Extraction::fallback(INVALID_FORMAT_FALLBACK),
            ResponseBody::Html(html) => match extract_srcdoc(html) {
                Some(text) => text,
                None => return Extraction::fallback(UNPARSEABLE_HTML_FALLBACK),
            },
            ResponseBody::Text(text) => text.clone(),
        };

        if text.trim().is_empty() {
            Extraction::fallback(EMPTY_REPLY_FALLBACK)
        } else {
            Extraction::reply(text)
        }
    }
}

/// Reads the reply out of a JSON value.
///
/// A non-empty array yields its first element's `output`; an object yields the
/// first of `output`, `response`, `message` that is present; anything else is
/// stringified.
pub fn extract_json(value: &Value) -> String {
    match value {
        Value::Array(items) if !items.is_empty() => items[0]
            .get("output")
            .map(value_to_text)
            .unwrap_or_default(),
        Value::Object(map) => REPLY_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .map(value_to_text)
            .unwrap_or_default(),
        other => value_to_text(other),
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn srcdoc_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"srcdoc="([^"]*)""#).ok())
        .as_ref()
}

/// Pulls the `srcdoc` attribute out of an HTML document and unescapes
/// `&quot;` and `&amp;`.
pub fn extract_srcdoc(html: &str) -> Option<String> {
    let captures = srcdoc_pattern()?.captures(html)?;
    let raw = captures.get(1)?.as_str();
    Some(raw.replace("&quot;", "\"").replace("&amp;", "&"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(content_type: &str, body: &str) -> Extraction {
        ResponseBody::classify(content_type, body).extract()
    }

    #[test]
    fn test_json_array_output() {
        let e = extract("application/json", r#"[{"output": "hi"}]"#);
        assert_eq!(e, Extraction::reply("hi".into()));
    }

    #[test]
    fn test_json_array_uses_first_element_only() {
        let e = extract("application/json", r#"[{"output": "first"}, {"output": "second"}]"#);
        assert_eq!(e.text, "first");
    }

    #[test]
    fn test_json_array_without_output_falls_back() {
        let e = extract("application/json", r#"[{"text": "nope"}]"#);
        assert_eq!(e.text, EMPTY_REPLY_FALLBACK);
        assert!(!e.usable);
    }

    #[test]
    fn test_json_object_key_priority() {
        assert_eq!(
            extract_json(&json!({"response": "hey"})),
            "hey"
        );
        assert_eq!(
            extract_json(&json!({"message": "m", "response": "r"})),
            "r"
        );
        assert_eq!(
            extract_json(&json!({"message": "m", "response": "r", "output": "o"})),
            "o"
        );
        assert_eq!(extract_json(&json!({"message": "m"})), "m");
    }

    #[test]
    fn test_json_object_without_keys_falls_back() {
        let e = extract("application/json", r#"{"content": "ignored"}"#);
        assert_eq!(e.text, EMPTY_REPLY_FALLBACK);
    }

    #[test]
    fn test_json_scalars_are_stringified() {
        assert_eq!(extract_json(&json!("plain string")), "plain string");
        assert_eq!(extract_json(&json!(42)), "42");
        assert_eq!(extract_json(&json!(true)), "true");
        assert_eq!(extract_json(&json!([])), "[]");
        assert_eq!(extract_json(&json!({"output": {"a": 1}})), r#"{"a":1}"#);
    }

    #[test]
    fn test_json_null_output_is_empty() {
        let e = extract("application/json", r#"{"output": null}"#);
        assert_eq!(e.text, EMPTY_REPLY_FALLBACK);
    }

    #[test]
    fn test_malformed_json() {
        let e = extract("application/json; charset=utf-8", "{not json");
        assert_eq!(e.text, INVALID_FORMAT_FALLBACK);
        assert!(!e.usable);
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        let body = ResponseBody::classify("Application/JSON", r#"{"output":"x"}"#);
        assert!(matches!(body, ResponseBody::Json(_)));
    }

    #[test]
    fn test_html_srcdoc() {
        let html = r#"<html><iframe srcdoc="Hello &amp; welcome"></iframe></html>"#;
        let e = extract("text/html; charset=utf-8", html);
        assert_eq!(e, Extraction::reply("Hello & welcome".into()));
    }

    #[test]
    fn test_html_unescapes_quotes() {
        let html = r#"<iframe srcdoc="She said &quot;hi&quot;"></iframe>"#;
        assert_eq!(extract_srcdoc(html).unwrap(), r#"She said "hi""#);
    }

    #[test]
    fn test_html_unescape_order() {
        // &amp;quot; decodes to the literal text &quot;, not to a quote
        assert_eq!(
            extract_srcdoc(r#"<i srcdoc="a &amp;quot; b">"#).unwrap(),
            "a &quot; b"
        );
    }

    #[test]
    fn test_html_without_srcdoc() {
        let e = extract("text/html", "<html><body>nothing here</body></html>");
        assert_eq!(e.text, UNPARSEABLE_HTML_FALLBACK);
        assert!(!e.usable);
    }

    #[test]
    fn test_html_empty_srcdoc() {
        let e = extract("text/html", r#"<iframe srcdoc=""></iframe>"#);
        assert_eq!(e.text, EMPTY_REPLY_FALLBACK);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(extract("text/plain", "ok"), Extraction::reply("ok".into()));
    }

    #[test]
    fn test_missing_content_type_is_text() {
        assert_eq!(extract("", "raw"), Extraction::reply("raw".into()));
    }

    #[test]
    fn test_blank_text_falls_back() {
        let e = extract("text/plain", "  \n ");
        assert_eq!(e.text, EMPTY_REPLY_FALLBACK);
        assert!(!e.usable);
    }
}
