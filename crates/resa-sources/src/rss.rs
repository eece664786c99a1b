//! RSS feed parsing shared by the news collectors.

use chrono::DateTime;
use quick_xml::events::Event;
use quick_xml::Reader;
use resa_core::DataItem;

use crate::error::SourceError;

#[derive(Default)]
struct ItemFields {
    title: String,
    link: String,
    description: String,
    pub_date: String,
    source: String,
}

impl ItemFields {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn set(&mut self, tag: &str, text: String) {
        match tag {
            "title" => self.title = text,
            "link" => self.link = text,
            "pubdate" => self.pub_date = text,
            "source" => self.source = text,
            _ => {}
        }
    }

    fn into_item(self) -> Option<DataItem> {
        if self.title.is_empty() || self.link.is_empty() {
            return None;
        }
        let date = (!self.pub_date.is_empty()).then(|| normalize_pub_date(&self.pub_date));
        Some(DataItem::web_result(
            self.title,
            self.description,
            self.source,
            date,
            self.link,
        ))
    }
}

/// Parse an RSS XML feed into web [`DataItem`]s.
///
/// Extracts `<item>` elements, pulling `<title>`, `<link>`, `<description>`,
/// `<pubDate>` and `<source>` (namespaced variants such as `News:Source`
/// included). HTML in descriptions is stripped. Stops after `max_items`
/// items have been collected.
///
/// # Errors
///
/// Returns [`SourceError::Xml`] if the XML is malformed.
pub(crate) fn parse_feed(xml: &str, max_items: usize) -> Result<Vec<DataItem>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut in_description = false;
    let mut current_tag = String::new();
    let mut fields = ItemFields::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                if name == "item" {
                    in_item = true;
                    in_description = false;
                    fields.clear();
                } else if name == "description" && in_item {
                    in_description = true;
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                if name == "description" {
                    in_description = false;
                }
                if name == "item" && in_item {
                    in_item = false;
                    if let Some(item) = std::mem::take(&mut fields).into_item() {
                        items.push(item);
                        if items.len() >= max_items {
                            break;
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    if in_description {
                        // Text nodes around nested tags like <b> all belong
                        // to the description.
                        let text = strip_html(&text);
                        if !fields.description.is_empty() && !text.is_empty() {
                            fields.description.push(' ');
                        }
                        fields.description.push_str(&text);
                    } else {
                        fields.set(&current_tag, text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    if in_description {
                        fields.description = strip_html(&text);
                    } else {
                        fields.set(&current_tag, text.trim().to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SourceError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

/// RFC 2822 `pubDate` → RFC 3339; anything else is kept as given.
pub(crate) fn normalize_pub_date(raw: &str) -> String {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw).map_or_else(|_| raw.to_string(), |d| d.to_rfc3339())
}

/// Strip HTML tags from a string and normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
