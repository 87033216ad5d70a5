//! RSS 2.0 document parsing.
//!
//! Walks the XML event stream and keeps an element path so that only direct
//! children of `<channel>` and `<channel><item>` are captured. Every other
//! element, including namespaced ones such as `atom:link`, is skipped.

use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::types::{RssChannel, RssFeed, RssItem};

/// Parse an RSS XML document.
///
/// Channel title and description, and each item's title and description, are
/// HTML-entity decoded after XML unescaping, so double-encoded text such as
/// `&amp;amp;` comes out as `&`.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] on malformed XML, [`ParseError::Empty`] if
/// there is no root element, or [`ParseError::UnexpectedEof`] if the
/// document is truncated.
pub fn parse_rss(xml: &str) -> Result<RssFeed, ParseError> {
    let mut reader = Reader::from_str(xml);

    let mut channel = RssChannel::default();
    let mut current_item: Option<RssItem> = None;
    let mut path: Vec<String> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                saw_root = true;
                if name == "item" && in_channel(&path) {
                    current_item = Some(RssItem::default());
                }
                path.push(name);
                // A repeated element replaces the earlier value.
                if let Some(field) = field_for(&path, &mut channel, &mut current_item) {
                    field.clear();
                }
            }
            Event::Empty(e) => {
                saw_root = true;
                if e.name().as_ref() == b"item" && in_channel(&path) {
                    channel.items.push(RssItem::default());
                }
            }
            Event::End(_) => {
                // Pieces are joined untrimmed so whitespace next to CDATA survives.
                if let Some(field) = field_for(&path, &mut channel, &mut current_item) {
                    *field = field.trim().to_string();
                }
                let closed = path.pop();
                if closed.as_deref() == Some("item") && in_channel(&path) {
                    if let Some(item) = current_item.take() {
                        channel.items.push(decode_item(item));
                    }
                }
            }
            Event::Text(e) => {
                if let Some(field) = field_for(&path, &mut channel, &mut current_item) {
                    field.push_str(&text_content(&e));
                }
            }
            Event::CData(e) => {
                if let Some(field) = field_for(&path, &mut channel, &mut current_item) {
                    field.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => {
                if let Some(open) = path.pop() {
                    return Err(ParseError::UnexpectedEof(open));
                }
                if !saw_root {
                    return Err(ParseError::Empty);
                }
                break;
            }
            _ => {}
        }
    }

    channel.title = decode_entities(&channel.title);
    channel.description = decode_entities(&channel.description);

    Ok(RssFeed { channel })
}

/// `true` when `path` points at `<root><channel>`.
fn in_channel(path: &[String]) -> bool {
    matches!(path, [_, channel] if channel == "channel")
}

fn field_for<'a>(
    path: &[String],
    channel: &'a mut RssChannel,
    item: &'a mut Option<RssItem>,
) -> Option<&'a mut String> {
    match path {
        [_, channel_tag, field] if channel_tag == "channel" => match field.as_str() {
            "title" => Some(&mut channel.title),
            "link" => Some(&mut channel.link),
            "description" => Some(&mut channel.description),
            _ => None,
        },
        [_, channel_tag, item_tag, field] if channel_tag == "channel" && item_tag == "item" => {
            let item = item.as_mut()?;
            match field.as_str() {
                "title" => Some(&mut item.title),
                "link" => Some(&mut item.link),
                "description" => Some(&mut item.description),
                "pubDate" => Some(&mut item.pub_date),
                _ => None,
            }
        }
        _ => None,
    }
}

/// XML-unescaped text.
///
/// XML rejects entities it does not define (`&nbsp;` and friends). For such
/// text the HTML decoder, a superset of the XML one, stands in for the
/// unescape so every entity still gets its first pass.
fn text_content(e: &BytesText<'_>) -> String {
    match e.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => decode_entities(&String::from_utf8_lossy(e)),
    }
}

fn decode_item(item: RssItem) -> RssItem {
    RssItem {
        title: decode_entities(&item.title),
        description: decode_entities(&item.description),
        ..item
    }
}

fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
