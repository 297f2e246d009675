use nf_core::{Error, RawItem, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

#[derive(Clone, Copy)]
enum Field {
    Title,
    Link,
    PubDate,
    Description,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"pubDate" => Some(Field::PubDate),
            b"description" => Some(Field::Description),
            _ => None,
        }
    }
}

/// Collects the first occurrence of each field among an item's children.
#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
    description: Option<String>,
}

impl ItemBuilder {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::Description => &mut self.description,
        }
    }

    /// Opens a field for capture, unless an earlier sibling already filled it.
    fn open(&mut self, field: Field) -> bool {
        let slot = self.slot(field);
        if slot.is_some() {
            return false;
        }
        *slot = Some(String::new());
        true
    }

    fn push_text(&mut self, field: Field, text: &str) {
        if let Some(value) = self.slot(field) {
            value.push_str(text);
        }
    }

    fn build(self) -> RawItem {
        RawItem {
            title: self.title.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            pub_date: self.pub_date.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        }
    }
}

/// Parse an RSS document into raw items, in document order.
///
/// `<item>` elements are found at any depth. Missing fields come back as
/// empty strings; no filtering happens here.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<RawItem>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut items = Vec::new();
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut saw_root = false;
    // (item builder, depth of the <item> element)
    let mut current: Option<(ItemBuilder, usize)> = None;
    // (field being captured, depth of the field element)
    let mut capture: Option<(Field, usize)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                saw_root = true;
                depth += 1;
                let name = e.name();
                if current.is_none() {
                    if name.as_ref() == b"item" {
                        current = Some((ItemBuilder::default(), depth));
                    }
                } else if let Some((builder, item_depth)) = current.as_mut() {
                    if capture.is_none() && depth == *item_depth + 1 {
                        if let Some(field) = Field::from_name(name.as_ref()) {
                            if builder.open(field) {
                                capture = Some((field, depth));
                            }
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                saw_root = true;
                if let Some((builder, item_depth)) = current.as_mut() {
                    if capture.is_none() && depth == *item_depth {
                        if let Some(field) = Field::from_name(e.name().as_ref()) {
                            builder.open(field);
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                if matches!(capture, Some((_, d)) if d == depth) {
                    capture = None;
                }
                if matches!(current, Some((_, d)) if d == depth) {
                    if let Some((builder, _)) = current.take() {
                        items.push(builder.build());
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(e)) => {
                if let (Some((builder, _)), Some((field, _))) = (current.as_mut(), capture) {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::Parse(format!("XML parse error: {}", e)))?;
                    builder.push_text(field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some((builder, _)), Some((field, _))) = (current.as_mut(), capture) {
                    builder.push_text(field, &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(Error::Parse("no root element".to_string()));
    }
    if depth != 0 {
        return Err(Error::Parse("unexpected end of document".to_string()));
    }

    Ok(items)
}
