//! Syndication feed parsing.
//!
//! Turns an RSS 2.0, RSS 1.0 (RDF) or Atom document into a flat list of
//! [`FeedEntry`] values in document order. The document is walked as a
//! namespace-aware event stream, so extension elements such as
//! `<media:title>` or `<atom:link>` never shadow the core fields they share
//! a local name with.
//!
//! Parsing is best-effort: undefined entities, stray ampersands and broken
//! markup flag the feed as malformed, and every entry read up to that point
//! is still returned.
//!
//! # Field mapping
//!
//! | Entry field   | RSS 2.0 / RSS 1.0                 | Atom                      |
//! |---------------|-----------------------------------|---------------------------|
//! | `title`       | `title`                           | `title`                   |
//! | `summary`     | -                                 | `summary`                 |
//! | `description` | `description`                     | -                         |
//! | `content`     | `content:encoded`                 | `content`                 |
//! | `link`        | `link`, else permalink `guid`     | `link[@href]`             |
//! | `published`   | `pubDate`                         | `published`, `issued`     |
//! | `updated`     | `dc:date`, `atom:updated`         | `updated`, `modified`     |
//!
//! Element text is taken verbatim; for Atom `type="xhtml"` constructs the
//! child markup is kept as-is so it can be cleaned like escaped HTML.

use quick_xml::escape::{escape, resolve_predefined_entity, resolve_xml_entity};
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use url::Url;

const ATOM_NS: &[u8] = b"http://www.w3.org/2005/Atom";
const ATOM_03_NS: &[u8] = b"http://purl.org/atom/ns#";
const RSS_10_NS: &[u8] = b"http://purl.org/rss/1.0/";
const RSS_090_NS: &[u8] = b"http://my.netscape.com/rdf/simple/0.9/";
const DC_NS: &[u8] = b"http://purl.org/dc/elements/1.1/";
const CONTENT_NS: &[u8] = b"http://purl.org/rss/1.0/modules/content/";

/// One entry as found in the feed, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
}

/// Result of parsing a feed document.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub entries: Vec<FeedEntry>,
    /// Set when the document was not well-formed; holds the first complaint.
    pub malformed: Option<String>,
}

impl ParsedFeed {
    fn flag(&mut self, reason: impl Into<String>) {
        if self.malformed.is_none() {
            self.malformed = Some(reason.into());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Rss,
    Atom,
}

/// Which vocabulary an element belongs to, relative to the feed's dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vocab {
    /// The feed's own elements (RSS 2.0 / RSS 1.0 items, Atom entries).
    Core,
    /// Atom elements used as an extension inside RSS.
    AtomExt,
    DublinCore,
    Content,
    Other,
}

impl Vocab {
    fn classify(ns: &ResolveResult<'_>, dialect: Dialect) -> Self {
        let uri = match ns {
            ResolveResult::Unbound => return Vocab::Core,
            ResolveResult::Bound(ns) => ns.as_ref(),
            ResolveResult::Unknown(_) => return Vocab::Other,
        };
        match uri {
            ATOM_NS | ATOM_03_NS if dialect == Dialect::Atom => Vocab::Core,
            ATOM_NS | ATOM_03_NS => Vocab::AtomExt,
            RSS_10_NS | RSS_090_NS if dialect == Dialect::Rss => Vocab::Core,
            DC_NS => Vocab::DublinCore,
            CONTENT_NS => Vocab::Content,
            _ => Vocab::Other,
        }
    }
}

/// Text-bearing entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Description,
    Content,
    Link,
    Guid { permalink: bool },
    Published,
    Updated,
}

impl Field {
    fn for_element(vocab: Vocab, local: &[u8], dialect: Dialect) -> Option<Self> {
        let field = match (dialect, vocab, local) {
            (_, Vocab::Core, b"title") => Field::Title,
            (_, Vocab::DublinCore, b"date") => Field::Updated,
            (Dialect::Rss, Vocab::Core, b"link") => Field::Link,
            (Dialect::Rss, Vocab::Core, b"description") => Field::Description,
            (Dialect::Rss, Vocab::Core, b"pubDate") => Field::Published,
            (Dialect::Rss, Vocab::Content, b"encoded") => Field::Content,
            (Dialect::Rss, Vocab::AtomExt, b"updated") => Field::Updated,
            (Dialect::Atom, Vocab::Core, b"summary") => Field::Summary,
            (Dialect::Atom, Vocab::Core, b"content") => Field::Content,
            (Dialect::Atom, Vocab::Core, b"published" | b"issued") => Field::Published,
            (Dialect::Atom, Vocab::Core, b"updated" | b"modified") => Field::Updated,
            _ => return None,
        };
        Some(field)
    }
}

/// Entry being assembled while its element is open.
#[derive(Debug, Default)]
struct EntryBuilder {
    depth: usize,
    entry: FeedEntry,
    guid: Option<String>,
    /// Atom `(rel, href)` pairs in document order.
    links: Vec<(Option<String>, String)>,
}

impl EntryBuilder {
    fn set(&mut self, field: Field, text: String) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let slot = match field {
            Field::Title => &mut self.entry.title,
            Field::Summary => &mut self.entry.summary,
            Field::Description => &mut self.entry.description,
            Field::Content => &mut self.entry.content,
            Field::Link => &mut self.entry.link,
            Field::Published => &mut self.entry.published,
            Field::Updated => &mut self.entry.updated,
            Field::Guid { permalink: false } => return,
            Field::Guid { permalink: true } => &mut self.guid,
        };
        // First occurrence wins.
        if slot.is_none() {
            *slot = Some(text.to_string());
        }
    }

    fn finish(mut self, base: Option<&Url>) -> FeedEntry {
        let atom_link = self
            .links
            .iter()
            .find(|(rel, _)| rel.as_deref().is_none_or(|r| r == "alternate"))
            .or_else(|| self.links.first())
            .map(|(_, href)| href.clone());

        let guid_link = self.guid.filter(|g| g.starts_with("http"));
        self.entry.link = self
            .entry
            .link
            .or(atom_link)
            .or(guid_link)
            .map(|href| resolve_link(&href, base));
        self.entry
    }
}

/// Field text being collected while its element is open.
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    buf: String,
}

impl Capture {
    /// Markup nested inside the captured element is kept verbatim.
    fn nested(&self, depth: usize) -> bool {
        depth > self.depth
    }
}

/// Resolve a relative link against the feed URL; absolute links pass through untouched.
fn resolve_link(href: &str, base: Option<&Url>) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Option<String> {
    let attr = element.try_get_attribute(name).ok()??;
    attr.unescape_value().ok().map(|v| v.trim().to_string())
}

/// `<name attrs>` or `<name attrs/>` rebuilt from a start tag.
fn raw_tag(element: &BytesStart<'_>, empty: bool) -> String {
    let inner = String::from_utf8_lossy(element);
    if empty {
        format!("<{inner}/>")
    } else {
        format!("<{inner}>")
    }
}

/// Text for a general entity reference such as `&mdash;` or `&#169;`.
///
/// Returns `None` for references that are neither numeric, XML-predefined nor
/// known HTML entities.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        return value.and_then(char::from_u32).map(String::from);
    }
    resolve_predefined_entity(name).map(|s| s.replace('\u{A0}', " "))
}

/// Parse a feed document.
///
/// # Arguments
///
/// * `xml` - The raw feed body
/// * `base` - URL the feed was fetched from, used to resolve relative links
///
/// # Returns
///
/// A [`ParsedFeed`] with the entries in document order. Never fails: problems
/// are reported through [`ParsedFeed::malformed`] alongside whatever entries
/// were read before the problem.
pub fn parse_feed(xml: &str, base: Option<&Url>) -> ParsedFeed {
    let mut parsed = ParsedFeed::default();
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().allow_dangling_amp = true;

    let mut dialect: Option<Dialect> = None;
    let mut depth = 0usize;
    let mut current: Option<EntryBuilder> = None;
    let mut capture: Option<Capture> = None;

    loop {
        let (vocab, event) = match reader.read_resolved_event() {
            Ok((ns, event)) => (dialect.map(|d| Vocab::classify(&ns, d)), event),
            Err(e) => {
                parsed.flag(e.to_string());
                break;
            }
        };

        match event {
            XmlEvent::Start(ref e) | XmlEvent::Empty(ref e) => {
                let empty = matches!(event, XmlEvent::Empty(_));
                if !empty {
                    depth += 1;
                }

                let Some(dialect) = dialect else {
                    // Root element decides the dialect.
                    let local = e.local_name();
                    dialect = match local.as_ref() {
                        b"rss" | b"RDF" => Some(Dialect::Rss),
                        b"feed" => Some(Dialect::Atom),
                        other => {
                            let name = String::from_utf8_lossy(other);
                            parsed.flag(format!("unsupported root element <{name}>"));
                            return parsed;
                        }
                    };
                    continue;
                };
                let vocab = vocab.unwrap_or(Vocab::Other);
                let local = e.local_name();

                if let Some(cap) = capture.as_mut() {
                    cap.buf.push_str(&raw_tag(e, empty));
                    continue;
                }

                let Some(builder) = current.as_mut() else {
                    let opens_entry = vocab == Vocab::Core
                        && match dialect {
                            Dialect::Rss => local.as_ref() == b"item",
                            Dialect::Atom => local.as_ref() == b"entry",
                        };
                    if opens_entry && !empty {
                        current = Some(EntryBuilder {
                            depth,
                            ..Default::default()
                        });
                    } else if opens_entry {
                        parsed.entries.push(FeedEntry::default());
                    }
                    continue;
                };

                // Only direct children of the entry carry fields.
                let child_depth = if empty { depth + 1 } else { depth };
                if child_depth != builder.depth + 1 {
                    continue;
                }

                if dialect == Dialect::Atom && vocab == Vocab::Core && local.as_ref() == b"link" {
                    if let Some(href) = attribute(e, "href").filter(|h| !h.is_empty()) {
                        builder.links.push((attribute(e, "rel"), href));
                    }
                    continue;
                }

                let field = if dialect == Dialect::Rss && vocab == Vocab::Core && local.as_ref() == b"guid" {
                    let permalink = attribute(e, "isPermaLink")
                        .is_none_or(|p| !p.eq_ignore_ascii_case("false"));
                    Some(Field::Guid { permalink })
                } else {
                    Field::for_element(vocab, local.as_ref(), dialect)
                };

                if let (Some(field), false) = (field, empty) {
                    capture = Some(Capture {
                        field,
                        depth,
                        buf: String::new(),
                    });
                }
            }
            XmlEvent::End(ref e) => {
                match capture.take() {
                    Some(mut cap) if cap.nested(depth) => {
                        cap.buf.push_str("</");
                        cap.buf.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                        cap.buf.push('>');
                        capture = Some(cap);
                    }
                    Some(cap) => {
                        if let Some(builder) = current.as_mut() {
                            builder.set(cap.field, cap.buf);
                        }
                    }
                    None => {
                        if current.as_ref().is_some_and(|b| b.depth == depth) {
                            if let Some(builder) = current.take() {
                                parsed.entries.push(builder.finish(base));
                            }
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            XmlEvent::Text(ref t) => {
                let text = t.decode().unwrap_or_else(|_| String::from_utf8_lossy(t).into_owned().into());
                if text.contains('&') {
                    parsed.flag("unescaped '&' in character data");
                }
                if let Some(cap) = capture.as_mut() {
                    if cap.nested(depth) {
                        cap.buf.push_str(&escape(&*text));
                    } else {
                        cap.buf.push_str(&text);
                    }
                }
            }
            XmlEvent::CData(ref c) => {
                if let Some(cap) = capture.as_mut() {
                    let text = c.decode().unwrap_or_else(|_| String::from_utf8_lossy(c).into_owned().into());
                    if cap.nested(depth) {
                        cap.buf.push_str(&escape(&*text));
                    } else {
                        cap.buf.push_str(&text);
                    }
                }
            }
            XmlEvent::GeneralRef(ref r) => {
                let name = String::from_utf8_lossy(r).into_owned();
                let resolved = resolve_reference(&name);
                if resolved.is_none() || (!name.starts_with('#') && resolve_xml_entity(&name).is_none()) {
                    parsed.flag(format!("undefined entity &{name};"));
                }
                if let Some(cap) = capture.as_mut() {
                    match resolved {
                        Some(text) if cap.nested(depth) => cap.buf.push_str(&escape(text.as_str())),
                        Some(text) => cap.buf.push_str(&text),
                        None => {
                            cap.buf.push('&');
                            cap.buf.push_str(&name);
                            cap.buf.push(';');
                        }
                    }
                }
            }
            XmlEvent::Eof => break,
            _ => {}
        }
    }

    if dialect.is_none() && parsed.malformed.is_none() {
        parsed.flag("document has no XML root element");
    }

    // An entry cut short by broken markup still counts if it got anywhere.
    if let Some(builder) = current.take() {
        let entry = builder.finish(base);
        if entry.title.is_some() || entry.link.is_some() {
            parsed.entries.push(entry);
        }
    }

    parsed
}
