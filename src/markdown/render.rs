//! Markdown rendering with mention recognition

use super::inline::{segments, Segment};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Supplies link targets and attributes for mentions during rendering.
pub trait MentionLinker {
    /// Where a mention should link to, or `None` to leave it as text
    fn link(&self, token: &str) -> Option<String>;

    /// Extra attributes for the anchor of a linked mention.
    ///
    /// Only called for tokens `link` returned a target for.
    fn link_attributes(&self, token: &str) -> Vec<(String, String)>;
}

/// Output of a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Every mention token recognized, in order of appearance, duplicates kept
    pub mentions: Vec<String>,
}

/// Markdown to HTML renderer that recognizes `@handle` mentions.
///
/// Without a linker the renderer only discovers mentions and writes them
/// back as text. With one, mentions it can resolve become anchors.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    linkify: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self { linkify: true }
    }

    /// Whether bare URLs in text become links
    pub fn with_linkify(mut self, linkify: bool) -> Self {
        self.linkify = linkify;
        self
    }

    fn options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
    }

    /// Render `text`, resolving mentions through `linker` when given.
    pub fn render(&self, text: &str, linker: Option<&dyn MentionLinker>) -> Rendered {
        let mut writer = EventWriter {
            linkify: self.linkify,
            linker,
            events: Vec::new(),
            mentions: Vec::new(),
        };

        let mut pending = String::new();
        // Links, images and code blocks: text inside is left alone
        let mut opaque_depth: usize = 0;

        for event in Parser::new_ext(text, Self::options()) {
            if let Event::Text(t) = event {
                // pulldown-cmark splits runs at delimiter candidates
                pending.push_str(&t);
                continue;
            }

            writer.flush_text(&mut pending, opaque_depth > 0);
            // Raw HTML from the author is written back as escaped text and
            // never scanned; only markup this renderer produces is emitted raw.
            let event = match event {
                Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
                other => other,
            };
            match &event {
                Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                    opaque_depth += 1;
                }
                Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                    opaque_depth = opaque_depth.saturating_sub(1);
                }
                _ => {}
            }
            writer.events.push(event);
        }
        writer.flush_text(&mut pending, opaque_depth > 0);

        let mut html_out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut html_out, writer.events.into_iter());
        Rendered {
            html: html_out,
            mentions: writer.mentions,
        }
    }
}

struct EventWriter<'l, 'a> {
    linkify: bool,
    linker: Option<&'l dyn MentionLinker>,
    events: Vec<Event<'a>>,
    mentions: Vec<String>,
}

impl<'l, 'a> EventWriter<'l, 'a> {
    fn flush_text(&mut self, pending: &mut String, opaque: bool) {
        if pending.is_empty() {
            return;
        }
        let run = std::mem::take(pending);
        if opaque {
            self.events.push(Event::Text(CowStr::from(run)));
            return;
        }

        for segment in segments(&run, self.linkify) {
            let event = match segment {
                Segment::Text(t) => Event::Text(CowStr::from(t.to_string())),
                Segment::Url(url) => Event::Html(CowStr::from(anchor(&url_href(url), &[], url))),
                Segment::Mention { raw, token } => {
                    self.mentions.push(token.to_string());
                    match self.linker.and_then(|l| l.link(token).map(|href| (l, href))) {
                        Some((linker, href)) => {
                            let attrs = linker.link_attributes(token);
                            Event::Html(CowStr::from(anchor(&href, &attrs, raw)))
                        }
                        None => Event::Text(CowStr::from(raw.to_string())),
                    }
                }
            };
            self.events.push(event);
        }
    }
}

/// Link target for linkified text; scheme-less `www.` hosts get `http://`
fn url_href(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

fn anchor(href: &str, attrs: &[(String, String)], text: &str) -> String {
    let mut out = format!("<a href=\"{}\"", escape_html(href));
    for (name, value) in attrs {
        out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
    }
    out.push('>');
    out.push_str(&escape_html(text));
    out.push_str("</a>");
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
