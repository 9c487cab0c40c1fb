//! Inline scanning of text runs for mentions and bare URLs
//!
//! pulldown-cmark knows neither, so each merged text run is split into
//! segments here before being written out.

/// A piece of a text run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// `raw` is the source text including the sigil, `token` is without it
    Mention { raw: &'a str, token: &'a str },
    Url(&'a str),
}

const URL_SCHEMES: [&str; 2] = ["https://", "http://"];
/// Scheme-less prefix that still starts a bare URL
const WWW_PREFIX: &str = "www.";

fn is_local_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_host_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-')
}

/// Characters after which an `@` does not start a mention, nor a URL begin
fn blocks_mention(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '@' | '/' | '.')
}

fn is_trailing_punct(c: char) -> bool {
    matches!(c, '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"')
}

/// Drop trailing punctuation from a URL candidate. A closing paren stays
/// while it balances an opening one inside the URL.
fn trim_url_end(url: &str) -> &str {
    let mut url = url;
    loop {
        match url.chars().next_back() {
            Some(c) if is_trailing_punct(c) => url = &url[..url.len() - c.len_utf8()],
            Some(')') if url.matches(')').count() > url.matches('(').count() => {
                url = &url[..url.len() - 1];
            }
            _ => return url,
        }
    }
}

/// Length of the host part of `user@host`, requiring at least two labels
fn scan_host(s: &str) -> Option<usize> {
    let mut labels = 0;
    let mut label_len = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        if is_host_char(c) {
            label_len += 1;
            end = idx + c.len_utf8();
        } else if c == '.' && label_len > 0 {
            labels += 1;
            label_len = 0;
        } else {
            break;
        }
    }
    if label_len > 0 {
        labels += 1;
    }
    (labels >= 2).then_some(end)
}

/// Length of the handle following an `@` sigil, if one is there
fn scan_handle(s: &str) -> Option<usize> {
    let local = s
        .char_indices()
        .find(|&(_, c)| !is_local_char(c))
        .map_or(s.len(), |(idx, _)| idx);
    let local = s[..local].trim_end_matches('.').len();
    if local == 0 {
        return None;
    }

    let rest = &s[local..];
    match rest.strip_prefix('@') {
        Some(host) => scan_host(host).map(|len| local + 1 + len),
        None => Some(local),
    }
}

/// Length of a bare URL at the start of `s`: `http(s)://...` or `www.host...`
fn scan_url(s: &str) -> Option<usize> {
    let prefix = match URL_SCHEMES.iter().find(|scheme| s.starts_with(*scheme)) {
        Some(scheme) => scheme.len(),
        None if s.starts_with(WWW_PREFIX) && scan_host(&s[WWW_PREFIX.len()..]).is_some() => {
            WWW_PREFIX.len()
        }
        None => return None,
    };
    let end = s
        .char_indices()
        .find(|&(_, c)| c.is_whitespace() || matches!(c, '<' | '>' | '"'))
        .map_or(s.len(), |(idx, _)| idx);
    let end = trim_url_end(&s[..end]).len();
    (end > prefix).then_some(end)
}

/// Split a text run into plain text, mentions and (when `linkify`) URLs.
pub fn segments(text: &str, linkify: bool) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut prev: Option<char> = None;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let Some(c) = rest.chars().next() else { break };
        let at_boundary = !prev.is_some_and(blocks_mention);

        let found = if linkify && at_boundary && matches!(c, 'h' | 'w') {
            scan_url(rest).map(|len| (len, Segment::Url(&rest[..len])))
        } else if c == '@' && at_boundary {
            scan_handle(&rest[1..]).map(|len| {
                (
                    len + 1,
                    Segment::Mention {
                        raw: &rest[..len + 1],
                        token: &rest[1..len + 1],
                    },
                )
            })
        } else {
            None
        };

        match found {
            Some((len, segment)) => {
                if plain_start < pos {
                    out.push(Segment::Text(&text[plain_start..pos]));
                }
                out.push(segment);
                pos += len;
                plain_start = pos;
                prev = text[..pos].chars().next_back();
            }
            None => {
                pos += c.len_utf8();
                prev = Some(c);
            }
        }
    }

    if plain_start < text.len() {
        out.push(Segment::Text(&text[plain_start..]));
    }
    out
}
