extern crate regex;

use log::debug;
use regex::{Captures, Regex};

pub(super) struct Markup {
    br: Regex,
    br_close: Regex,
    tag: Regex,
    entity: Regex,
    span: Regex,
    pre: Regex,
    inline_input: Regex,
    inline_output: Regex,
    heading: Regex,
}

enum Half {
    Input,
    Output,
}

impl Markup {
    pub(super) fn new() -> Self {
        Self {
            br: Regex::new(r"(?i)<br\s*/?>").unwrap(),
            br_close: Regex::new(r"(?i)</br\s*>").unwrap(),
            tag: Regex::new(r"<[^<]+?>").unwrap(),
            entity: Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap(),
            span: Regex::new(r"(?is)<span(?:\s[^>]*)?>(.*?)</span>").unwrap(),
            pre: Regex::new(r"(?is)<pre(?:\s[^>]*)?>(.*?)</pre>").unwrap(),
            inline_input: Regex::new(
                r"(?is)<(?:b|strong)>\s*(?:sample\s+|example\s+)?input[^<]*</(?:b|strong)>\s*:?",
            )
            .unwrap(),
            inline_output: Regex::new(
                r"(?is)<(?:b|strong)>\s*(?:sample\s+|example\s+)?output[^<]*</(?:b|strong)>\s*:?",
            )
            .unwrap(),
            heading: Regex::new(
                r"(?is)<(b|strong|h[1-6])(?:\s[^>]*)?>(.*?)</(?:b|strong|h[1-6])>",
            )
            .unwrap(),
        }
    }

    /// Line-break markup has to become newlines before tags are stripped.
    pub(super) fn normalize_breaks(&self, html: &str) -> String {
        let html = self.br.replace_all(html, "\n");
        self.br_close.replace_all(&html, "").into_owned()
    }
    pub(super) fn strip_tags(&self, html: &str) -> String {
        self.tag.replace_all(html, "").into_owned()
    }
    pub(super) fn decode_entities(&self, text: &str) -> String {
        self.entity
            .replace_all(text, |cap: &Captures| {
                let name = &cap[1];
                let decoded = if let Some(hex) = name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                {
                    u32::from_str_radix(hex, 16).ok().and_then(std::char::from_u32)
                } else if let Some(dec) = name.strip_prefix('#') {
                    dec.parse::<u32>().ok().and_then(std::char::from_u32)
                } else {
                    match name {
                        "lt" => Some('<'),
                        "gt" => Some('>'),
                        "amp" => Some('&'),
                        "quot" => Some('"'),
                        "apos" => Some('\''),
                        "nbsp" => Some(' '),
                        _ => None,
                    }
                };
                decoded.map_or_else(|| cap[0].to_string(), |c| c.to_string())
            })
            .into_owned()
    }
    pub(super) fn to_text(&self, fragment: &str) -> String {
        self.decode_entities(&self.strip_tags(&self.normalize_breaks(fragment)))
    }

    /// One line per `<span>`, used when a block is made of per-line spans.
    pub(super) fn span_lines(&self, fragment: &str) -> Option<String> {
        let lines: Vec<String> = self
            .span
            .captures_iter(fragment)
            .map(|c| self.to_text(&c[1]))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn preceding_marker(&self, gap: &str) -> Option<Half> {
        self.heading
            .captures_iter(gap)
            .filter_map(|c| {
                let text = self.strip_tags(&c[2]).to_lowercase();
                if text.contains("input") {
                    Some(Half::Input)
                } else if text.contains("output") {
                    Some(Half::Output)
                } else {
                    None
                }
            })
            .last()
    }

    /// Splits `<pre>` blocks into input/output pairs using bold or heading
    /// markers, falling back to block position when there is no marker.
    pub(super) fn split_marked(&self, html: &str) -> Vec<(String, String)> {
        let mut ret = Vec::new();
        let mut pending: Option<String> = None;
        let mut last_end = 0;
        for cap in self.pre.captures_iter(html) {
            let (whole, body) = match (cap.get(0), cap.get(1)) {
                (Some(w), Some(b)) => (w, b.as_str()),
                _ => continue,
            };
            let gap = &html[last_end..whole.start()];
            last_end = whole.end();

            let input = self.inline_input.find(body);
            let output = self.inline_output.find(body);
            match (input, output) {
                (Some(i), Some(o)) if i.end() <= o.start() => {
                    pending = None;
                    ret.push((
                        clean_blob(&self.to_text(&body[i.end()..o.start()])),
                        clean_blob(&self.to_text(&body[o.end()..])),
                    ));
                }
                (Some(i), None) => {
                    replace_pending(&mut pending, clean_blob(&self.to_text(&body[i.end()..])))
                }
                (_, Some(o)) => {
                    let text = clean_blob(&self.to_text(&body[o.end()..]));
                    match pending.take() {
                        Some(inp) => ret.push((inp, text)),
                        None => debug!("Dropping sample output without input"),
                    }
                }
                (None, None) => {
                    let text = clean_blob(&self.to_text(body));
                    match (self.preceding_marker(gap), pending.take()) {
                        (Some(Half::Output), Some(inp)) => ret.push((inp, text)),
                        (Some(Half::Output), None) => {
                            debug!("Dropping sample output without input")
                        }
                        (Some(Half::Input), prev) => {
                            pending = prev;
                            replace_pending(&mut pending, text)
                        }
                        (None, Some(inp)) => ret.push((inp, text)),
                        (None, None) => pending = Some(text),
                    }
                }
            }
        }
        if pending.is_some() {
            debug!("Dropping trailing sample input without output");
        }
        ret
    }
}

fn replace_pending(pending: &mut Option<String>, input: String) {
    if pending.replace(input).is_some() {
        debug!("Dropping sample input without matching output");
    }
}

/// Trimmed blob ending with a single newline; empty stays empty.
pub(super) fn clean_blob(text: &str) -> String {
    let trimmed = text.trim_matches(|c: char| c == '\n' || c == '\r' || c == ' ' || c == '\t');
    if trimmed.is_empty() {
        String::new()
    } else {
        let mut ret = trimmed.replace("\r\n", "\n");
        ret.push('\n');
        ret
    }
}

pub(super) fn search_all(text: &str, regex: &Regex) -> Vec<String> {
    regex
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_owned()))
        .collect()
}
