use alloc::string::String;
use alloc::vec::Vec;

use crate::translation::TranslationEntry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedEntry {
    pub context: Option<String>,
    pub entry: TranslationEntry,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedCatalog {
    pub entries: Vec<ParsedEntry>,
    // Lines such as msgstr[x] with a non-numeric index.
    pub skipped: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Header,
    Context,
    Id,
    PluralId,
    Str(usize),
    Skip,
}

struct Pending {
    context: Option<String>,
    entry: TranslationEntry,
    has_id: bool,
}

impl Pending {
    fn new(context: Option<String>) -> Self {
        Self {
            context,
            entry: TranslationEntry::default(),
            has_id: false,
        }
    }
}

pub fn parse_po(input: &str) -> ParsedCatalog {
    let mut parser = PoParser {
        output: ParsedCatalog::default(),
        pending: Pending::new(None),
        state: State::Header,
    };
    for line in input.lines() {
        parser.parse_line(line.trim());
    }
    parser.flush();
    parser.output
}

struct PoParser {
    output: ParsedCatalog,
    pending: Pending,
    state: State,
}

impl PoParser {
    fn parse_line(&mut self, line: &str) {
        if line.is_empty() || line.starts_with('#') {
            return;
        }
        if let Some(rest) = line.strip_prefix("msgctxt") {
            self.flush();
            match unquote(rest) {
                Some(context) => {
                    self.pending = Pending::new(Some(context));
                    self.state = State::Context;
                }
                None => self.skip(),
            }
        } else if let Some(rest) = line.strip_prefix("msgid_plural") {
            match unquote(rest) {
                Some(plural) if self.pending.has_id => {
                    *self.pending.entry.plural_id_mut() = plural;
                    self.state = State::PluralId;
                }
                _ => self.skip(),
            }
        } else if let Some(rest) = line.strip_prefix("msgid") {
            if self.pending.has_id {
                self.flush();
            }
            match unquote(rest) {
                Some(id) => {
                    *self.pending.entry.id_mut() = id;
                    self.pending.has_id = true;
                    self.state = State::Id;
                }
                None => self.skip(),
            }
        } else if let Some(rest) = line.strip_prefix("msgstr") {
            self.parse_msgstr(rest.trim_start());
        } else if line.starts_with('"') {
            self.parse_continuation(line);
        }
    }

    fn parse_msgstr(&mut self, rest: &str) {
        if !self.pending.has_id {
            self.skip();
            return;
        }
        let (index, text) = match rest.strip_prefix('[') {
            Some(indexed) => {
                let Some((index, text)) = indexed.split_once(']') else {
                    self.skip();
                    return;
                };
                let Ok(index) = index.trim().parse::<usize>() else {
                    self.skip();
                    return;
                };
                (index, text)
            }
            None => (0, rest),
        };
        match unquote(text) {
            Some(text) => {
                *self.pending.entry.form_mut(index) = text;
                self.state = State::Str(index);
            }
            None => self.skip(),
        }
    }

    fn parse_continuation(&mut self, line: &str) {
        let Some(text) = unquote(line) else {
            self.output.skipped += 1;
            return;
        };
        let target = match self.state {
            State::Context => self.pending.context.get_or_insert_with(String::new),
            State::Id => self.pending.entry.id_mut(),
            State::PluralId => self.pending.entry.plural_id_mut(),
            State::Str(index) => self.pending.entry.form_mut(index),
            State::Header | State::Skip => return,
        };
        target.push_str(&text);
    }

    fn skip(&mut self) {
        self.output.skipped += 1;
        self.state = State::Skip;
    }

    fn flush(&mut self) {
        let pending = core::mem::replace(&mut self.pending, Pending::new(None));
        if pending.has_id {
            self.output.entries.push(ParsedEntry {
                context: pending.context,
                entry: pending.entry,
            });
        }
    }
}

pub fn unquote(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    let bytes = inner.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let byte = bytes[idx];
        idx += 1;
        if byte != b'\\' {
            out.push(byte);
            continue;
        }
        let escape = *bytes.get(idx)?;
        idx += 1;
        match escape {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'"' | b'\\' | b'\'' | b'?' => out.push(escape),
            b'0'..=b'7' => {
                let mut value = u32::from(escape - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match bytes.get(idx) {
                        Some(digit @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(digit - b'0');
                            idx += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                out.push(u8::try_from(value).ok()?);
            }
            b'x' => {
                let mut value: u32 = 0;
                let mut digits = 0;
                while let Some(digit) = bytes.get(idx).and_then(|b| (*b as char).to_digit(16)) {
                    value = value * 16 + digit;
                    idx += 1;
                    digits += 1;
                    if digits == 2 {
                        break;
                    }
                }
                if digits == 0 {
                    return None;
                }
                out.push(u8::try_from(value).ok()?);
            }
            _ => return None,
        }
    }
    Some(String::from_utf8_lossy(&out).into_owned())
}
