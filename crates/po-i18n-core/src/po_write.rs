use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::catalog::Catalog;
use crate::translation::TranslationEntry;

pub fn write_po(catalog: &Catalog) -> String {
    let mut out = String::new();
    if let Some(header) = catalog.translations().get("") {
        write_entry(&mut out, None, header);
    }
    for (id, entry) in catalog.translations() {
        if !id.is_empty() {
            write_entry(&mut out, None, entry);
        }
    }
    for (context, entries) in catalog.contexts() {
        for entry in entries.values() {
            write_entry(&mut out, Some(context), entry);
        }
    }
    out
}

fn write_entry(out: &mut String, context: Option<&str>, entry: &TranslationEntry) {
    if !out.is_empty() {
        out.push('\n');
    }
    if let Some(context) = context {
        write_field(out, "msgctxt", context);
    }
    write_field(out, "msgid", entry.id());
    let indexed = !entry.plural_id().is_empty() || entry.forms().keys().any(|index| *index != 0);
    if !entry.plural_id().is_empty() {
        write_field(out, "msgid_plural", entry.plural_id());
    }
    if !indexed {
        let text = entry.forms().get(&0).map(String::as_str).unwrap_or_default();
        write_field(out, "msgstr", text);
    } else if entry.forms().is_empty() {
        write_field(out, "msgstr[0]", "");
    } else {
        for (index, text) in entry.forms() {
            write_field(out, &format!("msgstr[{index}]"), text);
        }
    }
}

// Text spanning several lines is written one quoted line per source line,
// the way msgmerge lays out header blocks.
fn write_field(out: &mut String, keyword: &str, text: &str) {
    out.push_str(keyword);
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    if lines.len() > 1 {
        out.push_str(" \"\"\n");
        for line in lines {
            out.push_str(&quote(line));
            out.push('\n');
        }
    } else {
        out.push(' ');
        out.push_str(&quote(text));
        out.push('\n');
    }
}

pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            ch if ch.is_ascii_control() => out.push_str(&format!("\\{:03o}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}
