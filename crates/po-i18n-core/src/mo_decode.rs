use alloc::string::String;

use crate::po_parse::{ParsedCatalog, ParsedEntry};
use crate::translation::TranslationEntry;
use crate::{CoreError, CoreResult};

const MAGIC: u32 = 0x9504_12de;
const MAGIC_SWAPPED: u32 = 0xde12_0495;
const HEADER_LEN: usize = 28;
const CONTEXT_SEPARATOR: char = '\u{4}';
const PLURAL_SEPARATOR: char = '\0';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

pub fn decode_mo(input: &[u8]) -> CoreResult<ParsedCatalog> {
    if input.len() < HEADER_LEN {
        return Err(CoreError::MalformedMo("header truncated"));
    }
    let mut cursor = 0usize;
    let order = match read_u32(input, &mut cursor, ByteOrder::Little)? {
        MAGIC => ByteOrder::Little,
        MAGIC_SWAPPED => ByteOrder::Big,
        _ => return Err(CoreError::MalformedMo("magic mismatch")),
    };
    let revision = read_u32(input, &mut cursor, order)?;
    if revision >> 16 > 1 {
        return Err(CoreError::UnsupportedMoRevision(revision >> 16));
    }
    let count = read_u32(input, &mut cursor, order)? as usize;
    let originals = read_u32(input, &mut cursor, order)? as usize;
    let translations = read_u32(input, &mut cursor, order)? as usize;

    let mut output = ParsedCatalog::default();
    for idx in 0..count {
        let original = read_table_string(input, originals, idx, order)?;
        let translated = read_table_string(input, translations, idx, order)?;
        output.entries.push(decode_entry(original, translated));
    }
    Ok(output)
}

fn decode_entry(original: &str, translated: &str) -> ParsedEntry {
    let (context, key) = match original.split_once(CONTEXT_SEPARATOR) {
        Some((context, key)) => (Some(String::from(context)), key),
        None => (None, original),
    };
    let mut entry = match key.split_once(PLURAL_SEPARATOR) {
        Some((id, plural)) => TranslationEntry::with_plural(id, plural),
        None => TranslationEntry::new(key),
    };
    if entry.plural_id().is_empty() {
        entry.set(translated);
    } else {
        for (index, form) in translated.split(PLURAL_SEPARATOR).enumerate() {
            entry.set_n(index, form);
        }
    }
    ParsedEntry { context, entry }
}

fn read_table_string(
    input: &[u8],
    table: usize,
    idx: usize,
    order: ByteOrder,
) -> CoreResult<&str> {
    let mut cursor = idx
        .checked_mul(8)
        .and_then(|offset| offset.checked_add(table))
        .ok_or(CoreError::MalformedMo("table out of bounds"))?;
    let len = read_u32(input, &mut cursor, order)? as usize;
    let start = read_u32(input, &mut cursor, order)? as usize;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= input.len())
        .ok_or(CoreError::MalformedMo("string out of bounds"))?;
    core::str::from_utf8(&input[start..end])
        .map_err(|_| CoreError::MalformedMo("string invalid utf8"))
}

fn read_u32(input: &[u8], cursor: &mut usize, order: ByteOrder) -> CoreResult<u32> {
    let end = *cursor + 4;
    if end > input.len() {
        return Err(CoreError::MalformedMo("unexpected eof"));
    }
    let bytes = [
        input[*cursor],
        input[*cursor + 1],
        input[*cursor + 2],
        input[*cursor + 3],
    ];
    *cursor = end;
    Ok(match order {
        ByteOrder::Little => u32::from_le_bytes(bytes),
        ByteOrder::Big => u32::from_be_bytes(bytes),
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{HEADER_LEN, MAGIC, decode_mo};
    use crate::CoreError;

    // Writes a little-endian MO file without a hash table.
    fn encode_mo(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut sorted: Vec<&(&str, &str)> = entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let count = sorted.len() as u32;
        let originals = HEADER_LEN as u32;
        let translations = originals + count * 8;
        let mut data_offset = translations + count * 8;

        let mut bytes = Vec::new();
        for value in [MAGIC, 0, count, originals, translations, 0, 0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let mut data = Vec::new();
        let mut tables = [Vec::new(), Vec::new()];
        for (table, pick) in tables.iter_mut().zip([0usize, 1]) {
            for entry in &sorted {
                let text = if pick == 0 { entry.0 } else { entry.1 };
                table.extend_from_slice(&(text.len() as u32).to_le_bytes());
                table.extend_from_slice(&data_offset.to_le_bytes());
                data.extend_from_slice(text.as_bytes());
                data.push(0);
                data_offset += text.len() as u32 + 1;
            }
        }
        bytes.extend_from_slice(&tables[0]);
        bytes.extend_from_slice(&tables[1]);
        bytes.extend_from_slice(&data);
        bytes
    }

    #[test]
    fn decodes_plain_plural_and_context_messages() {
        let bytes = encode_mo(&[
            ("", "Language: de\nPlural-Forms: nplurals=2; plural=(n != 1);\n"),
            ("My text", "Mein Text"),
            ("apple\0apples", "Apfel\0Äpfel"),
            ("Ctx\u{4}Open", "Öffnen"),
        ]);
        let parsed = decode_mo(&bytes).expect("decode");
        assert_eq!(parsed.entries.len(), 4);

        let apple = parsed
            .entries
            .iter()
            .find(|parsed| parsed.entry.id() == "apple")
            .expect("apple");
        assert_eq!(apple.entry.plural_id(), "apples");
        assert_eq!(apple.entry.get_n(1), "Äpfel");

        let open = parsed
            .entries
            .iter()
            .find(|parsed| parsed.entry.id() == "Open")
            .expect("open");
        assert_eq!(open.context.as_deref(), Some("Ctx"));
        assert_eq!(open.entry.get(), "Öffnen");
    }

    #[test]
    fn decodes_big_endian_header() {
        let mut bytes = Vec::new();
        for value in [0x9504_12deu32, 0, 0, 28, 28, 0, 0] {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
        let parsed = decode_mo(&bytes).expect("decode");
        assert!(parsed.entries.is_empty());
    }

    #[test]
    fn rejects_bad_magic() {
        let err = decode_mo(&[0u8; 28]).expect_err("magic");
        assert_eq!(err, CoreError::MalformedMo("magic mismatch"));
    }

    #[test]
    fn rejects_future_major_revision() {
        let mut bytes = encode_mo(&[("a", "b")]);
        bytes[4..8].copy_from_slice(&0x0002_0000u32.to_le_bytes());
        let err = decode_mo(&bytes).expect_err("revision");
        assert_eq!(err, CoreError::UnsupportedMoRevision(2));
    }

    #[test]
    fn rejects_out_of_bounds_strings() {
        let mut bytes = encode_mo(&[("a", "b")]);
        bytes.truncate(bytes.len() - 3);
        let err = decode_mo(&bytes).expect_err("bounds");
        assert_eq!(err, CoreError::MalformedMo("string out of bounds"));
    }
}
