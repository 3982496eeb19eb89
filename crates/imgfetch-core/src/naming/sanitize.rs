//! Filename sanitization for the output directory.

/// Characters replaced with `_` in addition to control characters.
const UNSAFE_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Byte cap so that `<name>.part` still fits the usual 255-byte file name limit.
const MAX_NAME_BYTES: usize = 255 - crate::storage::TEMP_SUFFIX.len();

/// Sanitizes a candidate filename so it can be joined directly onto the output directory.
///
/// - Drops directory components (anything up to the last `/` or `\`)
/// - Replaces `\ / * ? : " < > |` and control characters with `_`
/// - Trims surrounding whitespace; inner spaces are kept
/// - Truncates to `max_len` characters and to 250 bytes, keeping the extension
pub fn sanitize_filename(name: &str, max_len: usize) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if UNSAFE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    truncate_keeping_extension(cleaned.trim(), max_len)
}

fn truncate_keeping_extension(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len && name.len() <= MAX_NAME_BYTES {
        return name.to_string();
    }

    if let Some(dot) = name.rfind('.').filter(|&i| i > 0) {
        let ext = &name[dot..];
        let ext_len = ext.chars().count();
        if ext_len < max_len && ext.len() < MAX_NAME_BYTES {
            let stem = prefix_within(&name[..dot], max_len - ext_len, MAX_NAME_BYTES - ext.len());
            return format!("{stem}{ext}");
        }
    }

    prefix_within(name, max_len, MAX_NAME_BYTES).to_string()
}

/// Longest prefix of `s` with at most `max_chars` characters and `max_bytes` bytes.
fn prefix_within(s: &str, max_chars: usize, max_bytes: usize) -> &str {
    let end = s
        .char_indices()
        .take(max_chars)
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}
