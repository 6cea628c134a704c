//! Textual PO adapter.
//!
//! Reads and writes the standard gettext PO format: a header entry with
//! an empty msgid carrying metadata, then one block per message with
//! `#.` extraction comments, `#:` source references, `#,` flags, an
//! optional `msgctxt`, and `msgid`/`msgstr` pairs. Obsolete entries are
//! kept as `#~` blocks. Output order is deterministic: live entries
//! sorted by `(id, context)`, obsolete entries after them.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::catalog::{Catalog, CatalogMetadata};
use crate::entry::MessageEntry;
use crate::CatalogError;

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Drop obsolete entries from the output instead of writing `#~`
    /// blocks.
    pub ignore_obsolete: bool,
}

pub fn write_po<W: Write>(
    writer: W,
    catalog: &Catalog,
    opts: WriteOptions,
) -> Result<(), CatalogError> {
    let mut w = BufWriter::new(writer);
    write_header(&mut w, catalog)?;

    for entry in catalog.entries().filter(|e| !e.obsolete) {
        writeln!(w)?;
        write_entry(&mut w, entry, "")?;
    }

    if !opts.ignore_obsolete {
        for entry in catalog.entries().filter(|e| e.obsolete) {
            writeln!(w)?;
            write_entry(&mut w, entry, "#~ ")?;
        }
    }

    w.flush()?;
    Ok(())
}

pub fn write_po_file(path: &Path, catalog: &Catalog, opts: WriteOptions) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_po(File::create(path)?, catalog, opts)
}

fn write_header<W: Write>(w: &mut W, catalog: &Catalog) -> Result<(), CatalogError> {
    let meta = &catalog.metadata;
    let field = |v: &Option<String>| v.clone().unwrap_or_default();

    writeln!(w, "msgid \"\"")?;
    writeln!(w, "msgstr \"\"")?;
    writeln!(w, "\"Project-Id-Version: {}\\n\"", field(&meta.project))?;
    writeln!(w, "\"Report-Msgid-Bugs-To: {}\\n\"", field(&meta.maintainer))?;
    writeln!(w, "\"POT-Creation-Date: {}\\n\"", field(&meta.creation_date))?;
    writeln!(w, "\"PO-Revision-Date: {}\\n\"", field(&meta.revision_date))?;
    writeln!(w, "\"Last-Translator: {}\\n\"", field(&meta.maintainer))?;
    writeln!(w, "\"Language-Team: {}\\n\"", field(&meta.language_team))?;
    writeln!(
        w,
        "\"Language: {}\\n\"",
        catalog.locale.as_deref().unwrap_or("")
    )?;
    writeln!(w, "\"MIME-Version: 1.0\\n\"")?;
    writeln!(w, "\"Content-Type: text/plain; charset=utf-8\\n\"")?;
    writeln!(w, "\"Content-Transfer-Encoding: 8bit\\n\"")?;
    Ok(())
}

fn write_entry<W: Write>(w: &mut W, entry: &MessageEntry, prefix: &str) -> Result<(), CatalogError> {
    // gettext drops comments for obsolete entries; so do we.
    if prefix.is_empty() {
        for comment in &entry.comments {
            writeln!(w, "#. {comment}")?;
        }
        for (path, line) in &entry.locations {
            writeln!(w, "#: {path}:{line}")?;
        }
        if !entry.flags.is_empty() {
            let flags: Vec<&str> = entry.flags.iter().map(String::as_str).collect();
            writeln!(w, "#, {}", flags.join(", "))?;
        }
    }

    if let Some(ctx) = &entry.context {
        writeln!(w, "{prefix}msgctxt \"{}\"", escape(ctx))?;
    }
    writeln!(w, "{prefix}msgid \"{}\"", escape(&entry.id))?;
    writeln!(w, "{prefix}msgstr \"{}\"", escape(&entry.translation))?;
    Ok(())
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(s: &str, lineno: usize) -> Result<String, CatalogError> {
    let s = s.trim();
    if !s.starts_with('"') || !s.ends_with('"') || s.len() < 2 {
        return Err(CatalogError::PoParse {
            line: lineno,
            message: format!("expected quoted string, got `{s}`"),
        });
    }
    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Context,
    Id,
    Translation,
}

#[derive(Default)]
struct Block {
    comments: Vec<String>,
    locations: Vec<(String, u32)>,
    flags: Vec<String>,
    context: Option<String>,
    id: Option<String>,
    translation: Option<String>,
    obsolete: bool,
}

impl Block {
    fn is_empty(&self) -> bool {
        self.id.is_none() && self.context.is_none() && self.translation.is_none()
    }

    fn into_entry(self) -> Option<MessageEntry> {
        let id = self.id?;
        let mut entry = MessageEntry::new(id, self.context.as_deref());
        entry.translation = self.translation.unwrap_or_default();
        entry.locations = self.locations;
        entry.comments = self.comments;
        entry.flags = self.flags.into_iter().collect();
        entry.obsolete = self.obsolete;
        Some(entry)
    }
}

pub fn read_po<R: std::io::Read>(reader: R) -> Result<Catalog, CatalogError> {
    let reader = BufReader::new(reader);
    let mut catalog = Catalog::new(None);
    catalog.metadata = CatalogMetadata::default();
    let mut block = Block::default();
    let mut field = Field::None;
    let mut saw_header = false;

    fn flush(block: &mut Block, catalog: &mut Catalog, saw_header: &mut bool) {
        let done = std::mem::take(block);
        if done.is_empty() {
            return;
        }
        match done.into_entry() {
            Some(entry) if entry.id.is_empty() && entry.context.is_none() => {
                if !*saw_header {
                    apply_header(catalog, &entry.translation);
                    *saw_header = true;
                }
            }
            Some(entry) => catalog.insert(entry),
            None => {}
        }
    }

    for (idx, line) in reader.lines().enumerate() {
        let lineno = idx + 1;
        let raw = line?;
        let mut text = raw.trim();

        if text.is_empty() {
            flush(&mut block, &mut catalog, &mut saw_header);
            field = Field::None;
            continue;
        }

        let obsolete_line = text.starts_with("#~");
        if obsolete_line {
            text = text.trim_start_matches("#~").trim_start();
            // an obsolete line after a live block starts a new entry
            if !block.obsolete && !block.is_empty() {
                flush(&mut block, &mut catalog, &mut saw_header);
                field = Field::None;
            }
            block.obsolete = true;
        }

        if let Some(rest) = text.strip_prefix("#.") {
            block.comments.push(rest.trim().to_string());
            continue;
        }
        if let Some(rest) = text.strip_prefix("#:") {
            for reference in rest.split_whitespace() {
                block.locations.push(parse_location(reference));
            }
            continue;
        }
        if let Some(rest) = text.strip_prefix("#,") {
            block
                .flags
                .extend(rest.split(',').map(|f| f.trim().to_string()).filter(|f| !f.is_empty()));
            continue;
        }
        if text.starts_with('#') && !obsolete_line {
            // translator comments and anything else we do not model
            continue;
        }

        if let Some(rest) = text.strip_prefix("msgctxt") {
            block.context = Some(unescape(rest, lineno)?);
            field = Field::Context;
        } else if let Some(rest) = text.strip_prefix("msgid") {
            block.id = Some(unescape(rest, lineno)?);
            field = Field::Id;
        } else if let Some(rest) = text.strip_prefix("msgstr") {
            block.translation = Some(unescape(rest, lineno)?);
            field = Field::Translation;
        } else if text.starts_with('"') {
            let continued = unescape(text, lineno)?;
            match field {
                Field::Context => block.context.get_or_insert_with(String::new).push_str(&continued),
                Field::Id => block.id.get_or_insert_with(String::new).push_str(&continued),
                Field::Translation => block
                    .translation
                    .get_or_insert_with(String::new)
                    .push_str(&continued),
                Field::None => {
                    return Err(CatalogError::PoParse {
                        line: lineno,
                        message: "continuation line outside of an entry".into(),
                    })
                }
            }
        } else {
            return Err(CatalogError::PoParse {
                line: lineno,
                message: format!("unrecognized line `{text}`"),
            });
        }
    }

    flush(&mut block, &mut catalog, &mut saw_header);
    Ok(catalog)
}

/// Read a catalog file; a missing file yields `Ok(None)` so callers can
/// fall back to a fresh catalog.
pub fn read_po_file(path: &Path) -> Result<Option<Catalog>, CatalogError> {
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(read_po(File::open(path)?)?))
}

fn parse_location(reference: &str) -> (String, u32) {
    if let Some((path, line)) = reference.rsplit_once(':') {
        if let Ok(line) = line.parse::<u32>() {
            return (path.to_string(), line);
        }
    }
    (reference.to_string(), 1)
}

fn apply_header(catalog: &mut Catalog, header: &str) {
    let mut meta = CatalogMetadata::default();
    for line in header.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "Project-Id-Version" => meta.project = Some(value.to_string()),
            "Report-Msgid-Bugs-To" => meta.maintainer = Some(value.to_string()),
            "POT-Creation-Date" => meta.creation_date = Some(value.to_string()),
            "PO-Revision-Date" => meta.revision_date = Some(value.to_string()),
            "Language-Team" => meta.language_team = Some(value.to_string()),
            "Language" => catalog.locale = Some(value.to_string()),
            _ => {}
        }
    }
    catalog.metadata = meta;
}
