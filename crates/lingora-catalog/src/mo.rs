//! Compiled MO adapter.
//!
//! Standard GNU MO layout: magic, revision, entry count, two
//! `(length, offset)` tables for keys and values, then the string pool.
//! Context-qualified keys are encoded as `context\x04id`. The hash table
//! size is written as zero, which the format allows; lookups go through
//! the sorted key table.
//!
//! Compilation is deterministic: the same catalog always produces
//! byte-identical output, because entries are emitted sorted by key.
//! The MO file is a derived artifact; the PO file stays authoritative.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::catalog::Catalog;
use crate::CatalogError;

const MO_MAGIC: u32 = 0x950412de;
/// Separator between context and id inside an MO key, per gettext.
pub const CONTEXT_SEPARATOR: char = '\x04';

fn mo_key(context: Option<&str>, id: &str) -> String {
    match context {
        Some(ctx) => format!("{ctx}{CONTEXT_SEPARATOR}{id}"),
        None => id.to_string(),
    }
}

fn header_value(catalog: &Catalog) -> String {
    let meta = &catalog.metadata;
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    format!(
        "Project-Id-Version: {}\n\
         POT-Creation-Date: {}\n\
         PO-Revision-Date: {}\n\
         Language: {}\n\
         MIME-Version: 1.0\n\
         Content-Type: text/plain; charset=utf-8\n\
         Content-Transfer-Encoding: 8bit\n",
        field(&meta.project),
        field(&meta.creation_date),
        field(&meta.revision_date),
        catalog.locale.as_deref().unwrap_or(""),
    )
}

/// Compile a catalog to MO bytes.
///
/// Untranslated, fuzzy and obsolete entries are left out; a runtime miss
/// falls back to the original message anyway.
pub fn compile(catalog: &Catalog) -> Vec<u8> {
    let mut pairs: Vec<(String, String)> = vec![(String::new(), header_value(catalog))];
    pairs.extend(
        catalog
            .entries()
            .filter(|e| e.is_translated() && !e.is_fuzzy() && !e.obsolete)
            .map(|e| (mo_key(e.context.as_deref(), &e.id), e.translation.clone())),
    );
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let n = pairs.len() as u32;
    let key_table_offset = 28u32;
    let value_table_offset = key_table_offset + n * 8;
    let pool_offset = value_table_offset + n * 8;

    let mut key_pool: Vec<u8> = Vec::new();
    let mut value_pool: Vec<u8> = Vec::new();
    let mut key_table: Vec<u8> = Vec::new();
    let mut value_table: Vec<u8> = Vec::new();

    for (key, _) in &pairs {
        key_table.extend((key.len() as u32).to_le_bytes());
        key_table.extend((pool_offset + key_pool.len() as u32).to_le_bytes());
        key_pool.extend(key.as_bytes());
        key_pool.push(0);
    }
    let value_pool_offset = pool_offset + key_pool.len() as u32;
    for (_, value) in &pairs {
        value_table.extend((value.len() as u32).to_le_bytes());
        value_table.extend((value_pool_offset + value_pool.len() as u32).to_le_bytes());
        value_pool.extend(value.as_bytes());
        value_pool.push(0);
    }

    let mut out = Vec::with_capacity(28 + key_table.len() + value_table.len() + key_pool.len() + value_pool.len());
    out.extend(MO_MAGIC.to_le_bytes());
    out.extend(0u32.to_le_bytes()); // format revision
    out.extend(n.to_le_bytes());
    out.extend(key_table_offset.to_le_bytes());
    out.extend(value_table_offset.to_le_bytes());
    out.extend(0u32.to_le_bytes()); // hash table size
    out.extend(0u32.to_le_bytes()); // hash table offset
    out.extend(key_table);
    out.extend(value_table);
    out.extend(key_pool);
    out.extend(value_pool);
    out
}

pub fn write_mo_file(path: &Path, catalog: &Catalog) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut f = File::create(path)?;
    f.write_all(&compile(catalog))?;
    Ok(())
}

/// A loaded compiled catalog: a flat lookup table from MO key to
/// translated string. Cheap to query, disposable, rebuilt from the PO.
#[derive(Debug, Clone, Default)]
pub struct CompiledCatalog {
    entries: HashMap<String, String>,
}

impl CompiledCatalog {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Context-free lookup.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Context-qualified lookup.
    pub fn lookup_with_context(&self, context: &str, id: &str) -> Option<&str> {
        self.entries.get(&mo_key(Some(context), id)).map(String::as_str)
    }

    /// All entries as `(context, id, translation)`.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &str, &str)> {
        self.entries.iter().map(|(key, value)| {
            match key.split_once(CONTEXT_SEPARATOR) {
                Some((ctx, id)) => (Some(ctx), id, value.as_str()),
                None => (None, key.as_str(), value.as_str()),
            }
        })
    }

    pub fn parse(data: &[u8]) -> Result<Self, CatalogError> {
        let read_u32 = |offset: usize, le: bool| -> Result<u32, CatalogError> {
            let bytes: [u8; 4] = data
                .get(offset..offset + 4)
                .and_then(|s| s.try_into().ok())
                .ok_or_else(|| CatalogError::Mo("truncated header".into()))?;
            Ok(if le {
                u32::from_le_bytes(bytes)
            } else {
                u32::from_be_bytes(bytes)
            })
        };

        let le = match read_u32(0, true)? {
            MO_MAGIC => true,
            m if m == MO_MAGIC.swap_bytes() => false,
            other => return Err(CatalogError::Mo(format!("bad magic {other:#010x}"))),
        };
        let revision = read_u32(4, le)?;
        if revision >> 16 > 1 {
            return Err(CatalogError::Mo(format!("unsupported revision {revision}")));
        }
        let count = read_u32(8, le)? as usize;
        let key_table = read_u32(12, le)? as usize;
        let value_table = read_u32(16, le)? as usize;

        let read_str = |table: usize, index: usize| -> Result<String, CatalogError> {
            let len = read_u32(table + index * 8, le)? as usize;
            let offset = read_u32(table + index * 8 + 4, le)? as usize;
            let bytes = data
                .get(offset..offset + len)
                .ok_or_else(|| CatalogError::Mo("string out of bounds".into()))?;
            String::from_utf8(bytes.to_vec())
                .map_err(|_| CatalogError::Mo("string is not valid UTF-8".into()))
        };

        let mut entries = HashMap::with_capacity(count.saturating_sub(1));
        for i in 0..count {
            let key = read_str(key_table, i)?;
            if key.is_empty() {
                continue; // metadata entry
            }
            let value = read_str(value_table, i)?;
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let mut data = Vec::new();
        File::open(path)?.read_to_end(&mut data)?;
        Self::parse(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::entry::MessageEntry;

    fn sample() -> Catalog {
        let mut cat = Catalog::new(Some("de"));
        cat.add("Submit", None, &[], &[]);
        cat.get_mut("Submit", None).unwrap().translation = "Absenden".into();
        cat.add("May", Some("month"), &[], &[]);
        cat.get_mut("May", Some("month")).unwrap().translation = "Mai".into();
        cat.add("Untranslated", None, &[], &[]);

        let mut fuzzy = MessageEntry::new("Draft", None);
        fuzzy.translation = "Entwurf".into();
        fuzzy.flags.insert("fuzzy".into());
        cat.insert(fuzzy);

        cat
    }

    #[test]
    fn compilation_is_deterministic() {
        let cat = sample();
        assert_eq!(compile(&cat), compile(&cat));
    }

    #[test]
    fn round_trip_lookup() {
        let cat = sample();
        let compiled = CompiledCatalog::parse(&compile(&cat)).unwrap();

        assert_eq!(compiled.lookup("Submit"), Some("Absenden"));
        assert_eq!(compiled.lookup_with_context("month", "May"), Some("Mai"));
        assert_eq!(compiled.lookup("May"), None);
        // untranslated and fuzzy entries are not compiled
        assert_eq!(compiled.lookup("Untranslated"), None);
        assert_eq!(compiled.lookup("Draft"), None);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(CompiledCatalog::parse(b"not a catalog").is_err());
        let mut data = compile(&sample());
        data.truncate(20);
        assert!(CompiledCatalog::parse(&data).is_err());
    }

    #[test]
    fn magic_is_gettext_compatible() {
        let data = compile(&sample());
        assert_eq!(&data[..4], &[0xde, 0x12, 0x04, 0x95]);
    }
}
