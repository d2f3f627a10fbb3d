use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use ringchart::SymbolName;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ICON_SIZE: i32 = 128;

pub fn find_icon_path(symbol: &SymbolName) -> Option<PathBuf> {
    if symbol.is_empty() {
        return None;
    }

    let path = Path::new(symbol.as_str());
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }

    lookup(symbol.as_str())
        .with_size(ICON_SIZE as u16)
        .with_scale(1)
        .find()
}

/// Decoded symbol images, keyed by symbol. Misses are cached too so a missing
/// icon is only looked up once.
#[derive(Default)]
pub struct IconCache {
    entries: HashMap<SymbolName, Option<Pixbuf>>,
}

impl IconCache {
    pub fn get(&mut self, symbol: &SymbolName) -> Option<&Pixbuf> {
        self.entries
            .entry(symbol.clone())
            .or_insert_with(|| load_icon(symbol))
            .as_ref()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn load_icon(symbol: &SymbolName) -> Option<Pixbuf> {
    let path = find_icon_path(symbol)?;
    Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
        .inspect_err(|e| log::warn!("Failed to load icon '{}': {}", symbol, e))
        .ok()
}
