#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod cache;
mod sheet;

use std::collections::BTreeMap;
use std::io::Cursor;

use anyhow::Result;
use calamine::{Reader, Xlsx};

pub use cache::WorkbookCache;
pub use sheet::{Sheet, Value};

/// Every sheet of a parsed workbook, keyed by sheet name. This layer knows
/// nothing about what the sheets mean; callers look up the names they care
/// about and handle absence themselves.
pub struct Workbook {
    pub sheets: BTreeMap<String, Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }
}

pub fn load_workbook<R: std::io::Read + std::io::Seek>(reader: R) -> Result<Workbook> {
    let mut xlsx: Xlsx<_> = Xlsx::new(reader).map_err(|err| anyhow!("not a workbook: {err}"))?;

    let mut sheets = BTreeMap::new();
    let names: Vec<String> = xlsx.sheet_names().to_owned();
    for name in names {
        let range = xlsx
            .worksheet_range(&name)
            .map_err(|err| anyhow!("sheet {name}: {err}"))?;
        let sheet = sheet::from_range(&range);
        info!(
            "Sheet {:?}: {} columns, {} rows",
            name,
            sheet.headers.len(),
            sheet.rows.len()
        );
        if sheets.insert(name.clone(), sheet).is_some() {
            bail!("duplicate sheet name {:?}", name);
        }
    }
    Ok(Workbook { sheets })
}

pub fn load_workbook_bytes(bytes: &[u8]) -> Result<Workbook> {
    load_workbook(Cursor::new(bytes))
}
