use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::Workbook;

/// Memoizes parsed workbooks by the identity of the uploaded bytes, so
/// re-running analyses against the same upload never re-parses. Lives only as
/// long as the process.
pub struct WorkbookCache {
    parsed: BTreeMap<[u8; 32], Arc<Workbook>>,
}

impl WorkbookCache {
    pub fn new() -> Self {
        Self {
            parsed: BTreeMap::new(),
        }
    }

    pub fn get_or_load(&mut self, bytes: &[u8]) -> Result<Arc<Workbook>> {
        let digest: [u8; 32] = Sha256::digest(bytes).into();
        if let Some(workbook) = self.parsed.get(&digest) {
            debug!("Workbook cache hit");
            return Ok(workbook.clone());
        }
        let workbook = Arc::new(crate::load_workbook_bytes(bytes)?);
        self.parsed.insert(digest, workbook.clone());
        Ok(workbook)
    }
}
