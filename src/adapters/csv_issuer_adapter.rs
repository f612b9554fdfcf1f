//! CSV issuer directory adapter.
//!
//! Loads the whole directory once; lookups are in memory.

use crate::domain::error::EodError;
use crate::domain::issuer::Issuer;
use crate::ports::issuer_port::IssuerPort;
use std::collections::HashMap;
use std::path::Path;

pub struct CsvIssuerAdapter {
    issuers: HashMap<i64, Issuer>,
}

impl CsvIssuerAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EodError> {
        let path = path.as_ref();
        let rdr = csv::Reader::from_path(path).map_err(|e| EodError::IssuerDirectory {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_reader(rdr)
    }

    pub fn from_string(content: &str) -> Result<Self, EodError> {
        Self::from_reader(csv::Reader::from_reader(content.as_bytes()))
    }

    fn from_reader<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Self, EodError> {
        let mut issuers = HashMap::new();
        for result in rdr.deserialize::<Issuer>() {
            let issuer = result.map_err(|e| EodError::IssuerDirectory {
                reason: format!("CSV parse error: {}", e),
            })?;
            issuers.insert(issuer.id, issuer);
        }
        Ok(Self { issuers })
    }

    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }
}

impl IssuerPort for CsvIssuerAdapter {
    fn get_issuer(&self, id: i64) -> Result<Option<Issuer>, EodError> {
        Ok(self.issuers.get(&id).cloned())
    }
}
