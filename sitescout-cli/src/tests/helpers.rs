//! Stub source builders and request-file helpers.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sitescout_core::test_support::StubPoiSource;
use sitescout_core::{PoiSource, RawElement};
use tempfile::TempDir;

use crate::CliError;
use crate::source::{SourceBuilder, SourceSettings};

/// Hands out a shared stub so tests can inspect it afterwards.
pub(super) struct StubSourceBuilder {
    pub(super) stub: Arc<StubPoiSource>,
}

impl StubSourceBuilder {
    pub(super) fn new(stub: StubPoiSource) -> Self {
        Self {
            stub: Arc::new(stub),
        }
    }
}

impl SourceBuilder for StubSourceBuilder {
    fn build(&self, _settings: &SourceSettings) -> Result<Arc<dyn PoiSource>, CliError> {
        let source: Arc<dyn PoiSource> = self.stub.clone();
        Ok(source)
    }
}

pub(super) fn cafes(count: i64) -> Vec<RawElement> {
    (1..=count)
        .map(|id| {
            RawElement::new("node", id)
                .at(12.97, 77.59)
                .with_tag("amenity", "cafe")
                .with_tag("name", &format!("Cafe {id}"))
        })
        .collect()
}

/// Temporary directory holding a single request file.
pub(super) struct RequestFile {
    _dir: TempDir,
    pub(super) path: Utf8PathBuf,
}

impl RequestFile {
    pub(super) fn new(contents: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("request.json");
        std::fs::write(&path, contents).expect("write request");
        Self { _dir: dir, path }
    }
}
