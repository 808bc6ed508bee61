use std::fs;
use std::path::Path;

use anyhow::Context;
use ipalloc::{Address, IpRange};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PoolKind {
    Pod,
    Service,
    NodeService,
}

#[derive(Debug, Deserialize)]
pub struct RangeEntry {
    pub start: String,
    pub end: String,
}

/// Address pools, one list of ranges per kind.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PoolConfig {
    #[serde(default)]
    pub pod: Vec<RangeEntry>,
    #[serde(default)]
    pub service: Vec<RangeEntry>,
    #[serde(default)]
    pub node_service: Vec<RangeEntry>,
}

impl PoolConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: PoolConfig = toml::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn ranges(&self, kind: PoolKind) -> anyhow::Result<Vec<IpRange>> {
        let entries = match kind {
            PoolKind::Pod => &self.pod,
            PoolKind::Service => &self.service,
            PoolKind::NodeService => &self.node_service,
        };
        entries
            .iter()
            .map(|e| -> anyhow::Result<IpRange> {
                let start = e.start.parse::<Address>()?;
                let end = e.end.parse::<Address>()?;
                IpRange::new(start, end)
                    .with_context(|| format!("bad {:?} pool entry {}-{}", kind, e.start, e.end))
            })
            .collect()
    }
}
