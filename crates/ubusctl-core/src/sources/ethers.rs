// Static MAC to name mapping from `/etc/ethers`.

use std::collections::BTreeMap;

use tracing::debug;

use ubusctl_api::{Error, UbusClient};

use crate::config::ETHERS_PATH;

use super::degrade;

/// Read and parse the router's ethers file.
pub async fn load(client: &UbusClient) -> Result<BTreeMap<String, String>, Error> {
    let file = degrade("/etc/ethers", client.file_read(ETHERS_PATH).await)?;
    let map = file.data.as_deref().map(parse).unwrap_or_default();
    debug!(entries = map.len(), "ethers loaded");
    Ok(map)
}

/// Parse `MAC name...` lines into a map keyed by lowercased MAC.
///
/// Blank lines, `#` comments and lines with fewer than two fields are
/// skipped. Names may contain spaces; runs of whitespace collapse to one.
/// When a MAC repeats, the last line wins.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(mac), Some(first)) = (parts.next(), parts.next()) else {
            continue;
        };
        let name = std::iter::once(first).chain(parts).collect::<Vec<_>>().join(" ");
        map.insert(mac.to_lowercase(), name);
    }
    map
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_entries_and_skips_noise() {
        let content = "\
# static names
AA:BB:CC:DD:EE:01 nas

aa:bb:cc:dd:ee:02   living room   tv
lonely-token
  # indented comment
";
        let map = parse(content);
        assert_eq!(map.len(), 2);
        assert_eq!(map["aa:bb:cc:dd:ee:01"], "nas");
        assert_eq!(map["aa:bb:cc:dd:ee:02"], "living room tv");
    }

    #[test]
    fn last_occurrence_wins() {
        let map = parse("aa:bb:cc:dd:ee:01 old\nAA:BB:CC:DD:EE:01 new\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map["aa:bb:cc:dd:ee:01"], "new");
    }

    #[test]
    fn empty_content() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n# only comments\n").is_empty());
    }
}
