use serde::Serialize;

/// Definition of a network cluster a transport can submit to.
///
/// The SDK never performs I/O itself; these endpoints are configuration
/// handed to whichever transport the caller uses.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub ws_url: &'static str,
    pub is_testnet: bool,
}

pub const MAINNET_BETA: Cluster = Cluster {
    name: "mainnet-beta",
    rpc_url: "https://api.mainnet-beta.solana.com",
    ws_url: "wss://api.mainnet-beta.solana.com",
    is_testnet: false,
};

pub const TESTNET: Cluster = Cluster {
    name: "testnet",
    rpc_url: "https://api.testnet.solana.com",
    ws_url: "wss://api.testnet.solana.com",
    is_testnet: true,
};

pub const DEVNET: Cluster = Cluster {
    name: "devnet",
    rpc_url: "https://api.devnet.solana.com",
    ws_url: "wss://api.devnet.solana.com",
    is_testnet: true,
};

/// A validator running on this machine with default ports.
pub const LOCALNET: Cluster = Cluster {
    name: "localnet",
    rpc_url: "http://127.0.0.1:8899",
    ws_url: "ws://127.0.0.1:8900",
    is_testnet: true,
};

const ALL_CLUSTERS: &[&Cluster] = &[&MAINNET_BETA, &TESTNET, &DEVNET, &LOCALNET];

/// Look up a cluster by name (case-insensitive). `mainnet` is accepted as an
/// alias for `mainnet-beta`.
pub fn cluster_by_name(name: &str) -> Option<&'static Cluster> {
    let name = name.trim().to_ascii_lowercase();
    let name = if name == "mainnet" { "mainnet-beta" } else { name.as_str() };
    ALL_CLUSTERS.iter().copied().find(|c| c.name == name)
}

/// All known clusters.
pub fn all_clusters() -> Vec<&'static Cluster> {
    ALL_CLUSTERS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(cluster_by_name("devnet").unwrap().rpc_url, DEVNET.rpc_url);
        assert_eq!(cluster_by_name("Testnet").unwrap().name, "testnet");
        assert!(cluster_by_name("nope").is_none());
    }

    #[test]
    fn mainnet_alias() {
        let cluster = cluster_by_name("mainnet").unwrap();
        assert_eq!(cluster.name, "mainnet-beta");
        assert!(!cluster.is_testnet);
    }

    #[test]
    fn names_are_unique() {
        let clusters = all_clusters();
        for (i, a) in clusters.iter().enumerate() {
            for b in &clusters[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(LOCALNET).unwrap();
        assert_eq!(json["name"], "localnet");
        assert_eq!(json["rpc_url"], "http://127.0.0.1:8899");
        assert_eq!(json["is_testnet"], true);
    }
}
