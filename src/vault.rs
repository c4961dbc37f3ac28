//! Vault snapshot and tracked-asset resolution

use alloy::primitives::Address;

/// A token the vault currently recognizes as part of its holdings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedAsset {
    pub id: Address,
}

/// The vault's tracked holdings plus its comptroller contract
///
/// Fetched from the subgraph once per process lifetime and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct VaultSnapshot {
    pub comptroller: Address,
    pub tracked_assets: Vec<TrackedAsset>,
}

/// Look up a tracked asset by id
///
/// When the id is not among the tracked assets, the *first* tracked asset is
/// returned instead of signaling absence. This mirrors the vault protocol's
/// convention for "asset not currently held"; callers that care must compare
/// the returned id against the requested one. Only an empty snapshot yields
/// `None`.
pub fn resolve_asset(snapshot: &VaultSnapshot, id: Address) -> Option<&TrackedAsset> {
    snapshot
        .tracked_assets
        .iter()
        .find(|asset| asset.id == id)
        .or_else(|| snapshot.tracked_assets.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn snapshot() -> VaultSnapshot {
        VaultSnapshot {
            comptroller: address!("00000000000000000000000000000000000000cc"),
            tracked_assets: vec![
                TrackedAsset {
                    id: address!("00000000000000000000000000000000000000aa"),
                },
                TrackedAsset {
                    id: address!("00000000000000000000000000000000000000bb"),
                },
            ],
        }
    }

    #[test]
    fn returns_matching_entry() {
        let snap = snapshot();
        let target = address!("00000000000000000000000000000000000000bb");
        assert_eq!(resolve_asset(&snap, target).unwrap().id, target);
    }

    #[test]
    fn falls_back_to_first_entry_when_absent() {
        let snap = snapshot();
        let missing = address!("00000000000000000000000000000000000000ff");
        let resolved = resolve_asset(&snap, missing).unwrap();
        assert_eq!(resolved.id, snap.tracked_assets[0].id);
        // The fallback is indistinguishable from a match without this check
        assert_ne!(resolved.id, missing);
    }

    #[test]
    fn empty_snapshot_resolves_nothing() {
        let snap = VaultSnapshot {
            comptroller: Address::ZERO,
            tracked_assets: vec![],
        };
        assert!(resolve_asset(&snap, Address::ZERO).is_none());
    }
}
