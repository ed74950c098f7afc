//! Deferral of unused side-effect free re-exports
//!
//! A weak dependency (`export { x } from './x'`) into a module without side
//! effects does not need to be transformed when nothing that imports the
//! re-exporting asset asks for a symbol it forwards. Skipping those subtrees
//! is what keeps barrel-heavy libraries such as `lodash-es` cheap to build.

use pea_core::error::PeaResult;
use pea_core::types::{AssetGroup, Dependency};
use tracing::debug;

use super::{AssetGraph, NodeKind};

/// Decide whether resolving `dependency` to `asset_group` can be skipped
pub(super) fn should_defer(
    graph: &AssetGraph,
    dependency: &Dependency,
    asset_group: &AssetGroup,
) -> PeaResult<bool> {
    if !dependency.is_weak || asset_group.side_effects {
        return Ok(false);
    }

    // The re-exporting asset is the dependency's parent. A dependency that was
    // never attached to an asset is not deferred.
    let parents = graph.graph.get_nodes_connected_to(&dependency.id);
    let parent = match parents.first() {
        Some(parent) if parent.kind() != NodeKind::Root => parent,
        _ => {
            debug!(dependency = %dependency.module_specifier, "no parent asset, not deferring");
            return Ok(false);
        },
    };
    let resolved_asset = parent.expect_underlying_asset()?;

    // local name -> exported name of what this dependency forwards
    let forwarded = dependency.local_symbols();

    let incoming = graph.get_incoming_dependencies(resolved_asset)?;
    let defer = incoming.iter().all(|importer| {
        !importer.imports_namespace()
            && !importer.symbols.keys().any(|symbol| {
                resolved_asset
                    .symbols
                    .get(symbol)
                    .is_some_and(|local| forwarded.contains_key(local.as_str()))
            })
    });

    debug!(
        dependency = %dependency.module_specifier,
        asset = %resolved_asset.file_path,
        importers = incoming.len(),
        defer,
        "evaluated weak dependency"
    );
    Ok(defer)
}
