//! Update others: tell the nodes whose fingers should now point at the local node.

use crate::dht::Pointer;
use crate::error::Result;
use crate::protocol::route::route_to_predecessor;
use crate::protocol::ChordContext;

/// For every finger index `i`, find the predecessor of `self - 2^i + 1` and ask it to put the
/// local node into its finger `i`. Returns the count of nodes updated.
pub async fn update_others(ctx: &ChordContext) -> Result<usize> {
    let mut updated = 0;
    for i in 0..ctx.self_id.bits() {
        let router_id = ctx.self_id.sub_pow2(i)?;
        let target = router_id.add_pow2(0)?;
        let outcome = match route_to_predecessor(ctx, Pointer::Internal(ctx.base()), target).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("UPDATE_OTHERS {} index {} lookup failed: {}", ctx.self_id, i, e);
                continue;
            }
        };
        let Pointer::External(p) = outcome.pointer else {
            continue;
        };
        match ctx.rpc.update_finger_table(&p.address, ctx.self_id, i).await {
            Ok(()) => updated += 1,
            Err(e) => tracing::warn!("UPDATE_OTHERS {} index {} at {} failed: {}", ctx.self_id, i, p.id, e),
        }
    }
    Ok(updated)
}
