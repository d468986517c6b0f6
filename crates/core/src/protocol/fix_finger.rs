//! Fix finger table: refresh every finger by routing its target.

use crate::dht::ExternalPointer;
use crate::dht::Pointer;
use crate::error::Error;
use crate::error::Result;
use crate::protocol::route::route_to_successor;
use crate::protocol::ChordContext;

/// What one pass of [fix_finger_table] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixFingerReport {
    /// Fingers changed.
    pub refreshed: usize,
    /// Fingers whose lookup failed.
    pub failed: usize,
}

/// Whether `pointer` still answers with its own id.
async fn is_alive(ctx: &ChordContext, pointer: &ExternalPointer) -> bool {
    matches!(ctx.rpc.get_id(&pointer.address).await, Ok(id) if id == pointer.id)
}

/// Route the target of every finger `1..m`, starting at the successor, and put the results.
/// A recorded finger is never moved further away by this pass, unless it no longer answers.
pub async fn fix_finger_table(ctx: &ChordContext) -> Result<FixFingerReport> {
    let mut report = FixFingerReport::default();
    let seed = {
        let state = ctx.lock_state()?;
        match (state.successor(), state.finger_table().successor()) {
            (Some(Pointer::External(p)), _) => Some(p.clone()),
            (_, Pointer::External(p)) => Some(p.clone()),
            _ => None,
        }
    };
    let Some(seed) = seed else {
        tracing::debug!("FIX_FINGER {} knows no other node yet", ctx.self_id);
        return Ok(report);
    };

    for i in 1..ctx.self_id.bits() {
        let expected = ctx.self_id.add_pow2(i)?;
        match route_to_successor(ctx, Pointer::External(seed.clone()), expected).await {
            Ok(outcome) => {
                let Pointer::External(p) = outcome.pointer else {
                    continue;
                };
                let recorded = ctx.lock_state()?.finger_table().get(i as usize)?.clone();
                if let Pointer::External(cur) = recorded {
                    if cur.id != p.id && !is_alive(ctx, &cur).await {
                        tracing::info!("FIX_FINGER {} drops unreachable finger {}", ctx.self_id, cur.id);
                        let mut state = ctx.lock_state()?;
                        state.remove_node(cur.id)?;
                        state.put_finger(p, false)?;
                        report.refreshed += 1;
                        continue;
                    }
                }
                if ctx.lock_state()?.put_finger(p, true)? {
                    report.refreshed += 1;
                }
            }
            Err(Error::RouteFailedSelf) => {}
            Err(e) => {
                tracing::warn!("FIX_FINGER {} index {} failed: {}", ctx.self_id, i, e);
                report.failed += 1;
            }
        }
    }
    tracing::debug!("FIX_FINGER {} done: {:?}", ctx.self_id, report);
    Ok(report)
}
