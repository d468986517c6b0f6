//! Check predecessor: forget a predecessor that stopped answering.

use crate::error::Result;
use crate::protocol::ChordContext;

/// Ask the predecessor for its id. A failure or a different id clears it, unless another
/// predecessor was recorded meanwhile. Returns whether it was cleared.
pub async fn check_predecessor(ctx: &ChordContext) -> Result<bool> {
    let pred = {
        let state = ctx.lock_state()?;
        state.predecessor().cloned()
    };
    let Some(pred) = pred else {
        return Ok(false);
    };

    match ctx.rpc.get_id(&pred.address).await {
        Ok(id) if id == pred.id => Ok(false),
        Ok(id) => {
            tracing::warn!("predecessor at {} changed id from {} to {}", pred.address, pred.id, id);
            Ok(ctx.lock_state()?.clear_predecessor_if(&pred))
        }
        Err(e) => {
            tracing::warn!("predecessor {} unreachable: {}", pred.id, e);
            Ok(ctx.lock_state()?.clear_predecessor_if(&pred))
        }
    }
}
