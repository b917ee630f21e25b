//! Deterministic reconciliation of a local cart with a server-held one.

use basket_core::models::CartLine;

/// Merge a local (offline-originated) line list into the server's.
///
/// The server's list is the base and keeps its order; local lines whose
/// product is unknown to the server are appended; for products present on
/// both sides the larger quantity wins, so a higher local quantity is never
/// lost and nothing the user added offline is dropped.
pub fn merge_lines(server: &[CartLine], local: &[CartLine]) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = server.to_vec();

    for local_line in local {
        match merged
            .iter_mut()
            .find(|line| line.product_id == local_line.product_id)
        {
            Some(existing) => {
                if local_line.quantity > existing.quantity {
                    existing.quantity = local_line.quantity;
                }
            }
            None => merged.push(local_line.clone()),
        }
    }

    merged
}
