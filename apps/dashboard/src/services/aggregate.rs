use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AccountsSnapshot, CategoryTotals};

/// Sums current balances per account type. An empty snapshot yields an empty map.
///
/// A total that would leave the `Decimal` range saturates at its bound.
pub fn aggregate_by_type(snapshot: &AccountsSnapshot) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for account in &snapshot.accounts {
        let total = totals.entry(account.account_type.clone()).or_default();
        *total = match total.checked_add(account.current_balance) {
            Some(sum) => sum,
            None => {
                warn!(account_type = %account.account_type, "category total overflowed; saturating");
                if account.current_balance.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            }
        };
    }
    totals
}
