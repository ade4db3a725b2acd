//! Cart pricing. The single source of truth for subtotal, shipping fee and
//! total, shared by cart display and checkout so the two can never disagree.

/// Zone-based flat-rate shipping. Two tiers: an address containing the metro
/// keyword (case-insensitive) ships at the metro fee, everything else at the
/// standard fee.
#[derive(Debug, Clone)]
pub struct ShippingPolicy {
    pub metro_keyword: String,
    pub metro_fee: i64,
    pub standard_fee: i64,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            metro_keyword: "dhaka".to_string(),
            metro_fee: 60,
            standard_fee: 130,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub price: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub total: i64,
}

pub fn subtotal(lines: &[PricedLine]) -> i64 {
    lines
        .iter()
        .map(|line| line.price * i64::from(line.quantity))
        .sum()
}

pub fn shipping_fee(address: &str, policy: &ShippingPolicy) -> i64 {
    let metro = address
        .to_lowercase()
        .contains(&policy.metro_keyword.to_lowercase());
    if metro {
        policy.metro_fee
    } else {
        policy.standard_fee
    }
}

pub fn compute_totals(lines: &[PricedLine], address: &str, policy: &ShippingPolicy) -> CartTotals {
    let subtotal = subtotal(lines);
    let shipping_fee = shipping_fee(address, policy);
    CartTotals {
        subtotal,
        shipping_fee,
        total: subtotal + shipping_fee,
    }
}

/// New quantity after an increment/decrement. Floored at 1: a cart line can
/// only disappear through an explicit remove, never by decrementing.
pub fn apply_quantity_delta(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ShippingPolicy {
        ShippingPolicy::default()
    }

    #[test]
    fn metro_address_gets_metro_fee() {
        let lines = [PricedLine {
            price: 500,
            quantity: 2,
        }];
        let totals = compute_totals(&lines, "House 12, Dhaka", &policy());
        assert_eq!(totals.subtotal, 1000);
        assert_eq!(totals.shipping_fee, 60);
        assert_eq!(totals.total, 1060);
    }

    #[test]
    fn outside_address_gets_standard_fee() {
        let lines = [PricedLine {
            price: 500,
            quantity: 2,
        }];
        let totals = compute_totals(&lines, "Chittagong", &policy());
        assert_eq!(totals.subtotal, 1000);
        assert_eq!(totals.shipping_fee, 130);
        assert_eq!(totals.total, 1130);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(shipping_fee("dHAkA 1207", &policy()), 60);
        assert_eq!(shipping_fee("", &policy()), 130);
    }

    #[test]
    fn subtotal_sums_all_lines() {
        let lines = [
            PricedLine {
                price: 100,
                quantity: 3,
            },
            PricedLine {
                price: 250,
                quantity: 1,
            },
        ];
        assert_eq!(subtotal(&lines), 550);
    }

    #[test]
    fn quantity_never_drops_below_one() {
        assert_eq!(apply_quantity_delta(3, -100), 1);
        assert_eq!(apply_quantity_delta(1, -1), 1);
        assert_eq!(apply_quantity_delta(2, -1), 1);
        assert_eq!(apply_quantity_delta(2, 1), 3);
    }
}
