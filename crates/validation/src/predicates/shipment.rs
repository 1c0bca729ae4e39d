//! Timing and addresses of documents that travel with goods.

use saftpt_documents::{ShippingPoint, SourceDocument};

use super::RuleContext;
use crate::rules::Rule;

pub fn check_document<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    if !doc.is_transport_document() {
        return;
    }
    let number = doc.document_number();

    match doc.movement_start_time() {
        None => ctx.report(Rule::MovementStartMissing, number, &[&number]),
        Some(start) => {
            if let Some(date) = doc.date().get() {
                if start.date() < date {
                    ctx.report(Rule::MovementStartBeforeDate, number, &[&number, &start, &date]);
                }
            }
            if let Some(entry) = doc.system_entry_date().get() {
                if start < entry {
                    ctx.report(Rule::MovementStartBeforeEntry, number, &[&number, &start, &entry]);
                }
            }
            if let Some(end) = doc.movement_end_time() {
                if end < start {
                    ctx.report(Rule::MovementEndBeforeStart, number, &[&number, &end, &start]);
                }
            }
        }
    }

    check_point(ctx, number, "ShipFrom", doc.ship_from());
    check_point(ctx, number, "ShipTo", doc.ship_to());
}

fn check_point(ctx: &RuleContext<'_>, number: &str, name: &str, point: Option<&ShippingPoint>) {
    let Some(address) = point.and_then(|p| p.address.as_ref()) else {
        ctx.report(Rule::ShippingAddressIncomplete, number, &[&number, &name, &"Address"]);
        return;
    };
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
    if blank(&address.city) {
        ctx.report(Rule::ShippingAddressIncomplete, number, &[&number, &name, &"City"]);
    }
    if blank(&address.country) {
        ctx.report(Rule::ShippingAddressIncomplete, number, &[&number, &name, &"Country"]);
    }
}
