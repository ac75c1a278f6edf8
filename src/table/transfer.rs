//! The transfer protocol: the one place cards change zones.
//!
//! Order matters and is fixed:
//!
//! 1. remove the card from `from` (healing through the location index if
//!    it is not actually there)
//! 2. strip modifiers unless the destination is a battlefield
//! 3. apply caller overrides (face-down moves, replayed remote tags)
//! 4. add the card to `to`
//!
//! Removal always completes before insertion starts, so no observer ever
//! sees the card in two zones. Publishing the matching event is the
//! caller's job.

use tracing::{debug, warn};

use super::context::TableContext;
use crate::animation::AnimationHandle;
use crate::cards::{Modifiers, TagChange, TagOverrides};
use crate::core::{CardId, Result, ZoneId};
use crate::zones::{AddOptions, ZoneKind};

/// Move `card` from `from` to `to`.
pub fn transfer_card(
    ctx: &mut TableContext,
    card: &CardId,
    from: &ZoneId,
    to: &ZoneId,
    options: &AddOptions,
    overrides: Option<&TagOverrides>,
) -> Result<AnimationHandle> {
    ctx.cards.require(card)?;
    let to_kind = ctx.zones.require(to)?.kind();

    let (zones, mut env) = ctx.split();
    if !zones.remove_card(from, card, &mut env) {
        let healed = zones.detach(card, &mut env);
        if healed.is_empty() {
            warn!(card = %card, from = %from, "transfer: card was not in any zone");
        }
    }

    let entry = env.cards.require_mut(card)?;
    if to_kind != ZoneKind::Battlefield {
        entry.apply(TagChange::Modifiers(Modifiers::default()));
    }
    if let Some(overrides) = overrides {
        entry.apply_all(overrides.changes());
    }

    let handle = zones.add_card(to, card, options, &mut env)?;
    debug!(card = %card, from = %from, to = %to, "card transferred");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardDetail};
    use crate::core::{ClientId, TableConfig};
    use crate::zones::Zone;

    fn table() -> TableContext {
        let config = TableConfig::default();
        let mut ctx = TableContext::new(config.clone().with_seed(1));
        for kind in [ZoneKind::Hand, ZoneKind::Battlefield, ZoneKind::Graveyard] {
            ctx.zones.register(Zone::new(
                zone(kind),
                kind,
                ClientId::new("p1"),
                0,
                &config,
            ));
        }
        ctx.cards
            .insert(Card::new(card(), ClientId::new("p1"), CardDetail::named("Bear")))
            .unwrap();
        let (zones, mut env) = ctx.split();
        zones
            .add_card(&zone(ZoneKind::Hand), &card(), &AddOptions::new(), &mut env)
            .unwrap();
        ctx
    }

    fn zone(kind: ZoneKind) -> ZoneId {
        ZoneId::new(format!("p1/{kind}"))
    }

    fn card() -> CardId {
        CardId::new("p1-1")
    }

    fn move_to(ctx: &mut TableContext, from: ZoneKind, to: ZoneKind) {
        transfer_card(ctx, &card(), &zone(from), &zone(to), &AddOptions::new(), None).unwrap();
    }

    #[test]
    fn test_round_trip_restores_location() {
        let mut ctx = table();
        let before = ctx.cards.get(&card()).unwrap().tags.clone();

        move_to(&mut ctx, ZoneKind::Hand, ZoneKind::Battlefield);
        let tags = &ctx.cards.get(&card()).unwrap().tags;
        assert_eq!(tags.location, Some(ZoneKind::Battlefield));
        assert_eq!(tags.previous_location, Some(ZoneKind::Hand));
        assert_eq!(tags.previous_zone_id, Some(zone(ZoneKind::Hand)));

        move_to(&mut ctx, ZoneKind::Battlefield, ZoneKind::Hand);
        let after = &ctx.cards.get(&card()).unwrap().tags;
        assert_eq!(after.location, before.location);
        assert_eq!(after.zone_id, before.zone_id);
        assert_eq!(ctx.zones.zones_containing(&card()), vec![zone(ZoneKind::Hand)]);
    }

    #[test]
    fn test_leaving_battlefield_clears_modifiers() {
        let mut ctx = table();
        move_to(&mut ctx, ZoneKind::Hand, ZoneKind::Battlefield);
        ctx.cards.get_mut(&card()).unwrap().tags.modifiers.power = 2;

        move_to(&mut ctx, ZoneKind::Battlefield, ZoneKind::Graveyard);
        assert!(ctx.cards.get(&card()).unwrap().tags.modifiers.is_empty());
    }

    #[test]
    fn test_face_down_override() {
        let mut ctx = table();
        transfer_card(
            &mut ctx,
            &card(),
            &zone(ZoneKind::Hand),
            &zone(ZoneKind::Battlefield),
            &AddOptions::new(),
            Some(&TagOverrides::face_down()),
        )
        .unwrap();

        let tags = &ctx.cards.get(&card()).unwrap().tags;
        assert!(tags.is_flipped);
        assert!(!tags.is_public);
    }

    #[test]
    fn test_stale_source_is_healed() {
        let mut ctx = table();
        // Caller believes the card is in the graveyard; it is in the hand
        move_to(&mut ctx, ZoneKind::Graveyard, ZoneKind::Battlefield);

        assert_eq!(ctx.zones.zones_containing(&card()), vec![zone(ZoneKind::Battlefield)]);
        assert!(ctx.zones.get(&zone(ZoneKind::Hand)).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_destination_changes_nothing() {
        let mut ctx = table();
        let result = transfer_card(
            &mut ctx,
            &card(),
            &zone(ZoneKind::Hand),
            &ZoneId::new("p9/hand"),
            &AddOptions::new(),
            None,
        );
        assert!(result.is_err());
        assert_eq!(ctx.zones.location_of(&card()), Some(&zone(ZoneKind::Hand)));
    }
}
