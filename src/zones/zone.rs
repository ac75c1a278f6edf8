//! The closed zone variant and its uniform add/remove/serialize contract.
//!
//! Every variant shares a `ZoneCore` (identity + ordered card ids) and
//! implements `ZoneLayout`, which supplies only what differs between kinds:
//! where a card is inserted, which tags it gets, where it should sit, and
//! which neighbours must move afterwards. `Zone` drives the common flow.

use std::ops::Range;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::battlefield::Battlefield;
use super::deck::Deck;
use super::grid::{Grid, GridLayout};
use super::hand::Hand;
use super::kind::{AddOptions, ZoneKind};
use super::stack::Stack;
use crate::animation::{AnimationHandle, AnimationScheduler, AnimationSpec, TweenPath};
use crate::cards::{Card, CardStore, TagChange};
use crate::core::geometry::{Pose, Vec3};
use crate::core::{AnimationConfig, CardId, ClientId, LayoutConfig, Result, TableConfig, ZoneId};

/// Mutable collaborators a zone needs while adding or removing cards.
pub struct ZoneEnv<'a> {
    pub cards: &'a mut CardStore,
    pub animator: &'a mut AnimationScheduler<CardId>,
}

/// State shared by every zone variant.
#[derive(Clone, Debug)]
pub struct ZoneCore {
    pub id: ZoneId,
    pub kind: ZoneKind,
    pub owner: ClientId,
    pub origin: Vec3,
    pub layout: LayoutConfig,
    pub animation: AnimationConfig,
    cards: Vector<CardId>,
}

impl ZoneCore {
    fn new(id: ZoneId, kind: ZoneKind, owner: ClientId, seat: usize, config: &TableConfig) -> Self {
        Self {
            id,
            kind,
            owner,
            origin: config.layout.origin_for(kind, seat),
            layout: config.layout,
            animation: config.animation,
            cards: Vector::new(),
        }
    }

    #[must_use]
    pub fn cards(&self) -> &Vector<CardId> {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, card: &CardId) -> Option<usize> {
        self.cards.index_of(card)
    }

    /// Insert at `index`, clamped to the sequence length. Returns the index used.
    pub fn insert(&mut self, index: usize, card: CardId) -> usize {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
        index
    }

    pub fn push_back(&mut self, card: CardId) -> usize {
        self.cards.push_back(card);
        self.cards.len() - 1
    }

    /// Remove `card` by identity. Returns its former index.
    pub fn splice_out(&mut self, card: &CardId) -> Option<usize> {
        let index = self.cards.index_of(card)?;
        self.cards.remove(index);
        Some(index)
    }

    /// Replace the whole sequence (used by shuffles).
    pub fn replace_order(&mut self, order: Vector<CardId>) {
        self.cards = order;
    }
}

/// Variant-specific layout rules.
pub trait ZoneLayout {
    fn core(&self) -> &ZoneCore;
    fn core_mut(&mut self) -> &mut ZoneCore;

    /// Insert `card` into the sequence and return the index used.
    fn adopt(&mut self, card: &Card, options: &AddOptions) -> usize;

    /// Tags a member at `index` must carry in this zone.
    fn member_tags(&self, index: usize, card: &Card) -> Vec<TagChange>;

    /// Target pose for the member at `index`.
    fn pose_for(&self, index: usize, card: &Card) -> Pose;

    /// Members to re-layout after an insert at `index`.
    fn reflow_after_insert(&self, _index: usize) -> Range<usize> {
        0..0
    }

    /// Members to re-layout after a removal from `index`.
    fn reflow_after_remove(&self, _index: usize) -> Range<usize> {
        0..0
    }

    /// Forget per-card layout state.
    fn forget(&mut self, _card: &CardId) {}
}

/// Serializable form of a zone: `{id, cards}` plus the kind tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSnapshot {
    pub id: ZoneId,
    pub zone: ZoneKind,
    pub cards: Vec<CardId>,
    #[serde(default)]
    pub top_revealed: bool,
}

/// A card container.
#[derive(Clone, Debug)]
pub enum Zone {
    Deck(Deck),
    Hand(Hand),
    Battlefield(Battlefield),
    Stack(Stack),
    Grid(Grid),
}

impl Zone {
    /// Create an empty zone of `kind` for the player in `seat`.
    #[must_use]
    pub fn new(id: ZoneId, kind: ZoneKind, owner: ClientId, seat: usize, config: &TableConfig) -> Self {
        let core = ZoneCore::new(id, kind, owner, seat, config);
        match kind {
            ZoneKind::Deck => Zone::Deck(Deck::new(core)),
            ZoneKind::Hand => Zone::Hand(Hand::new(core)),
            ZoneKind::Battlefield => Zone::Battlefield(Battlefield::new(core)),
            ZoneKind::Exile | ZoneKind::Graveyard => Zone::Stack(Stack::new(core)),
            ZoneKind::Peek | ZoneKind::Reveal | ZoneKind::TokenSearch => Zone::Grid(Grid::new(core)),
        }
    }

    fn layout(&self) -> &dyn ZoneLayout {
        match self {
            Zone::Deck(z) => z,
            Zone::Hand(z) => z,
            Zone::Battlefield(z) => z,
            Zone::Stack(z) => z,
            Zone::Grid(z) => z,
        }
    }

    fn layout_mut(&mut self) -> &mut dyn ZoneLayout {
        match self {
            Zone::Deck(z) => z,
            Zone::Hand(z) => z,
            Zone::Battlefield(z) => z,
            Zone::Stack(z) => z,
            Zone::Grid(z) => z,
        }
    }

    #[must_use]
    pub fn core(&self) -> &ZoneCore {
        self.layout().core()
    }

    #[must_use]
    pub fn id(&self) -> &ZoneId {
        &self.core().id
    }

    #[must_use]
    pub fn kind(&self) -> ZoneKind {
        self.core().kind
    }

    #[must_use]
    pub fn owner(&self) -> &ClientId {
        &self.core().owner
    }

    /// Ordered card ids.
    #[must_use]
    pub fn cards(&self) -> &Vector<CardId> {
        self.core().cards()
    }

    /// Card-count projection for UI.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.core().is_empty()
    }

    #[must_use]
    pub fn contains(&self, card: &CardId) -> bool {
        self.core().index_of(card).is_some()
    }

    /// Add a card: tag it, insert it, and hand its pose to the animator.
    pub fn add_card(
        &mut self,
        card_id: &CardId,
        options: &AddOptions,
        env: &mut ZoneEnv<'_>,
    ) -> Result<AnimationHandle> {
        let (id, kind) = (self.id().clone(), self.kind());
        let layout = self.layout_mut();

        let card = env.cards.require_mut(card_id)?;
        card.apply_all([TagChange::Location(kind), TagChange::ZoneId(id.clone())]);
        let index = layout.adopt(card, options);
        let tags = layout.member_tags(index, card);
        card.apply_all(tags);
        let pose = layout.pose_for(index, card);

        debug!(card = %card_id, zone = %id, index, "card added");
        let handle = move_card(layout.core(), env.animator, card_id, pose, options.skip_animation);

        let range = layout.reflow_after_insert(index);
        for neighbour in range.filter(|&i| i != index) {
            self.refresh_index(neighbour, options.skip_animation, env);
        }
        Ok(handle)
    }

    /// Remove a card by identity. Logs and returns `false` if it is not here.
    pub fn remove_card(&mut self, card_id: &CardId, env: &mut ZoneEnv<'_>) -> bool {
        let origin = self.core().origin;
        env.animator.snapshot_pose(card_id, Pose::at(origin));

        let layout = self.layout_mut();
        let Some(index) = layout.core_mut().splice_out(card_id) else {
            error!(
                card = %card_id,
                zone = %layout.core().id,
                kind = %layout.core().kind,
                cards = layout.core().len(),
                "remove_card: card not in zone"
            );
            return false;
        };
        layout.forget(card_id);
        debug!(card = %card_id, zone = %layout.core().id, index, "card removed");

        let range = layout.reflow_after_remove(index);
        self.reflow(range, false, env);
        true
    }

    /// Re-apply tags and pose for one member (after tap, flip, reveal...).
    pub fn refresh_card(&mut self, card_id: &CardId, env: &mut ZoneEnv<'_>) -> Option<AnimationHandle> {
        let index = self.core().index_of(card_id)?;
        Some(self.refresh_index(index, false, env))
    }

    /// Re-apply tags and poses for every member.
    pub fn refresh_all(&mut self, skip_animation: bool, env: &mut ZoneEnv<'_>) {
        self.reflow(0..self.len(), skip_animation, env);
    }

    fn reflow(&mut self, range: Range<usize>, skip_animation: bool, env: &mut ZoneEnv<'_>) {
        let end = range.end.min(self.len());
        for index in range.start..end {
            self.refresh_index(index, skip_animation, env);
        }
    }

    fn refresh_index(&mut self, index: usize, skip_animation: bool, env: &mut ZoneEnv<'_>) -> AnimationHandle {
        let layout = self.layout_mut();
        let Some(card_id) = layout.core().cards().get(index).cloned() else {
            return AnimationHandle::finished();
        };
        let Some(card) = env.cards.get_mut(&card_id) else {
            error!(card = %card_id, zone = %layout.core().id, "zone member missing from card store");
            return AnimationHandle::finished();
        };
        let tags = layout.member_tags(index, card);
        card.apply_all(tags);
        let pose = layout.pose_for(index, card);
        move_card(layout.core(), env.animator, &card_id, pose, skip_animation)
    }

    /// Serializable `{id, cards}` view.
    #[must_use]
    pub fn serializable(&self) -> ZoneSnapshot {
        ZoneSnapshot {
            id: self.id().clone(),
            zone: self.kind(),
            cards: self.cards().iter().cloned().collect(),
            top_revealed: match self {
                Zone::Deck(deck) => deck.top_revealed(),
                _ => false,
            },
        }
    }

    /// Replace the member order with a permutation of the same ids.
    pub(crate) fn replace_order(&mut self, order: Vector<CardId>) {
        self.layout_mut().core_mut().replace_order(order);
    }

    #[must_use]
    pub fn as_deck(&self) -> Option<&Deck> {
        match self {
            Zone::Deck(deck) => Some(deck),
            _ => None,
        }
    }

    pub fn as_deck_mut(&mut self) -> Option<&mut Deck> {
        match self {
            Zone::Deck(deck) => Some(deck),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_grid(&self) -> Option<&Grid> {
        match self {
            Zone::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn as_grid_mut(&mut self) -> Option<&mut Grid> {
        match self {
            Zone::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    /// Filter a grid zone by text and re-layout. Returns `false` for non-grids.
    pub fn set_grid_filter(&mut self, filter: &str, skip_animation: bool, env: &mut ZoneEnv<'_>) -> bool {
        let Zone::Grid(grid) = &mut *self else {
            return false;
        };
        grid.apply_filter(filter, env.cards);
        self.refresh_all(skip_animation, env);
        true
    }

    /// Switch a grid zone's layout mode. Returns `true` if anything changed.
    pub fn set_grid_layout(&mut self, mode: GridLayout, skip_animation: bool, env: &mut ZoneEnv<'_>) -> bool {
        let Zone::Grid(grid) = &mut *self else {
            return false;
        };
        if !grid.set_mode(mode) {
            return false;
        }
        self.refresh_all(skip_animation, env);
        true
    }
}

fn move_card(
    core: &ZoneCore,
    animator: &mut AnimationScheduler<CardId>,
    card: &CardId,
    pose: Pose,
    skip_animation: bool,
) -> AnimationHandle {
    if skip_animation {
        animator.place(card, pose);
        return AnimationHandle::finished();
    }
    if animator.pose(card) == Some(pose) && !animator.is_animating(card) {
        return AnimationHandle::finished();
    }
    animator.animate(
        card.clone(),
        AnimationSpec::to(pose, core.animation.duration_ms).path(TweenPath::Arc {
            height: core.animation.arc_height,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDetail;

    struct Fixture {
        cards: CardStore,
        animator: AnimationScheduler<CardId>,
        config: TableConfig,
    }

    impl Fixture {
        fn new(n: usize) -> Self {
            let mut cards = CardStore::new();
            for i in 1..=n {
                let id = CardId::new(format!("p1-{i}"));
                cards
                    .insert(Card::new(id, ClientId::new("p1"), CardDetail::named(format!("Card {i}"))))
                    .unwrap();
            }
            Self {
                cards,
                animator: AnimationScheduler::new(),
                config: TableConfig::default(),
            }
        }

        fn env(&mut self) -> ZoneEnv<'_> {
            ZoneEnv {
                cards: &mut self.cards,
                animator: &mut self.animator,
            }
        }

        fn zone(&self, kind: ZoneKind) -> Zone {
            Zone::new(
                ZoneId::new(format!("p1/{kind}")),
                kind,
                ClientId::new("p1"),
                0,
                &self.config,
            )
        }
    }

    fn id(n: usize) -> CardId {
        CardId::new(format!("p1-{n}"))
    }

    #[test]
    fn test_add_tags_card() {
        let mut fx = Fixture::new(1);
        let mut zone = fx.zone(ZoneKind::Hand);

        zone.add_card(&id(1), &AddOptions::new(), &mut fx.env()).unwrap();

        let card = fx.cards.get(&id(1)).unwrap();
        assert_eq!(card.tags.location, Some(ZoneKind::Hand));
        assert_eq!(card.tags.zone_id.as_ref(), Some(zone.id()));
        assert_eq!(zone.len(), 1);
    }

    #[test]
    fn test_skip_animation_places_immediately() {
        let mut fx = Fixture::new(1);
        let mut zone = fx.zone(ZoneKind::Graveyard);

        let handle = zone
            .add_card(&id(1), &AddOptions::new().immediate(), &mut fx.env())
            .unwrap();

        assert!(handle.is_complete());
        assert!(fx.animator.is_idle());
        assert!(fx.animator.pose(&id(1)).is_some());
    }

    #[test]
    fn test_animated_add_tweens() {
        let mut fx = Fixture::new(1);
        let mut zone = fx.zone(ZoneKind::Graveyard);
        fx.animator.place(&id(1), Pose::default());

        let handle = zone.add_card(&id(1), &AddOptions::new(), &mut fx.env()).unwrap();
        assert!(!handle.is_complete());

        fx.animator.advance(10_000);
        assert!(handle.is_complete());
    }

    #[test]
    fn test_remove_missing_card_is_soft() {
        let mut fx = Fixture::new(2);
        let mut zone = fx.zone(ZoneKind::Hand);
        zone.add_card(&id(1), &AddOptions::new(), &mut fx.env()).unwrap();

        assert!(!zone.remove_card(&id(2), &mut fx.env()));
        assert_eq!(zone.len(), 1);
        assert!(zone.remove_card(&id(1), &mut fx.env()));
        assert!(zone.is_empty());
    }

    #[test]
    fn test_missing_card_in_store_is_error() {
        let mut fx = Fixture::new(0);
        let mut zone = fx.zone(ZoneKind::Hand);
        assert!(zone.add_card(&id(1), &AddOptions::new(), &mut fx.env()).is_err());
        assert!(zone.is_empty());
    }

    #[test]
    fn test_serializable() {
        let mut fx = Fixture::new(2);
        let mut zone = fx.zone(ZoneKind::Exile);
        zone.add_card(&id(1), &AddOptions::new(), &mut fx.env()).unwrap();
        zone.add_card(&id(2), &AddOptions::new(), &mut fx.env()).unwrap();

        let snapshot = zone.serializable();
        assert_eq!(snapshot.id, ZoneId::new("p1/exile"));
        assert_eq!(snapshot.zone, ZoneKind::Exile);
        assert_eq!(snapshot.cards, vec![id(1), id(2)]);
    }
}
