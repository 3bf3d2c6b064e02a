//! Card Enhancement Engine.
//!
//! Material cards are consumed for experience on a target card. The card curve is
//! `level * 100` per level, separate from the player curve.

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use uuid::Uuid;

use super::{stats_at_level, OwnedCard};
use crate::catalog::Catalog;
use crate::economy::ledger::{self, AdjustOp, Currency};
use crate::error::GameError;
use crate::store::PlayerAggregate;

/// Experience a material card yields per level it has.
pub const EXP_PER_MATERIAL_LEVEL: u64 = 50;

pub fn exp_for_next_card_level(level: u32) -> u64 {
    u64::from(level) * 100
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct EnhanceResult {
    pub enhanced_card: OwnedCard,
    pub levels_gained: u32,
    pub exp_gained: u64,
}

/// Carry `exp` into `level` without passing `max_level`.
fn level_card(level: u32, exp: u64, max_level: u32) -> (u32, u64) {
    let (mut level, mut exp) = (level, exp);
    while level < max_level && exp >= exp_for_next_card_level(level) {
        exp -= exp_for_next_card_level(level);
        level += 1;
    }
    (level, exp)
}

pub fn enhance(
    aggregate: &mut PlayerAggregate,
    catalog: &Catalog,
    target_id: Uuid,
    material_ids: &[Uuid],
    gold_cost: u64,
) -> Result<EnhanceResult, GameError> {
    let target = aggregate
        .card(target_id)
        .cloned()
        .ok_or_else(|| GameError::CardNotOwned("Player does not own this card".to_string()))?;
    let master = catalog.get_by_id(&target.card_master_id)?;

    if target.level >= master.max_level {
        return Err(GameError::validation("Card is already at max level"));
    }
    if material_ids.is_empty() {
        return Err(GameError::validation("No material cards provided"));
    }
    let materials = aggregate.cards_by_ids(material_ids);
    if materials.len() != material_ids.len() {
        return Err(GameError::CardNotOwned(
            "One or more material cards not owned by player".to_string(),
        ));
    }
    if material_ids.contains(&target_id) {
        return Err(GameError::validation("Cannot use target card as material"));
    }
    let exp_gained: u64 = materials
        .iter()
        .map(|m| u64::from(m.level) * EXP_PER_MATERIAL_LEVEL)
        .sum();

    ledger::adjust(&mut aggregate.player, Currency::Gold, gold_cost, AdjustOp::Subtract)?;
    aggregate.remove_cards(material_ids);

    let (new_level, new_exp) = level_card(target.level, target.exp + exp_gained, master.max_level);
    let (attack, defense) = stats_at_level(master, new_level);
    let card = aggregate
        .card_mut(target_id)
        .ok_or_else(|| GameError::internal(format!("target card {target_id} vanished")))?;
    card.level = new_level;
    card.exp = new_exp;
    card.attack = attack;
    card.defense = defense;
    let enhanced_card = card.clone();

    log::info!(
        "player {} enhanced {} with {} materials: level {} -> {}",
        aggregate.player.id,
        target_id,
        material_ids.len(),
        target.level,
        new_level
    );
    Ok(EnhanceResult {
        enhanced_card,
        levels_gained: new_level - target.level,
        exp_gained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::materialize;
    use crate::catalog::seed;
    use crate::player::Player;
    use chrono::Utc;

    struct Fixture {
        agg: PlayerAggregate,
        catalog: Catalog,
        target: Uuid,
        materials: Vec<Uuid>,
    }

    /// A level 1 target plus two level 2 materials of the first catalog card.
    fn fixture() -> Fixture {
        let catalog = Catalog::new(seed::card_masters());
        let master = catalog.get_all()[0].clone();
        assert!(master.max_level >= 3);
        let now = Utc::now();
        let mut agg = PlayerAggregate::new(Player::new("smith".to_string(), now), 3);
        let target = materialize(agg.player.id, &master, now);
        let target_id = target.id;
        agg.add_card(target);
        let mut materials = Vec::new();
        for _ in 0..2 {
            let mut m = materialize(agg.player.id, &master, now);
            m.level = 2;
            materials.push(m.id);
            agg.add_card(m);
        }
        Fixture {
            agg,
            catalog,
            target: target_id,
            materials,
        }
    }

    #[test]
    fn two_level_two_materials_walk_the_carry_loop() {
        let mut f = fixture();
        let gold = f.agg.player.gold;
        let result = enhance(&mut f.agg, &f.catalog, f.target, &f.materials, 100).unwrap();
        // 200 exp: 100 to reach level 2, then 100 < 200 so it stays
        assert_eq!(result.exp_gained, 200);
        assert_eq!(result.enhanced_card.level, 2);
        assert_eq!(result.enhanced_card.exp, 100);
        assert_eq!(result.levels_gained, 1);
        assert_eq!(f.agg.player.gold, gold - 100);
        for m in &f.materials {
            assert!(f.agg.card(*m).is_none());
        }
        let master = f.catalog.get_all()[0].clone();
        assert_eq!(
            (result.enhanced_card.attack, result.enhanced_card.defense),
            (master.base_attack + 2, master.base_defense + 2)
        );
        assert_eq!(f.agg.card(f.target), Some(&result.enhanced_card));
    }

    #[test]
    fn carry_is_capped_at_max_level() {
        assert_eq!(level_card(1, 10_000, 3), (3, 9_700));
        assert_eq!(level_card(1, 300, 10), (3, 0));
    }

    #[test]
    fn target_must_be_owned() {
        let mut f = fixture();
        let result = enhance(&mut f.agg, &f.catalog, Uuid::new_v4(), &f.materials, 1);
        assert!(matches!(result, Err(GameError::CardNotOwned(_))));
    }

    #[test]
    fn max_level_target_is_rejected() {
        let mut f = fixture();
        let max = f.catalog.get_all()[0].max_level;
        if let Some(c) = f.agg.card_mut(f.target) {
            c.level = max;
        }
        let result = enhance(&mut f.agg, &f.catalog, f.target, &f.materials, 1);
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[test]
    fn empty_materials_are_rejected() {
        let mut f = fixture();
        let result = enhance(&mut f.agg, &f.catalog, f.target, &[], 1);
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[test]
    fn target_cannot_feed_itself() {
        let mut f = fixture();
        let ids = vec![f.target, f.materials[0]];
        let result = enhance(&mut f.agg, &f.catalog, f.target, &ids, 1);
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[test]
    fn unowned_material_is_rejected() {
        let mut f = fixture();
        let ids = vec![f.materials[0], Uuid::new_v4()];
        let result = enhance(&mut f.agg, &f.catalog, f.target, &ids, 1);
        assert!(matches!(result, Err(GameError::CardNotOwned(_))));
    }

    #[test]
    fn insufficient_gold_is_reported() {
        let mut f = fixture();
        f.agg.player.gold = 10;
        let result = enhance(&mut f.agg, &f.catalog, f.target, &f.materials, 11);
        assert!(matches!(result, Err(GameError::InsufficientGold(_))));
    }
}
