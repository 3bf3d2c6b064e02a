use std::collections::HashMap;

use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::GameError;
use crate::store::PlayerAggregate;

pub const MIN_DECK_SIZE: usize = 20;
pub const MAX_DECK_SIZE: usize = 40;
pub const MAX_DUPLICATE_CARDS: u32 = 3;
pub const MAX_TOTAL_COST: u32 = 200;

/// Check a candidate card list and return its total cost.
///
/// Checks run in order: size, copies per card, ownership, cost budget. Cost counts every
/// entry, so a card listed three times costs three times.
pub fn validate(
    aggregate: &PlayerAggregate,
    catalog: &Catalog,
    card_ids: &[Uuid],
) -> Result<u32, GameError> {
    if card_ids.len() < MIN_DECK_SIZE || card_ids.len() > MAX_DECK_SIZE {
        return Err(GameError::InvalidDeckSize(format!(
            "Deck must contain {MIN_DECK_SIZE}-{MAX_DECK_SIZE} cards"
        )));
    }

    let mut counts: HashMap<Uuid, u32> = HashMap::new();
    for id in card_ids {
        let count = counts.entry(*id).or_insert(0);
        *count += 1;
        if *count > MAX_DUPLICATE_CARDS {
            return Err(GameError::DuplicateCardLimit(format!(
                "Cannot have more than {MAX_DUPLICATE_CARDS} copies of the same card"
            )));
        }
    }

    let mut total_cost = 0u32;
    for id in card_ids {
        let card = aggregate.card(*id).ok_or_else(|| {
            GameError::CardNotOwned("Player does not own all specified cards".to_string())
        })?;
        let cost = catalog.get_by_id(&card.card_master_id)?.cost;
        total_cost = total_cost.checked_add(cost).ok_or_else(|| {
            GameError::DeckCostExceeded(format!(
                "Total deck cost exceeds maximum ({MAX_TOTAL_COST})"
            ))
        })?;
    }
    if total_cost > MAX_TOTAL_COST {
        return Err(GameError::DeckCostExceeded(format!(
            "Total deck cost ({total_cost}) exceeds maximum ({MAX_TOTAL_COST})"
        )));
    }
    Ok(total_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::materialize;
    use crate::catalog::{Attribute, CardMaster, Rarity};
    use crate::player::Player;
    use chrono::Utc;

    fn master(id: &str, cost: u32) -> CardMaster {
        CardMaster {
            id: id.to_string(),
            name: id.to_string(),
            rarity: Rarity::Common,
            attribute: Attribute::Wind,
            cost,
            base_attack: 10,
            base_defense: 10,
            max_level: 10,
            description: String::new(),
        }
    }

    /// Owns `count` distinct cards of cost 10, plus one of cost 11.
    fn owner(count: usize) -> (PlayerAggregate, Catalog, Vec<Uuid>, Uuid) {
        let catalog = Catalog::new(vec![master("ten", 10), master("eleven", 11)]);
        let now = Utc::now();
        let mut agg = PlayerAggregate::new(Player::new("builder".to_string(), now), 9);
        let mut ids = Vec::new();
        for _ in 0..count {
            let card = materialize(agg.player.id, catalog.get_by_id("ten").unwrap(), now);
            ids.push(card.id);
            agg.add_card(card);
        }
        let pricey = materialize(agg.player.id, catalog.get_by_id("eleven").unwrap(), now);
        let pricey_id = pricey.id;
        agg.add_card(pricey);
        (agg, catalog, ids, pricey_id)
    }

    #[test]
    fn nineteen_cards_is_too_small() {
        let (agg, catalog, ids, _) = owner(19);
        assert!(matches!(
            validate(&agg, &catalog, &ids),
            Err(GameError::InvalidDeckSize(_))
        ));
    }

    #[test]
    fn forty_one_cards_is_too_large() {
        let (agg, catalog, ids, _) = owner(41);
        assert!(matches!(
            validate(&agg, &catalog, &ids),
            Err(GameError::InvalidDeckSize(_))
        ));
    }

    #[test]
    fn twenty_owned_cards_within_budget_pass() {
        let (agg, catalog, ids, _) = owner(20);
        assert_eq!(validate(&agg, &catalog, &ids), Ok(200));
    }

    #[test]
    fn fourth_copy_is_rejected() {
        let (agg, catalog, ids, _) = owner(20);
        let mut list = ids[..16].to_vec();
        list.extend([ids[0]; 4]);
        assert_eq!(list.len(), 20);
        assert!(matches!(
            validate(&agg, &catalog, &list),
            Err(GameError::DuplicateCardLimit(_))
        ));
    }

    #[test]
    fn three_copies_are_fine() {
        let (agg, catalog, ids, _) = owner(20);
        let mut list = ids[..17].to_vec();
        list.extend([ids[0]; 2]);
        list.push(ids[1]);
        assert_eq!(list.len(), 20);
        assert_eq!(validate(&agg, &catalog, &list), Ok(200));
    }

    #[test]
    fn unowned_card_is_rejected() {
        let (agg, catalog, mut ids, _) = owner(20);
        ids[5] = Uuid::new_v4();
        assert!(matches!(
            validate(&agg, &catalog, &ids),
            Err(GameError::CardNotOwned(_))
        ));
    }

    #[test]
    fn cost_of_201_exceeds_budget() {
        let (agg, catalog, mut ids, pricey) = owner(20);
        ids[0] = pricey;
        assert!(matches!(
            validate(&agg, &catalog, &ids),
            Err(GameError::DeckCostExceeded(_))
        ));
    }

    #[test]
    fn huge_costs_do_not_wrap_around() {
        let catalog = Catalog::new(vec![master("ten", 10), master("colossus", u32::MAX)]);
        let now = Utc::now();
        let mut agg = PlayerAggregate::new(Player::new("builder".to_string(), now), 9);
        let mut ids = Vec::new();
        for _ in 0..19 {
            let card = materialize(agg.player.id, catalog.get_by_id("ten").unwrap(), now);
            ids.push(card.id);
            agg.add_card(card);
        }
        let colossus = materialize(agg.player.id, catalog.get_by_id("colossus").unwrap(), now);
        ids.insert(0, colossus.id);
        agg.add_card(colossus);

        // u32::MAX + 190 would wrap to 189 and pass the budget
        assert!(matches!(
            validate(&agg, &catalog, &ids),
            Err(GameError::DeckCostExceeded(_))
        ));
    }
}
