use std::collections::{BTreeMap, HashSet};

use rand::SeedableRng;
use rand_pcg::Lcg64Xsh32;
use uuid::Uuid;

use crate::cards::OwnedCard;
use crate::deck::Deck;
use crate::gacha::GachaHistory;
use crate::player::Player;
use crate::quest::QuestProgress;

/// Everything one player owns. A store transaction works on a copy of this and commits it
/// as a whole, so engines can mutate freely and simply return an error to roll back.
#[derive(Debug, Clone)]
pub struct PlayerAggregate {
    pub player: Player,
    /// Owned cards in acquisition order.
    pub cards: Vec<OwnedCard>,
    pub decks: Vec<Deck>,
    pub quest_progress: BTreeMap<String, QuestProgress>,
    /// Append-only.
    pub gacha_history: Vec<GachaHistory>,
    /// The player's own random stream; advances only when a transaction commits.
    pub rng: Lcg64Xsh32,
}

/// Two copies of the u64 fill the 16 byte PCG seed.
pub fn seed_bytes(seed: u64) -> [u8; 16] {
    let mut seed_bytes = [0u8; 16];
    seed_bytes[0..8].copy_from_slice(&seed.to_le_bytes());
    seed_bytes[8..16].copy_from_slice(&seed.to_le_bytes());
    seed_bytes
}

/// Per-player seed derived from the server seed and the player id.
pub fn player_seed(server_seed: u64, player_id: Uuid) -> u64 {
    let (hi, lo) = player_id.as_u64_pair();
    server_seed ^ hi ^ lo.rotate_left(32)
}

impl PlayerAggregate {
    pub fn new(player: Player, server_seed: u64) -> Self {
        let rng = Lcg64Xsh32::from_seed(seed_bytes(player_seed(server_seed, player.id)));
        PlayerAggregate {
            player,
            cards: Vec::new(),
            decks: Vec::new(),
            quest_progress: BTreeMap::new(),
            gacha_history: Vec::new(),
            rng,
        }
    }

    pub fn card(&self, card_id: Uuid) -> Option<&OwnedCard> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: Uuid) -> Option<&mut OwnedCard> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    pub fn add_card(&mut self, card: OwnedCard) {
        self.cards.push(card);
    }

    /// Owned cards among `ids`, each listed once even if `ids` repeats it.
    pub fn cards_by_ids(&self, ids: &[Uuid]) -> Vec<&OwnedCard> {
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        self.cards.iter().filter(|c| wanted.contains(&c.id)).collect()
    }

    /// Delete the given cards; returns how many were removed.
    pub fn remove_cards(&mut self, ids: &[Uuid]) -> usize {
        let doomed: HashSet<Uuid> = ids.iter().copied().collect();
        let before = self.cards.len();
        self.cards.retain(|c| !doomed.contains(&c.id));
        before - self.cards.len()
    }

    pub fn deck(&self, deck_id: Uuid) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    pub fn deck_mut(&mut self, deck_id: Uuid) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.id == deck_id)
    }
}
